//! Error types for credential resolution

use aws_sdk_cognitoidentity::{
    error::SdkError,
    operation::{
        get_credentials_for_identity::GetCredentialsForIdentityError, get_id::GetIdError,
    },
};
use thiserror::Error;

/// Result type for credential resolution
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while exchanging the identity pool id for credentials
#[derive(Error, Debug)]
pub enum AuthError {
    /// The identity service rejected the `GetId` call
    #[error("Failed to obtain identity id: {0}")]
    GetId(String),

    /// The identity service rejected the `GetCredentialsForIdentity` call
    #[error("Failed to obtain credentials for identity: {0}")]
    GetCredentials(String),

    /// The identity service answered without a required field
    #[error("Identity service response is missing {0}")]
    MissingField(&'static str),

    /// The identity service could not be reached or timed out
    #[error("Identity service unreachable: {0}")]
    Unreachable(String),

    /// Upstream service error (5xx from the identity service)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl AuthError {
    fn from_sdk<E: std::fmt::Debug>(
        error: SdkError<E>,
        rejected: impl FnOnce(String) -> Self,
    ) -> Self {
        match error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{:?}", service_err.err()))
            }
            SdkError::ServiceError(service_err) => rejected(format!("{:?}", service_err.err())),
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                Self::Unreachable(error.to_string())
            }
            _ => rejected(error.to_string()),
        }
    }
}

impl From<SdkError<GetIdError>> for AuthError {
    fn from(error: SdkError<GetIdError>) -> Self {
        Self::from_sdk(error, Self::GetId)
    }
}

impl From<SdkError<GetCredentialsForIdentityError>> for AuthError {
    fn from(error: SdkError<GetCredentialsForIdentityError>) -> Self {
        Self::from_sdk(error, Self::GetCredentials)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cognitoidentity::error::ErrorMetadata;
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;

    use super::*;

    fn response(status: u16) -> Response {
        Response::new(StatusCode::try_from(status).unwrap(), SdkBody::empty())
    }

    fn get_id_rejected(status: u16) -> SdkError<GetIdError> {
        let err = GetIdError::generic(
            ErrorMetadata::builder()
                .code("NotAuthorizedException")
                .message("identity pool rejected")
                .build(),
        );
        SdkError::service_error(err, response(status))
    }

    #[test]
    fn test_server_errors_are_upstream() {
        assert!(matches!(
            AuthError::from(get_id_rejected(500)),
            AuthError::UpstreamError(_)
        ));
        assert!(matches!(
            AuthError::from(get_id_rejected(503)),
            AuthError::UpstreamError(_)
        ));
    }

    #[test]
    fn test_rejected_pool_id() {
        match AuthError::from(get_id_rejected(400)) {
            AuthError::GetId(message) => assert!(message.contains("NotAuthorizedException")),
            other => panic!("Expected GetId, got {other:?}"),
        }
    }

    #[test]
    fn test_rejected_credentials_exchange() {
        let err = GetCredentialsForIdentityError::generic(
            ErrorMetadata::builder()
                .code("ResourceNotFoundException")
                .build(),
        );
        let err = AuthError::from(SdkError::service_error(err, response(400)));
        assert!(matches!(err, AuthError::GetCredentials(_)));
    }

    #[test]
    fn test_timeout_is_unreachable() {
        let err: SdkError<GetIdError> = SdkError::timeout_error("operation timed out");
        assert!(matches!(AuthError::from(err), AuthError::Unreachable(_)));

        let err: SdkError<GetCredentialsForIdentityError> =
            SdkError::timeout_error("operation timed out");
        assert!(matches!(AuthError::from(err), AuthError::Unreachable(_)));
    }
}
