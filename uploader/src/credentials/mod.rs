//! Temporary storage credentials issued by an identity pool

mod error;

use std::fmt;
use std::time::SystemTime;

use aws_credential_types::Credentials as AwsCredentials;
use aws_sdk_cognitoidentity::{
    operation::{
        get_credentials_for_identity::GetCredentialsForIdentityOutput, get_id::GetIdOutput,
    },
    Client as CognitoClient,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

pub use error::{AuthError, AuthResult};

const PROVIDER_NAME: &str = "CognitoIdentity";

/// Short-lived credentials for a single upload attempt
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_key: String,
    /// Session token bound to the temporary identity
    pub session_token: String,
    /// Instant after which the credentials are rejected
    pub expiry: DateTime<Utc>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl From<&Credentials> for AwsCredentials {
    fn from(credentials: &Credentials) -> Self {
        Self::new(
            credentials.access_key_id.clone(),
            credentials.secret_key.clone(),
            Some(credentials.session_token.clone()),
            Some(SystemTime::from(credentials.expiry)),
            PROVIDER_NAME,
        )
    }
}

/// Source of temporary credentials
///
/// Implementations must not cache: every call performs a fresh exchange.
#[async_trait::async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Exchanges the configured identity pool id for temporary credentials
    async fn resolve(&self) -> AuthResult<Credentials>;
}

/// Credential broker backed by Amazon Cognito Identity
pub struct CognitoCredentialBroker {
    client: CognitoClient,
    identity_pool_id: String,
}

impl CognitoCredentialBroker {
    /// Creates a new broker for the given identity pool
    ///
    /// # Arguments
    ///
    /// * `sdk_config` - Shared AWS configuration carrying the pool's region
    /// * `identity_pool_id` - Identity pool to exchange for credentials
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig, identity_pool_id: impl Into<String>) -> Self {
        Self {
            client: CognitoClient::new(sdk_config),
            identity_pool_id: identity_pool_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl CredentialBroker for CognitoCredentialBroker {
    async fn resolve(&self) -> AuthResult<Credentials> {
        debug!("Requesting identity from pool: {}", self.identity_pool_id);

        let identity = self
            .client
            .get_id()
            .identity_pool_id(&self.identity_pool_id)
            .send()
            .await
            .map_err(|e| {
                error!("Cognito GetId failed: {e}");
                AuthError::from(e)
            })?;

        let identity_id = identity_id_from(&identity)?;

        let output = self
            .client
            .get_credentials_for_identity()
            .identity_id(identity_id)
            .send()
            .await
            .map_err(|e| {
                error!("Cognito GetCredentialsForIdentity failed: {e}");
                AuthError::from(e)
            })?;

        let credentials = credentials_from(&output)?;

        info!("Resolved temporary credentials expiring at {}", credentials.expiry);

        Ok(credentials)
    }
}

fn identity_id_from(output: &GetIdOutput) -> AuthResult<&str> {
    output
        .identity_id()
        .ok_or(AuthError::MissingField("identity id"))
}

fn credentials_from(output: &GetCredentialsForIdentityOutput) -> AuthResult<Credentials> {
    let credentials = output
        .credentials()
        .ok_or(AuthError::MissingField("credentials"))?;

    let expiration = credentials
        .expiration()
        .ok_or(AuthError::MissingField("expiration"))?;
    let expiry = DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
        .ok_or(AuthError::MissingField("valid expiration"))?;

    Ok(Credentials {
        access_key_id: credentials
            .access_key_id()
            .ok_or(AuthError::MissingField("access key id"))?
            .to_string(),
        secret_key: credentials
            .secret_key()
            .ok_or(AuthError::MissingField("secret key"))?
            .to_string(),
        session_token: credentials
            .session_token()
            .ok_or(AuthError::MissingField("session token"))?
            .to_string(),
        expiry,
    })
}

/// Test doubles for credential resolution
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Duration, Utc};

    use super::{AuthError, AuthResult, CredentialBroker, Credentials};

    /// Broker that either always succeeds or always fails, counting calls
    pub struct MockCredentialBroker {
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockCredentialBroker {
        /// Broker handing out fixed test credentials
        #[must_use]
        pub const fn succeeding() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        /// Broker whose identity pool is rejected
        #[must_use]
        pub const fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of `resolve` calls so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CredentialBroker for MockCredentialBroker {
        async fn resolve(&self) -> AuthResult<Credentials> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                return Err(AuthError::GetId(
                    "NotAuthorizedException: identity pool rejected".to_string(),
                ));
            }

            Ok(Credentials {
                access_key_id: "ASIATESTACCESSKEY".to_string(),
                secret_key: "test-secret-key".to_string(),
                session_token: "test-session-token".to_string(),
                expiry: Utc::now() + Duration::hours(1),
            })
        }
    }
}
