//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials as AwsCredentials;
use tracing::Level;

use super::ConfigError;

const MAX_ATTEMPTS: u32 = 3;
const OPERATION_TIMEOUT_SECS: u64 = 30;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (optionally pointed at `LocalStack`)
    Development {
        /// Optional override for the AWS endpoint, e.g. `http://localhost:4566`
        aws_endpoint_url: Option<String>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVar` if `APP_ENV` contains an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development {
                aws_endpoint_url: env::var("AWS_ENDPOINT_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
            }),
            _ => Err(ConfigError::InvalidVar {
                name: "APP_ENV",
                value: env,
            }),
        }
    }

    /// Whether missing configuration may fall back to built-in defaults
    #[must_use]
    pub const fn allows_defaults(&self) -> bool {
        matches!(self, Self::Development { .. })
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            Self::Production | Self::Staging => None,
            Self::Development { aws_endpoint_url } => aws_endpoint_url.as_deref(),
        }
    }

    /// Shared AWS configuration with retry and timeout settings
    ///
    /// No credentials provider is attached: identity-pool calls are
    /// unauthenticated and S3 calls get per-upload temporary credentials.
    pub async fn aws_config(&self, region: &str) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(MAX_ATTEMPTS)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(OPERATION_TIMEOUT_SECS))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .no_credentials();

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// S3 client configuration signed with the given temporary credentials
    #[must_use]
    pub fn s3_client_config(
        &self,
        sdk_config: &aws_config::SdkConfig,
        credentials: AwsCredentials,
    ) -> aws_sdk_s3::Config {
        let s3_config: aws_sdk_s3::Config = sdk_config.into();
        let mut builder = s3_config.to_builder().credentials_provider(credentials);

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.override_aws_endpoint_url().is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Tracing level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        env::remove_var("AWS_ENDPOINT_URL");
        assert_eq!(
            Environment::from_env().unwrap(),
            Environment::Development {
                aws_endpoint_url: None
            }
        );

        env::set_var("APP_ENV", "Staging ");
        assert_eq!(Environment::from_env().unwrap(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env().unwrap(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let err = Environment::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for APP_ENV: invalid");
        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_development_endpoint_override() {
        env::set_var("APP_ENV", "development");
        env::set_var("AWS_ENDPOINT_URL", "http://localhost:4566");

        let env = Environment::from_env().unwrap();
        assert_eq!(env.override_aws_endpoint_url(), Some("http://localhost:4566"));
        assert!(env.allows_defaults());
        assert!(!env.json_logs());

        // Blank values are ignored
        env::set_var("AWS_ENDPOINT_URL", "  ");
        let env = Environment::from_env().unwrap();
        assert_eq!(env.override_aws_endpoint_url(), None);

        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_tracing_level() {
        env::remove_var("TRACING_LEVEL");
        assert_eq!(Environment::Production.tracing_level(), Level::INFO);
        assert_eq!(
            Environment::Development {
                aws_endpoint_url: None
            }
            .tracing_level(),
            Level::DEBUG
        );

        env::set_var("TRACING_LEVEL", "warn");
        assert_eq!(Environment::Production.tracing_level(), Level::WARN);
        env::remove_var("TRACING_LEVEL");
    }
}
