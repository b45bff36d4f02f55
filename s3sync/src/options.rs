//! Connection settings for one storage backend.

use std::{env, fmt};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::remotes::aws::AwsCredential;

pub const BUCKET_ENV: &str = "S3_BUCKET";
pub const REGION_ENV: &str = "AWS_REGION";
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENDPOINT_ENV: &str = "S3_ENDPOINT";

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("environment variable `{name}` is not usable: {source}")]
    Env {
        name: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint `{endpoint}`: {reason}")]
    UnsupportedEndpoint {
        endpoint: String,
        reason: &'static str,
    },
    #[error("no http client configured, enable `tokio-http` or pass one to the builder")]
    MissingHttpClient,
}

/// Bucket, region, credentials and an optional custom endpoint.
///
/// With an endpoint, objects are addressed path style (`{endpoint}/{bucket}/{key}`),
/// which is what local S3-compatible servers expect. Without one, AWS
/// virtual-hosted addressing is used.
///
/// Deserializes from the camelCase keys a host stores its preferences under:
/// ```
/// # use s3sync::StorageConfig;
/// let config: StorageConfig = serde_json::from_str(
///     r#"{"bucket":"notes","region":"eu-central-1","accessKeyId":"AKID",
///         "secretAccessKey":"SECRET","endpoint":""}"#,
/// )
/// .unwrap();
/// assert_eq!(config.endpoint(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    bucket: String,
    #[serde(default = "default_region")]
    region: String,
    access_key_id: String,
    secret_access_key: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    endpoint: Option<String>,
}

impl StorageConfig {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            endpoint: None,
        }
    }

    /// A blank endpoint means "not set".
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into()).filter(|e| !e.trim().is_empty());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &'static str| {
            env::var(name).map_err(|source| ConfigError::Env { name, source })
        };

        let config = Self::new(
            var(BUCKET_ENV)?,
            env::var(REGION_ENV).unwrap_or_else(|_| default_region()),
            var(ACCESS_KEY_ID_ENV)?,
            var(SECRET_ACCESS_KEY_ENV)?,
        );
        Ok(match env::var(ENDPOINT_ENV) {
            Ok(endpoint) => config.with_endpoint(endpoint),
            Err(_) => config,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn credential(&self) -> AwsCredential {
        AwsCredential {
            key_id: self.access_key_id.clone(),
            secret_key: self.secret_access_key.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("bucket", &self.bucket),
            ("region", &self.region),
            ("accessKeyId", &self.access_key_id),
            ("secretAccessKey", &self.secret_access_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let endpoint = Option::<String>::deserialize(deserializer)?;
    Ok(endpoint.filter(|e| !e.trim().is_empty()))
}
