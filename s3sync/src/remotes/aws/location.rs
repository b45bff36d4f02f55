use percent_encoding::utf8_percent_encode;
use url::Url;

use super::STRICT_ENCODE_SET;
use crate::options::{ConfigError, StorageConfig};

/// Where one object lives: the URL the request goes to, plus the `host` and
/// canonical URI that SigV4 signs over. All three are derived from a single
/// encoding of the key, so the signed path is always the path that is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    url: String,
    host: String,
    canonical_uri: String,
}

impl ObjectLocation {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn canonical_uri(&self) -> &str {
        &self.canonical_uri
    }
}

pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, &STRICT_ENCODE_SET).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Addressing {
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    VirtualHosted { host: String },
    /// `{endpoint}/{bucket}/{key}`
    PathStyle {
        origin: String,
        host: String,
        prefix: String,
    },
}

impl Addressing {
    pub(crate) fn resolve(config: &StorageConfig) -> Result<Self, ConfigError> {
        let Some(endpoint) = config.endpoint() else {
            return Ok(Addressing::VirtualHosted {
                host: format!("{}.s3.{}.amazonaws.com", config.bucket(), config.region()),
            });
        };

        let url = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let unsupported = |reason| ConfigError::UnsupportedEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        if url.query().is_some() || url.fragment().is_some() {
            return Err(unsupported("query strings and fragments are not allowed"));
        }
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(unsupported("endpoint has no host")),
        };

        Ok(Addressing::PathStyle {
            origin: format!("{}://{}", url.scheme(), host),
            prefix: url.path().trim_end_matches('/').to_string(),
            host,
        })
    }

    pub(crate) fn locate(&self, bucket: &str, key: &str) -> ObjectLocation {
        let key = encode_key(key);
        match self {
            Addressing::VirtualHosted { host } => {
                let canonical_uri = format!("/{key}");
                ObjectLocation {
                    url: format!("https://{host}{canonical_uri}"),
                    host: host.clone(),
                    canonical_uri,
                }
            }
            Addressing::PathStyle {
                origin,
                host,
                prefix,
            } => {
                let canonical_uri = format!("{prefix}/{bucket}/{key}");
                ObjectLocation {
                    url: format!("{origin}{canonical_uri}"),
                    host: host.clone(),
                    canonical_uri,
                }
            }
        }
    }
}
