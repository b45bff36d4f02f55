use std::fmt;

use http::header::InvalidHeaderValue;
use thiserror::Error;

use crate::BoxedError;

/// Static access key pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredential {
    pub key_id: String,
    pub secret_key: String,
}

impl fmt::Debug for AwsCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredential")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("failed to read request payload for signing: {0}")]
    SignHashFailed(#[source] BoxedError),
    #[error("signed header is not a valid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}
