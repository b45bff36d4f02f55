use http::StatusCode;
use thiserror::Error;

use super::credential::AuthorizeError;
use crate::remotes::http::HttpError;

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("http error: {0}")]
    HttpError(#[from] HttpError),
    #[error("authorize error: {0}")]
    AuthorizeError(#[from] AuthorizeError),
    #[error("object key is empty")]
    EmptyKey,
    #[error("upload body has no exact length")]
    UnknownLength,
}

/// Failure of one storage operation, tagged with the key it was performed on.
#[derive(Debug, Error)]
#[error("S3 verification error for `{key}` ({source})")]
pub struct VerificationError {
    key: String,
    #[source]
    source: S3Error,
}

impl VerificationError {
    pub(crate) fn new(key: impl Into<String>, source: impl Into<S3Error>) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cause(&self) -> &S3Error {
        &self.source
    }

    pub fn into_cause(self) -> S3Error {
        self.source
    }

    /// Status of the non-success response, `None` when no response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.source {
            S3Error::HttpError(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
