use thiserror::Error;

use crate::BoxedError;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed, status: {status}, body: {body}")]
    HttpNotSuccess {
        status: http::StatusCode,
        body: String,
    },
    #[error(transparent)]
    Http(#[from] http::Error),
    #[cfg(feature = "tokio-http")]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Other(#[from] BoxedError),
}

impl HttpError {
    /// Status code of a response the server actually answered with.
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            HttpError::HttpNotSuccess { status, .. } => Some(*status),
            _ => None,
        }
    }
}
