use std::{fmt, sync::Arc};

use bytes::Bytes;
use http::{header::CONTENT_LENGTH, Method, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Empty, Full};
use tracing::{debug, warn};

use super::{
    credential::AwsCredential,
    crypto::{RingCrypto, SigningCrypto},
    location::{Addressing, ObjectLocation},
    sign::{AwsAuthorizer, Sign},
    S3Error, VerificationError,
};
use crate::{
    options::{ConfigError, StorageConfig},
    remotes::http::{BoxBody, DynHttpClient, HttpClient, HttpError},
    BoxedError,
};

pub struct S3StorageBuilder {
    config: StorageConfig,
    client: Option<Box<dyn DynHttpClient>>,
    crypto: Box<dyn SigningCrypto>,
}

impl S3StorageBuilder {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            client: None,
            crypto: Box::new(RingCrypto),
        }
    }

    pub fn client(mut self, client: impl HttpClient + 'static) -> Self {
        self.client = Some(Box::new(client));
        self
    }

    pub fn crypto(mut self, crypto: impl SigningCrypto + 'static) -> Self {
        self.crypto = Box::new(crypto);
        self
    }

    pub fn build(self) -> Result<S3Storage, ConfigError> {
        self.config.validate()?;
        let addressing = Addressing::resolve(&self.config)?;
        let client = match self.client {
            Some(client) => client,
            None => default_client()?,
        };

        Ok(S3Storage {
            inner: Arc::new(S3StorageInner {
                credential: self.config.credential(),
                config: self.config,
                addressing,
                client,
                crypto: self.crypto,
            }),
        })
    }
}

#[cfg(feature = "tokio-http")]
fn default_client() -> Result<Box<dyn DynHttpClient>, ConfigError> {
    Ok(Box::new(crate::remotes::http::tokio::TokioClient::new()))
}

#[cfg(not(feature = "tokio-http"))]
fn default_client() -> Result<Box<dyn DynHttpClient>, ConfigError> {
    Err(ConfigError::MissingHttpClient)
}

/// Object storage on one bucket. Cheap to clone; clones share configuration and
/// the HTTP client, and any number of operations may run concurrently.
#[derive(Clone)]
pub struct S3Storage {
    inner: Arc<S3StorageInner>,
}

struct S3StorageInner {
    config: StorageConfig,
    credential: AwsCredential,
    addressing: Addressing,
    client: Box<dyn DynHttpClient>,
    crypto: Box<dyn SigningCrypto>,
}

impl fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Storage")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl S3Storage {
    pub fn new(config: StorageConfig) -> Result<Self, ConfigError> {
        S3StorageBuilder::new(config).build()
    }

    pub fn config(&self) -> &StorageConfig {
        &self.inner.config
    }

    pub fn bucket(&self) -> &str {
        self.inner.config.bucket()
    }

    pub fn location(&self, key: &str) -> ObjectLocation {
        self.inner.addressing.locate(self.bucket(), key)
    }

    pub fn url(&self, key: &str) -> String {
        self.location(key).url().to_string()
    }

    #[tracing::instrument(skip(self, content), fields(bucket = %self.bucket()))]
    pub async fn put_file(
        &self,
        key: &str,
        content: impl Into<Bytes>,
    ) -> Result<(), VerificationError> {
        let content = content.into();
        debug!(len = content.len(), "uploading object");
        async {
            let response = self.send(Method::PUT, key, Full::new(content)).await?;
            ensure_success(response).await?;
            Ok::<_, S3Error>(())
        }
        .await
        .map_err(|e| VerificationError::new(key, e))
    }

    /// Object body decoded as UTF-8 text, invalid sequences replaced.
    pub async fn get_file(&self, key: &str) -> Result<String, VerificationError> {
        let body = self.get_file_bytes(key).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket()))]
    pub async fn get_file_bytes(&self, key: &str) -> Result<Bytes, VerificationError> {
        self.fetch(key)
            .await
            .map_err(|e| VerificationError::new(key, e))
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket()))]
    pub async fn delete_file(&self, key: &str) -> Result<(), VerificationError> {
        async {
            let response = self.send(Method::DELETE, key, Empty::new()).await?;
            ensure_success(response).await?;
            Ok::<_, S3Error>(())
        }
        .await
        .map_err(|e| VerificationError::new(key, e))
    }

    /// `Ok(false)` only for a 404; every other non-success answer is an error.
    #[tracing::instrument(skip(self), fields(bucket = %self.bucket()))]
    pub async fn file_exists(&self, key: &str) -> Result<bool, VerificationError> {
        let response = self
            .send(Method::HEAD, key, Empty::new())
            .await
            .map_err(|e| VerificationError::new(key, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::NOT_FOUND {
            debug!("object not found");
            return Ok(false);
        }
        Err(VerificationError::new(key, not_success(response).await))
    }

    async fn fetch(&self, key: &str) -> Result<Bytes, S3Error> {
        let response = ensure_success(self.send(Method::GET, key, Empty::new()).await?).await?;
        let body = response.into_body().collect().await?.to_bytes();
        debug!(len = body.len(), "downloaded object");
        Ok(body)
    }

    async fn send<B>(
        &self,
        method: Method,
        key: &str,
        body: B,
    ) -> Result<Response<BoxBody>, S3Error>
    where
        B: Body<Data = Bytes> + Clone + Send + Sync + 'static,
        B::Error: Into<BoxedError>,
    {
        if key.is_empty() {
            return Err(S3Error::EmptyKey);
        }
        let location = self.location(key);
        let mut builder = Request::builder().method(method).uri(location.url());
        // S3 rejects uploads framed as chunked or without a length
        if builder.method_ref() == Some(&Method::PUT) {
            let len = body.size_hint().exact().ok_or(S3Error::UnknownLength)?;
            builder = builder.header(CONTENT_LENGTH, len);
        }
        let mut request = builder.body(body).map_err(HttpError::from)?;

        let authorizer = AwsAuthorizer::new(
            &self.inner.credential,
            self.inner.config.region(),
            self.inner.crypto.as_ref(),
        );
        request.sign(&authorizer, &location).await?;

        debug!(method = %request.method(), url = location.url(), "sending signed request");
        let response = self.inner.client.send_request(request).await?;
        debug!(status = %response.status(), "received response");
        Ok(response)
    }
}

async fn ensure_success(response: Response<BoxBody>) -> Result<Response<BoxBody>, S3Error> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(not_success(response).await)
    }
}

async fn not_success(response: Response<BoxBody>) -> S3Error {
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();
    warn!(%status, "S3 request was not successful");

    HttpError::HttpNotSuccess {
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
    .into()
}
