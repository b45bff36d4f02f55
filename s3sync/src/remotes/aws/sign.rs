//! AWS Signature Version 4 for single-shot S3 object requests.
//!
//! The signed header set is fixed to `host;x-amz-content-sha256;x-amz-date`, the
//! query string is always empty and the payload is always hashed, which is all a
//! plain `PUT`/`GET`/`DELETE`/`HEAD` on one key needs.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{
    header::{HeaderValue, AUTHORIZATION},
    HeaderMap, Method, Request,
};
use http_body::Body;
use http_body_util::BodyExt;

use super::{
    credential::{AuthorizeError, AwsCredential},
    crypto::{RingCrypto, SigningCrypto},
    location::ObjectLocation,
};
use crate::BoxedError;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";
pub const DATE_HEADER: &str = "x-amz-date";
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";

const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// The three headers that authenticate one request. Bound to a single instant and
/// payload, so a fresh set is produced for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    amz_date: String,
    content_sha256: String,
    authorization: String,
}

impl SignedHeaders {
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    pub fn content_sha256(&self) -> &str {
        &self.content_sha256
    }

    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AuthorizeError> {
        headers.insert(DATE_HEADER, HeaderValue::from_str(&self.amz_date)?);
        headers.insert(
            CONTENT_SHA256_HEADER,
            HeaderValue::from_str(&self.content_sha256)?,
        );
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&self.authorization)?);
        Ok(())
    }
}

pub struct AwsAuthorizer<'a, C: SigningCrypto + ?Sized = RingCrypto> {
    credential: &'a AwsCredential,
    region: &'a str,
    crypto: &'a C,
}

impl<'a, C: SigningCrypto + ?Sized> AwsAuthorizer<'a, C> {
    pub fn new(credential: &'a AwsCredential, region: &'a str, crypto: &'a C) -> Self {
        Self {
            credential,
            region,
            crypto,
        }
    }

    pub fn sign(
        &self,
        method: &Method,
        location: &ObjectLocation,
        payload: &[u8],
    ) -> SignedHeaders {
        self.sign_at(method, location, payload, Utc::now())
    }

    /// Signing is a pure function of its inputs; `sign` only supplies the clock.
    pub fn sign_at(
        &self,
        method: &Method,
        location: &ObjectLocation,
        payload: &[u8],
        at: DateTime<Utc>,
    ) -> SignedHeaders {
        let amz_date = at.format(AMZ_DATE_FORMAT).to_string();
        let date_stamp = &amz_date[..8];
        let payload_hash = hex::encode(self.crypto.sha256(payload));

        let canonical_request = canonical_request(method, location, &payload_hash, &amz_date);
        tracing::trace!(%canonical_request, "built canonical request");

        let scope = self.credential_scope(date_stamp);
        let string_to_sign = self.string_to_sign(&amz_date, &scope, &canonical_request);
        let signing_key = self.signing_key(date_stamp);
        let signature = hex::encode(
            self.crypto
                .hmac_sha256(&signing_key, string_to_sign.as_bytes()),
        );

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, \
             Signature={signature}",
            self.credential.key_id,
        );

        SignedHeaders {
            amz_date,
            content_sha256: payload_hash,
            authorization,
        }
    }

    pub fn credential_scope(&self, date_stamp: &str) -> String {
        format!("{date_stamp}/{}/{SERVICE}/{TERMINATOR}", self.region)
    }

    pub fn string_to_sign(&self, amz_date: &str, scope: &str, canonical_request: &str) -> String {
        let hashed_request = hex::encode(self.crypto.sha256(canonical_request.as_bytes()));
        format!("{ALGORITHM}\n{amz_date}\n{scope}\n{hashed_request}")
    }

    /// `kSigning` of the SigV4 key chain for one day and this region.
    pub fn signing_key(&self, date_stamp: &str) -> [u8; 32] {
        let secret = format!("AWS4{}", self.credential.secret_key);
        let date_key = self
            .crypto
            .hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
        let region_key = self.crypto.hmac_sha256(&date_key, self.region.as_bytes());
        let service_key = self.crypto.hmac_sha256(&region_key, SERVICE.as_bytes());
        self.crypto.hmac_sha256(&service_key, TERMINATOR.as_bytes())
    }
}

pub fn canonical_request(
    method: &Method,
    location: &ObjectLocation,
    payload_hash: &str,
    amz_date: &str,
) -> String {
    let canonical_headers = format!(
        "host:{}\n{CONTENT_SHA256_HEADER}:{payload_hash}\n{DATE_HEADER}:{amz_date}\n",
        location.host()
    );
    [
        method.as_str(),
        location.canonical_uri(),
        "",
        &canonical_headers,
        SIGNED_HEADERS,
        payload_hash,
    ]
    .join("\n")
}

pub(crate) trait Sign {
    async fn sign<C: SigningCrypto + ?Sized>(
        &mut self,
        authorizer: &AwsAuthorizer<'_, C>,
        location: &ObjectLocation,
    ) -> Result<(), AuthorizeError>;
}

impl<B> Sign for Request<B>
where
    B: Body<Data = Bytes> + Clone,
    B::Error: Into<BoxedError>,
{
    async fn sign<C: SigningCrypto + ?Sized>(
        &mut self,
        authorizer: &AwsAuthorizer<'_, C>,
        location: &ObjectLocation,
    ) -> Result<(), AuthorizeError> {
        let payload = self
            .body()
            .clone()
            .collect()
            .await
            .map_err(|e| AuthorizeError::SignHashFailed(e.into()))?
            .to_bytes();

        authorizer
            .sign(self.method(), location, &payload)
            .apply(self.headers_mut())
    }
}
