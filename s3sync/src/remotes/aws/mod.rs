pub mod client;
pub mod credential;
pub mod crypto;
mod error;
pub mod location;
pub mod sign;

pub use client::{S3Storage, S3StorageBuilder};
pub use credential::{AuthorizeError, AwsCredential};
pub use crypto::{RingCrypto, SigningCrypto};
pub use error::{S3Error, VerificationError};
pub use location::ObjectLocation;
pub use sign::{AwsAuthorizer, SignedHeaders};

/// Everything outside the RFC 3986 unreserved set is escaped, `/` included, so an
/// object key always occupies exactly one path segment.
const STRICT_ENCODE_SET: percent_encoding::AsciiSet = percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
