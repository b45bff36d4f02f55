//! s3sync stores opaque file content in an S3 bucket, or any S3-compatible
//! server, signing every request with AWS Signature Version 4.
//!
//! # Example
//! ```no_run
//! use s3sync::{S3Storage, StorageConfig, VerificationError};
//!
//! async fn sync_note(storage: &S3Storage) -> Result<(), VerificationError> {
//!     storage.put_file("notes/today.md", "# Today").await?;
//!     assert!(storage.file_exists("notes/today.md").await?);
//!     assert_eq!(storage.get_file("notes/today.md").await?, "# Today");
//!     storage.delete_file("notes/today.md").await
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StorageConfig::new("my-bucket", "eu-west-1", "AKID", "SECRET")
//!         .with_endpoint("http://localhost:9000");
//!     let storage = S3Storage::new(config).unwrap();
//!     sync_note(&storage).await.unwrap();
//! }
//! ```

mod error;
pub mod options;
pub mod remotes;
pub mod storage;

pub use error::BoxedError;
pub use options::{ConfigError, StorageConfig};
pub use remotes::aws::{
    AwsAuthorizer, AwsCredential, ObjectLocation, S3Error, S3Storage, S3StorageBuilder,
    SignedHeaders, VerificationError,
};
pub use storage::{DynStorage, Storage, StorageRegistry};
