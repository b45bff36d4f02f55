//! The contract a host's sync layer consumes. A host keeps its own
//! [`StorageRegistry`] and picks a backend by mode name; backends only implement
//! [`Storage`].

use std::{collections::BTreeMap, fmt, future::Future, pin::Pin, sync::Arc};

use bytes::Bytes;

use crate::remotes::aws::{S3Storage, VerificationError};

pub trait Storage: Send + Sync {
    /// Stable identifier a host stores in its settings, e.g. `"s3"`.
    fn mode(&self) -> &'static str;

    /// Human readable name.
    fn name(&self) -> &'static str;

    fn put_file(
        &self,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), VerificationError>> + Send;

    fn get_file(&self, key: &str) -> impl Future<Output = Result<String, VerificationError>> + Send;

    fn delete_file(&self, key: &str) -> impl Future<Output = Result<(), VerificationError>> + Send;

    fn file_exists(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<bool, VerificationError>> + Send;
}

type StorageFuture<'s, T> = Pin<Box<dyn Future<Output = Result<T, VerificationError>> + Send + 's>>;

/// Object safe form of [`Storage`], implemented for every [`Storage`].
pub trait DynStorage: Send + Sync {
    fn mode(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn put_file<'s>(&'s self, key: &'s str, content: Bytes) -> StorageFuture<'s, ()>;

    fn get_file<'s>(&'s self, key: &'s str) -> StorageFuture<'s, String>;

    fn delete_file<'s>(&'s self, key: &'s str) -> StorageFuture<'s, ()>;

    fn file_exists<'s>(&'s self, key: &'s str) -> StorageFuture<'s, bool>;
}

impl<S: Storage> DynStorage for S {
    fn mode(&self) -> &'static str {
        Storage::mode(self)
    }

    fn name(&self) -> &'static str {
        Storage::name(self)
    }

    fn put_file<'s>(&'s self, key: &'s str, content: Bytes) -> StorageFuture<'s, ()> {
        Box::pin(Storage::put_file(self, key, content))
    }

    fn get_file<'s>(&'s self, key: &'s str) -> StorageFuture<'s, String> {
        Box::pin(Storage::get_file(self, key))
    }

    fn delete_file<'s>(&'s self, key: &'s str) -> StorageFuture<'s, ()> {
        Box::pin(Storage::delete_file(self, key))
    }

    fn file_exists<'s>(&'s self, key: &'s str) -> StorageFuture<'s, bool> {
        Box::pin(Storage::file_exists(self, key))
    }
}

impl Storage for S3Storage {
    fn mode(&self) -> &'static str {
        "s3"
    }

    fn name(&self) -> &'static str {
        "Amazon S3"
    }

    fn put_file(
        &self,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), VerificationError>> + Send {
        S3Storage::put_file(self, key, content)
    }

    fn get_file(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<String, VerificationError>> + Send {
        S3Storage::get_file(self, key)
    }

    fn delete_file(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), VerificationError>> + Send {
        S3Storage::delete_file(self, key)
    }

    fn file_exists(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<bool, VerificationError>> + Send {
        S3Storage::file_exists(self, key)
    }
}

/// Storage backends known to a host, keyed by [`DynStorage::mode`].
#[derive(Default, Clone)]
pub struct StorageRegistry {
    backends: BTreeMap<&'static str, Arc<dyn DynStorage>>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the backend previously registered under the same mode.
    pub fn register(&mut self, storage: Arc<dyn DynStorage>) -> Option<Arc<dyn DynStorage>> {
        self.backends.insert(storage.mode(), storage)
    }

    pub fn unregister(&mut self, mode: &str) -> Option<Arc<dyn DynStorage>> {
        self.backends.remove(mode)
    }

    pub fn get(&self, mode: &str) -> Option<Arc<dyn DynStorage>> {
        self.backends.get(mode).cloned()
    }

    pub fn modes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.backends.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for StorageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.modes()).finish()
    }
}
