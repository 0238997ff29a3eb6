//! In-memory storage double with failure injection

use async_trait::async_trait;
use shopfront_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub const TEST_BUCKET_URL: &str = "https://shop-assets.s3.us-east-1.amazonaws.com";

#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_copy: AtomicBool,
    fail_exists: AtomicBool,
    fail_delete: Mutex<HashSet<String>>,
    vanish_on_copy: Mutex<HashSet<String>>,
    deletes: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fail_copies(&self) {
        self.fail_copy.store(true, Ordering::SeqCst);
    }

    pub fn fail_exists_checks(&self) {
        self.fail_exists.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.fail_delete.lock().unwrap().insert(key.to_string());
    }

    /// Remove `key` right before a copy reads it, after any existence check passed
    pub fn vanish_before_copy(&self, key: &str) {
        self.vanish_on_copy.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        self.put(storage_key, &data);
        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.get(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.lock().unwrap().push(storage_key.to_string());
        if self.fail_delete.lock().unwrap().contains(storage_key) {
            return Err(StorageError::DeleteFailed("connection reset".to_string()));
        }
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("timeout".to_string()));
        }
        Ok(self.contains(storage_key))
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<String> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(StorageError::CopyFailed("access denied".to_string()));
        }
        if self.vanish_on_copy.lock().unwrap().remove(from_key) {
            self.objects.lock().unwrap().remove(from_key);
        }
        let data = self
            .get(from_key)
            .ok_or_else(|| StorageError::NotFound(from_key.to_string()))?;
        self.put(to_key, &data);
        Ok(self.public_url(to_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", TEST_BUCKET_URL, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
