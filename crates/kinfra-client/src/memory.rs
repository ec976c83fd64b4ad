use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_lock::Mutex;
use async_lock::RwLock;
use async_trait::async_trait;
use serde_yaml::Value;
use tracing::debug;
use tracing::trace;
use uuid::Uuid;

use kinfra_types::K8Obj;
use kinfra_types::ObjectKey;
use kinfra_types::Spec;

use crate::StoreClient;
use crate::StoreClientError;

/// objects of a single kind
#[derive(Debug, Default)]
struct SpecStore {
    data: RwLock<HashMap<ObjectKey, Value>>,
}

impl SpecStore {
    async fn get<S>(&self, key: &ObjectKey) -> Result<Option<K8Obj<S>>, MemoryClientError>
    where
        S: Spec,
    {
        let lock = self.data.read().await;
        let Some(value) = lock.get(key) else {
            return Ok(None);
        };

        let output = value.clone();
        drop(lock);

        Ok(Some(serde_yaml::from_value(output)?))
    }
}

/// In-memory store. Every kind gets its own keyspace.
#[derive(Debug, Default)]
pub struct MemoryClient {
    data: Mutex<HashMap<&'static str, Arc<SpecStore>>>,
    version: AtomicU64,
}

impl MemoryClient {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn get_store<S: Spec>(&self) -> Arc<SpecStore> {
        let mut stores = self.data.lock().await;
        stores.entry(S::label()).or_default().clone()
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// number of objects of kind `S`
    pub async fn count<S: Spec>(&self) -> usize {
        let store = self.get_store::<S>().await;
        let lock = store.data.read().await;
        lock.len()
    }
}

#[async_trait]
impl StoreClient for MemoryClient {
    type StoreClientError = MemoryClientError;

    async fn retrieve_item<S>(&self, key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let store = self.get_store::<S>().await;
        trace!(kind = S::label(), %key, "retrieving");

        store
            .get::<S>(key)
            .await?
            .ok_or_else(|| MemoryClientError::NotFound(S::label(), key.clone()))
    }

    async fn create_item<S>(&self, mut value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let store = self.get_store::<S>().await;
        let key = value.key();

        let mut lock = store.data.write().await;
        if lock.contains_key(&key) {
            return Err(MemoryClientError::AlreadyExists(S::label(), key));
        }

        value.api_version = S::api_version();
        value.kind = S::kind();
        value.metadata.uid = Uuid::new_v4().to_string();
        value.metadata.resource_version = self.next_version();

        lock.insert(key.clone(), serde_yaml::to_value(&value)?);
        drop(lock);

        debug!(kind = S::label(), %key, "created");
        Ok(value)
    }

    async fn update_item<S>(&self, mut value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let store = self.get_store::<S>().await;
        let key = value.key();

        let mut lock = store.data.write().await;
        let Some(old_value) = lock.get(&key) else {
            return Err(MemoryClientError::NotFound(S::label(), key));
        };
        let old: K8Obj<S> = serde_yaml::from_value(old_value.clone())?;

        value.api_version = S::api_version();
        value.kind = S::kind();
        value.metadata.uid = old.metadata.uid;
        value.metadata.resource_version = self.next_version();

        lock.insert(key.clone(), serde_yaml::to_value(&value)?);
        drop(lock);

        debug!(kind = S::label(), %key, version = %value.metadata.resource_version, "updated");
        Ok(value)
    }

    async fn delete_item<S>(&self, key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec,
    {
        let store = self.get_store::<S>().await;

        let mut lock = store.data.write().await;
        if lock.remove(key).is_none() {
            return Err(MemoryClientError::NotFound(S::label(), key.clone()));
        }
        drop(lock);

        debug!(kind = S::label(), %key, "deleted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryClientError {
    #[error("Yaml serialization error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("{0} {1} not found")]
    NotFound(&'static str, ObjectKey),
    #[error("{0} {1} already exists")]
    AlreadyExists(&'static str, ObjectKey),
}

impl StoreClientError for MemoryClientError {
    fn not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }

    fn already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(..))
    }
}
