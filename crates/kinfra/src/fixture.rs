use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use kinfra_client::MemoryClient;
use kinfra_client::MemoryClientError;
use kinfra_client::StoreClient;
use kinfra_client::StoreClientError;
use kinfra_types::K8Obj;
use kinfra_types::ObjectKey;
use kinfra_types::Spec;

/// memory store that counts the calls it receives
#[derive(Debug, Default)]
pub struct CountingClient {
    inner: MemoryClient,
    pub gets: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl CountingClient {
    pub fn calls(&self) -> usize {
        [&self.gets, &self.creates, &self.updates, &self.deletes]
            .iter()
            .map(|counter| counter.load(Ordering::SeqCst))
            .sum()
    }
}

#[async_trait]
impl StoreClient for CountingClient {
    type StoreClientError = MemoryClientError;

    async fn retrieve_item<S>(&self, key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.retrieve_item(key).await
    }

    async fn create_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_item(value).await
    }

    async fn update_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_item(value).await
    }

    async fn delete_item<S>(&self, key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec,
    {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_item::<S>(key).await
    }
}

/// memory store whose reads never see any object
#[derive(Debug, Default)]
pub struct LaggingClient {
    pub inner: MemoryClient,
}

#[async_trait]
impl StoreClient for LaggingClient {
    type StoreClientError = MemoryClientError;

    async fn retrieve_item<S>(&self, key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        Err(MemoryClientError::NotFound(S::label(), key.clone()))
    }

    async fn create_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        self.inner.create_item(value).await
    }

    async fn update_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        self.inner.update_item(value).await
    }

    async fn delete_item<S>(&self, key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec,
    {
        self.inner.delete_item::<S>(key).await
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
pub struct ConnectionRefused;

impl StoreClientError for ConnectionRefused {
    fn not_found(&self) -> bool {
        false
    }
}

/// store that is never reachable
#[derive(Debug, Default)]
pub struct BrokenClient;

#[async_trait]
impl StoreClient for BrokenClient {
    type StoreClientError = ConnectionRefused;

    async fn retrieve_item<S>(&self, _key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        Err(ConnectionRefused)
    }

    async fn create_item<S>(&self, _value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        Err(ConnectionRefused)
    }

    async fn update_item<S>(&self, _value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        Err(ConnectionRefused)
    }

    async fn delete_item<S>(&self, _key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec,
    {
        Err(ConnectionRefused)
    }
}
