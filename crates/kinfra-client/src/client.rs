use async_trait::async_trait;
use tracing::debug;

use kinfra_types::K8Obj;
use kinfra_types::ObjectKey;
use kinfra_types::Spec;

/// errors reported by a store client
pub trait StoreClientError: std::error::Error + Send + Sync + 'static {
    /// object addressed by the call is not in the store
    fn not_found(&self) -> bool;

    /// create was refused because the object is already in the store
    fn already_exists(&self) -> bool {
        false
    }
}

/// typed get/create/update/delete access to the object store.
/// kind is taken from the spec type, identity from the key.
#[async_trait]
pub trait StoreClient: Send + Sync {
    type StoreClientError: StoreClientError;

    /// retrieve a single item
    async fn retrieve_item<S>(&self, key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec;

    /// create new object, fails if it is already present
    async fn create_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec;

    /// replace existing object, fails if it is absent
    async fn update_item<S>(&self, value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec;

    async fn delete_item<S>(&self, key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec;

    /// Check if the object exists, return true or false.
    async fn exists<S>(&self, key: &ObjectKey) -> Result<bool, Self::StoreClientError>
    where
        S: Spec,
    {
        debug!(kind = S::label(), %key, "check if exists");

        match self.retrieve_item::<S>(key).await {
            Ok(_) => Ok(true),
            Err(err) => {
                if err.not_found() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }
}
