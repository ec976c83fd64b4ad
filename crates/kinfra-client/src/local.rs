use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_lock::RwLock;
use async_trait::async_trait;
use tracing::debug;
use tracing::trace;
use uuid::Uuid;

use kinfra_types::K8Obj;
use kinfra_types::ObjectKey;
use kinfra_types::Spec;

use crate::StoreClient;
use crate::StoreClientError;

/// directory holding cluster scoped objects of a kind
const CLUSTER_SCOPE_DIR: &str = "_cluster";

/// File backed store. Each object is a yaml file at
/// `<root>/<kind>/<namespace>/<name>.yaml`.
#[derive(Debug)]
pub struct LocalClient {
    path: PathBuf,
    lock: RwLock<()>,
}

impl LocalClient {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn spec_file_name<S: Spec>(&self, key: &ObjectKey) -> Result<PathBuf, LocalClientError> {
        for part in [&key.name, &key.namespace] {
            if part.contains(['/', '\\']) || part == ".." || part == "." {
                return Err(LocalClientError::InvalidKey(key.clone()));
            }
        }
        if key.name.is_empty() {
            return Err(LocalClientError::InvalidKey(key.clone()));
        }

        let scope = if key.namespace.is_empty() {
            CLUSTER_SCOPE_DIR
        } else {
            key.namespace.as_str()
        };

        Ok(self
            .path
            .join(S::label())
            .join(scope)
            .join(format!("{}.yaml", key.name)))
    }

    fn read<S: Spec>(path: &Path) -> Result<Option<K8Obj<S>>, LocalClientError> {
        match File::open(path) {
            Ok(file) => Ok(Some(serde_yaml::from_reader(file)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn flush<S: Spec>(path: &Path, value: &K8Obj<S>) -> Result<(), LocalClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        serde_yaml::to_writer(File::create(path)?, value)?;
        Ok(())
    }
}

#[async_trait]
impl StoreClient for LocalClient {
    type StoreClientError = LocalClientError;

    async fn retrieve_item<S>(&self, key: &ObjectKey) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let path = self.spec_file_name::<S>(key)?;
        trace!(path = %path.display(), "reading");

        let _read = self.lock.read().await;
        Self::read::<S>(&path)?.ok_or_else(|| LocalClientError::NotFound(S::label(), key.clone()))
    }

    async fn create_item<S>(&self, mut value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let key = value.key();
        let path = self.spec_file_name::<S>(&key)?;

        let _write = self.lock.write().await;
        if path.exists() {
            return Err(LocalClientError::AlreadyExists(S::label(), key));
        }

        value.api_version = S::api_version();
        value.kind = S::kind();
        value.metadata.uid = Uuid::new_v4().to_string();
        value.metadata.resource_version = "1".to_owned();
        Self::flush(&path, &value)?;

        debug!(kind = S::label(), %key, path = %path.display(), "created");
        Ok(value)
    }

    async fn update_item<S>(&self, mut value: K8Obj<S>) -> Result<K8Obj<S>, Self::StoreClientError>
    where
        S: Spec,
    {
        let key = value.key();
        let path = self.spec_file_name::<S>(&key)?;

        let _write = self.lock.write().await;
        let Some(old) = Self::read::<S>(&path)? else {
            return Err(LocalClientError::NotFound(S::label(), key));
        };

        let revision: u64 = old.metadata.resource_version.parse().map_err(|_| {
            LocalClientError::InvalidResourceVersion(key.clone(), old.metadata.resource_version.clone())
        })?;
        value.api_version = S::api_version();
        value.kind = S::kind();
        value.metadata.uid = old.metadata.uid;
        value.metadata.resource_version = (revision + 1).to_string();
        Self::flush(&path, &value)?;

        debug!(kind = S::label(), %key, version = %value.metadata.resource_version, "updated");
        Ok(value)
    }

    async fn delete_item<S>(&self, key: &ObjectKey) -> Result<(), Self::StoreClientError>
    where
        S: Spec,
    {
        let path = self.spec_file_name::<S>(key)?;

        let _write = self.lock.write().await;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(kind = S::label(), %key, "deleted");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(LocalClientError::NotFound(S::label(), key.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocalClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Yaml serialization error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("invalid object key {0:?}")]
    InvalidKey(ObjectKey),
    #[error("{0} has invalid resource version {1:?}")]
    InvalidResourceVersion(ObjectKey, String),
    #[error("{0} {1} not found")]
    NotFound(&'static str, ObjectKey),
    #[error("{0} {1} already exists")]
    AlreadyExists(&'static str, ObjectKey),
}

impl StoreClientError for LocalClientError {
    fn not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }

    fn already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(..))
    }
}
