//!
//! # Client configuration
//!
//! Which store the builders talk to, read from a toml file:
//!
//! ```toml
//! namespace = "metallb-system"
//!
//! [store]
//! type = "local"
//! path = "/var/lib/kinfra"
//! ```
//!
use std::fmt::Debug;
use std::fs::File;
use std::fs::read_to_string;
use std::io::Error as IoError;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIRECTORY: &str = ".kinfra";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORE_DIRECTORY: &str = "store";

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("IoError: {0}")]
    IoError(IoError),
    #[error("TomlError: {0}")]
    TomlError(toml::de::Error),
}

pub trait SaveLoadConfig {
    fn save_to<T: AsRef<Path>>(&self, path: T) -> Result<(), IoError>;
    fn load_from<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError>
    where
        Self: Sized;
    fn load_str(config: &str) -> Result<Self, LoadConfigError>
    where
        Self: Sized;
}

impl<S> SaveLoadConfig for S
where
    S: Serialize + DeserializeOwned + Debug,
{
    fn save_to<T: AsRef<Path>>(&self, path: T) -> Result<(), IoError> {
        let path_ref = path.as_ref();
        debug!(?path_ref, "saving config");
        let toml = toml::to_string(self).map_err(IoError::other)?;

        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path_ref)?;
        file.write_all(toml.as_bytes())?;
        file.sync_all()
    }

    fn load_from<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError> {
        let path_ref = path.as_ref();
        debug!(?path_ref, "loading from");

        let file_str = read_to_string(path_ref).map_err(LoadConfigError::IoError)?;
        Self::load_str(&file_str)
    }

    fn load_str(config: &str) -> Result<Self, LoadConfigError> {
        toml::from_str(config).map_err(LoadConfigError::TomlError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// objects live only as long as the process
    Memory,
    /// objects are yaml files under `path`
    Local { path: PathBuf },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Local {
            path: default_base_path().join(STORE_DIRECTORY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// namespace used when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
}

impl ClientConfig {
    /// `~/.kinfra/config.toml`
    pub fn default_file_path() -> PathBuf {
        default_base_path().join(CONFIG_FILE_NAME)
    }

    /// load config at `path`, falling back to defaults when the file is missing
    pub fn load_or_default<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError> {
        match Self::load_from(path.as_ref()) {
            Ok(config) => Ok(config),
            Err(LoadConfigError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.as_ref().display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }
}

fn default_base_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIRECTORY)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_str() {
        let config = ClientConfig::load_str(
            r#"
namespace = "metallb-system"

[store]
type = "local"
path = "/var/lib/kinfra"
"#,
        )
        .expect("parse");

        assert_eq!(config.namespace.as_deref(), Some("metallb-system"));
        assert_eq!(
            config.store,
            StoreConfig::Local {
                path: PathBuf::from("/var/lib/kinfra")
            }
        );
    }

    #[test]
    fn test_memory_store() {
        let config = ClientConfig::load_str("[store]\ntype = \"memory\"\n").expect("parse");
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.namespace, None);
    }

    #[test]
    fn test_invalid_config() {
        let err = ClientConfig::load_str("[store]\ntype = \"etcd\"\n").expect_err("unknown store");
        assert!(matches!(err, LoadConfigError::TomlError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("temp dir created");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = ClientConfig {
            namespace: Some("default".to_owned()),
            store: StoreConfig::Local {
                path: dir.path().join("store"),
            },
        };

        config.save_to(&path).expect("saved");
        let loaded = ClientConfig::load_from(&path).expect("loaded");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir created");
        let config =
            ClientConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, ClientConfig::default());
    }
}
