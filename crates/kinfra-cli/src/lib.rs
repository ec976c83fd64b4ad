mod demo;
mod profile;
mod resource;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing::debug;

use kinfra_client::LocalClient;
use kinfra_client::MemoryClient;
use kinfra_client::StoreClient;
use kinfra_client::config::ClientConfig;
use kinfra_client::config::StoreConfig;

pub use self::demo::DemoOpt;
pub use self::profile::ProfileOpt;
pub use self::resource::CreateOpt;
pub use self::resource::ResourceKind;
pub use self::resource::ResourceOpt;

#[derive(Debug, Parser)]
#[command(
    name = "kinfra",
    about = "Drive declarative cluster resources through their lifecycle",
    max_term_width = 100
)]
pub struct Root {
    #[clap(flatten)]
    pub opts: GlobalOptions,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Clone, Default)]
pub struct GlobalOptions {
    /// Client config file, defaults to ~/.kinfra/config.toml
    #[arg(long, global = true, env = "KINFRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep objects as yaml files under this directory
    #[arg(long, global = true, env = "KINFRA_STORE", conflicts_with = "memory")]
    pub store: Option<PathBuf>,

    /// Keep objects in memory, they are gone when the command exits
    #[arg(long, global = true)]
    pub memory: bool,
}

impl GlobalOptions {
    /// config file overlaid with command line flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(ClientConfig::default_file_path);
        let mut config = ClientConfig::load_or_default(&path)
            .with_context(|| format!("unable to load config from {}", path.display()))?;

        if self.memory {
            config.store = StoreConfig::Memory;
        } else if let Some(store) = &self.store {
            config.store = StoreConfig::Local {
                path: store.clone(),
            };
        }

        debug!(?config, "client config");
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report whether a resource is in the store
    Exists(ResourceOpt),
    /// Print a resource as yaml
    Get(ResourceOpt),
    /// Create a resource unless it already exists
    Create(CreateOpt),
    /// Delete a resource
    Delete(ResourceOpt),
    /// Print the root device hints of a hardware profile
    Profile(ProfileOpt),
    /// Create and delete a BGP peer step by step
    Demo(DemoOpt),
}

impl Root {
    pub async fn process(self) -> Result<()> {
        let config = self.opts.client_config()?;

        match &config.store {
            StoreConfig::Memory => self.command.process(MemoryClient::new_shared(), &config).await,
            StoreConfig::Local { path } => {
                let client = Arc::new(LocalClient::new(path));
                self.command.process(client, &config).await
            }
        }
    }
}

impl Command {
    pub async fn process<C: StoreClient>(self, client: Arc<C>, config: &ClientConfig) -> Result<()> {
        match self {
            Self::Exists(opt) => opt.exists(client, config).await,
            Self::Get(opt) => opt.get(client, config).await,
            Self::Create(opt) => opt.process(client, config).await,
            Self::Delete(opt) => opt.delete(client, config).await,
            Self::Profile(opt) => opt.process(),
            Self::Demo(opt) => opt.process(client).await,
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    fn parse(command: &str) -> Result<Root, clap::error::Error> {
        Root::try_parse_from(command.split_whitespace())
    }

    #[test]
    fn test_resource_command_parse() {
        let root = parse("kinfra --memory exists --kind bgp-peer --name peer-one -n metallb-system")
            .expect("valid command");

        assert!(root.opts.memory);
        let Command::Exists(opt) = root.command else {
            panic!("expected exists");
        };
        assert_eq!(opt.kind, ResourceKind::BgpPeer);
        assert_eq!(opt.name, "peer-one");
        assert_eq!(opt.namespace.as_deref(), Some("metallb-system"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let root = parse("kinfra demo --store /tmp/kinfra").expect("valid command");
        assert_eq!(root.opts.store, Some(PathBuf::from("/tmp/kinfra")));
        assert!(matches!(root.command, Command::Demo(_)));
    }

    #[test]
    fn test_memory_conflicts_with_store() {
        assert!(parse("kinfra --memory --store /tmp/kinfra demo").is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().expect("temp dir created");
        let opts = GlobalOptions {
            config: Some(dir.path().join("missing.toml")),
            store: Some(dir.path().join("objects")),
            memory: false,
        };

        let config = opts.client_config().expect("config");
        assert_eq!(
            config.store,
            StoreConfig::Local {
                path: dir.path().join("objects")
            }
        );
    }
}
