use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::ValueEnum;
use tracing::debug;

use kinfra::Presence;
use kinfra::ResourceBuilder;
use kinfra_client::StoreClient;
use kinfra_client::config::ClientConfig;
use kinfra_types::Spec;
use kinfra_types::argocd::ArgoCDSpec;
use kinfra_types::metallb::BfdProfileSpec;
use kinfra_types::metallb::BgpAdvertisementSpec;
use kinfra_types::metallb::BgpPeerSpec;
use kinfra_types::metallb::IpAddressPoolSpec;
use kinfra_types::namespace::NamespaceSpec;
use kinfra_types::networkpolicy::MultiNetworkPolicySpec;

/// namespace used when neither the command nor the config names one
const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Namespace,
    #[value(name = "argocd")]
    ArgoCD,
    MultiNetworkPolicy,
    BgpPeer,
    BfdProfile,
    BgpAdvertisement,
    IpAddressPool,
}

/// run `$body` with `$spec` bound to the schema type of `$kind`
macro_rules! with_spec {
    ($kind:expr, $spec:ident => $body:expr) => {
        match $kind {
            ResourceKind::Namespace => {
                type $spec = NamespaceSpec;
                $body
            }
            ResourceKind::ArgoCD => {
                type $spec = ArgoCDSpec;
                $body
            }
            ResourceKind::MultiNetworkPolicy => {
                type $spec = MultiNetworkPolicySpec;
                $body
            }
            ResourceKind::BgpPeer => {
                type $spec = BgpPeerSpec;
                $body
            }
            ResourceKind::BfdProfile => {
                type $spec = BfdProfileSpec;
                $body
            }
            ResourceKind::BgpAdvertisement => {
                type $spec = BgpAdvertisementSpec;
                $body
            }
            ResourceKind::IpAddressPool => {
                type $spec = IpAddressPoolSpec;
                $body
            }
        }
    };
}

#[derive(Debug, Args)]
pub struct ResourceOpt {
    #[arg(long, value_enum)]
    pub kind: ResourceKind,

    #[arg(long)]
    pub name: String,

    /// Ignored for cluster scoped kinds
    #[arg(short, long)]
    pub namespace: Option<String>,
}

impl ResourceOpt {
    fn builder<S, C>(&self, client: Arc<C>, config: &ClientConfig) -> ResourceBuilder<S, C>
    where
        S: Spec,
        C: StoreClient,
    {
        let namespace = self
            .namespace
            .as_deref()
            .or(config.namespace.as_deref())
            .unwrap_or(DEFAULT_NAMESPACE);
        ResourceBuilder::new(client, self.name.as_str(), namespace)
    }

    pub async fn exists<C: StoreClient>(&self, client: Arc<C>, config: &ClientConfig) -> Result<()> {
        with_spec!(self.kind, S => {
            let mut builder = self.builder::<S, C>(client, config);
            builder.validate()?;
            match builder.presence().await {
                Presence::Present => println!("{} {} exists", S::label(), builder.key()),
                Presence::Absent => println!("{} {} does not exist", S::label(), builder.key()),
                Presence::Unknown(err) => return Err(err.into()),
            }
        });
        Ok(())
    }

    pub async fn get<C: StoreClient>(&self, client: Arc<C>, config: &ClientConfig) -> Result<()> {
        with_spec!(self.kind, S => {
            let object = self.builder::<S, C>(client, config).get().await?;
            print!("{}", serde_yaml::to_string(&object)?);
        });
        Ok(())
    }

    pub async fn delete<C: StoreClient>(&self, client: Arc<C>, config: &ClientConfig) -> Result<()> {
        with_spec!(self.kind, S => {
            let mut builder = self.builder::<S, C>(client, config);
            builder.delete().await?;
            println!("{} {} deleted", S::label(), builder.key());
        });
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct CreateOpt {
    #[clap(flatten)]
    pub resource: ResourceOpt,

    /// Yaml file holding the spec of the new resource
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,
}

impl CreateOpt {
    pub async fn process<C: StoreClient>(&self, client: Arc<C>, config: &ClientConfig) -> Result<()> {
        let spec = match &self.spec {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("unable to read spec from {}", path.display()))?,
            ),
            None => None,
        };

        with_spec!(self.resource.kind, S => {
            let mut builder = self.resource.builder::<S, C>(client, config);
            if let Some(spec) = &spec {
                let spec: S = serde_yaml::from_str(spec).context("invalid spec")?;
                debug!(?spec, "spec loaded");
                builder.update_definition(|definition| {
                    definition.spec = spec;
                    Ok(())
                });
            }
            builder.create().await?;

            let uid = builder
                .object()
                .map(|object| object.metadata.uid.as_str())
                .unwrap_or_default();
            println!("{} {} created (uid {uid})", S::label(), builder.key());
        });
        Ok(())
    }
}
