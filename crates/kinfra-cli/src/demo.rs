use std::sync::Arc;

use anyhow::Result;
use anyhow::bail;
use clap::Args;
use tracing::info;

use kinfra::metallb::BgpPeerBuilder;
use kinfra_client::StoreClient;

#[derive(Debug, Args)]
pub struct DemoOpt {
    #[arg(long, default_value = "peer-one")]
    pub name: String,

    #[arg(short, long, default_value = "metallb-system")]
    pub namespace: String,

    #[arg(long, default_value = "10.46.81.1")]
    pub peer_ip: String,

    #[arg(long, default_value_t = 64500)]
    pub asn: u32,

    #[arg(long, default_value_t = 64501)]
    pub remote_asn: u32,
}

impl DemoOpt {
    /// Walk a BGP peer through exists, create, delete and a second delete,
    /// printing what the builder reports at each step.
    pub async fn process<C: StoreClient>(&self, client: Arc<C>) -> Result<()> {
        let mut peer = BgpPeerBuilder::new(
            client,
            self.name.as_str(),
            self.namespace.as_str(),
            self.peer_ip.as_str(),
            self.asn,
            self.remote_asn,
        );
        let key = peer.key().to_string();

        if peer.exists().await {
            bail!("BGPPeer {key} already exists, pick another name");
        }
        println!("exists before create: false");

        peer.create().await?;
        println!("created BGPPeer {key}");
        println!("exists after create: {}", peer.exists().await);

        peer.delete().await?;
        println!("deleted BGPPeer {key}");
        println!("exists after delete: {}", peer.exists().await);

        match peer.delete().await {
            Ok(_) => bail!("second delete of BGPPeer {key} succeeded"),
            Err(err) => {
                info!(%err, "second delete refused");
                println!("second delete: {err}");
            }
        }
        Ok(())
    }
}
