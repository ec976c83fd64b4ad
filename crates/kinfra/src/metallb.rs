//!
//! # MetalLB builders
//!
//! BGP peers, BFD profiles, BGP advertisements and IP address pools
//!
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

use kinfra_client::SharedClient;
use kinfra_client::StoreClient;
use kinfra_types::metallb::BfdProfileSpec;
use kinfra_types::metallb::BgpAdvertisementSpec;
use kinfra_types::metallb::BgpPeerSpec;
use kinfra_types::metallb::IpAddressPoolSpec;

use crate::BuilderError;
use crate::ResourceBuilder;
use crate::net::parse_ip;
use crate::net::parse_ipv4;

/// BFD timers, in milliseconds
const PEER_PORT: RangeInclusive<u16> = 0..=16384;
const BFD_INTERVAL_MS: RangeInclusive<u32> = 10..=60000;
const BFD_MULTIPLIER: RangeInclusive<u32> = 2..=255;
const BFD_MINIMUM_TTL: RangeInclusive<u32> = 1..=254;
const AGGREGATION_LENGTH_V4: RangeInclusive<i32> = 0..=32;
const AGGREGATION_LENGTH_V6: RangeInclusive<i32> = 0..=128;

fn check_range<T>(field: &'static str, value: T, range: RangeInclusive<T>) -> Result<T, BuilderError>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(BuilderError::invalid_field(
            field,
            format!("{value} is outside {}..={}", range.start(), range.end()),
        ))
    }
}

fn check_names<I, T>(field: &'static str, values: I) -> Result<Vec<String>, BuilderError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(BuilderError::invalid_field(field, "list cannot be empty"));
    }
    if values.iter().any(String::is_empty) {
        return Err(BuilderError::invalid_field(field, "entries cannot be empty"));
    }
    Ok(values)
}

// -----------------------------------
// BGPPeer
// -----------------------------------

resource_builder!(
    /// Builder for MetalLB `BGPPeer` objects
    BgpPeerBuilder,
    BgpPeerSpec
);

impl<C> BgpPeerBuilder<C>
where
    C: StoreClient,
{
    /// `asn` is the local AS number, `remote_asn` the one expected from the peer
    pub fn new(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        peer_ip: impl Into<String>,
        asn: u32,
        remote_asn: u32,
    ) -> Self {
        let peer_ip = peer_ip.into();
        let mut builder = Self(ResourceBuilder::new(client, name, namespace));
        builder.update_definition(|definition| {
            parse_ip("peerAddress", &peer_ip)?;
            definition.spec = BgpPeerSpec {
                my_asn: asn,
                asn: remote_asn,
                address: peer_ip,
                ..Default::default()
            };
            Ok(())
        });
        builder
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, namespace).await.map(Self)
    }

    pub fn with_router_id(mut self, router_id: &str) -> Self {
        self.update_definition(|definition| {
            let router_id = parse_ipv4("routerID", router_id)?;
            definition.spec.router_id = Some(router_id.to_string());
            Ok(())
        });
        self
    }

    pub fn with_bfd_profile(mut self, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        self.update_definition(|definition| {
            if profile.is_empty() {
                return Err(BuilderError::invalid_field("bfdProfile", "cannot be empty"));
            }
            definition.spec.bfd_profile = Some(profile);
            Ok(())
        });
        self
    }

    pub fn with_src_address(mut self, address: &str) -> Self {
        self.update_definition(|definition| {
            let address = parse_ip("sourceAddress", address)?;
            definition.spec.src_address = Some(address.to_string());
            Ok(())
        });
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.update_definition(|definition| {
            if port == 0 {
                return Err(BuilderError::InvalidPort);
            }
            definition.spec.port = Some(check_range("peerPort", port, PEER_PORT)?);
            Ok(())
        });
        self
    }

    pub fn with_hold_time(mut self, hold_time: Duration) -> Self {
        self.update_definition(|definition| {
            definition.spec.hold_time = Some(hold_time);
            Ok(())
        });
        self
    }

    pub fn with_keepalive_time(mut self, keepalive_time: Duration) -> Self {
        self.update_definition(|definition| {
            definition.spec.keepalive_time = Some(keepalive_time);
            Ok(())
        });
        self
    }

    pub fn with_ebgp_multihop(mut self, multihop: bool) -> Self {
        self.update_definition(|definition| {
            definition.spec.ebgp_multi_hop = multihop;
            Ok(())
        });
        self
    }

    /// TCP MD5 password for the session
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.update_definition(|definition| {
            if password.is_empty() {
                return Err(BuilderError::invalid_field("password", "cannot be empty"));
            }
            definition.spec.password = Some(password);
            Ok(())
        });
        self
    }
}

// -----------------------------------
// BFDProfile
// -----------------------------------

resource_builder!(
    /// Builder for MetalLB `BFDProfile` objects
    BfdProfileBuilder,
    BfdProfileSpec
);

impl<C> BfdProfileBuilder<C>
where
    C: StoreClient,
{
    pub fn new(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self(ResourceBuilder::new(client, name, namespace))
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, namespace).await.map(Self)
    }

    pub fn with_rcv_interval(mut self, interval_ms: u32) -> Self {
        self.update_definition(|definition| {
            let interval = check_range("receiveInterval", interval_ms, BFD_INTERVAL_MS)?;
            definition.spec.receive_interval = Some(interval);
            Ok(())
        });
        self
    }

    pub fn with_transmit_interval(mut self, interval_ms: u32) -> Self {
        self.update_definition(|definition| {
            let interval = check_range("transmitInterval", interval_ms, BFD_INTERVAL_MS)?;
            definition.spec.transmit_interval = Some(interval);
            Ok(())
        });
        self
    }

    pub fn with_echo_interval(mut self, interval_ms: u32) -> Self {
        self.update_definition(|definition| {
            let interval = check_range("echoInterval", interval_ms, BFD_INTERVAL_MS)?;
            definition.spec.echo_interval = Some(interval);
            Ok(())
        });
        self
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.update_definition(|definition| {
            let multiplier = check_range("detectMultiplier", multiplier, BFD_MULTIPLIER)?;
            definition.spec.detect_multiplier = Some(multiplier);
            Ok(())
        });
        self
    }

    pub fn with_minimum_ttl(mut self, ttl: u32) -> Self {
        self.update_definition(|definition| {
            let ttl = check_range("minimumTtl", ttl, BFD_MINIMUM_TTL)?;
            definition.spec.minimum_ttl = Some(ttl);
            Ok(())
        });
        self
    }

    pub fn with_echo_mode(mut self, echo_mode: bool) -> Self {
        self.update_definition(|definition| {
            definition.spec.echo_mode = Some(echo_mode);
            Ok(())
        });
        self
    }

    pub fn with_passive_mode(mut self, passive_mode: bool) -> Self {
        self.update_definition(|definition| {
            definition.spec.passive_mode = Some(passive_mode);
            Ok(())
        });
        self
    }
}

// -----------------------------------
// BGPAdvertisement
// -----------------------------------

resource_builder!(
    /// Builder for MetalLB `BGPAdvertisement` objects
    BgpAdvertisementBuilder,
    BgpAdvertisementSpec
);

impl<C> BgpAdvertisementBuilder<C>
where
    C: StoreClient,
{
    pub fn new(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self(ResourceBuilder::new(client, name, namespace))
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, namespace).await.map(Self)
    }

    /// prefix length used when advertising IPv4 service addresses
    pub fn with_aggregation_length4(mut self, length: i32) -> Self {
        self.update_definition(|definition| {
            let length = check_range("aggregationLength", length, AGGREGATION_LENGTH_V4)?;
            definition.spec.aggregation_length = Some(length);
            Ok(())
        });
        self
    }

    pub fn with_aggregation_length6(mut self, length: i32) -> Self {
        self.update_definition(|definition| {
            let length = check_range("aggregationLengthV6", length, AGGREGATION_LENGTH_V6)?;
            definition.spec.aggregation_length_v6 = Some(length);
            Ok(())
        });
        self
    }

    pub fn with_local_pref(mut self, local_pref: u32) -> Self {
        self.update_definition(|definition| {
            definition.spec.local_pref = Some(local_pref);
            Ok(())
        });
        self
    }

    pub fn with_communities<I, T>(mut self, communities: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let communities = check_names("communities", communities);
        self.update_definition(|definition| {
            definition.spec.communities = communities?;
            Ok(())
        });
        self
    }

    pub fn with_ip_address_pools<I, T>(mut self, pools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let pools = check_names("ipAddressPools", pools);
        self.update_definition(|definition| {
            definition.spec.ip_address_pools = pools?;
            Ok(())
        });
        self
    }

    /// restrict the advertisement to these BGPPeer names
    pub fn with_peers<I, T>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let peers = check_names("peers", peers);
        self.update_definition(|definition| {
            definition.spec.peers = peers?;
            Ok(())
        });
        self
    }
}

// -----------------------------------
// IPAddressPool
// -----------------------------------

resource_builder!(
    /// Builder for MetalLB `IPAddressPool` objects
    IpAddressPoolBuilder,
    IpAddressPoolSpec
);

impl<C> IpAddressPoolBuilder<C>
where
    C: StoreClient,
{
    /// `addresses` holds CIDRs or `first-last` ranges and must not be empty
    pub fn new<I, T>(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        addresses: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let addresses = check_names("addresses", addresses);
        let mut builder = Self(ResourceBuilder::new(client, name, namespace));
        builder.update_definition(|definition| {
            definition.spec.addresses = addresses?;
            Ok(())
        });
        builder
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, namespace).await.map(Self)
    }

    pub fn with_auto_assign(mut self, auto_assign: bool) -> Self {
        self.update_definition(|definition| {
            definition.spec.auto_assign = Some(auto_assign);
            Ok(())
        });
        self
    }

    /// skip `.0` and `.255` addresses
    pub fn with_avoid_buggy_ips(mut self, avoid: bool) -> Self {
        self.update_definition(|definition| {
            definition.spec.avoid_buggy_ips = avoid;
            Ok(())
        });
        self
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use kinfra_client::MemoryClient;

    use super::*;

    const NS: &str = "metallb-system";

    #[fluvio_future::test]
    async fn test_bgp_peer() {
        let client = Arc::new(MemoryClient::default());

        let mut peer = BgpPeerBuilder::new(client.clone(), "peer-one", NS, "10.46.81.1", 64500, 64501)
            .with_router_id("10.10.10.10")
            .with_bfd_profile("fast")
            .with_src_address("10.46.81.10")
            .with_port(179)
            .with_hold_time(Duration::from_secs(90))
            .with_keepalive_time(Duration::from_secs(30))
            .with_ebgp_multihop(true)
            .with_password("secret");
        peer.create().await.expect("created");

        let pulled = BgpPeerBuilder::pull(client, "peer-one", NS)
            .await
            .expect("pulled");
        let spec = &pulled.definition().expect("defined").spec;
        assert_eq!(spec.my_asn, 64500);
        assert_eq!(spec.asn, 64501);
        assert_eq!(spec.address, "10.46.81.1");
        assert_eq!(spec.router_id.as_deref(), Some("10.10.10.10"));
        assert_eq!(spec.hold_time, Some(Duration::from_secs(90)));
        assert!(spec.ebgp_multi_hop);
    }

    #[test]
    fn test_bgp_peer_invalid_addresses() {
        let client = MemoryClient::new_shared();

        let peer = BgpPeerBuilder::new(client.clone(), "peer-one", NS, "10.46.81", 64500, 64501);
        assert!(matches!(
            peer.error(),
            Some(BuilderError::InvalidField { field: "peerAddress", .. })
        ));

        let peer = BgpPeerBuilder::new(client, "peer-one", NS, "10.46.81.1", 64500, 64501)
            .with_router_id("fd00::1")
            .with_port(179);
        assert!(matches!(
            peer.error(),
            Some(BuilderError::InvalidField { field: "routerID", .. })
        ));
        assert_eq!(peer.definition().expect("defined").spec.port, None);
    }

    #[test]
    fn test_bgp_peer_port_range() {
        let client = MemoryClient::new_shared();

        let peer = BgpPeerBuilder::new(client.clone(), "peer-one", NS, "10.46.81.1", 64500, 64501)
            .with_port(16384);
        assert!(peer.error().is_none());
        assert_eq!(peer.definition().expect("defined").spec.port, Some(16384));

        let peer = BgpPeerBuilder::new(client.clone(), "peer-one", NS, "10.46.81.1", 64500, 64501)
            .with_port(20000);
        assert!(matches!(
            peer.error(),
            Some(BuilderError::InvalidField { field: "peerPort", .. })
        ));
        assert_eq!(peer.definition().expect("defined").spec.port, None);

        let peer = BgpPeerBuilder::new(client, "peer-one", NS, "10.46.81.1", 64500, 64501).with_port(0);
        assert!(matches!(peer.error(), Some(BuilderError::InvalidPort)));
    }

    #[test]
    fn test_bfd_profile_ranges() {
        let client = MemoryClient::new_shared();

        let profile = BfdProfileBuilder::new(client.clone(), "fast", NS)
            .with_rcv_interval(300)
            .with_transmit_interval(300)
            .with_echo_interval(50)
            .with_multiplier(3)
            .with_minimum_ttl(254)
            .with_echo_mode(true)
            .with_passive_mode(false);
        assert!(profile.error().is_none());
        let spec = &profile.definition().expect("defined").spec;
        assert_eq!(spec.detect_multiplier, Some(3));
        assert_eq!(spec.echo_mode, Some(true));

        for profile in [
            BfdProfileBuilder::new(client.clone(), "slow", NS).with_echo_interval(9),
            BfdProfileBuilder::new(client.clone(), "slow", NS).with_rcv_interval(60001),
            BfdProfileBuilder::new(client.clone(), "slow", NS).with_multiplier(1),
            BfdProfileBuilder::new(client.clone(), "slow", NS).with_minimum_ttl(0),
        ] {
            assert!(profile.error().is_some(), "{profile:?}");
        }

        let err = BfdProfileBuilder::new(client, "slow", NS)
            .with_multiplier(256)
            .error()
            .cloned()
            .expect("poisoned");
        assert_eq!(err.to_string(), "invalid detectMultiplier: 256 is outside 2..=255");
    }

    #[test]
    fn test_bgp_advertisement() {
        let client = MemoryClient::new_shared();

        let advertisement = BgpAdvertisementBuilder::new(client.clone(), "bgp-adv", NS)
            .with_aggregation_length4(32)
            .with_aggregation_length6(128)
            .with_local_pref(100)
            .with_communities(["65535:65282"])
            .with_ip_address_pools(vec!["pool-one".to_owned()])
            .with_peers(["peer-one"]);
        assert!(advertisement.error().is_none());
        let spec = &advertisement.definition().expect("defined").spec;
        assert_eq!(spec.aggregation_length, Some(32));
        assert_eq!(spec.peers, vec!["peer-one".to_owned()]);

        let advertisement = BgpAdvertisementBuilder::new(client.clone(), "bgp-adv", NS)
            .with_aggregation_length4(33);
        assert!(advertisement.error().is_some());

        let advertisement = BgpAdvertisementBuilder::new(client, "bgp-adv", NS)
            .with_peers(Vec::<String>::new());
        assert_eq!(
            advertisement.error().map(ToString::to_string).as_deref(),
            Some("invalid peers: list cannot be empty")
        );
    }

    #[fluvio_future::test]
    async fn test_ip_address_pool() {
        let client = MemoryClient::new_shared();

        let mut pool = IpAddressPoolBuilder::new(client.clone(), "pool-one", NS, ["192.168.100.0/24"])
            .with_auto_assign(false)
            .with_avoid_buggy_ips(true);
        pool.create().await.expect("created");
        assert!(pool.exists().await);

        let object = pool.object().expect("observed");
        assert_eq!(object.spec.addresses, vec!["192.168.100.0/24".to_owned()]);
        assert_eq!(object.spec.auto_assign, Some(false));
        assert!(object.spec.avoid_buggy_ips);

        let mut empty = IpAddressPoolBuilder::new(client.clone(), "pool-two", NS, Vec::<&str>::new());
        assert!(empty.create().await.is_err());
        assert_eq!(client.count::<IpAddressPoolSpec>().await, 1);
    }
}
