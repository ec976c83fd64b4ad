//!
//! # MetalLB
//!
//! BGP peers, BFD profiles, BGP advertisements and address pools
//!
use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::{Crd, CrdNames, EmptyStatus, LabelSelector, Spec};

pub const METALLB_GROUP: &str = "metallb.io";

const BGP_PEER_API: Crd = Crd {
    group: METALLB_GROUP,
    version: "v1beta2",
    names: CrdNames {
        kind: "BGPPeer",
        plural: "bgppeers",
        singular: "bgppeer",
    },
};

const BFD_PROFILE_API: Crd = Crd {
    group: METALLB_GROUP,
    version: "v1beta1",
    names: CrdNames {
        kind: "BFDProfile",
        plural: "bfdprofiles",
        singular: "bfdprofile",
    },
};

const BGP_ADVERTISEMENT_API: Crd = Crd {
    group: METALLB_GROUP,
    version: "v1beta1",
    names: CrdNames {
        kind: "BGPAdvertisement",
        plural: "bgpadvertisements",
        singular: "bgpadvertisement",
    },
};

const IP_ADDRESS_POOL_API: Crd = Crd {
    group: METALLB_GROUP,
    version: "v1beta1",
    names: CrdNames {
        kind: "IPAddressPool",
        plural: "ipaddresspools",
        singular: "ipaddresspool",
    },
};

// -----------------------------------
// BGPPeer
// -----------------------------------

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct BgpPeerSpec {
    /// AS number to use for the local end of the session
    #[serde(rename = "myASN")]
    pub my_asn: u32,
    /// AS number to expect from the remote end of the session
    #[serde(rename = "peerASN")]
    pub asn: u32,
    /// address to dial when establishing the session
    #[serde(rename = "peerAddress")]
    pub address: String,
    #[serde(rename = "sourceAddress", skip_serializing_if = "Option::is_none")]
    pub src_address: Option<String>,
    #[serde(rename = "peerPort", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// requested BGP hold time, per RFC4271
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<Duration>,
    /// requested BGP keepalive time, per RFC4271
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub keepalive_time: Option<Duration>,
    #[serde(rename = "routerID", skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    /// only connect to this peer on nodes matching one of these selectors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_selectors: Vec<NodeSelector>,
    /// TCP MD5 authentication password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "bfdProfile", skip_serializing_if = "Option::is_none")]
    pub bfd_profile: Option<String>,
    #[serde(rename = "ebgpMultiHop", skip_serializing_if = "std::ops::Not::not")]
    pub ebgp_multi_hop: bool,
}

impl Spec for BgpPeerSpec {
    type Status = EmptyStatus;

    fn metadata() -> &'static Crd {
        &BGP_PEER_API
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSelector {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<MatchExpression>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
pub struct MatchExpression {
    pub key: String,
    pub operator: String,
    pub values: Vec<String>,
}

// -----------------------------------
// BFDProfile
// -----------------------------------

/// timer values are in milliseconds
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct BfdProfileSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_multiplier: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_mode: Option<bool>,
    #[serde(rename = "minimumTtl", skip_serializing_if = "Option::is_none")]
    pub minimum_ttl: Option<u32>,
}

impl Spec for BfdProfileSpec {
    type Status = EmptyStatus;

    fn metadata() -> &'static Crd {
        &BFD_PROFILE_API
    }
}

// -----------------------------------
// BGPAdvertisement
// -----------------------------------

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct BgpAdvertisementSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_length: Option<i32>,
    #[serde(rename = "aggregationLengthV6", skip_serializing_if = "Option::is_none")]
    pub aggregation_length_v6: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_pref: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub communities: Vec<String>,
    #[serde(rename = "ipAddressPools", skip_serializing_if = "Vec::is_empty")]
    pub ip_address_pools: Vec<String>,
    #[serde(
        rename = "ipAddressPoolSelectors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ip_address_pool_selectors: Vec<LabelSelector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_selectors: Vec<LabelSelector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<String>,
}

impl Spec for BgpAdvertisementSpec {
    type Status = EmptyStatus;

    fn metadata() -> &'static Crd {
        &BGP_ADVERTISEMENT_API
    }
}

// -----------------------------------
// IPAddressPool
// -----------------------------------

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAddressPoolSpec {
    /// CIDRs or `first-last` ranges handed out to load balancer services
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_assign: Option<bool>,
    #[serde(rename = "avoidBuggyIPs", skip_serializing_if = "std::ops::Not::not")]
    pub avoid_buggy_ips: bool,
}

impl Spec for IpAddressPoolSpec {
    type Status = EmptyStatus;

    fn metadata() -> &'static Crd {
        &IP_ADDRESS_POOL_API
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bgp_peer_field_names() {
        let spec = BgpPeerSpec {
            my_asn: 64500,
            asn: 64501,
            address: "10.46.81.1".to_owned(),
            hold_time: Some(Duration::from_secs(90)),
            ebgp_multi_hop: true,
            ..Default::default()
        };

        let value = serde_yaml::to_value(&spec).expect("serialize");
        assert_eq!(value["myASN"], serde_yaml::Value::from(64500));
        assert_eq!(value["peerASN"], serde_yaml::Value::from(64501));
        assert_eq!(value["peerAddress"], serde_yaml::Value::from("10.46.81.1"));
        assert_eq!(value["ebgpMultiHop"], serde_yaml::Value::from(true));
        assert!(value.get("peerPort").is_none());

        let parsed: BgpPeerSpec = serde_yaml::from_value(value).expect("deserialize");
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_pool_defaults() {
        let pool: IpAddressPoolSpec =
            serde_yaml::from_str("addresses: [\"192.168.10.0/24\"]").expect("deserialize");
        assert_eq!(pool.addresses, vec!["192.168.10.0/24".to_owned()]);
        assert_eq!(pool.auto_assign, None);
        assert!(!pool.avoid_buggy_ips);
    }
}
