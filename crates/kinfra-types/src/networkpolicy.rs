//!
//! # MultiNetworkPolicy
//!
//! Network policy applied to secondary (multus) networks
//!
use serde::Deserialize;
use serde::Serialize;

use crate::{Crd, CrdNames, EmptyStatus, IntOrString, LabelSelector, Spec};

const MULTI_NETWORK_POLICY_API: Crd = Crd {
    group: "k8s.cni.cncf.io",
    version: "v1beta1",
    names: CrdNames {
        kind: "MultiNetworkPolicy",
        plural: "multi-networkpolicies",
        singular: "multi-networkpolicy",
    },
};

/// annotation binding a policy to a network attachment definition
pub const POLICY_FOR_ANNOTATION: &str = "k8s.v1.cni.cncf.io/policy-for";

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiNetworkPolicySpec {
    pub pod_selector: LabelSelector,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<MultiNetworkPolicyIngressRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub egress: Vec<MultiNetworkPolicyEgressRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policy_types: Vec<PolicyType>,
}

impl Spec for MultiNetworkPolicySpec {
    type Status = EmptyStatus;

    fn metadata() -> &'static Crd {
        &MULTI_NETWORK_POLICY_API
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiNetworkPolicyIngressRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<MultiNetworkPolicyPort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<MultiNetworkPolicyPeer>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiNetworkPolicyEgressRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<MultiNetworkPolicyPort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<MultiNetworkPolicyPeer>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiNetworkPolicyPort {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<IntOrString>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiNetworkPolicyPeer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<IpBlock>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IpBlock {
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum PolicyType {
    Ingress,
    Egress,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rule_yaml() {
        let rule = MultiNetworkPolicyIngressRule {
            ports: vec![MultiNetworkPolicyPort {
                protocol: Some(Protocol::Tcp),
                port: Some(IntOrString::Int(5001)),
            }],
            from: vec![MultiNetworkPolicyPeer {
                ip_block: Some(IpBlock {
                    cidr: "192.168.0.0/16".to_owned(),
                    except: vec!["192.168.1.0/24".to_owned()],
                }),
                ..Default::default()
            }],
        };

        let yaml = serde_yaml::to_string(&rule).expect("serialize");
        assert_eq!(
            yaml,
            r#"ports:
- protocol: TCP
  port: 5001
from:
- ipBlock:
    cidr: 192.168.0.0/16
    except:
    - 192.168.1.0/24
"#
        );
    }
}
