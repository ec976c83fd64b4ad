//!
//! # CRD Definition
//!
//! Describes where a resource kind lives in the remote object store
//!
#[derive(Debug)]
pub struct Crd {
    pub group: &'static str,
    pub version: &'static str,
    pub names: CrdNames,
}

#[derive(Debug)]
pub struct CrdNames {
    pub kind: &'static str,
    pub plural: &'static str,
    pub singular: &'static str,
}

impl Crd {
    /// `group/version`, or bare `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_owned()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

pub const CORE_GROUP: &str = "";
pub const V1: &str = "v1";

#[cfg(test)]
mod test {
    use super::*;

    const CORE: Crd = Crd {
        group: CORE_GROUP,
        version: V1,
        names: CrdNames {
            kind: "Namespace",
            plural: "namespaces",
            singular: "namespace",
        },
    };

    const CUSTOM: Crd = Crd {
        group: "metallb.io",
        version: "v1beta2",
        names: CrdNames {
            kind: "BGPPeer",
            plural: "bgppeers",
            singular: "bgppeer",
        },
    };

    #[test]
    fn test_api_version() {
        assert_eq!(CORE.api_version(), "v1");
        assert_eq!(CUSTOM.api_version(), "metallb.io/v1beta2");
    }
}
