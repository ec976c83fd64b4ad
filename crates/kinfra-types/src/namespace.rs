//!
//! # Namespace
//!
//! Core, cluster scoped namespace
//!
use serde::Deserialize;
use serde::Serialize;

use crate::{Crd, CrdNames, Spec, Status, CORE_GROUP, V1};

const NAMESPACE_API: Crd = Crd {
    group: CORE_GROUP,
    version: V1,
    names: CrdNames {
        kind: "Namespace",
        plural: "namespaces",
        singular: "namespace",
    },
};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

impl Spec for NamespaceSpec {
    type Status = NamespaceStatus;

    const NAMESPACED: bool = false;

    fn metadata() -> &'static Crd {
        &NAMESPACE_API
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<NamespacePhase>,
}

impl Status for NamespaceStatus {}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub enum NamespacePhase {
    Active,
    Terminating,
}
