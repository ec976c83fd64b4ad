//!
//! # ArgoCD
//!
//! Instance managed by the argocd-operator
//!
use serde::Deserialize;
use serde::Serialize;

use crate::{Crd, CrdNames, Spec, Status};

const ARGOCD_API: Crd = Crd {
    group: "argoproj.io",
    version: "v1alpha1",
    names: CrdNames {
        kind: "ArgoCD",
        plural: "argocds",
        singular: "argocd",
    },
};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ArgoCDSpec {
    /// container image for all ArgoCD components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// tag of the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Spec for ArgoCDSpec {
    type Status = ArgoCDStatus;

    fn metadata() -> &'static Crd {
        &ARGOCD_API
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ArgoCDStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl Status for ArgoCDStatus {}
