use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Crd;

/// Payload of a resource kind held by the store
pub trait Spec:
    Serialize + DeserializeOwned + Debug + Default + Clone + PartialEq + Send + Sync + 'static
{
    type Status: Status;

    /// cluster scoped kinds are keyed by name only
    const NAMESPACED: bool = true;

    fn metadata() -> &'static Crd;

    fn label() -> &'static str {
        Self::metadata().names.kind
    }

    fn kind() -> String {
        Self::metadata().names.kind.to_owned()
    }

    fn api_version() -> String {
        Self::metadata().api_version()
    }
}

pub trait Status:
    Serialize + DeserializeOwned + Debug + Default + Clone + PartialEq + Send + Sync + 'static
{
}

/// Status for kinds whose status the store never reports
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
pub struct EmptyStatus {}

impl Status for EmptyStatus {}

/// Identity of an object within a kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new<S>(name: S, namespace: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn cluster<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: String::new(),
        }
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new<S>(name: S, namespace: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn set_labels<T: Into<String>>(mut self, labels: Vec<(T, T)>) -> Self {
        for (key, value) in labels {
            self.labels.insert(key.into(), value.into());
        }
        self
    }
}

/// Full object as stored: type header, metadata, spec and status
#[derive(Deserialize, Serialize, Debug, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
pub struct K8Obj<S>
where
    S: Spec,
{
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: S,
    #[serde(default)]
    pub status: S::Status,
}

impl<S> K8Obj<S>
where
    S: Spec,
{
    pub fn new<N>(name: N, namespace: N, spec: S) -> Self
    where
        N: Into<String>,
    {
        Self {
            api_version: S::api_version(),
            kind: S::kind(),
            metadata: ObjectMeta::new(name, namespace),
            spec,
            status: S::Status::default(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    pub fn set_status(mut self, status: S::Status) -> Self {
        self.status = status;
        self
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

impl LabelSelector {
    pub fn new_labels<T: Into<String>>(labels: Vec<(T, T)>) -> Self {
        Self {
            match_labels: labels
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}

impl From<u16> for IntOrString {
    fn from(value: u16) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for IntOrString {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
