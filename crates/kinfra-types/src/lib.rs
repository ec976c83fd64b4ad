mod crd;
mod metadata;

pub mod argocd;
pub mod metallb;
pub mod namespace;
pub mod networkpolicy;
pub mod profile;

pub use crd::*;
pub use metadata::*;
