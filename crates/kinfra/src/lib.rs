//! Resource builders for Kubernetes-style object stores.
//!
//! A [`ResourceBuilder`] owns the desired definition of one object and drives
//! it through exists, create, update and delete against a [`StoreClient`].
//! Kind specific builders live in their own modules.

#[macro_use]
mod macros;

mod builder;
mod error;
mod net;

#[cfg(test)]
mod fixture;

pub mod argocd;
pub mod metallb;
pub mod namespace;
pub mod networkpolicy;

pub use builder::Presence;
pub use builder::ResourceBuilder;
pub use error::BuilderError;
pub use error::StoreOp;

pub use kinfra_client::SharedClient;
pub use kinfra_client::StoreClient;
