mod client;
mod local;
mod memory;

pub mod config;

pub use client::StoreClient;
pub use client::StoreClientError;
pub use local::LocalClient;
pub use local::LocalClientError;
pub use memory::MemoryClient;
pub use memory::MemoryClientError;

pub type SharedClient<C> = std::sync::Arc<C>;
