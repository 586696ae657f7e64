//! Background relay — per-page snapshot state and message routing.
//!
//! The relay keeps the latest page snapshot for every open page instance,
//! answers lookups, and evicts entries when their page closes. All
//! handlers run sequentially on a single worker task.

pub mod pending;
pub mod relay;
pub mod store;
pub mod types;
pub mod worker;

pub use pending::PendingRequests;
pub use relay::Relay;
pub use store::SnapshotStore;
pub use types::*;
pub use worker::RelayHandle;
