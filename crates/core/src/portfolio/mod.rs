//! Portfolio module - lot accounting, PnL, snapshots and windowed queries.

pub mod lots;
pub mod pnl;
pub mod query;
pub mod rebuild_service;
pub mod snapshot;

pub use lots::*;
pub use pnl::*;
pub use query::*;
pub use rebuild_service::*;
pub use snapshot::*;

#[cfg(test)]
pub mod test_support;
