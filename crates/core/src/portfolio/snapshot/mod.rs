//! Portfolio snapshot module - daily value series calculation and storage traits.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;
