//! Repository trait for portfolio value snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::PortfolioValueSnapshot;
use crate::errors::Result;

/// Storage access for the daily value series.
///
/// The builder owns the stored series from its start date forward and
/// rewrites it wholesale: delete-then-rewrite, no in-place patching.
/// Implementations must return ranges in ascending date order.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Delete every snapshot dated on or after `start_date`.
    /// Returns the number of rows removed.
    async fn delete_snapshots_from_date(&self, start_date: NaiveDate) -> Result<usize>;

    /// Save a batch of snapshots.
    async fn save_snapshots(&self, snapshots: &[PortfolioValueSnapshot]) -> Result<()>;

    /// Snapshots with `start_date <= snapshot_date <= end_date`, ascending.
    fn get_snapshots_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioValueSnapshot>>;

    /// The snapshot for an exact date, if one is stored.
    fn get_snapshot_by_date(&self, date: NaiveDate) -> Result<Option<PortfolioValueSnapshot>>;
}
