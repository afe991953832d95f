//! Entry point for snapshot rebuilds after transaction mutations.

use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use crate::errors::Result;
use crate::instruments::Instrument;
use crate::transactions::Transaction;
use crate::utils::time_utils::today_utc;

use super::snapshot::{SnapshotRepositoryTrait, SnapshotService};

/// Thin coordinator over [`SnapshotService`]: "rebuild everything from date
/// X forward".
///
/// Mutation handlers call this after a transaction create/edit/delete.
/// `affected_date` must be the true earliest trade date touched by the
/// mutation; a later date silently leaves stale snapshots in between.
pub struct RebuildService {
    snapshot_service: Arc<SnapshotService>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl RebuildService {
    pub fn new(
        snapshot_service: Arc<SnapshotService>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            snapshot_service,
            snapshot_repository,
        }
    }

    /// Rebuilds the stored series for `[affected_date, end_date]` and
    /// returns the number of snapshots now stored in that range.
    /// `end_date` defaults to today.
    pub async fn rebuild_snapshots_from(
        &self,
        transactions: &[Transaction],
        instruments: &[Instrument],
        affected_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<usize> {
        let end_date = end_date.unwrap_or_else(today_utc);
        debug!(
            "Rebuilding snapshots from {} through {}",
            affected_date, end_date
        );

        self.snapshot_service
            .build_portfolio_value_series(transactions, instruments, affected_date, end_date)
            .await?;

        let rebuilt = self
            .snapshot_repository
            .get_snapshots_in_range(affected_date, end_date)?;
        Ok(rebuilt.len())
    }
}
