//! Point-in-time and windowed portfolio reads.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::PERCENT_SCALE;
use crate::errors::Result;
use crate::instruments::Instrument;
use crate::portfolio::lots::process_transactions;
use crate::transactions::Transaction;
use crate::utils::time_utils::{end_of_day_utc, start_of_day_utc};

use super::{HoldingBreakdown, PortfolioWindowReport};
use crate::portfolio::snapshot::{SnapshotRepositoryTrait, SnapshotService};

/// Windowed read API over the snapshot series.
///
/// Note the write side effect: a query rebuilds and overwrites the stored
/// snapshots for the requested range before reading them back.
pub struct PortfolioWindowService {
    snapshot_service: Arc<SnapshotService>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl PortfolioWindowService {
    pub fn new(
        snapshot_service: Arc<SnapshotService>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            snapshot_service,
            snapshot_repository,
        }
    }

    /// Builds the `[start_date, end_date]` series and derives window
    /// statistics from it.
    ///
    /// With `as_of` set, transactions trading after that instant are
    /// ignored, giving the portfolio as it was known at that point in time.
    pub async fn query_portfolio_window(
        &self,
        transactions: &[Transaction],
        instruments: &[Instrument],
        start_date: NaiveDate,
        end_date: NaiveDate,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<PortfolioWindowReport> {
        let filtered: Vec<Transaction> = match as_of {
            Some(cutoff) => transactions
                .iter()
                .filter(|transaction| transaction.trade_date <= cutoff)
                .cloned()
                .collect(),
            None => transactions.to_vec(),
        };
        debug!(
            "Window query [{}, {}] over {} transactions (as_of: {:?})",
            start_date,
            end_date,
            filtered.len(),
            as_of
        );

        self.snapshot_service
            .build_portfolio_value_series(&filtered, instruments, start_date, end_date)
            .await?;
        let series = self
            .snapshot_repository
            .get_snapshots_in_range(start_date, end_date)?;

        let start_value = series
            .first()
            .map(|snapshot| snapshot.total_value)
            .unwrap_or(Decimal::ZERO);
        let end_value = series
            .last()
            .map(|snapshot| snapshot.total_value)
            .unwrap_or(Decimal::ZERO);
        let absolute_change = end_value - start_value;
        let percentage_change = if start_value.is_zero() {
            Decimal::ZERO
        } else {
            (absolute_change / start_value).round_dp(PERCENT_SCALE)
        };

        let realized_pnl_in_window =
            realized_pnl_between(&filtered, start_date, end_date);

        let unrealized_pnl_at_end = series
            .last()
            .map(|snapshot| snapshot.unrealized_pnl)
            .unwrap_or(Decimal::ZERO);

        let mut holdings: Vec<HoldingBreakdown> = series
            .last()
            .map(|snapshot| {
                snapshot
                    .holdings
                    .iter()
                    .map(|(symbol, position)| HoldingBreakdown {
                        symbol: symbol.clone(),
                        instrument_id: position.instrument_id.clone(),
                        quantity: position.quantity,
                        value: position.value,
                        cost_basis: position.cost_basis,
                        unrealized_pnl: position.value - position.cost_basis,
                        is_estimated: position.is_estimated,
                    })
                    .collect()
            })
            .unwrap_or_default();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        Ok(PortfolioWindowReport {
            start_date,
            end_date,
            start_value,
            end_value,
            absolute_change,
            percentage_change,
            realized_pnl_in_window,
            unrealized_pnl_at_end,
            holdings,
        })
    }
}

/// Re-runs the lot engine per instrument and sums the realized PnL of sells
/// dated inside `[start 00:00, end 23:59:59.999]`.
fn realized_pnl_between(
    transactions: &[Transaction],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Decimal {
    let window_start = start_of_day_utc(start_date);
    let window_end = end_of_day_utc(end_date);

    let mut partitions: HashMap<&str, Vec<Transaction>> = HashMap::new();
    for transaction in transactions {
        partitions
            .entry(transaction.instrument_id.as_str())
            .or_default()
            .push(transaction.clone());
    }

    let mut total = Decimal::ZERO;
    for partition in partitions.values_mut() {
        partition.sort_by_key(|transaction| transaction.trade_date);
        let output = process_transactions(partition);
        total += output
            .realized_trades
            .iter()
            .filter(|trade| trade.sell_date >= window_start && trade.sell_date <= window_end)
            .map(|trade| trade.realized_pnl)
            .sum::<Decimal>();
    }
    total
}
