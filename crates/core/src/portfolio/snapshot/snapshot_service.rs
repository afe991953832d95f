//! Daily portfolio value series builder.
//!
//! Iterates trading days, maintains per-instrument FIFO state, resolves
//! close prices (with carry-forward), and rewrites the stored snapshot
//! series from the start date forward.

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::calendar::TradingCalendarTrait;
use crate::errors::{CalendarError, Result};
use crate::instruments::Instrument;
use crate::market_data::PriceLookupTrait;
use crate::portfolio::lots::{process_transactions, LotEngineOutput};
use crate::transactions::Transaction;
use crate::utils::time_utils::end_of_day_utc;

use super::{HoldingPosition, PortfolioValueSnapshot, SnapshotRepositoryTrait};

/// Per-instrument engine state during the trading-day loop. Rebuilt fresh
/// for every builder invocation; never shared between calls.
struct InstrumentEngineState {
    /// The instrument's transactions, ascending by trade date (stable).
    transactions: Vec<Transaction>,
    /// Count of transactions already applied to `output`.
    applied: usize,
    output: LotEngineOutput,
}

/// Builds and persists the daily portfolio value series.
pub struct SnapshotService {
    price_lookup: Arc<dyn PriceLookupTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    calendar: Arc<dyn TradingCalendarTrait>,
    exchange: String,
}

impl SnapshotService {
    pub fn new(
        price_lookup: Arc<dyn PriceLookupTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        calendar: Arc<dyn TradingCalendarTrait>,
        exchange: String,
    ) -> Self {
        Self {
            price_lookup,
            snapshot_repository,
            calendar,
            exchange,
        }
    }

    /// Rebuilds the snapshot series for `[start_date, end_date]` (inclusive
    /// calendar dates) from the full transaction set.
    ///
    /// Every stored snapshot dated on or after `start_date` is deleted
    /// first: the builder owns that suffix of the series exclusively.
    /// Returns the snapshots written, one per trading day. Collaborator
    /// errors propagate unmodified; on error the stored suffix is left in a
    /// partial state and the caller must retry the whole window.
    pub async fn build_portfolio_value_series(
        &self,
        transactions: &[Transaction],
        instruments: &[Instrument],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioValueSnapshot>> {
        debug!(
            "Building portfolio value series from {} to {} over {} transactions",
            start_date,
            end_date,
            transactions.len()
        );

        let deleted = self
            .snapshot_repository
            .delete_snapshots_from_date(start_date)
            .await?;
        if deleted > 0 {
            debug!("Dropped {} stored snapshots on or after {}", deleted, start_date);
        }

        let instrument_index: HashMap<&str, &Instrument> = instruments
            .iter()
            .map(|instrument| (instrument.id.as_str(), instrument))
            .collect();

        let mut states = partition_by_instrument(transactions);

        let mut day = self.first_trading_day(start_date)?;
        let mut snapshots: Vec<PortfolioValueSnapshot> = Vec::new();

        while day <= end_date {
            let cutoff = end_of_day_utc(day);

            for state in states.values_mut() {
                let mut advanced = false;
                while state.applied < state.transactions.len()
                    && state.transactions[state.applied].trade_date <= cutoff
                {
                    state.applied += 1;
                    advanced = true;
                }
                if advanced {
                    // Recompute the full FIFO state over the cumulative
                    // applied prefix; untouched instruments carry forward.
                    state.output = process_transactions(&state.transactions[..state.applied]);
                }
            }

            let mut snapshot = PortfolioValueSnapshot::new(day);
            for (instrument_id, state) in &states {
                snapshot.realized_pnl += state
                    .output
                    .realized_trades
                    .iter()
                    .filter(|trade| trade.sell_date <= cutoff)
                    .map(|trade| trade.realized_pnl)
                    .sum::<Decimal>();

                let quantity = state.output.total_open_quantity();
                if quantity.is_zero() {
                    continue;
                }
                let cost_basis = state.output.total_cost_basis();
                let symbol = instrument_index
                    .get(instrument_id.as_str())
                    .map(|instrument| instrument.symbol.clone())
                    .unwrap_or_else(|| instrument_id.clone());

                let position = self
                    .resolve_position(instrument_id, day, quantity, cost_basis)
                    .await?;
                snapshot.total_cost_basis += position.cost_basis;
                if !position.cost_basis_only {
                    snapshot.total_value += position.value;
                }
                snapshot.holdings.insert(symbol, position);
            }
            snapshot.unrealized_pnl = snapshot.total_value - snapshot.total_cost_basis;
            snapshots.push(snapshot);

            day = self.advance(day)?;
        }

        self.snapshot_repository.save_snapshots(&snapshots).await?;
        debug!("Wrote {} snapshots for [{}, {}]", snapshots.len(), start_date, end_date);
        Ok(snapshots)
    }

    /// Values one open position for one day, resolving the close price with
    /// carry-forward. When no price exists at all the position degrades to
    /// cost-basis-only: it keeps its cost basis but contributes no value.
    async fn resolve_position(
        &self,
        instrument_id: &str,
        day: NaiveDate,
        quantity: Decimal,
        cost_basis: Decimal,
    ) -> Result<HoldingPosition> {
        if let Some(resolved) = self
            .price_lookup
            .get_close_price_or_carry_forward(instrument_id, day)
            .await?
        {
            return Ok(HoldingPosition {
                instrument_id: instrument_id.to_string(),
                quantity,
                value: quantity * resolved.price,
                cost_basis,
                is_estimated: resolved.is_carry_forward,
                cost_basis_only: false,
            });
        }

        let first_bar = self.price_lookup.get_first_bar_date(instrument_id).await?;
        match first_bar {
            None => debug!(
                "No price history at all for {}; carrying at cost on {}",
                instrument_id, day
            ),
            Some(first) if first > day => debug!(
                "Price history for {} starts {} (after {}); carrying at cost",
                instrument_id, first, day
            ),
            Some(first) => warn!(
                "Price lookup returned no close for {} on {} despite bars since {}; carrying at cost",
                instrument_id, day, first
            ),
        }

        Ok(HoldingPosition {
            instrument_id: instrument_id.to_string(),
            quantity,
            value: Decimal::ZERO,
            cost_basis,
            is_estimated: false,
            cost_basis_only: true,
        })
    }

    /// The first trading day at or after `start_date`.
    fn first_trading_day(&self, start_date: NaiveDate) -> Result<NaiveDate> {
        if self.calendar.is_trading_day(start_date, &self.exchange) {
            return Ok(start_date);
        }
        let next = self.calendar.next_trading_day(start_date, &self.exchange);
        if next <= start_date {
            return Err(CalendarError::NonAdvancing {
                exchange: self.exchange.clone(),
                date: start_date,
            }
            .into());
        }
        Ok(next)
    }

    /// The trading day after `day`, aborting on a stalled calendar.
    fn advance(&self, day: NaiveDate) -> Result<NaiveDate> {
        let next = self.calendar.next_trading_day(day, &self.exchange);
        if next <= day {
            return Err(CalendarError::NonAdvancing {
                exchange: self.exchange.clone(),
                date: day,
            }
            .into());
        }
        Ok(next)
    }
}

/// Groups transactions per instrument, each partition sorted ascending by
/// trade date (stable: ties keep input order).
fn partition_by_instrument(transactions: &[Transaction]) -> HashMap<String, InstrumentEngineState> {
    let mut states: HashMap<String, InstrumentEngineState> = HashMap::new();
    for transaction in transactions {
        states
            .entry(transaction.instrument_id.clone())
            .or_insert_with(|| InstrumentEngineState {
                transactions: Vec::new(),
                applied: 0,
                output: LotEngineOutput::default(),
            })
            .transactions
            .push(transaction.clone());
    }
    for state in states.values_mut() {
        state.transactions.sort_by_key(|transaction| transaction.trade_date);
    }
    states
}
