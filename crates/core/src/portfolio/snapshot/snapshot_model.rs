//! Daily portfolio value snapshot models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::PORTFOLIO_TOTAL_ID;
use crate::utils::decimal_serde::decimal_serde;

/// One instrument's contribution to a daily snapshot, keyed by symbol in
/// [`PortfolioValueSnapshot::holdings`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPosition {
    pub instrument_id: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    /// The value was computed from a carried-forward close, not an exact bar.
    #[serde(default)]
    pub is_estimated: bool,
    /// No usable price existed at all: the position is carried at cost only
    /// and excluded from the snapshot's total value.
    #[serde(default)]
    pub cost_basis_only: bool,
}

/// The portfolio's state at the close of one trading day.
///
/// Rows are only ever replaced wholesale by a rebuild, never patched in
/// place. A snapshot for date D reflects exactly the transactions with
/// `trade_date <= end_of_day_utc(D)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValueSnapshot {
    /// "TOTAL_YYYY-MM-DD"
    pub id: String,
    pub snapshot_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_cost_basis: Decimal,
    /// Cumulative realized PnL from inception up to this date.
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl: Decimal,
    /// symbol -> position
    #[serde(default)]
    pub holdings: HashMap<String, HoldingPosition>,
    pub calculated_at: NaiveDateTime,
}

impl PortfolioValueSnapshot {
    pub fn new(snapshot_date: NaiveDate) -> Self {
        PortfolioValueSnapshot {
            id: Self::id_for_date(snapshot_date),
            snapshot_date,
            total_value: Decimal::ZERO,
            total_cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            holdings: HashMap::new(),
            calculated_at: Utc::now().naive_utc(),
        }
    }

    pub fn id_for_date(date: NaiveDate) -> String {
        format!("{}_{}", PORTFOLIO_TOTAL_ID, date.format("%Y-%m-%d"))
    }
}
