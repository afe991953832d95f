//! Windowed portfolio query models. Derived at query time, never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// One holding in the window report, derived from the last snapshot of the
/// window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingBreakdown {
    pub symbol: String,
    pub instrument_id: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl: Decimal,
    pub is_estimated: bool,
}

/// Point-in-time / windowed view of the portfolio between two dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioWindowReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub start_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub end_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub absolute_change: Decimal,
    /// `absolute_change / start_value` to four decimal places; ZERO when the
    /// window starts from nothing.
    #[serde(with = "decimal_serde")]
    pub percentage_change: Decimal,
    /// Realized PnL of sells dated inside the window only.
    #[serde(with = "decimal_serde")]
    pub realized_pnl_in_window: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl_at_end: Decimal,
    pub holdings: Vec<HoldingBreakdown>,
}
