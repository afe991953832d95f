//! PnL aggregation models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// Aggregated view of one instrument's open position and trading history
/// against a mark price. Derived at query time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSummary {
    pub instrument_id: String,
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub average_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub unrealized_pnl_percent: Decimal,
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
}
