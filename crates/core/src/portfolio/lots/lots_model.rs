//! Tax-lot domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// An open tax lot: the still-held remainder of a single BUY.
///
/// Lots are kept in FIFO order (ascending `opened_at`) per instrument.
/// `cost_basis_remaining` is always `remaining_qty * unit_price`; BUY fees
/// do not capitalize into the basis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub instrument_id: String,
    pub opened_at: DateTime<Utc>,
    #[serde(with = "decimal_serde")]
    pub original_qty: Decimal,
    #[serde(with = "decimal_serde")]
    pub remaining_qty: Decimal,
    #[serde(with = "decimal_serde")]
    pub unit_price: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis_remaining: Decimal,
}

/// Profit or loss locked in by one SELL against one consumed lot.
///
/// A SELL that crosses several lots emits one record per lot, oldest lot
/// first. `fees` is the SELL fee share allocated to this record; shares
/// always sum exactly to the SELL's fee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealizedTrade {
    pub instrument_id: String,
    pub sell_date: DateTime<Utc>,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub proceeds: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub fees: Decimal,
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
}

/// Result of replaying one instrument's transactions through the lot engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LotEngineOutput {
    /// Remaining open lots, FIFO order.
    pub lots: Vec<Lot>,
    /// Realized trades in chronological emission order.
    pub realized_trades: Vec<RealizedTrade>,
}

impl LotEngineOutput {
    pub fn total_open_quantity(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.remaining_qty).sum()
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.cost_basis_remaining).sum()
    }
}
