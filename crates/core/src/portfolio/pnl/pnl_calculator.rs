//! Unrealized and realized PnL aggregation over lots and realized trades.

use rust_decimal::Decimal;

use super::HoldingSummary;
use crate::portfolio::lots::{Lot, RealizedTrade};

/// Paper profit of the open lots against a mark price. Empty lots sum to ZERO.
pub fn compute_unrealized_pnl(lots: &[Lot], mark_price: Decimal) -> Decimal {
    lots.iter()
        .map(|lot| mark_price * lot.remaining_qty - lot.cost_basis_remaining)
        .sum()
}

/// Total locked-in profit of the given realized trades. Empty input is ZERO.
pub fn compute_realized_pnl(trades: &[RealizedTrade]) -> Decimal {
    trades.iter().map(|trade| trade.realized_pnl).sum()
}

/// Aggregates one instrument's lots and trades into a [`HoldingSummary`].
///
/// All ratios are zero-guarded: a position with no remaining cost basis
/// reports ZERO percentages rather than NaN or infinity, while historical
/// realized PnL is still carried.
pub fn compute_holding_summary(
    instrument_id: &str,
    symbol: &str,
    lots: &[Lot],
    trades: &[RealizedTrade],
    mark_price: Decimal,
) -> HoldingSummary {
    let quantity: Decimal = lots.iter().map(|lot| lot.remaining_qty).sum();
    let cost_basis: Decimal = lots.iter().map(|lot| lot.cost_basis_remaining).sum();
    let market_value = quantity * mark_price;
    let unrealized_pnl = market_value - cost_basis;

    let unrealized_pnl_percent = if cost_basis.is_zero() {
        Decimal::ZERO
    } else {
        unrealized_pnl / cost_basis
    };
    let average_cost = if quantity.is_zero() {
        Decimal::ZERO
    } else {
        cost_basis / quantity
    };

    HoldingSummary {
        instrument_id: instrument_id.to_string(),
        symbol: symbol.to_string(),
        quantity,
        average_cost,
        cost_basis,
        market_value,
        unrealized_pnl,
        unrealized_pnl_percent,
        realized_pnl: compute_realized_pnl(trades),
    }
}
