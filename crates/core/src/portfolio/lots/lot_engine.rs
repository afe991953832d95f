//! FIFO lot consumption for a single instrument.

use log::warn;
use rust_decimal::Decimal;

use crate::transactions::{Transaction, TransactionType};

use super::{Lot, LotEngineOutput, RealizedTrade};

/// Replays one instrument's transactions, pre-sorted ascending by
/// `trade_date`, into open lots and realized trades.
///
/// A BUY opens a lot; a SELL consumes the oldest open lots first. The engine
/// never fails: a SELL exceeding the open quantity consumes what is
/// available and leaves the rest unfilled (the transaction validator is the
/// precondition gate for that case).
pub fn process_transactions(transactions: &[Transaction]) -> LotEngineOutput {
    let mut lots: Vec<Lot> = Vec::new();
    let mut realized_trades: Vec<RealizedTrade> = Vec::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Buy => {
                lots.push(Lot {
                    instrument_id: transaction.instrument_id.clone(),
                    opened_at: transaction.trade_date,
                    original_qty: transaction.quantity,
                    remaining_qty: transaction.quantity,
                    unit_price: transaction.unit_price,
                    cost_basis_remaining: transaction.quantity * transaction.unit_price,
                });
            }
            TransactionType::Sell => {
                apply_sell(&mut lots, &mut realized_trades, transaction);
            }
        }
    }

    LotEngineOutput {
        lots,
        realized_trades,
    }
}

/// Consumes lots oldest-first for one SELL, emitting one realized trade per
/// consumed lot and mutating the touched lots afterwards.
fn apply_sell(
    lots: &mut Vec<Lot>,
    realized_trades: &mut Vec<RealizedTrade>,
    transaction: &Transaction,
) {
    let total_sell_qty = transaction.quantity;

    // Phase 1: determine consumption, oldest lot first.
    let mut remaining_to_sell = total_sell_qty;
    let mut consumed: Vec<(usize, Decimal)> = Vec::new();
    for (index, lot) in lots.iter().enumerate() {
        if remaining_to_sell <= Decimal::ZERO {
            break;
        }
        if lot.remaining_qty <= Decimal::ZERO {
            continue;
        }
        let quantity = lot.remaining_qty.min(remaining_to_sell);
        consumed.push((index, quantity));
        remaining_to_sell -= quantity;
    }

    let fully_covered = remaining_to_sell <= Decimal::ZERO;
    if !fully_covered {
        warn!(
            "SELL {} requested {} of {} but only {} was open; consuming the open quantity",
            transaction.id,
            total_sell_qty,
            transaction.instrument_id,
            total_sell_qty - remaining_to_sell
        );
    }

    // Phase 2: realize and allocate fees, oldest lot first.
    let mut fees_allocated = Decimal::ZERO;
    let last_index = consumed.len().saturating_sub(1);
    for (position, (index, quantity)) in consumed.iter().enumerate() {
        let lot = &lots[*index];
        let proceeds = *quantity * transaction.unit_price;
        let cost_basis = *quantity * lot.unit_price;
        let fees = if total_sell_qty.is_zero() {
            Decimal::ZERO
        } else if fully_covered && position == last_index {
            // The last consumed lot takes the arithmetic remainder so the
            // allocated fees always sum exactly to the SELL's fee.
            transaction.fee - fees_allocated
        } else {
            (*quantity * transaction.fee) / total_sell_qty
        };
        fees_allocated += fees;

        realized_trades.push(RealizedTrade {
            instrument_id: transaction.instrument_id.clone(),
            sell_date: transaction.trade_date,
            quantity: *quantity,
            proceeds,
            cost_basis,
            fees,
            realized_pnl: proceeds - cost_basis - fees,
        });
    }

    // Phase 3: mutate touched lots in reverse index order so removals keep
    // earlier indices stable.
    for (index, quantity) in consumed.iter().rev() {
        let lot = &mut lots[*index];
        lot.remaining_qty -= *quantity;
        lot.cost_basis_remaining -= *quantity * lot.unit_price;
        if lot.remaining_qty.is_zero() {
            lots.remove(*index);
        }
    }
}
