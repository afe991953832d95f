//! Precondition check for transaction sets: a valid set never drives an
//! instrument's position negative at any point of its replay.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde_option;

use super::{Transaction, TransactionType};

/// Outcome of [`validate_transaction_set`]. Structured data, not an error:
/// mutation handlers reject the offending change using the reported violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSetValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offending_transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_negative_date: Option<DateTime<Utc>>,
    #[serde(default, with = "decimal_serde_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deficit_qty: Option<Decimal>,
}

impl TransactionSetValidation {
    fn ok() -> Self {
        TransactionSetValidation {
            valid: true,
            offending_transaction: None,
            first_negative_date: None,
            deficit_qty: None,
        }
    }

    fn oversell(transaction: &Transaction, available: Decimal) -> Self {
        TransactionSetValidation {
            valid: false,
            first_negative_date: Some(transaction.trade_date),
            deficit_qty: Some(transaction.quantity - available),
            offending_transaction: Some(transaction.clone()),
        }
    }
}

/// Replays one instrument's transactions in `trade_date` order and reports
/// the first SELL that would drive the running position negative.
///
/// The caller pre-filters by instrument. Selling down to exactly zero is
/// valid, as is an empty set. Only the first violation is reported.
pub fn validate_transaction_set(transactions: &[Transaction]) -> TransactionSetValidation {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    // Stable sort: equal trade dates keep input order.
    ordered.sort_by_key(|tx| tx.trade_date);

    let mut balance = Decimal::ZERO;
    for tx in ordered {
        if tx.transaction_type == TransactionType::Sell && tx.quantity > balance {
            return TransactionSetValidation::oversell(tx, balance);
        }
        balance += tx.signed_quantity();
    }

    TransactionSetValidation::ok()
}
