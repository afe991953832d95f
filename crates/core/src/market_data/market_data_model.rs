//! Price resolution models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// A close price resolved for a valuation date.
///
/// `actual_date` is the bar the price came from. When no bar exists for the
/// requested date the lookup may fall back to the most recent earlier bar;
/// such prices carry `is_carry_forward = true` and the valuation that uses
/// them is flagged as estimated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    pub actual_date: NaiveDate,
    pub is_carry_forward: bool,
}
