//! Price lookup trait implemented by the market data layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ResolvedPrice;
use crate::errors::Result;

/// Read-only close-price access for the valuation engine.
///
/// The engine issues one resolution per instrument per trading day and calls
/// serially; implementations are expected to batch or cache internally.
#[async_trait]
pub trait PriceLookupTrait: Send + Sync {
    /// Close price for the exact date, if a bar exists.
    async fn get_close_price(
        &self,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Decimal>>;

    /// Close price for the date, falling back to the most recent earlier bar.
    /// Returns `None` when no bar exists on or before the date.
    async fn get_close_price_or_carry_forward(
        &self,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<Option<ResolvedPrice>>;

    /// Date of the earliest known bar for the instrument, if any.
    async fn get_first_bar_date(&self, instrument_id: &str) -> Result<Option<NaiveDate>>;
}
