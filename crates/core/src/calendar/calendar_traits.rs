//! Trading calendar trait implemented by the market calendar layer.

use chrono::NaiveDate;

/// Trading-day queries for one exchange.
///
/// Contract: `next_trading_day` returns a date strictly after its input.
/// The snapshot builder treats a non-advancing result as fatal
/// ([`crate::errors::CalendarError::NonAdvancing`]).
pub trait TradingCalendarTrait: Send + Sync {
    fn is_trading_day(&self, date: NaiveDate, exchange: &str) -> bool;

    fn next_trading_day(&self, date: NaiveDate, exchange: &str) -> NaiveDate;
}
