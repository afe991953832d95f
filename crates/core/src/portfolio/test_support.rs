//! Shared mock collaborators and fixture helpers for portfolio tests.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::RwLock;

use crate::calendar::TradingCalendarTrait;
use crate::errors::Result;
use crate::instruments::Instrument;
use crate::market_data::{PriceLookupTrait, ResolvedPrice};
use crate::portfolio::snapshot::{PortfolioValueSnapshot, SnapshotRepositoryTrait};
use crate::transactions::{Transaction, TransactionType};

// --- Fixture helpers ---

pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::from_str(date_str).unwrap()
}

pub fn trade_instant(date_str: &str) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date(date_str).and_hms_opt(15, 30, 0).unwrap())
}

pub fn instrument(id: &str, symbol: &str) -> Instrument {
    Instrument::new(id, symbol, "USD")
}

pub fn buy(
    id: &str,
    instrument_id: &str,
    quantity: Decimal,
    unit_price: Decimal,
    date_str: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument_id.to_string(),
        transaction_type: TransactionType::Buy,
        quantity,
        unit_price,
        fee: Decimal::ZERO,
        trade_date: trade_instant(date_str),
        notes: None,
    }
}

pub fn sell(
    id: &str,
    instrument_id: &str,
    quantity: Decimal,
    unit_price: Decimal,
    fee: Decimal,
    date_str: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument_id.to_string(),
        transaction_type: TransactionType::Sell,
        quantity,
        unit_price,
        fee,
        trade_date: trade_instant(date_str),
        notes: None,
    }
}

// --- Mock price lookup ---

/// In-memory close-price bars keyed per instrument, with the same
/// carry-forward semantics the engine expects from the market data layer.
#[derive(Default)]
pub struct MockPriceLookup {
    bars: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl MockPriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, instrument_id: &str, date_str: &str, price: Decimal) -> Self {
        self.add_price(instrument_id, date_str, price);
        self
    }

    pub fn add_price(&mut self, instrument_id: &str, date_str: &str, price: Decimal) {
        self.bars
            .entry(instrument_id.to_string())
            .or_default()
            .insert(date(date_str), price);
    }
}

#[async_trait]
impl PriceLookupTrait for MockPriceLookup {
    async fn get_close_price(
        &self,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Decimal>> {
        Ok(self
            .bars
            .get(instrument_id)
            .and_then(|bars| bars.get(&date))
            .copied())
    }

    async fn get_close_price_or_carry_forward(
        &self,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<Option<ResolvedPrice>> {
        let bars = match self.bars.get(instrument_id) {
            Some(bars) => bars,
            None => return Ok(None),
        };
        Ok(bars
            .range(..=date)
            .next_back()
            .map(|(actual_date, price)| ResolvedPrice {
                price: *price,
                actual_date: *actual_date,
                is_carry_forward: *actual_date != date,
            }))
    }

    async fn get_first_bar_date(&self, instrument_id: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .bars
            .get(instrument_id)
            .and_then(|bars| bars.keys().next())
            .copied())
    }
}

// --- Mock snapshot repository ---

/// Snapshot store over an in-memory ordered map, date-keyed like the
/// storage layer's unique index on snapshot_date.
#[derive(Default)]
pub struct MockSnapshotRepository {
    rows: RwLock<BTreeMap<NaiveDate, PortfolioValueSnapshot>>,
}

impl MockSnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn stored_dates(&self) -> Vec<NaiveDate> {
        self.rows.read().unwrap().keys().copied().collect()
    }

    /// Seeds a stored row directly, bypassing the engine (for
    /// delete-then-rewrite tests).
    pub fn seed(&self, snapshot: PortfolioValueSnapshot) {
        self.rows
            .write()
            .unwrap()
            .insert(snapshot.snapshot_date, snapshot);
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for MockSnapshotRepository {
    async fn delete_snapshots_from_date(&self, start_date: NaiveDate) -> Result<usize> {
        let mut rows = self.rows.write().unwrap();
        let removed = rows.split_off(&start_date);
        Ok(removed.len())
    }

    async fn save_snapshots(&self, snapshots: &[PortfolioValueSnapshot]) -> Result<()> {
        let mut rows = self.rows.write().unwrap();
        for snapshot in snapshots {
            rows.insert(snapshot.snapshot_date, snapshot.clone());
        }
        Ok(())
    }

    fn get_snapshots_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioValueSnapshot>> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .range(start_date..=end_date)
            .map(|(_, snapshot)| snapshot.clone())
            .collect())
    }

    fn get_snapshot_by_date(&self, date: NaiveDate) -> Result<Option<PortfolioValueSnapshot>> {
        Ok(self.rows.read().unwrap().get(&date).cloned())
    }
}

// --- Mock calendars ---

/// Weekday-only trading calendar; ignores holidays and the exchange code.
pub struct WeekdayCalendar;

impl TradingCalendarTrait for WeekdayCalendar {
    fn is_trading_day(&self, date: NaiveDate, _exchange: &str) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn next_trading_day(&self, date: NaiveDate, exchange: &str) -> NaiveDate {
        let mut next = date + Duration::days(1);
        while !self.is_trading_day(next, exchange) {
            next += Duration::days(1);
        }
        next
    }
}

/// A broken calendar that never advances; used to exercise the defensive
/// abort in the day loop.
pub struct StalledCalendar;

impl TradingCalendarTrait for StalledCalendar {
    fn is_trading_day(&self, _date: NaiveDate, _exchange: &str) -> bool {
        true
    }

    fn next_trading_day(&self, date: NaiveDate, _exchange: &str) -> NaiveDate {
        date
    }
}
