use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// First instant of the given valuation date, UTC.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time of day");
    Utc.from_utc_datetime(&naive)
}

/// Last instant of the given valuation date, UTC (millisecond resolution).
///
/// A transaction belongs to day D exactly when `trade_date <= end_of_day_utc(D)`.
pub fn end_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is always a valid time of day");
    Utc.from_utc_datetime(&naive)
}

/// Today's valuation date, UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
