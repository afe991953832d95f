use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::portfolio::snapshot::SnapshotService;
use crate::portfolio::test_support::{
    buy, date, instrument, sell, trade_instant, MockPriceLookup, MockSnapshotRepository,
    WeekdayCalendar,
};

use super::PortfolioWindowService;

fn window_service(
    prices: MockPriceLookup,
    repository: Arc<MockSnapshotRepository>,
) -> PortfolioWindowService {
    let snapshot_service = Arc::new(SnapshotService::new(
        Arc::new(prices),
        repository.clone(),
        Arc::new(WeekdayCalendar),
        "NYSE".to_string(),
    ));
    PortfolioWindowService::new(snapshot_service, repository)
}

#[tokio::test]
async fn window_with_no_transactions_reports_all_zero() {
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(MockPriceLookup::new(), repository);

    let report = service
        .query_portfolio_window(&[], &[], date("2024-01-01"), date("2024-01-05"), None)
        .await
        .unwrap();

    assert_eq!(report.start_value, Decimal::ZERO);
    assert_eq!(report.end_value, Decimal::ZERO);
    assert_eq!(report.absolute_change, Decimal::ZERO);
    assert_eq!(report.percentage_change, Decimal::ZERO);
    assert_eq!(report.realized_pnl_in_window, Decimal::ZERO);
    assert_eq!(report.unrealized_pnl_at_end, Decimal::ZERO);
    assert!(report.holdings.is_empty());
}

#[tokio::test]
async fn window_statistics_derive_from_first_and_last_snapshots() {
    let prices = MockPriceLookup::new()
        .with_price("inst-aapl", "2024-01-01", dec!(100))
        .with_price("inst-aapl", "2024-01-05", dec!(110));
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(prices, repository.clone());

    let transactions = vec![buy("t1", "inst-aapl", dec!(10), dec!(100), "2024-01-01")];
    let instruments = vec![instrument("inst-aapl", "AAPL")];

    let report = service
        .query_portfolio_window(
            &transactions,
            &instruments,
            date("2024-01-01"),
            date("2024-01-05"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(report.start_value, dec!(1000));
    assert_eq!(report.end_value, dec!(1100));
    assert_eq!(report.absolute_change, dec!(100));
    assert_eq!(report.percentage_change, dec!(0.1));
    assert_eq!(report.unrealized_pnl_at_end, dec!(100));

    // The read rebuilt and stored the series for the window.
    assert_eq!(repository.row_count(), 5);
}

#[tokio::test]
async fn percentage_change_is_rounded_to_four_decimal_places() {
    let prices = MockPriceLookup::new()
        .with_price("inst-aapl", "2024-01-01", dec!(33))
        .with_price("inst-aapl", "2024-01-02", dec!(34));
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(prices, repository);

    let transactions = vec![buy("t1", "inst-aapl", dec!(3), dec!(33), "2024-01-01")];
    let instruments = vec![instrument("inst-aapl", "AAPL")];

    let report = service
        .query_portfolio_window(
            &transactions,
            &instruments,
            date("2024-01-01"),
            date("2024-01-02"),
            None,
        )
        .await
        .unwrap();

    // 3 / 99 = 0.0303... rounded to 4 places.
    assert_eq!(report.absolute_change, dec!(3));
    assert_eq!(report.percentage_change, dec!(0.0303));
}

#[tokio::test]
async fn as_of_cutoff_ignores_later_transactions() {
    let mut prices = MockPriceLookup::new();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"] {
        prices.add_price("inst-aapl", day, dec!(100));
    }
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(prices, repository);

    let transactions = vec![
        buy("t1", "inst-aapl", dec!(10), dec!(100), "2024-01-01"),
        buy("t2", "inst-aapl", dec!(90), dec!(100), "2024-01-04"),
    ];
    let instruments = vec![instrument("inst-aapl", "AAPL")];

    let report = service
        .query_portfolio_window(
            &transactions,
            &instruments,
            date("2024-01-01"),
            date("2024-01-05"),
            Some(trade_instant("2024-01-02")),
        )
        .await
        .unwrap();

    // The Jan 4 BUY postdates the cutoff and is invisible to the query.
    assert_eq!(report.end_value, dec!(1000));
    assert_eq!(report.holdings.len(), 1);
    assert_eq!(report.holdings[0].quantity, dec!(10));
}

#[tokio::test]
async fn realized_pnl_counts_only_sells_inside_the_window() {
    let mut prices = MockPriceLookup::new();
    prices.add_price("inst-aapl", "2023-12-01", dec!(10));
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"] {
        prices.add_price("inst-aapl", day, dec!(15));
    }
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(prices, repository);

    let transactions = vec![
        buy("t1", "inst-aapl", dec!(100), dec!(10), "2023-12-01"),
        sell("t2", "inst-aapl", dec!(10), dec!(12), Decimal::ZERO, "2023-12-28"),
        sell("t3", "inst-aapl", dec!(10), dec!(15), Decimal::ZERO, "2024-01-03"),
        sell("t4", "inst-aapl", dec!(10), dec!(20), Decimal::ZERO, "2024-02-01"),
    ];
    let instruments = vec![instrument("inst-aapl", "AAPL")];

    let report = service
        .query_portfolio_window(
            &transactions,
            &instruments,
            date("2024-01-01"),
            date("2024-01-05"),
            None,
        )
        .await
        .unwrap();

    // Only the Jan 3 SELL lands inside the window: 10 * (15 - 10).
    assert_eq!(report.realized_pnl_in_window, dec!(50));
}

#[tokio::test]
async fn holdings_breakdown_derives_from_the_last_snapshot() {
    let prices = MockPriceLookup::new()
        .with_price("inst-aapl", "2024-01-02", dec!(110))
        .with_price("inst-msft", "2024-01-02", dec!(60));
    let repository = Arc::new(MockSnapshotRepository::new());
    let service = window_service(prices, repository);

    let transactions = vec![
        buy("t1", "inst-msft", dec!(20), dec!(50), "2024-01-01"),
        buy("t2", "inst-aapl", dec!(10), dec!(100), "2024-01-01"),
    ];
    let instruments = vec![
        instrument("inst-aapl", "AAPL"),
        instrument("inst-msft", "MSFT"),
    ];

    let report = service
        .query_portfolio_window(
            &transactions,
            &instruments,
            date("2024-01-02"),
            date("2024-01-02"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(report.holdings.len(), 2);
    // Sorted by symbol.
    assert_eq!(report.holdings[0].symbol, "AAPL");
    assert_eq!(report.holdings[1].symbol, "MSFT");

    let aapl = &report.holdings[0];
    assert_eq!(aapl.instrument_id, "inst-aapl");
    assert_eq!(aapl.value, dec!(1100));
    assert_eq!(aapl.cost_basis, dec!(1000));
    assert_eq!(aapl.unrealized_pnl, dec!(100));

    let msft = &report.holdings[1];
    assert_eq!(msft.value, dec!(1200));
    assert_eq!(msft.unrealized_pnl, dec!(200));
}
