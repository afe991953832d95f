/// Portfolio-level snapshot ID prefix
pub const PORTFOLIO_TOTAL_ID: &str = "TOTAL";

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for window percentage-change figures
pub const PERCENT_SCALE: u32 = 4;
