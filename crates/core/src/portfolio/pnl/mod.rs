mod pnl_calculator;
mod pnl_model;

pub use pnl_calculator::*;
pub use pnl_model::*;
