mod transaction_validator;
mod transactions_model;

pub use transaction_validator::*;
pub use transactions_model::*;
