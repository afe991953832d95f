//! Instrument registry models.

use serde::{Deserialize, Serialize};

/// A tradable instrument known to the portfolio.
///
/// The engine only needs identity and display data; quotes, profiles and
/// provider metadata live behind the price lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

impl Instrument {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, currency: impl Into<String>) -> Self {
        Instrument {
            id: id.into(),
            symbol: symbol.into(),
            name: None,
            currency: currency.into(),
            exchange: None,
        }
    }
}
