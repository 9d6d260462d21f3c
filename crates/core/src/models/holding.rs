use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded quantity of a currency.
///
/// `purchase_rate` is the rate table's entry for `currency_code` at the time
/// the holding was created, relative to the base currency in effect then.
/// It is only meaningful under that base currency, which is why a rebase
/// clears every holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Stable identifier, used by the durable store only
    pub id: Uuid,

    /// Units held, in the holding's own currency. Always > 0.
    pub amount: f64,

    /// Currency code, uppercased (e.g., "EUR")
    pub currency_code: String,

    /// Recorded rate at acquisition. Always > 0.
    pub purchase_rate: f64,
}

impl Holding {
    /// Create a holding with a fresh random ID.
    ///
    /// Performs no validation; `PortfolioService::add_holding` is the
    /// validating entry point.
    pub fn new(amount: f64, currency_code: impl Into<String>, purchase_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            currency_code: currency_code.into().trim().to_uppercase(),
            purchase_rate,
        }
    }
}
