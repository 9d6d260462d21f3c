use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rate used for any currency missing from the table.
pub const FALLBACK_RATE: f64 = 1.0;

/// Exchange rates from a single fetch, all relative to `base_currency`.
///
/// A rate is the value of one unit of the base currency expressed in the
/// given currency, so `1 / rate` converts that currency into base units.
/// Tables are replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base_currency: String,
    rates: HashMap<String, f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Build a table from fetched rates. Keys are uppercased.
    pub fn new(
        base_currency: impl Into<String>,
        rates: HashMap<String, f64>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            base_currency: base_currency.into().to_uppercase(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
            fetched_at: Some(fetched_at),
        }
    }

    /// Placeholder table used before the first fetch for `base_currency`
    /// completes. Every lookup falls back to 1.0.
    pub fn empty(base_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into().to_uppercase(),
            rates: HashMap::new(),
            fetched_at: None,
        }
    }

    /// Rate for `currency_code`, or 1.0 when the table has no entry.
    pub fn rate_of(&self, currency_code: &str) -> f64 {
        self.get(currency_code).unwrap_or(FALLBACK_RATE)
    }

    /// Raw table entry, without the fallback.
    pub fn get(&self, currency_code: &str) -> Option<f64> {
        self.rates.get(&currency_code.to_uppercase()).copied()
    }

    pub fn contains(&self, currency_code: &str) -> bool {
        self.rates.contains_key(&currency_code.to_uppercase())
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// True for placeholder tables that never came from a fetch.
    pub fn is_placeholder(&self) -> bool {
        self.fetched_at.is_none()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterate over `(code, rate)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Currency codes sorted alphabetically (deterministic, for pickers).
    pub fn currency_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
