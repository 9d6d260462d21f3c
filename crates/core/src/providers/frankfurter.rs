use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::rates::RateTable;
use crate::models::settings::DEFAULT_RATE_API_URL;
use super::traits::RateProvider;

/// Frankfurter API provider for fiat currency exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30 currencies (EUR, USD, TRY, GBP, JPY, etc.)
/// - **Endpoint**: `/latest?base={base}`
///
/// Frankfurter omits the base itself from `rates`; we add it at 1.0 so
/// holdings in the base currency resolve to an explicit entry.
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_RATE_API_URL)
    }

    /// Point the provider at a self-hosted Frankfurter instance.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the table from a decoded response body.
    pub fn parse_latest(base_currency: &str, body: &str) -> Result<RateTable, CoreError> {
        let base = base_currency.to_uppercase();
        let resp: LatestResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("Failed to parse rates for base {base}: {e}"),
        })?;
        Self::into_table(&base, resp)
    }

    fn into_table(base: &str, resp: LatestResponse) -> Result<RateTable, CoreError> {
        if !resp.base.eq_ignore_ascii_case(base) {
            return Err(CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Requested base {base} but received {}", resp.base),
            });
        }

        let mut rates = resp.rates;
        rates.insert(base.to_string(), 1.0);
        Ok(RateTable::new(base, rates, Utc::now()))
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct LatestResponse {
    base: String,
    rates: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, CoreError> {
        let base = base_currency.to_uppercase();
        let url = format!("{}/latest?base={base}", self.base_url);

        let resp: LatestResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse rates for base {base}: {e}"),
            })?;

        Self::into_table(&base, resp)
    }
}
