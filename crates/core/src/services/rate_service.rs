use crate::errors::CoreError;
use crate::models::rates::RateTable;
use crate::providers::registry::RateProviderRegistry;

/// Identifies one rate fetch. Only the most recently issued ticket may have
/// its result applied; anything older is a stale response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    base_currency: String,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }
}

/// Fetches rate tables from the registered providers with automatic
/// fallback, and hands out fetch tickets from a monotonic counter.
pub struct RateService {
    registry: RateProviderRegistry,
    generation: u64,
}

impl RateService {
    pub fn new(registry: RateProviderRegistry) -> Self {
        Self {
            registry,
            generation: 0,
        }
    }

    /// Names of all registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Issue a ticket for a new fetch. Supersedes every earlier ticket.
    pub fn begin_fetch(&mut self, base_currency: &str) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            base_currency: base_currency.to_uppercase(),
        }
    }

    /// Supersede every outstanding ticket without issuing a new one.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether a result for `ticket` may still be applied while
    /// `base_currency` is in effect.
    pub fn is_current(&self, ticket: &FetchTicket, base_currency: &str) -> bool {
        ticket.generation == self.generation
            && ticket.base_currency.eq_ignore_ascii_case(base_currency)
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Fetch the rates for a ticket's base currency.
    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<RateTable, CoreError> {
        self.fetch_rates(&ticket.base_currency).await
    }

    /// Fetch a rate table against `base_currency`.
    ///
    /// Tries providers in registration order. If the primary fails (API down,
    /// rate limited, bad data), automatically falls back to the next one.
    /// A table is rejected if its base differs from the request or any rate
    /// is non-finite or not strictly positive.
    pub async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let base = base_currency.to_uppercase();
        let mut last_error = None;

        for provider in &providers {
            let result = provider
                .fetch_rates(&base)
                .await
                .and_then(|table| Self::validate_table(provider.name(), &base, table));

            match result {
                Ok(table) => {
                    log::debug!(
                        "Fetched {} rates for base {base} from {}",
                        table.len(),
                        provider.name()
                    );
                    return Ok(table);
                }
                Err(e) => {
                    log::warn!("Rate provider {} failed for base {base}: {e}", provider.name());
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    fn validate_table(
        provider: &str,
        base: &str,
        table: RateTable,
    ) -> Result<RateTable, CoreError> {
        if !table.base_currency().eq_ignore_ascii_case(base) {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!(
                    "Requested rates for base {base} but received base {}",
                    table.base_currency()
                ),
            });
        }

        if let Some((code, rate)) = table.iter().find(|(_, r)| !r.is_finite() || *r <= 0.0) {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!(
                    "Invalid rate returned for {code}: {rate} (must be finite and positive)"
                ),
            });
        }

        Ok(table)
    }
}
