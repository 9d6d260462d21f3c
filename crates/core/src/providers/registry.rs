use super::frankfurter::FrankfurterProvider;
use super::traits::RateProvider;
use crate::models::settings::Settings;

/// Ordered list of rate providers. The first registered is the primary;
/// the rest are fallbacks tried in registration order.
pub struct RateProviderRegistry {
    providers: Vec<Box<dyn RateProvider>>,
}

impl RateProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers for these settings.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // Frankfurter: ECB rates, no API key needed
        registry.register(Box::new(FrankfurterProvider::with_base_url(
            settings.rate_api_url.clone(),
        )));

        registry
    }

    /// Register a new rate provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn RateProvider>) {
        self.providers.push(provider);
    }

    /// All providers, ordered by registration priority.
    pub fn providers(&self) -> Vec<&dyn RateProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for RateProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
