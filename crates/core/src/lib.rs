pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    currency::{normalize_currency_code, CurrencyInfo},
    holding::Holding,
    outcome::{BaseCurrencyChange, Committed, RateApplication, RebaseOutcome, RebaseState},
    rates::RateTable,
    settings::Settings,
    snapshot::PortfolioSnapshot,
};
use providers::{
    metadata::BuiltinCurrencyMetadata, registry::RateProviderRegistry, traits::CurrencyMetadata,
};
use services::{
    portfolio_service::PortfolioService,
    rate_service::{FetchTicket, RateService},
    valuation_service::ValuationService,
};
use storage::store::DurableStore;

use errors::CoreError;

/// Main entry point for the currency portfolio core library.
///
/// Owns the holdings, the current rate table, the base currency and the
/// collaborators (durable store, rate providers, currency metadata). All
/// mutations go through `&mut self`, so there is exactly one writer.
#[must_use]
pub struct PortfolioTracker {
    holdings: Vec<Holding>,
    base_currency: String,
    rates: RateTable,
    rebase_state: RebaseState,
    /// Aggregate value of `holdings` under `rates`, refreshed after every
    /// mutation or rate change.
    total_current_value: f64,
    /// Why startup fell back to an empty portfolio, if it did.
    startup_error: Option<CoreError>,
    store: Box<dyn DurableStore>,
    rate_service: RateService,
    metadata: Box<dyn CurrencyMetadata>,
    portfolio_service: PortfolioService,
    valuation_service: ValuationService,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.holdings.len())
            .field("base_currency", &self.base_currency)
            .field("rates", &self.rates.len())
            .field("rebase_state", &self.rebase_state)
            .field("total_current_value", &self.total_current_value)
            .finish()
    }
}

impl PortfolioTracker {
    /// Open the portfolio kept in `store`, fetching rates through the
    /// default providers for `settings`.
    pub fn open(store: Box<dyn DurableStore>, settings: Settings) -> Self {
        let registry = RateProviderRegistry::new_with_defaults(&settings);
        Self::with_registry(store, settings, registry)
    }

    /// Open the portfolio with an explicit set of rate providers.
    ///
    /// A store that cannot be read never blocks startup: the tracker comes
    /// up empty and the failure is available from `startup_error()`. On first
    /// run the base currency is `settings.base_currency` (locale-derived by
    /// default), and it is persisted immediately.
    pub fn with_registry(
        mut store: Box<dyn DurableStore>,
        settings: Settings,
        registry: RateProviderRegistry,
    ) -> Self {
        let mut startup_error = None;

        let base_currency = match store.load_base_currency() {
            Ok(Some(code)) => match normalize_currency_code(&code) {
                Ok(code) => code,
                Err(e) => {
                    log::warn!("Stored base currency '{code}' is invalid, using default: {e}");
                    settings.base_currency.clone()
                }
            },
            Ok(None) => {
                let code = settings.base_currency.clone();
                if let Err(e) = store.save_base_currency(&code) {
                    log::warn!("Failed to persist initial base currency {code}: {e}");
                }
                code
            }
            Err(e) => {
                log::warn!("Could not load base currency, using default: {e}");
                startup_error = Some(e);
                settings.base_currency.clone()
            }
        };

        let portfolio_service = PortfolioService::new();
        let holdings = match store.load_holdings() {
            Ok(holdings) => portfolio_service.sanitize(holdings),
            Err(e) => {
                log::warn!("Could not load holdings, starting with an empty portfolio: {e}");
                startup_error.get_or_insert(e);
                Vec::new()
            }
        };

        log::info!(
            "Opened portfolio with {} holdings in base currency {base_currency}",
            holdings.len()
        );

        let mut tracker = Self {
            holdings,
            rates: RateTable::empty(&base_currency),
            base_currency,
            rebase_state: RebaseState::Stable,
            total_current_value: 0.0,
            startup_error,
            store,
            rate_service: RateService::new(registry),
            metadata: Box::new(BuiltinCurrencyMetadata::new()),
            portfolio_service,
            valuation_service: ValuationService::new(),
        };
        tracker.recompute_total();
        tracker
    }

    /// Replace the currency metadata source used by `describe_currency`.
    pub fn with_metadata(mut self, metadata: Box<dyn CurrencyMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    // ── Read-only views ─────────────────────────────────────────────

    /// Value every holding against the current rates. Recomputed on every
    /// call.
    pub fn snapshot(&self) -> PortfolioSnapshot {
        self.valuation_service
            .snapshot(&self.holdings, &self.rates, &self.base_currency)
    }

    /// Aggregate value of all valid holdings, in the base currency.
    #[must_use]
    pub fn total_current_value(&self) -> f64 {
        self.total_current_value
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    #[must_use]
    pub fn holding(&self, index: usize) -> Option<&Holding> {
        self.holdings.get(index)
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    #[must_use]
    pub fn rebase_state(&self) -> &RebaseState {
        &self.rebase_state
    }

    /// The load failure that made startup fall back to an empty portfolio.
    #[must_use]
    pub fn startup_error(&self) -> Option<&CoreError> {
        self.startup_error.as_ref()
    }

    /// Display name and symbol for a currency. Presentation only.
    pub fn describe_currency(&self, currency_code: &str) -> Result<CurrencyInfo, CoreError> {
        self.metadata.lookup(currency_code)
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.rate_service.provider_names()
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Record a new holding at the current rate of its currency.
    /// Returns the new holding's ID.
    pub fn add_holding(
        &mut self,
        amount: f64,
        currency_code: &str,
    ) -> Result<Committed<uuid::Uuid>, CoreError> {
        let index = self.portfolio_service.add_holding(
            &mut self.holdings,
            amount,
            currency_code,
            &self.rates,
        )?;
        let id = self.holdings[index].id;
        log::debug!("Added holding {id}: {amount} {}", self.holdings[index].currency_code);
        self.recompute_total();

        let persist_error = Self::report("holdings", self.store.save_holdings(&self.holdings));
        Ok(Committed {
            value: id,
            persist_error,
        })
    }

    /// Replace the amount of the holding at `index`.
    pub fn update_amount(
        &mut self,
        index: usize,
        new_amount: f64,
    ) -> Result<Committed<()>, CoreError> {
        self.portfolio_service
            .update_amount(&mut self.holdings, index, new_amount)?;
        log::debug!("Updated holding at {index} to amount {new_amount}");
        self.recompute_total();

        let persist_error = Self::report("holdings", self.store.save_holdings(&self.holdings));
        Ok(Committed {
            value: (),
            persist_error,
        })
    }

    /// Delete the holding at `index`. Returns the removed holding.
    pub fn remove_holding(&mut self, index: usize) -> Result<Committed<Holding>, CoreError> {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.holdings, index)?;
        log::debug!("Removed holding {} at {index}", removed.id);
        self.recompute_total();

        let persist_error = Self::report("holding deletion", self.store.delete_holding(removed.id));
        Ok(Committed {
            value: removed,
            persist_error,
        })
    }

    /// Write the full in-memory state to the store again, e.g. after an
    /// earlier persistence failure.
    pub fn persist(&mut self) -> Result<(), CoreError> {
        self.store.save_holdings(&self.holdings)?;
        self.store.save_base_currency(&self.base_currency)
    }

    // ── Base currency ───────────────────────────────────────────────

    /// Ask to switch the base currency.
    ///
    /// With no holdings the change is committed at once and rates for the
    /// new base are fetched. With holdings, nothing changes yet: the caller
    /// must confirm (losing every holding) or cancel. Asking for the current
    /// base currency is a no-op.
    pub async fn request_base_currency_change(
        &mut self,
        currency_code: &str,
    ) -> Result<BaseCurrencyChange, CoreError> {
        let target = normalize_currency_code(currency_code)?;

        if target == self.base_currency {
            self.rebase_state = RebaseState::Stable;
            return Ok(BaseCurrencyChange::AppliedImmediately(Committed::persisted(
                RebaseOutcome::Stable {
                    base_currency: target,
                },
            )));
        }

        if !self.holdings.is_empty() {
            log::debug!(
                "Base currency change {} -> {target} awaits confirmation ({} holdings at risk)",
                self.base_currency,
                self.holdings.len()
            );
            self.rebase_state = RebaseState::PendingConfirmation {
                target: target.clone(),
            };
            return Ok(BaseCurrencyChange::RequiresConfirmation {
                from: self.base_currency.clone(),
                to: target,
                holdings_at_risk: self.holdings.len(),
            });
        }

        let outcome = self.rebase_to(target, None).await;
        Ok(BaseCurrencyChange::AppliedImmediately(outcome))
    }

    /// Keep the current base currency and holdings.
    pub fn cancel_base_currency_change(&mut self) -> Result<(), CoreError> {
        match self.rebase_state {
            RebaseState::PendingConfirmation { .. } => {
                self.rebase_state = RebaseState::Stable;
                Ok(())
            }
            _ => Err(CoreError::NoPendingRebase),
        }
    }

    /// Proceed with the pending base-currency change.
    ///
    /// Every holding is deleted first: purchase rates are relative to the old
    /// base and cannot be converted. The new base currency is then committed
    /// and rates fetched for it. A failed fetch is reported in the outcome;
    /// the holdings are gone and the new base stays in effect regardless.
    pub async fn confirm_base_currency_change(
        &mut self,
    ) -> Result<Committed<RebaseOutcome>, CoreError> {
        let target = match &self.rebase_state {
            RebaseState::PendingConfirmation { target } => target.clone(),
            _ => return Err(CoreError::NoPendingRebase),
        };

        self.rebase_state = RebaseState::Rebasing {
            target: target.clone(),
        };

        let cleared = self.portfolio_service.clear(&mut self.holdings);
        log::info!(
            "Rebasing {} -> {target}: cleared {} holdings",
            self.base_currency,
            cleared.len()
        );
        let persist_error = Self::report("cleared holdings", self.store.save_holdings(&[]));

        Ok(self.rebase_to(target, persist_error).await)
    }

    /// Commit `target` as the base currency, reset the rate table and fetch
    /// fresh rates. Ends in `RebaseState::Stable`.
    async fn rebase_to(
        &mut self,
        target: String,
        earlier_persist_error: Option<CoreError>,
    ) -> Committed<RebaseOutcome> {
        self.rebase_state = RebaseState::Rebasing {
            target: target.clone(),
        };

        let base_persist_error =
            Self::report("base currency", self.store.save_base_currency(&target));
        let persist_error = earlier_persist_error.or(base_persist_error);

        log::info!("Base currency changed {} -> {target}", self.base_currency);
        // Fetches still in flight were issued for the old base
        self.rate_service.invalidate();
        self.base_currency = target.clone();
        self.rates = RateTable::empty(&target);
        self.recompute_total();

        let outcome = match self.refresh_rates().await {
            Ok(_) => RebaseOutcome::Stable {
                base_currency: target,
            },
            Err(error) => RebaseOutcome::RateFetchFailed {
                base_currency: target,
                error,
            },
        };

        self.rebase_state = RebaseState::Stable;
        Committed {
            value: outcome,
            persist_error,
        }
    }

    // ── Rates ───────────────────────────────────────────────────────

    /// Fetch and apply the latest rates for the current base currency.
    pub async fn refresh_rates(&mut self) -> Result<RateApplication, CoreError> {
        let ticket = self.begin_rate_fetch();
        let result = self.rate_service.fetch(&ticket).await;
        self.apply_rate_fetch(&ticket, result)
    }

    /// Start a fetch for the current base currency. Supersedes any fetch
    /// still in flight.
    pub fn begin_rate_fetch(&mut self) -> FetchTicket {
        self.rate_service.begin_fetch(&self.base_currency)
    }

    /// Run the fetch for `ticket` through the registered providers without
    /// applying it.
    pub async fn fetch_for_ticket(&self, ticket: &FetchTicket) -> Result<RateTable, CoreError> {
        self.rate_service.fetch(ticket).await
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Results for superseded tickets, or for a base currency that is no
    /// longer current, are discarded whether they succeeded or not. A failed
    /// current fetch keeps the previous table and returns
    /// `CoreError::RateFetchFailed`.
    pub fn apply_rate_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<RateTable, CoreError>,
    ) -> Result<RateApplication, CoreError> {
        if !self.rate_service.is_current(ticket, &self.base_currency) {
            log::warn!(
                "Discarding stale rate fetch #{} for base {} (current: #{} for {})",
                ticket.generation(),
                ticket.base_currency(),
                self.rate_service.current_generation(),
                self.base_currency
            );
            return Ok(RateApplication::Discarded);
        }

        let table = result.map_err(|e| {
            log::warn!("Rate fetch for base {} failed: {e}", self.base_currency);
            CoreError::RateFetchFailed(e.to_string())
        })?;

        if !table.base_currency().eq_ignore_ascii_case(&self.base_currency) {
            return Err(CoreError::RateFetchFailed(format!(
                "Rate table is based on {} but the base currency is {}",
                table.base_currency(),
                self.base_currency
            )));
        }

        log::info!(
            "Applied {} rates for base {}",
            table.len(),
            self.base_currency
        );
        self.rates = table;
        self.recompute_total();
        Ok(RateApplication::Applied)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn recompute_total(&mut self) {
        self.total_current_value = self
            .valuation_service
            .aggregate(&self.holdings, &self.rates)
            .total;
    }

    fn report(what: &str, result: Result<(), CoreError>) -> Option<CoreError> {
        match result {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Failed to persist {what}: {e}");
                Some(e)
            }
        }
    }
}
