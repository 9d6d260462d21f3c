use crate::errors::CoreError;

/// Result of a mutation that was committed in memory.
///
/// Persistence is fire-and-report: if writing to the durable store failed,
/// the in-memory change still stands and the failure is carried here so
/// the UI can offer a retry.
#[must_use]
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub persist_error: Option<CoreError>,
}

impl<T> Committed<T> {
    pub fn persisted(value: T) -> Self {
        Self {
            value,
            persist_error: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Drop the persistence report and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Where the base-currency change workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseState {
    /// No change in progress
    Stable,
    /// The user asked to switch to `target`; holdings exist and would be lost
    PendingConfirmation { target: String },
    /// Confirmed: holdings are being cleared and rates fetched for `target`
    Rebasing { target: String },
}

/// Answer to a base-currency change request.
#[derive(Debug)]
pub enum BaseCurrencyChange {
    /// Holdings exist; call `confirm_base_currency_change` to proceed (and
    /// lose them) or `cancel_base_currency_change` to keep them.
    RequiresConfirmation {
        from: String,
        to: String,
        holdings_at_risk: usize,
    },
    /// Nothing to lose, so the change was committed straight away.
    AppliedImmediately(Committed<RebaseOutcome>),
}

/// How a committed base-currency change ended. The new base currency is in
/// effect either way.
#[derive(Debug)]
pub enum RebaseOutcome {
    Stable { base_currency: String },
    /// The rates for the new base could not be fetched; valuation falls
    /// back to 1.0 until `refresh_rates` succeeds.
    RateFetchFailed { base_currency: String, error: CoreError },
}

impl RebaseOutcome {
    pub fn base_currency(&self) -> &str {
        match self {
            RebaseOutcome::Stable { base_currency }
            | RebaseOutcome::RateFetchFailed { base_currency, .. } => base_currency,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, RebaseOutcome::Stable { .. })
    }
}

/// What happened to a completed rate fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateApplication {
    /// The table replaced the current one
    Applied,
    /// A newer fetch was started (or the base changed) after this one;
    /// its result was dropped
    Discarded,
}
