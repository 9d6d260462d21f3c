use serde::{Deserialize, Serialize};

use super::holding::Holding;
use crate::errors::CoreError;

/// Direction of a holding's value since purchase.
///
/// `Unchanged` is only produced for an exact 0.0 change (typically a holding
/// in the base currency itself); the UI hides the percentage, the arrow and
/// the current-rate label for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Unchanged,
}

impl Trend {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 0.0 {
            Trend::Up
        } else if percentage < 0.0 {
            Trend::Down
        } else {
            Trend::Unchanged
        }
    }

    /// Whether percentage and arrow should be displayed at all.
    pub fn shows_change(&self) -> bool {
        !matches!(self, Trend::Unchanged)
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "Up"),
            Trend::Down => write!(f, "Down"),
            Trend::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// Derived valuation of a single holding, in base-currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub holding: Holding,
    /// Base-currency value of one unit right now (`1 / rate`)
    pub per_unit_value: f64,
    /// `per_unit_value * amount`
    pub current_value: f64,
    /// Change of `per_unit_value` against `purchase_rate`, in percent
    pub percentage_change: f64,
    pub trend: Trend,
}

/// A holding that could not be valued, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationFailure {
    /// Position of the holding in the portfolio
    pub index: usize,
    pub holding: Holding,
    pub reason: String,
}

/// Read-only view of the whole portfolio. Recomputed on every request,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub base_currency: String,
    /// Valued holdings, in portfolio order
    pub valuations: Vec<HoldingValuation>,
    /// Holdings skipped because their rate data was invalid
    pub failures: Vec<ValuationFailure>,
    /// Sum of `current_value` over `valuations`
    pub total_current_value: f64,
}

impl PortfolioSnapshot {
    pub fn is_empty(&self) -> bool {
        self.valuations.is_empty() && self.failures.is_empty()
    }

    /// True when every holding was valued successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-holding values plus their sum.
///
/// One holding failing does not stop the others from being valued. Use
/// `total` to skip-and-report, or `strict_total()` to abort on the first
/// failure.
#[derive(Debug)]
pub struct Aggregate {
    /// One entry per input holding, in input order
    pub values: Vec<Result<f64, CoreError>>,
    /// Sum over the successful entries only
    pub total: f64,
}

impl Aggregate {
    pub fn failure_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_err()).count()
    }

    /// The total, or the first per-holding error if any holding failed.
    pub fn strict_total(self) -> Result<f64, CoreError> {
        let total = self.total;
        for value in self.values {
            value?;
        }
        Ok(total)
    }
}
