use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::rates::RateTable;
use crate::models::snapshot::{
    Aggregate, HoldingValuation, PortfolioSnapshot, Trend, ValuationFailure,
};

/// Computes current value and gain/loss of holdings in the base currency.
///
/// Pure business logic, no I/O.
///
/// A table rate `r` means one base unit buys `r` units of the currency, so
/// one unit of the currency is worth `1 / r` base units. Gain/loss compares
/// that per-unit value with the holding's `purchase_rate`, never the raw
/// table rate.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Base-currency value of one unit of `currency_code` (`1 / rate`).
    pub fn per_unit_value(
        &self,
        currency_code: &str,
        rates: &RateTable,
    ) -> Result<f64, CoreError> {
        let rate = rates.rate_of(currency_code);
        Self::check_rate(currency_code, rate)?;
        Ok(1.0 / rate)
    }

    /// `(1 / rate) * amount`, in base-currency units.
    pub fn current_value(&self, holding: &Holding, rates: &RateTable) -> Result<f64, CoreError> {
        let per_unit = self.per_unit_value(&holding.currency_code, rates)?;
        Ok(per_unit * holding.amount)
    }

    /// `((1 / rate - purchase_rate) / purchase_rate) * 100`.
    pub fn percentage_change(
        &self,
        holding: &Holding,
        rates: &RateTable,
    ) -> Result<f64, CoreError> {
        let per_unit = self.per_unit_value(&holding.currency_code, rates)?;
        Self::check_rate(&holding.currency_code, holding.purchase_rate)?;
        Ok(((per_unit - holding.purchase_rate) / holding.purchase_rate) * 100.0)
    }

    /// Full valuation of one holding, including the display trend.
    pub fn valuate(
        &self,
        holding: &Holding,
        rates: &RateTable,
    ) -> Result<HoldingValuation, CoreError> {
        let per_unit_value = self.per_unit_value(&holding.currency_code, rates)?;
        let current_value = per_unit_value * holding.amount;
        let percentage_change = self.percentage_change(holding, rates)?;

        Ok(HoldingValuation {
            holding: holding.clone(),
            per_unit_value,
            current_value,
            percentage_change,
            trend: Trend::from_percentage(percentage_change),
        })
    }

    /// Value every holding independently and sum the successes.
    pub fn aggregate(&self, holdings: &[Holding], rates: &RateTable) -> Aggregate {
        let values: Vec<Result<f64, CoreError>> = holdings
            .iter()
            .map(|h| self.current_value(h, rates))
            .collect();
        let total = values.iter().filter_map(|v| v.as_ref().ok()).sum();
        Aggregate { values, total }
    }

    /// Build the read-only portfolio view. Holdings with invalid rate data
    /// are reported in `failures` and excluded from the total.
    pub fn snapshot(
        &self,
        holdings: &[Holding],
        rates: &RateTable,
        base_currency: &str,
    ) -> PortfolioSnapshot {
        let mut valuations = Vec::with_capacity(holdings.len());
        let mut failures = Vec::new();
        let mut total_current_value = 0.0;

        for (index, holding) in holdings.iter().enumerate() {
            match self.valuate(holding, rates) {
                Ok(valuation) => {
                    total_current_value += valuation.current_value;
                    valuations.push(valuation);
                }
                Err(e) => {
                    log::warn!(
                        "Skipping holding {} ({}) in snapshot: {e}",
                        holding.id,
                        holding.currency_code
                    );
                    failures.push(ValuationFailure {
                        index,
                        holding: holding.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        PortfolioSnapshot {
            base_currency: base_currency.to_string(),
            valuations,
            failures,
            total_current_value,
        }
    }

    /// A rate is usable as a divisor only if finite and strictly positive.
    fn check_rate(currency_code: &str, rate: f64) -> Result<(), CoreError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::InvalidRate {
                currency: currency_code.to_string(),
                rate,
            });
        }
        Ok(())
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
