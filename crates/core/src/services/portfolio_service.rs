use crate::errors::CoreError;
use crate::models::currency::normalize_currency_code;
use crate::models::holding::Holding;
use crate::models::rates::RateTable;

/// Manages the holdings collection: add, update amount, remove, clear.
///
/// Pure business logic, no I/O. Every operation validates
/// its inputs before touching the collection, so a returned error always
/// means the holdings are unchanged.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Record a new holding, capturing the current table rate of its
    /// currency as the purchase rate. Returns the new holding's index.
    pub fn add_holding(
        &self,
        holdings: &mut Vec<Holding>,
        amount: f64,
        currency_code: &str,
        rates: &RateTable,
    ) -> Result<usize, CoreError> {
        Self::validate_amount(amount)?;
        let code = normalize_currency_code(currency_code)?;

        let purchase_rate = rates.rate_of(&code);
        if !purchase_rate.is_finite() || purchase_rate <= 0.0 {
            return Err(CoreError::InvalidRate {
                currency: code,
                rate: purchase_rate,
            });
        }

        holdings.push(Holding::new(amount, code, purchase_rate));
        Ok(holdings.len() - 1)
    }

    /// Replace the amount of the holding at `index`.
    pub fn update_amount(
        &self,
        holdings: &mut [Holding],
        index: usize,
        new_amount: f64,
    ) -> Result<(), CoreError> {
        let len = holdings.len();
        let holding = holdings
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        Self::validate_amount(new_amount)?;
        holding.amount = new_amount;
        Ok(())
    }

    /// Remove and return the holding at `index`.
    pub fn remove_holding(
        &self,
        holdings: &mut Vec<Holding>,
        index: usize,
    ) -> Result<Holding, CoreError> {
        if index >= holdings.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: holdings.len(),
            });
        }
        Ok(holdings.remove(index))
    }

    /// Drop every holding. Used by a confirmed rebase: purchase rates are
    /// relative to the old base currency and cannot be carried over.
    pub fn clear(&self, holdings: &mut Vec<Holding>) -> Vec<Holding> {
        std::mem::take(holdings)
    }

    /// Drop loaded records that break the holding invariants
    /// (non-positive amount or purchase rate, bad currency code).
    pub fn sanitize(&self, holdings: Vec<Holding>) -> Vec<Holding> {
        holdings
            .into_iter()
            .filter(|h| {
                let valid = Self::validate_amount(h.amount).is_ok()
                    && h.purchase_rate.is_finite()
                    && h.purchase_rate > 0.0
                    && normalize_currency_code(&h.currency_code).is_ok();
                if !valid {
                    log::warn!("Discarding invalid stored holding {}: {:?}", h.id, h);
                }
                valid
            })
            .collect()
    }

    fn validate_amount(amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidAmount(amount));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
