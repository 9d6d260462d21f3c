use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Presentational metadata for a currency. Never used in valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    /// ISO 4217 code, uppercased (e.g., "EUR")
    pub code: String,
    /// Human-readable name (e.g., "Euro")
    pub display_name: String,
    /// Symbol used when formatting amounts (e.g., "€")
    pub symbol: String,
}

/// Trim and uppercase a currency code, requiring exactly 3 ASCII letters.
pub fn normalize_currency_code(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim().to_uppercase();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., USD, EUR, TRY)"
        )));
    }
    Ok(trimmed)
}
