use thiserror::Error;

/// Unified error type for the entire currency-portfolio-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Valuation / Portfolio ───────────────────────────────────────
    #[error("Invalid amount: {0} (must be a finite number greater than zero)")]
    InvalidAmount(f64),

    #[error("Invalid rate for {currency}: {rate} (must be a finite number greater than zero)")]
    InvalidRate { currency: String, rate: f64 },

    #[error("Index {index} out of range for portfolio of {len} holdings")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("No base currency change is awaiting confirmation")]
    NoPendingRebase,

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No rate provider registered")]
    NoProvider,

    #[error("Rate fetch failed: {0}")]
    RateFetchFailed(String),

    // ── Durable store ───────────────────────────────────────────────
    #[error("Failed to persist portfolio: {0}")]
    Persist(String),

    #[error("Failed to load portfolio: {0}")]
    Load(String),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Errors expected at runtime that the user can retry (network down,
    /// disk full). Everything else is a caller bug or corrupted data.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. }
                | CoreError::Network(_)
                | CoreError::NoProvider
                | CoreError::RateFetchFailed(_)
                | CoreError::Persist(_)
                | CoreError::FileIO(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs; they may carry API keys.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
