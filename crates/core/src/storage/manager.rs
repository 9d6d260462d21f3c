use crate::errors::CoreError;
use crate::models::portfolio::StoredPortfolio;

use super::encryption::{self, KdfParams};
use super::format;

/// High-level storage operations: save/load the stored portfolio to/from
/// encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt and serialize with the default (strong) KDF parameters.
    pub fn save_to_bytes(
        portfolio: &StoredPortfolio,
        password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        Self::save_to_bytes_with(portfolio, password, KdfParams::default())
    }

    /// Flow: StoredPortfolio → bincode → AES-256-GCM(Argon2id(password)) → CPTK bytes
    pub fn save_to_bytes_with(
        portfolio: &StoredPortfolio,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, kdf_params)?;
        Ok(format::encode(&sealed))
    }

    /// Flow: CPTK bytes → header → Argon2id(password, salt) → AES-256-GCM → bincode
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<StoredPortfolio, CoreError> {
        let sealed = format::decode(data)?;
        let plaintext = encryption::open(&sealed, password)?;
        bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}"))
        })
    }

    /// Write to a temporary sibling, then rename over the target, so a
    /// crash mid-write never leaves a half-written file behind.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(
        portfolio: &StoredPortfolio,
        path: &std::path::Path,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes_with(portfolio, password, kdf_params)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        path: &std::path::Path,
        password: &str,
    ) -> Result<StoredPortfolio, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
