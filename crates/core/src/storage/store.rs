use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::StoredPortfolio;

#[cfg(not(target_arch = "wasm32"))]
use super::encryption::KdfParams;
#[cfg(not(target_arch = "wasm32"))]
use super::manager::StorageManager;

/// Durable storage for holdings and the base-currency preference.
///
/// Calls are blocking. Write failures are reported as `CoreError::Persist`,
/// read failures as `CoreError::Load`.
pub trait DurableStore: Send {
    /// Replace the stored holdings with `holdings`.
    fn save_holdings(&mut self, holdings: &[Holding]) -> Result<(), CoreError>;

    fn load_holdings(&self) -> Result<Vec<Holding>, CoreError>;

    /// Delete one holding record. Deleting an unknown ID is not an error.
    fn delete_holding(&mut self, id: Uuid) -> Result<(), CoreError>;

    /// `None` on first run, before any base currency was committed.
    fn load_base_currency(&self) -> Result<Option<String>, CoreError>;

    fn save_base_currency(&mut self, currency_code: &str) -> Result<(), CoreError>;
}

// ── In-memory store ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryState {
    stored: StoredPortfolio,
    fail_writes: bool,
    fail_reads: bool,
    writes: usize,
}

/// Volatile store. Clones share the same state, so a caller can keep a
/// handle for inspection after giving one to the tracker.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records.
    pub fn with_contents(stored: StoredPortfolio) -> Self {
        let store = Self::new();
        store.lock().stored = stored;
        store
    }

    /// Make every subsequent write fail with `CoreError::Persist`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make every subsequent read fail with `CoreError::Load`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Copy of what is currently stored.
    pub fn contents(&self) -> StoredPortfolio {
        self.lock().stored.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, apply: impl FnOnce(&mut StoredPortfolio)) -> Result<(), CoreError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(CoreError::Persist("memory store is read-only".into()));
        }
        apply(&mut state.stored);
        state.writes += 1;
        Ok(())
    }

    fn read<T>(&self, get: impl FnOnce(&StoredPortfolio) -> T) -> Result<T, CoreError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(CoreError::Load("memory store is unreadable".into()));
        }
        Ok(get(&state.stored))
    }
}

impl DurableStore for MemoryStore {
    fn save_holdings(&mut self, holdings: &[Holding]) -> Result<(), CoreError> {
        self.write(|s| s.holdings = holdings.to_vec())
    }

    fn load_holdings(&self) -> Result<Vec<Holding>, CoreError> {
        self.read(|s| s.holdings.clone())
    }

    fn delete_holding(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.write(|s| s.holdings.retain(|h| h.id != id))
    }

    fn load_base_currency(&self) -> Result<Option<String>, CoreError> {
        self.read(|s| s.base_currency.clone())
    }

    fn save_base_currency(&mut self, currency_code: &str) -> Result<(), CoreError> {
        self.write(|s| s.base_currency = Some(currency_code.to_string()))
    }
}

// ── Encrypted file store (native only) ──────────────────────────────

/// Keeps the whole portfolio in one password-encrypted `.cptk` file.
/// Every write re-encrypts and atomically replaces the file.
#[cfg(not(target_arch = "wasm32"))]
pub struct EncryptedFileStore {
    path: std::path::PathBuf,
    password: String,
    kdf_params: KdfParams,
    /// Last state read from or written to disk
    cached: StoredPortfolio,
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .field("holdings", &self.cached.holdings.len())
            .field("base_currency", &self.cached.base_currency)
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl EncryptedFileStore {
    /// Open (or prepare to create) the store at `path`.
    ///
    /// A missing file is an empty portfolio. An unreadable one (wrong
    /// password, corruption) is `CoreError::Load`.
    pub fn open(
        path: impl Into<std::path::PathBuf>,
        password: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Self::open_with(path, password, KdfParams::default())
    }

    /// Like `open`, with explicit KDF parameters for new writes.
    pub fn open_with(
        path: impl Into<std::path::PathBuf>,
        password: impl Into<String>,
        kdf_params: KdfParams,
    ) -> Result<Self, CoreError> {
        let mut store = Self {
            path: path.into(),
            password: password.into(),
            kdf_params,
            cached: StoredPortfolio::default(),
        };
        store.cached = store.read_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_file(&self) -> Result<StoredPortfolio, CoreError> {
        if !self.path.exists() {
            return Ok(StoredPortfolio::default());
        }
        StorageManager::load_from_file(&self.path, &self.password)
            .map_err(|e| CoreError::Load(format!("{}: {e}", self.path.display())))
    }

    /// Apply `change` to a copy, write it, and keep it only if the write
    /// succeeded.
    fn write_file(&mut self, change: impl FnOnce(&mut StoredPortfolio)) -> Result<(), CoreError> {
        let mut next = self.cached.clone();
        change(&mut next);
        StorageManager::save_to_file(&next, &self.path, &self.password, self.kdf_params)
            .map_err(|e| CoreError::Persist(format!("{}: {e}", self.path.display())))?;
        self.cached = next;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DurableStore for EncryptedFileStore {
    fn save_holdings(&mut self, holdings: &[Holding]) -> Result<(), CoreError> {
        self.write_file(|s| s.holdings = holdings.to_vec())
    }

    fn load_holdings(&self) -> Result<Vec<Holding>, CoreError> {
        Ok(self.read_file()?.holdings)
    }

    fn delete_holding(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.write_file(|s| s.holdings.retain(|h| h.id != id))
    }

    fn load_base_currency(&self) -> Result<Option<String>, CoreError> {
        Ok(self.read_file()?.base_currency)
    }

    fn save_base_currency(&mut self, currency_code: &str) -> Result<(), CoreError> {
        self.write_file(|s| s.base_currency = Some(currency_code.to_string()))
    }
}
