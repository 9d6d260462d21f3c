use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;

/// Argon2id parameters for key derivation.
/// Stored in the file header so they can be upgraded in future versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost: u32,
    /// Degree of parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65_536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Reject parameters outside safe bounds, so a crafted file cannot make
    /// us allocate gigabytes or spin for minutes.
    ///
    /// - memory_cost: 8 KiB ..= 1 GiB
    /// - time_cost: 1 ..= 20
    /// - parallelism: 1 ..= 16
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(8..=1_048_576).contains(&self.memory_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF memory_cost out of safe range: {} KiB (expected 8..1048576)",
                self.memory_cost
            )));
        }
        if !(1..=20).contains(&self.time_cost) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF time_cost out of safe range: {} (expected 1..20)",
                self.time_cost
            )));
        }
        if !(1..=16).contains(&self.parallelism) {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF parallelism out of safe range: {} (expected 1..16)",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Ciphertext plus everything needed to decrypt it, except the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// AES-256-GCM output, 16-byte auth tag included
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a key derived from `password`.
/// A fresh salt and nonce are drawn on every call.
pub fn seal(
    plaintext: &[u8],
    password: &str,
    kdf_params: KdfParams,
) -> Result<SealedPayload, CoreError> {
    kdf_params.validate()?;
    let salt = random_bytes::<SALT_LEN>()?;
    let nonce = random_bytes::<NONCE_LEN>()?;
    let key = derive_key(password, &salt, &kdf_params)?;

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CoreError::Encryption(format!("Encryption failed: {e}")))?;

    Ok(SealedPayload {
        kdf_params,
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt a sealed payload. Returns `CoreError::Decryption` if the
/// password is wrong or the data has been tampered with.
pub fn open(sealed: &SealedPayload, password: &str) -> Result<Vec<u8>, CoreError> {
    let key = derive_key(password, &sealed.salt, &sealed.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CoreError::Decryption)
}

/// Derive a 256-bit key from a password using Argon2id.
pub fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN], CoreError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("Argon2 key derivation failed: {e}")))?;

    Ok(key)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to generate random bytes: {e}")))?;
    Ok(buf)
}
