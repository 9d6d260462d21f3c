use crate::errors::CoreError;
use super::encryption::{KdfParams, SealedPayload, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a CPTK (Currency Portfolio Tracker) file.
pub const MAGIC: &[u8; 4] = b"CPTK";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_SIZE: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Serialize a sealed payload into the on-disk layout.
///
/// ```text
/// [CPTK: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn encode(sealed: &SealedPayload) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + sealed.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&sealed.salt);
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&(sealed.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Parse file bytes back into a sealed payload. Trailing bytes after the
/// declared ciphertext are ignored.
pub fn decode(data: &[u8]) -> Result<SealedPayload, CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid CPTK file".into(),
        ));
    }

    let mut reader = ByteReader::new(data);

    if reader.take::<4>("magic")? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a CPTK file".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take("version")?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take("KDF memory_cost")?),
        time_cost: u32::from_le_bytes(reader.take("KDF time_cost")?),
        parallelism: u32::from_le_bytes(reader.take("KDF parallelism")?),
    };
    kdf_params.validate()?;

    let salt = reader.take::<SALT_LEN>("salt")?;
    let nonce = reader.take::<NONCE_LEN>("nonce")?;
    let ciphertext_len = u64::from_le_bytes(reader.take("ciphertext length")?);

    let remaining = reader.remaining();
    if (remaining.len() as u64) < ciphertext_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {ciphertext_len} bytes of ciphertext, got {}",
            remaining.len()
        )));
    }

    Ok(SealedPayload {
        kdf_params,
        salt,
        nonce,
        ciphertext: remaining[..ciphertext_len as usize].to_vec(),
    })
}

/// Forward-only cursor over the header bytes.
struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take<const N: usize>(&mut self, field: &str) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat(format!("Failed to read {field}")))?;
        self.offset = end;
        Ok(bytes)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}
