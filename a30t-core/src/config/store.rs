//! Persisted configuration blob
//!
//! Layout: postcard-encoded [`StoredConfig`] (magic, version, config)
//! followed by a little-endian CRC32 over the encoded bytes. The host decides
//! where the blob lives (EEPROM, flash page, SD file).

use serde::{Deserialize, Serialize};

use super::types::AdapterConfig;

/// Magic number to identify valid adapter configuration
pub const CONFIG_MAGIC: u32 = 0x4133_3054; // "A30T"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Buffer size that fits any encoded configuration
pub const MAX_STORED_CONFIG: usize = 256;

const CRC_LEN: usize = 4;

/// Errors while storing or loading configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Output buffer too small
    BufferTooSmall,
    /// Blob shorter than its checksum
    Truncated,
    /// CRC does not match the content
    Corrupted,
    /// Not an adapter configuration blob
    BadMagic,
    /// Written by an incompatible version
    VersionMismatch(u8),
    /// Body could not be decoded
    Decode,
}

/// Header plus configuration, as serialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConfig {
    pub magic: u32,
    pub version: u8,
    pub config: AdapterConfig,
}

/// Encode `config` into `buf`, returning the used part
pub fn save<'a>(config: &AdapterConfig, buf: &'a mut [u8]) -> Result<&'a [u8], StoreError> {
    let stored = StoredConfig {
        magic: CONFIG_MAGIC,
        version: CONFIG_VERSION,
        config: config.clone(),
    };

    let body_capacity = buf.len().checked_sub(CRC_LEN).ok_or(StoreError::BufferTooSmall)?;
    let body_len = postcard::to_slice(&stored, &mut buf[..body_capacity])
        .map_err(|_| StoreError::BufferTooSmall)?
        .len();

    let crc = crc32(&buf[..body_len]);
    buf[body_len..body_len + CRC_LEN].copy_from_slice(&crc.to_le_bytes());
    Ok(&buf[..body_len + CRC_LEN])
}

/// Decode a blob written by [`save`]
pub fn load(bytes: &[u8]) -> Result<AdapterConfig, StoreError> {
    let body_len = bytes.len().checked_sub(CRC_LEN).ok_or(StoreError::Truncated)?;
    let (body, crc) = bytes.split_at(body_len);

    let mut expected = [0u8; CRC_LEN];
    expected.copy_from_slice(crc);
    if crc32(body) != u32::from_le_bytes(expected) {
        return Err(StoreError::Corrupted);
    }

    let stored: StoredConfig = postcard::from_bytes(body).map_err(|_| StoreError::Decode)?;
    if stored.magic != CONFIG_MAGIC {
        return Err(StoreError::BadMagic);
    }
    if stored.version != CONFIG_VERSION {
        return Err(StoreError::VersionMismatch(stored.version));
    }
    Ok(stored.config)
}

/// CRC32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = 0xFFFF_FFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
