//! The 20-byte configuration block.

use crate::catalog::CONFIG_LEN;
use crate::error::Error;

/// An immutable snapshot of the device's 20-byte configuration block.
///
/// A snapshot is constructed by decoding a received payload, or by cloning an
/// existing snapshot with one field replaced via [`DeviceConfig::with_field`].
/// It is never mutated in place, so a failed write attempt can never leak a
/// half-updated block to other operations.
///
/// Raw codes outside the enumerations known to the
/// [catalog](crate::catalog) are preserved verbatim: the device is
/// authoritative and may report reserved or future values.
///
/// Two snapshots are equal iff all 20 positions match, which is the unit of
/// comparison for verifying writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    bytes: [u8; CONFIG_LEN],
}

impl DeviceConfig {
    /// Decode a received configuration payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if the payload is not exactly 20
    /// bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; CONFIG_LEN] = raw.try_into().map_err(|_| Error::InvalidLength(raw.len()))?;
        Ok(Self { bytes })
    }

    /// The raw 20 bytes, as sent on the wire.
    ///
    /// Identity inverse of [`DeviceConfig::decode`].
    pub fn encode(&self) -> [u8; CONFIG_LEN] {
        self.bytes
    }

    /// The raw code at a byte position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldIndexOutOfRange`] if `index` is not within the
    /// configuration block.
    pub fn field(&self, index: usize) -> Result<u8, Error> {
        self.bytes
            .get(index)
            .copied()
            .ok_or(Error::FieldIndexOutOfRange(index))
    }

    /// A new snapshot with the byte at `index` replaced by `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldIndexOutOfRange`] if `index` is not within the
    /// configuration block.
    pub fn with_field(&self, index: usize, raw: u8) -> Result<Self, Error> {
        if index >= CONFIG_LEN {
            return Err(Error::FieldIndexOutOfRange(index));
        }
        let mut bytes = self.bytes;
        bytes[index] = raw;
        Ok(Self { bytes })
    }
}
