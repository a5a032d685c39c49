//! Owned byte buffer with the views game-data handling needs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::DataError;
use crate::Result;

/// AES block size; every pack cipher in the game uses 16-byte blocks.
pub const BLOCK_SIZE: usize = 16;

/// An owned byte buffer.
///
/// All pack, record and image bytes cross this type. Cloning is a deep
/// copy, which is what catalog forking relies on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Data(Vec<u8>);

impl Data {
    /// Create a buffer from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy out a sub-range. Out-of-range bounds are clamped to the
    /// buffer length, so a truncated slice is returned rather than a
    /// panic.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let start = start.min(self.0.len());
        let end = end.clamp(start, self.0.len());
        Self(self.0[start..end].to_vec())
    }

    /// Concatenate many buffers into one, preserving order.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend_from_slice(&chunk.0);
        }
        Self(out)
    }

    /// Base64 (standard alphabet) encoding of the buffer.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Decode a base64 string into a buffer.
    pub fn from_base64(s: &str) -> Result<Self> {
        Ok(Self(BASE64.decode(s)?))
    }

    /// View the buffer as UTF-8 text.
    pub fn to_utf8(&self) -> Result<String> {
        Ok(String::from_utf8(self.0.clone())?)
    }

    /// View the buffer as UTF-8 text, replacing invalid sequences.
    pub fn to_utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Read a little-endian `u32` at a fixed offset.
    pub fn read_u32_le(&self, offset: usize) -> Result<u32> {
        let end = offset.checked_add(4).ok_or(DataError::OutOfBounds {
            offset,
            wanted: 4,
            len: self.0.len(),
        })?;
        if end > self.0.len() {
            return Err(DataError::OutOfBounds {
                offset,
                wanted: 4,
                len: self.0.len(),
            });
        }
        Ok(LittleEndian::read_u32(&self.0[offset..end]))
    }

    /// View the whole buffer as a little-endian `u32` sequence.
    ///
    /// Trailing bytes that do not fill a full word are ignored.
    pub fn to_u32_list_le(&self) -> Vec<u32> {
        self.0
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .collect()
    }

    /// Build a buffer from a little-endian `u32` sequence.
    pub fn from_u32_list_le(values: &[u32]) -> Self {
        let mut out = vec![0u8; values.len() * 4];
        LittleEndian::write_u32_into(values, &mut out);
        Self(out)
    }

    /// Append PKCS#7 padding up to the AES block size.
    ///
    /// Always adds at least one byte; a block-aligned input grows by a
    /// full block.
    pub fn pad_pkcs7(&self) -> Self {
        let pad = BLOCK_SIZE - self.0.len() % BLOCK_SIZE;
        let mut out = self.0.clone();
        out.resize(self.0.len() + pad, pad as u8);
        Self(out)
    }

    /// Strip PKCS#7 padding.
    pub fn unpad_pkcs7(&self) -> Result<Self> {
        let len = self.0.len();
        if len == 0 || len % BLOCK_SIZE != 0 {
            return Err(DataError::InvalidPadding);
        }
        let pad = self.0[len - 1] as usize;
        if pad == 0 || pad > BLOCK_SIZE || pad > len {
            return Err(DataError::InvalidPadding);
        }
        if self.0[len - pad..].iter().any(|&b| b as usize != pad) {
            return Err(DataError::InvalidPadding);
        }
        Ok(Self(self.0[..len - pad].to_vec()))
    }
}

impl std::ops::Deref for Data {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Data {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_unpad_round_trip() {
        for len in 0..64 {
            let data = Data::new(vec![0xAB; len]);
            let padded = data.pad_pkcs7();
            assert_eq!(padded.len() % BLOCK_SIZE, 0);
            assert!(padded.len() > data.len());
            assert_eq!(padded.unpad_pkcs7().unwrap(), data);
        }
    }

    #[test]
    fn test_unpad_rejects_garbage() {
        assert!(Data::new(vec![]).unpad_pkcs7().is_err());
        assert!(Data::new(vec![0u8; 15]).unpad_pkcs7().is_err());
        // Pad byte larger than the block size
        let mut bad = vec![0u8; 16];
        bad[15] = 17;
        assert!(Data::new(bad).unpad_pkcs7().is_err());
        // Inconsistent pad bytes
        let mut bad = vec![3u8; 16];
        bad[14] = 2;
        assert!(Data::new(bad).unpad_pkcs7().is_err());
    }

    #[test]
    fn test_base64_round_trip() {
        let data = Data::from("battlecats");
        let encoded = data.to_base64();
        assert_eq!(Data::from_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn test_u32_views() {
        let data = Data::from_u32_list_le(&[1, 0x0201, 0xFFFF_FFFF]);
        assert_eq!(data.len(), 12);
        assert_eq!(data.to_u32_list_le(), vec![1, 0x0201, 0xFFFF_FFFF]);
        assert_eq!(data.read_u32_le(4).unwrap(), 0x0201);
        assert!(data.read_u32_le(9).is_err());
    }

    #[test]
    fn test_slice_clamps() {
        let data = Data::from("abcdef");
        assert_eq!(data.slice(2, 4).as_bytes(), b"cd");
        assert_eq!(data.slice(4, 100).as_bytes(), b"ef");
        assert_eq!(data.slice(10, 20).len(), 0);
    }

    #[test]
    fn test_from_chunks() {
        let joined = Data::from_chunks([Data::from("ab"), Data::empty(), Data::from("cd")]);
        assert_eq!(joined.as_bytes(), b"abcd");
    }
}
