//! AES-128 pack cipher.
//!
//! Pack data is encrypted in raw blocks; PKCS#7 padding is applied and
//! stripped explicitly by callers on the byte buffer, never inside the
//! cipher. One pack (`ImageDataLocal`) ships plaintext, modeled here as
//! a passthrough cipher so pack code never special-cases it.

use aes::Aes128;
use cipher::block_padding::NoPadding;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};

use crate::Result;
use crate::error::CryptoError;

const KEY_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

type EcbEnc = ecb::Encryptor<Aes128>;
type EcbDec = ecb::Decryptor<Aes128>;
type CbcEnc = cbc::Encryptor<Aes128>;
type CbcDec = cbc::Decryptor<Aes128>;

#[derive(Debug, Clone)]
enum Kind {
    Ecb { key: [u8; KEY_LEN] },
    Cbc { key: [u8; KEY_LEN], iv: [u8; KEY_LEN] },
    Passthrough,
}

/// An AES-128 cipher in ECB or CBC mode, or a passthrough.
#[derive(Debug, Clone)]
pub struct AesCipher {
    kind: Kind,
}

impl AesCipher {
    /// ECB cipher (no IV).
    pub fn ecb(key: &[u8; KEY_LEN]) -> Self {
        Self {
            kind: Kind::Ecb { key: *key },
        }
    }

    /// CBC cipher.
    pub fn cbc(key: &[u8; KEY_LEN], iv: &[u8; KEY_LEN]) -> Self {
        Self {
            kind: Kind::Cbc { key: *key, iv: *iv },
        }
    }

    /// Build a cipher from runtime key material, selecting ECB when the
    /// IV is absent and CBC when present.
    pub fn new(key: &[u8], iv: Option<&[u8]>) -> Result<Self> {
        match iv {
            Some(iv) => Ok(Self::cbc(&check_key(key)?, &check_iv(iv)?)),
            None => Ok(Self::ecb(&check_key(key)?)),
        }
    }

    /// Identity cipher for the plaintext pack.
    pub fn passthrough() -> Self {
        Self {
            kind: Kind::Passthrough,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.kind, Kind::Passthrough)
    }

    /// Encrypt block-aligned data.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.kind {
            Kind::Passthrough => Ok(data.to_vec()),
            Kind::Ecb { key } => {
                check_aligned(data)?;
                Ok(EcbEnc::new(key.into()).encrypt_padded_vec_mut::<NoPadding>(data))
            }
            Kind::Cbc { key, iv } => {
                check_aligned(data)?;
                Ok(CbcEnc::new(key.into(), iv.into())
                    .encrypt_padded_vec_mut::<NoPadding>(data))
            }
        }
    }

    /// Decrypt block-aligned data.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.kind {
            Kind::Passthrough => Ok(data.to_vec()),
            Kind::Ecb { key } => {
                check_aligned(data)?;
                EcbDec::new(key.into())
                    .decrypt_padded_vec_mut::<NoPadding>(data)
                    .map_err(|_| CryptoError::NotBlockAligned(data.len()))
            }
            Kind::Cbc { key, iv } => {
                check_aligned(data)?;
                CbcDec::new(key.into(), iv.into())
                    .decrypt_padded_vec_mut::<NoPadding>(data)
                    .map_err(|_| CryptoError::NotBlockAligned(data.len()))
            }
        }
    }
}

fn check_key(key: &[u8]) -> Result<[u8; KEY_LEN]> {
    key.try_into().map_err(|_| CryptoError::InvalidKeySize {
        expected: KEY_LEN,
        actual: key.len(),
    })
}

fn check_iv(iv: &[u8]) -> Result<[u8; KEY_LEN]> {
    iv.try_into().map_err(|_| CryptoError::InvalidIvSize {
        expected: KEY_LEN,
        actual: iv.len(),
    })
}

fn check_aligned(data: &[u8]) -> Result<()> {
    if data.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::NotBlockAligned(data.len()));
    }
    Ok(())
}
