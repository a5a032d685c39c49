//! Digest and HMAC helpers.

use hmac::Mac;
use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::Sha256;

use crate::Result;
use crate::error::CryptoError;

/// Hash algorithms used by the game's data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

/// Compute the full digest of `data`.
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
        HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
    }
}

/// Compute a digest truncated to its first `len` bytes.
///
/// The pack key derivations use truncated MD5 digests. `len` larger than
/// the digest returns the full digest.
pub fn hash_truncated(algorithm: HashAlgorithm, data: &[u8], len: usize) -> Vec<u8> {
    let mut digest = hash(algorithm, data);
    digest.truncate(len);
    digest
}

/// Keyed-hash message authentication.
pub struct Hmac {
    key: Vec<u8>,
    algorithm: HashAlgorithm,
}

impl Hmac {
    pub fn new(key: &[u8], algorithm: HashAlgorithm) -> Self {
        Self {
            key: key.to_vec(),
            algorithm,
        }
    }

    /// Compute the MAC of `data`.
    pub fn mac(&self, data: &[u8]) -> Result<Vec<u8>> {
        let bad_key = |_| CryptoError::InvalidKeySize {
            expected: 0,
            actual: self.key.len(),
        };
        match self.algorithm {
            HashAlgorithm::Md5 => {
                let mut mac =
                    hmac::Hmac::<Md5>::new_from_slice(&self.key).map_err(bad_key)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha1 => {
                let mut mac =
                    hmac::Hmac::<Sha1>::new_from_slice(&self.key).map_err(bad_key)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashAlgorithm::Sha256 => {
                let mut mac =
                    hmac::Hmac::<Sha256>::new_from_slice(&self.key).map_err(bad_key)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_value() {
        // md5("battlecats") drives the legacy server-pack key
        assert_eq!(
            hex::encode(hash_truncated(HashAlgorithm::Md5, b"battlecats", 8)),
            "89a0f99078419c28"
        );
    }

    #[test]
    fn test_truncation() {
        let full = hash(HashAlgorithm::Sha256, b"abc");
        assert_eq!(full.len(), 32);
        assert_eq!(hash_truncated(HashAlgorithm::Sha256, b"abc", 8), full[..8]);
        assert_eq!(hash_truncated(HashAlgorithm::Sha1, b"abc", 64).len(), 20);
    }

    #[test]
    fn test_hmac_sha1() {
        // RFC 2202 test case 2
        let mac = Hmac::new(b"Jefe", HashAlgorithm::Sha1)
            .mac(b"what do ya want for nothing?")
            .unwrap();
        assert_eq!(
            hex::encode(mac),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }
}
