//! Pack key material.
//!
//! Three families of keys cover every pack:
//! - every list file, any country or version, uses one fixed ECB key
//! - server packs and pre-8.9.0 clients use a legacy ECB key derived
//!   from a hashed constant
//! - modern local packs use a per-country CBC key/IV pair

use bc_data::CountryCode;

use crate::Result;
use crate::aes::AesCipher;
use crate::error::CryptoError;
use crate::hash::{HashAlgorithm, hash_truncated};

/// Fixed AES-ECB key for every pack list file.
///
/// This is `hex(md5("pack"))[..16]` as ASCII, burned in as a constant.
pub const LIST_KEY: &[u8; 16] = b"b484857901742afc";

/// Cipher for pack list files.
pub fn list_cipher() -> AesCipher {
    AesCipher::ecb(LIST_KEY)
}

/// Legacy ECB key for server packs and pre-8.9.0 clients.
///
/// The first eight digest bytes of `md5("battlecats")`, hex-encoded and
/// used as UTF-8 bytes.
pub fn server_key() -> [u8; 16] {
    let digest = hash_truncated(HashAlgorithm::Md5, b"battlecats", 8);
    let mut key = [0u8; 16];
    key.copy_from_slice(hex::encode(digest).as_bytes());
    key
}

/// Per-country CBC key/IV pair as 32-char hex strings.
pub fn country_key_iv(cc: CountryCode) -> (&'static str, &'static str) {
    match cc {
        CountryCode::Jp => (
            "d754868de89d717fa9e7b06da45ae9e3",
            "40b2131a9f388ad4e5002a98118f6128",
        ),
        CountryCode::En => (
            "0ad39e4aeaf55aa717feb1825edef521",
            "d1d7e708091941d90cdf8aa5f30bb0c2",
        ),
        CountryCode::Kr => (
            "bea585eb993216ef4dcb88b625c3df98",
            "9b13c2121d39f1353a125fed98696649",
        ),
        CountryCode::Tw => (
            "313d9858a7fb939def1d7d859629087d",
            "0e3743eb53bf5944d1ae7e10c2e54bdf",
        ),
    }
}

/// Decode a 32-char hex key or IV into raw bytes.
pub fn parse_key(hex_str: &str) -> Result<[u8; 16]> {
    let bytes =
        hex::decode(hex_str).map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidKeySize {
            expected: 16,
            actual: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_key_derivation() {
        assert_eq!(&server_key(), b"89a0f99078419c28");
    }

    #[test]
    fn test_country_material_parses() {
        for cc in CountryCode::ALL {
            let (key, iv) = country_key_iv(cc);
            assert!(parse_key(key).is_ok());
            assert!(parse_key(iv).is_ok());
        }
    }

    #[test]
    fn test_parse_key_rejects_bad_input() {
        assert!(parse_key("zz").is_err());
        assert!(parse_key("00ff").is_err());
    }

    #[test]
    fn test_list_cipher_round_trip() {
        let cipher = list_cipher();
        let data = [9u8; 48];
        assert_eq!(
            cipher.decrypt(&cipher.encrypt(&data).unwrap()).unwrap(),
            data
        );
    }
}
