//! A single addressable entry inside a pack.

use std::cell::OnceCell;

use bc_data::{CountryCode, Data, GameVersion};

use crate::Result;
use crate::cipher::pack_cipher;
use crate::error::PackError;

/// One named file inside a pack.
///
/// The entry starts out holding only its ciphertext slice; the plaintext
/// is produced on first access and cached. The first-observed plaintext
/// is kept so re-encoding can tell whether the entry actually changed:
/// an unmodified entry re-emits its original ciphertext byte-for-byte
/// instead of re-encrypting.
#[derive(Debug, Clone)]
pub struct GameFile {
    pub file_name: String,
    pub pack_name: String,
    cc: CountryCode,
    gv: GameVersion,
    key: Option<String>,
    iv: Option<String>,
    enc_data: Option<Data>,
    /// Plaintext as first observed, decrypted on demand.
    original_dec: OnceCell<Data>,
    /// Replacement plaintext from a write, if any.
    modified_dec: Option<Data>,
}

impl GameFile {
    /// Wrap a ciphertext slice cut out of a pack blob.
    pub fn from_encrypted(
        enc_data: Data,
        file_name: impl Into<String>,
        pack_name: impl Into<String>,
        cc: CountryCode,
        gv: GameVersion,
        key: Option<String>,
        iv: Option<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            pack_name: pack_name.into(),
            cc,
            gv,
            key,
            iv,
            enc_data: Some(enc_data),
            original_dec: OnceCell::new(),
            modified_dec: None,
        }
    }

    /// Create a brand-new entry from plaintext.
    pub fn from_decrypted(
        dec_data: Data,
        file_name: impl Into<String>,
        pack_name: impl Into<String>,
        cc: CountryCode,
        gv: GameVersion,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            pack_name: pack_name.into(),
            cc,
            gv,
            key: None,
            iv: None,
            enc_data: None,
            original_dec: OnceCell::new(),
            modified_dec: Some(dec_data),
        }
    }

    pub fn enc_data(&self) -> Option<&Data> {
        self.enc_data.as_ref()
    }

    /// Current plaintext, decrypting and caching on first access.
    pub fn dec_data(&self) -> Result<&Data> {
        if let Some(modified) = &self.modified_dec {
            return Ok(modified);
        }
        if let Some(original) = self.original_dec.get() {
            return Ok(original);
        }
        let enc = self
            .enc_data
            .as_ref()
            .ok_or_else(|| PackError::MissingData(self.file_name.clone()))?;
        let cipher = pack_cipher(
            self.cc,
            &self.pack_name,
            self.gv,
            false,
            self.key.as_deref(),
            self.iv.as_deref(),
        )?;
        let plain = Data::new(cipher.decrypt(enc)?);
        // Padding exists only where the cipher does; the plaintext pack
        // stores bare file bytes.
        let plain = if cipher.is_passthrough() {
            plain
        } else {
            plain.unpad_pkcs7().map_err(|_| PackError::BadPadding {
                pack: self.pack_name.clone(),
                file: self.file_name.clone(),
            })?
        };
        Ok(self.original_dec.get_or_init(|| plain))
    }

    /// Replace the plaintext.
    pub fn set_dec_data(&mut self, data: Data) {
        self.modified_dec = Some(data);
    }

    /// Whether the plaintext differs from what was first observed.
    pub fn is_modified(&self) -> bool {
        match (&self.modified_dec, self.original_dec.get()) {
            (None, _) => false,
            (Some(modified), Some(original)) => modified != original,
            // Written before the original was ever decrypted; treat as
            // changed rather than decrypt here.
            (Some(_), None) => true,
        }
    }

    /// Produce the ciphertext for re-emission.
    ///
    /// If the plaintext was never modified and the caller neither forces
    /// server mode nor replaces the key material, the original
    /// ciphertext is returned verbatim; re-encrypting could differ in
    /// padding and produce spurious diffs.
    pub fn encrypt(
        &self,
        force_server: bool,
        key: Option<&str>,
        iv: Option<&str>,
    ) -> Result<Data> {
        if let Some(enc) = &self.enc_data {
            if !self.is_modified() && !force_server && key.is_none() && iv.is_none() {
                return Ok(enc.clone());
            }
        }
        let dec = self.dec_data()?.clone();
        let cipher = pack_cipher(
            self.cc,
            &self.pack_name,
            self.gv,
            force_server,
            key.or(self.key.as_deref()),
            iv.or(self.iv.as_deref()),
        )?;
        if cipher.is_passthrough() {
            return Ok(dec);
        }
        let padded = dec.pad_pkcs7();
        Ok(Data::new(cipher.encrypt(&padded)?))
    }

    /// Check that this entry's plaintext survives a full encode/decode
    /// round trip.
    ///
    /// The original ciphertext may carry non-canonical padding, so the
    /// comparison happens at the plaintext level: re-encrypting and
    /// decrypting again must reproduce the bytes exactly. A mismatch
    /// can only mean the cipher selection or padding logic is wrong.
    pub fn verify_integrity(&self) -> Result<()> {
        let dec = self.dec_data()?.clone();
        let cipher = pack_cipher(
            self.cc,
            &self.pack_name,
            self.gv,
            false,
            self.key.as_deref(),
            self.iv.as_deref(),
        )?;
        let round_tripped = if cipher.is_passthrough() {
            dec.clone()
        } else {
            let reencrypted = cipher.encrypt(&dec.pad_pkcs7())?;
            Data::new(cipher.decrypt(&reencrypted)?).unpad_pkcs7()?
        };
        if round_tripped != dec {
            return Err(PackError::IntegrityViolation {
                pack: self.pack_name.clone(),
                file: self.file_name.clone(),
            });
        }
        Ok(())
    }

    /// Whether a file name is an animation resource.
    pub fn is_anim(file_name: &str) -> bool {
        [".maanim", ".mamodel", ".imgcut"]
            .iter()
            .any(|ext| file_name.ends_with(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC: CountryCode = CountryCode::En;
    const GV: GameVersion = GameVersion::new(12, 0, 0);

    fn encrypted_file(plain: &[u8], pack: &str) -> GameFile {
        let fresh = GameFile::from_decrypted(Data::from(plain), "a.csv", pack, CC, GV);
        let enc = fresh.encrypt(false, None, None).unwrap();
        GameFile::from_encrypted(enc, "a.csv", pack, CC, GV, None, None)
    }

    #[test]
    fn test_lazy_decrypt_round_trip() {
        let file = encrypted_file(b"1,2,3\n", "DataLocal");
        assert_eq!(file.dec_data().unwrap().as_bytes(), b"1,2,3\n");
    }

    #[test]
    fn test_unmodified_reemits_original_ciphertext() {
        let file = encrypted_file(b"1,2,3\n", "DataLocal");
        let original = file.enc_data().unwrap().clone();
        // Force the lazy decrypt, then re-encode
        file.dec_data().unwrap();
        assert_eq!(file.encrypt(false, None, None).unwrap(), original);
    }

    #[test]
    fn test_modified_reencrypts() {
        let mut file = encrypted_file(b"1,2,3\n", "DataLocal");
        let original = file.enc_data().unwrap().clone();
        file.set_dec_data(Data::from("9,9,9\n"));
        let reencoded = file.encrypt(false, None, None).unwrap();
        assert_ne!(reencoded, original);

        let reread = GameFile::from_encrypted(reencoded, "a.csv", "DataLocal", CC, GV, None, None);
        assert_eq!(reread.dec_data().unwrap().as_bytes(), b"9,9,9\n");
    }

    #[test]
    fn test_write_back_same_bytes_is_not_modified() {
        let mut file = encrypted_file(b"1,2,3\n", "DataLocal");
        file.dec_data().unwrap();
        file.set_dec_data(Data::from("1,2,3\n"));
        assert!(!file.is_modified());
        assert_eq!(
            file.encrypt(false, None, None).unwrap(),
            *file.enc_data().unwrap()
        );
    }

    #[test]
    fn test_plaintext_pack_has_no_padding() {
        let file = GameFile::from_decrypted(
            Data::from("model-bytes"),
            "000_f.mamodel",
            "ImageDataLocal",
            CC,
            GV,
        );
        let emitted = file.encrypt(false, None, None).unwrap();
        assert_eq!(emitted.as_bytes(), b"model-bytes");
    }

    #[test]
    fn test_corrupt_padding_surfaces_error() {
        let file = encrypted_file(b"1,2,3\n", "DataLocal");
        let mut corrupted = file.enc_data().unwrap().clone().into_bytes();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;
        let bad = GameFile::from_encrypted(
            Data::new(corrupted),
            "a.csv",
            "DataLocal",
            CC,
            GV,
            None,
            None,
        );
        assert!(matches!(
            bad.dec_data(),
            Err(PackError::BadPadding { .. })
        ));
    }

    #[test]
    fn test_verify_integrity() {
        let file = encrypted_file(b"1,2,3\n", "DataLocal");
        file.verify_integrity().unwrap();
        let plain = GameFile::from_decrypted(
            Data::from("raw"),
            "a.imgcut",
            "ImageDataLocal",
            CC,
            GV,
        );
        plain.verify_integrity().unwrap();
    }

    #[test]
    fn test_is_anim() {
        assert!(GameFile::is_anim("000_f.mamodel"));
        assert!(GameFile::is_anim("000_f02.maanim"));
        assert!(GameFile::is_anim("000_f.imgcut"));
        assert!(!GameFile::is_anim("000_f.png"));
    }
}
