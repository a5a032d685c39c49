//! One file inside a bundle.

use serde::Deserialize;

use bc_crypto::AesCipher;
use bc_data::Data;

use crate::Result;

/// Directory entry as stored in the bundle's JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub size: usize,
    pub offset: usize,
}

/// Kind of content a bundle file holds, from the second path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcuFileKind {
    Animations,
    Musics,
    Pack,
    Other,
}

/// A decrypted bundle file.
#[derive(Debug, Clone)]
pub struct BcuFile {
    pub path: String,
    pub name: String,
    pub kind: BcuFileKind,
    pub data: Data,
}

/// Encrypted slice length for a payload of `size` bytes; the bundle
/// always pads up to the next block, a full extra block when already
/// aligned.
pub fn padded_size(size: usize) -> usize {
    size + (16 - size % 16)
}

impl BcuFile {
    /// Cut this file's slice out of the payload area and decrypt it.
    pub fn decrypt(
        info: &FileInfo,
        payload: &Data,
        cipher: &AesCipher,
    ) -> Result<Self> {
        let enc = payload.slice(info.offset, info.offset + padded_size(info.size));
        let plain = Data::new(cipher.decrypt(&enc)?);
        let data = plain.slice(0, info.size);

        let name = info
            .path
            .rsplit('/')
            .next()
            .unwrap_or(&info.path)
            .to_string();
        let kind = match info.path.split('/').nth(1) {
            Some("animations") => BcuFileKind::Animations,
            Some("musics") => BcuFileKind::Musics,
            Some("pack.json") => BcuFileKind::Pack,
            _ => BcuFileKind::Other,
        };
        Ok(Self {
            path: info.path.clone(),
            name,
            kind,
            data,
        })
    }

    /// Directory component the file sits in (the entity id for
    /// animation files).
    pub fn dir_name(&self) -> &str {
        let mut parts: Vec<&str> = self.path.split('/').collect();
        parts.pop();
        parts.last().copied().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_size_always_grows() {
        assert_eq!(padded_size(0), 16);
        assert_eq!(padded_size(1), 16);
        assert_eq!(padded_size(15), 16);
        assert_eq!(padded_size(16), 32);
        assert_eq!(padded_size(17), 32);
    }

    #[test]
    fn test_dir_name() {
        let file = BcuFile {
            path: "./animations/unit7/sprite.png".into(),
            name: "sprite.png".into(),
            kind: BcuFileKind::Animations,
            data: Data::empty(),
        };
        assert_eq!(file.dir_name(), "unit7");
    }
}
