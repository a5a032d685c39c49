//! Bundle container parsing.
//!
//! Layout:
//! - `0x00..0x10`: signature/header, ignored here
//! - `0x10..0x20`: raw AES key
//! - `0x20..0x24`: little-endian length of the directory JSON
//! - `0x24..`: AES-CBC directory JSON (padded), then the file
//!   payload area addressed by the directory's `(path, offset, size)`
//!   entries
//!
//! The IV is fixed for every bundle: `md5("battlecatsultimate")`.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use bc_crypto::hash::{HashAlgorithm, hash};
use bc_crypto::AesCipher;
use bc_data::Data;

use crate::Result;
use crate::cat::BcuCat;
use crate::enemy::BcuEnemy;
use crate::error::BundleError;
use crate::file::{BcuFile, BcuFileKind, FileInfo, padded_size};

const KEY_OFFSET: usize = 0x10;
const LEN_OFFSET: usize = 0x20;
const DIR_OFFSET: usize = 0x24;

/// Fixed phrase whose MD5 digest is every bundle's IV.
const IV_PHRASE: &[u8] = b"battlecatsultimate";

#[derive(Debug, Clone, Deserialize)]
struct Directory {
    desc: Value,
    files: Vec<FileInfo>,
}

/// Bundle metadata from the directory's `desc` block.
#[derive(Debug, Clone, Default)]
pub struct BundleDesc {
    pub bcu_version: String,
    pub id: String,
    pub author: String,
    pub name: String,
    pub allow_anim: bool,
    pub dependency: Vec<String>,
}

impl BundleDesc {
    fn from_value(desc: &Value) -> Self {
        let text = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            bcu_version: desc.get("BCU_VERSION").map(&text).unwrap_or_default(),
            id: desc.get("id").map(&text).unwrap_or_default(),
            author: desc.get("author").map(&text).unwrap_or_default(),
            name: desc
                .pointer("/names/dat/0/val")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            allow_anim: desc
                .get("allowAnim")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            dependency: desc
                .get("dependency")
                .and_then(Value::as_array)
                .map(|deps| deps.iter().map(&text).collect())
                .unwrap_or_default(),
        }
    }
}

/// A parsed bundle: metadata, decrypted files, and the unit and enemy
/// entities from `pack.json`.
#[derive(Debug, Clone)]
pub struct BcuBundle {
    pub desc: BundleDesc,
    pub files: Vec<BcuFile>,
    pub cats: Vec<BcuCat>,
    pub enemies: Vec<BcuEnemy>,
}

impl BcuBundle {
    /// Decrypt and parse a bundle.
    pub fn parse(enc_data: &Data) -> Result<Self> {
        if enc_data.len() < DIR_OFFSET {
            return Err(BundleError::Truncated {
                needed: DIR_OFFSET,
                have: enc_data.len(),
            });
        }
        let key: [u8; 16] = enc_data.as_bytes()[KEY_OFFSET..KEY_OFFSET + 16]
            .try_into()
            .map_err(|_| BundleError::Truncated {
                needed: KEY_OFFSET + 16,
                have: enc_data.len(),
            })?;
        let iv_digest = hash(HashAlgorithm::Md5, IV_PHRASE);
        let iv: [u8; 16] = iv_digest
            .as_slice()
            .try_into()
            .map_err(|_| BundleError::MalformedEntity("bad IV digest".into()))?;
        let cipher = AesCipher::cbc(&key, &iv);

        let json_len = enc_data.read_u32_le(LEN_OFFSET)? as usize;
        let json_pad = padded_size(json_len);
        let needed = DIR_OFFSET + json_pad;
        if enc_data.len() < needed {
            return Err(BundleError::Truncated {
                needed,
                have: enc_data.len(),
            });
        }
        let dir_plain =
            Data::new(cipher.decrypt(&enc_data.slice(DIR_OFFSET, needed))?).slice(0, json_len);
        let directory: Directory = serde_json::from_slice(dir_plain.as_bytes())?;
        debug!("bundle directory: {} files", directory.files.len());

        let payload = enc_data.slice(needed, enc_data.len());
        let mut files = Vec::with_capacity(directory.files.len());
        for info in &directory.files {
            files.push(BcuFile::decrypt(info, &payload, &cipher)?);
        }

        let pack_json = files
            .iter()
            .find(|file| file.name == "pack.json")
            .ok_or_else(|| BundleError::MissingFile("pack.json".into()))?;
        let pack: Value = serde_json::from_slice(pack_json.data.as_bytes())?;

        let bundle_files = |dir: &str| -> Vec<BcuFile> {
            files
                .iter()
                .filter(|file| file.dir_name() == dir)
                .cloned()
                .collect()
        };

        let mut cats = Vec::new();
        if let Some(units) = pack.pointer("/units/data").and_then(Value::as_array) {
            for unit in units {
                match BcuCat::from_value(unit, &bundle_files) {
                    Ok(cat) => cats.push(cat),
                    Err(e) => debug!("skipping malformed bundle unit: {e}"),
                }
            }
        }
        let mut enemies = Vec::new();
        if let Some(list) = pack.pointer("/enemies/data").and_then(Value::as_array) {
            for entry in list {
                match BcuEnemy::from_value(entry.get("val").unwrap_or(entry), &bundle_files)
                {
                    Ok(enemy) => enemies.push(enemy),
                    Err(e) => debug!("skipping malformed bundle enemy: {e}"),
                }
            }
        }

        Ok(Self {
            desc: BundleDesc::from_value(&directory.desc),
            files,
            cats,
            enemies,
        })
    }

    pub fn file_by_name(&self, name: &str) -> Option<&BcuFile> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn files_by_kind(&self, kind: BcuFileKind) -> impl Iterator<Item = &BcuFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }
}
