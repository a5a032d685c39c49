//! Pack decode/encode: one `(list, pack)` blob pair.

use indexmap::IndexMap;
use tracing::debug;

use bc_crypto::keys::list_cipher;
use bc_data::csv::Delimiter;
use bc_data::{CountryCode, Csv, Data, GameVersion, Language};

use crate::Result;
use crate::error::PackError;
use crate::game_file::GameFile;

/// Pack kind, derived from the pack name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    /// Delivered as a runtime delta; legacy ECB cipher, read-only for
    /// the modder.
    Server,
    /// Ships in the APK; country-keyed CBC, rewritable.
    Local,
    /// Ships in the APK but stored plaintext.
    ImageDataLocal,
}

/// An ordered collection of game files plus the pack identity.
#[derive(Debug, Clone)]
pub struct PackFile {
    pub pack_name: String,
    cc: CountryCode,
    gv: GameVersion,
    files: IndexMap<String, GameFile>,
    modified: bool,
}

impl PackFile {
    pub fn new(pack_name: impl Into<String>, cc: CountryCode, gv: GameVersion) -> Self {
        Self {
            pack_name: pack_name.into(),
            cc,
            gv,
            files: IndexMap::new(),
            modified: false,
        }
    }

    /// Whether a pack name denotes a server pack.
    pub fn is_server(pack_name: &str) -> bool {
        pack_name.contains("Server")
    }

    /// Whether a pack name denotes the plaintext image-data pack.
    pub fn is_image_data_local(pack_name: &str) -> bool {
        pack_name.to_ascii_lowercase().contains("imagedatalocal")
    }

    pub fn kind(&self) -> PackKind {
        if Self::is_server(&self.pack_name) {
            PackKind::Server
        } else if Self::is_image_data_local(&self.pack_name) {
            PackKind::ImageDataLocal
        } else {
            PackKind::Local
        }
    }

    /// Map a server pack name to its local counterpart and strip any
    /// language tag, yielding the pack a modification should land in.
    pub fn server_to_local_name(pack_name: &str) -> String {
        const SERVER_PACKS: [&str; 5] = [
            "MapServer",
            "NumberServer",
            "UnitServer",
            "ImageServer",
            "ImageDataServer",
        ];
        let mut name = pack_name.to_string();
        for server in SERVER_PACKS {
            if name.contains(server) {
                name = server.replace("Server", "Local");
                break;
            }
        }
        for lang in Language::ALL {
            let tag = format!("_{lang}");
            if name.contains(&tag) {
                name = name.replace(&tag, "");
                break;
            }
        }
        name
    }

    /// Language tag of a language-suffixed pack name (`Base_<lang>`).
    pub fn language_tag(pack_name: &str) -> Option<Language> {
        let (_, suffix) = pack_name.split_once('_')?;
        Language::from_code(suffix)
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn files(&self) -> impl Iterator<Item = &GameFile> {
        self.files.values()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn get_file(&self, file_name: &str) -> Option<&GameFile> {
        self.files.get(file_name)
    }

    pub fn add_file(&mut self, file: GameFile) {
        self.files.insert(file.file_name.clone(), file);
    }

    /// Write plaintext into an entry, creating it if absent. Marks the
    /// pack modified.
    pub fn set_file(&mut self, file_name: &str, data: Data) {
        match self.files.get_mut(file_name) {
            Some(file) => file.set_dec_data(data),
            None => {
                let file = GameFile::from_decrypted(
                    data,
                    file_name,
                    self.pack_name.clone(),
                    self.cc,
                    self.gv,
                );
                self.files.insert(file_name.to_string(), file);
            }
        }
        self.modified = true;
    }

    /// Decode a pack from its encrypted list and pack blobs.
    ///
    /// Entry plaintexts stay encrypted until first access.
    pub fn from_encrypted(
        enc_list: &Data,
        enc_pack: &Data,
        cc: CountryCode,
        pack_name: &str,
        gv: GameVersion,
        key: Option<String>,
        iv: Option<String>,
    ) -> Result<Self> {
        let bad_list = |reason: &str| PackError::BadList {
            pack: pack_name.to_string(),
            reason: reason.to_string(),
        };

        let list_plain = Data::new(list_cipher().decrypt(enc_list)?)
            .unpad_pkcs7()
            .map_err(|_| bad_list("invalid list padding"))?;
        let mut list = Csv::parse(&list_plain, Delimiter::Comma);

        let header = list.read_line().ok_or_else(|| bad_list("empty list"))?;
        let count: usize = header[0]
            .trim()
            .parse()
            .map_err(|_| bad_list("entry count is not a number"))?;

        debug!("decoding pack {pack_name}: {count} entries");

        let mut pack = Self::new(pack_name, cc, gv);
        for _ in 0..count {
            let row = list
                .read_line()
                .ok_or_else(|| bad_list("fewer entries than the header declares"))?;
            if row.len() < 3 {
                return Err(bad_list("entry row is missing fields"));
            }
            // Names are bare: anything up to the last path separator is
            // dropped.
            let file_name = row[0]
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or(&row[0])
                .to_string();
            let offset: usize = row[1]
                .trim()
                .parse()
                .map_err(|_| bad_list("entry offset is not a number"))?;
            let len: usize = row[2]
                .trim()
                .parse()
                .map_err(|_| bad_list("entry length is not a number"))?;
            let end = offset.checked_add(len).ok_or_else(|| PackError::Truncated {
                pack: pack_name.to_string(),
                file: file_name.clone(),
                offset,
                len,
                pack_len: enc_pack.len(),
            })?;
            if end > enc_pack.len() {
                return Err(PackError::Truncated {
                    pack: pack_name.to_string(),
                    file: file_name.clone(),
                    offset,
                    len,
                    pack_len: enc_pack.len(),
                });
            }
            let file = GameFile::from_encrypted(
                enc_pack.slice(offset, end),
                file_name,
                pack_name,
                cc,
                gv,
                key.clone(),
                iv.clone(),
            );
            pack.add_file(file);
        }
        Ok(pack)
    }

    /// Encode the pack back into `(pack_bytes, list_bytes)`.
    ///
    /// Entries are emitted in insertion order; the list records the
    /// running ciphertext offsets. Unmodified entries contribute their
    /// original ciphertext, so an untouched pack round-trips
    /// byte-identically.
    pub fn to_pack_list(&self, key: Option<&str>, iv: Option<&str>) -> Result<(Data, Data)> {
        let mut list = Csv::new(Delimiter::Comma);
        list.push_row(vec![self.files.len().to_string()]);

        let mut chunks = Vec::with_capacity(self.files.len());
        let mut offset = 0usize;
        for file in self.files.values() {
            let enc = file.encrypt(false, key, iv)?;
            list.push_row(vec![
                file.file_name.clone(),
                offset.to_string(),
                enc.len().to_string(),
            ]);
            offset += enc.len();
            chunks.push(enc);
        }

        let pack_data = Data::from_chunks(chunks);
        let list_plain = list.to_data().pad_pkcs7();
        let list_data = Data::new(list_cipher().encrypt(&list_plain)?);
        Ok((pack_data, list_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC: CountryCode = CountryCode::En;
    const GV: GameVersion = GameVersion::new(12, 0, 0);

    pub(crate) fn build_pack(
        pack_name: &str,
        entries: &[(&str, &[u8])],
    ) -> (Data, Data) {
        let mut pack = PackFile::new(pack_name, CC, GV);
        for (name, bytes) in entries {
            pack.set_file(name, Data::from(*bytes));
        }
        pack.to_pack_list(None, None).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let (pack_data, list_data) = build_pack(
            "DataLocal",
            &[
                ("unit000.csv", b"1,2,3\n" as &[u8]),
                ("unit001.csv", b"4,5,6\n"),
            ],
        );
        let pack =
            PackFile::from_encrypted(&list_data, &pack_data, CC, "DataLocal", GV, None, None)
                .unwrap();
        assert_eq!(pack.file_count(), 2);
        assert_eq!(
            pack.get_file("unit000.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"1,2,3\n"
        );
        assert_eq!(
            pack.get_file("unit001.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"4,5,6\n"
        );
    }

    #[test]
    fn test_untouched_pack_reencodes_identically() {
        let (pack_data, list_data) = build_pack(
            "DataLocal",
            &[("a.csv", b"1\n" as &[u8]), ("b.csv", b"2\n"), ("c.csv", b"3\n")],
        );
        let pack =
            PackFile::from_encrypted(&list_data, &pack_data, CC, "DataLocal", GV, None, None)
                .unwrap();
        // Touch every plaintext to prove caching does not disturb
        // re-emission.
        for file in pack.files() {
            file.dec_data().unwrap();
        }
        let (pack_again, _) = pack.to_pack_list(None, None).unwrap();
        assert_eq!(pack_again, pack_data);
    }

    #[test]
    fn test_single_entry_modification_is_isolated() {
        let (pack_data, list_data) = build_pack(
            "DataLocal",
            &[("a.csv", b"1\n" as &[u8]), ("b.csv", b"2\n")],
        );
        let mut pack =
            PackFile::from_encrypted(&list_data, &pack_data, CC, "DataLocal", GV, None, None)
                .unwrap();
        let b_enc = pack.get_file("b.csv").unwrap().enc_data().unwrap().clone();
        pack.set_file("a.csv", Data::from("999\n"));
        let (new_pack, new_list) = pack.to_pack_list(None, None).unwrap();

        let reread =
            PackFile::from_encrypted(&new_list, &new_pack, CC, "DataLocal", GV, None, None)
                .unwrap();
        assert_eq!(
            reread.get_file("a.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"999\n"
        );
        assert_eq!(*reread.get_file("b.csv").unwrap().enc_data().unwrap(), b_enc);
    }

    #[test]
    fn test_malformed_list_is_rejected() {
        let (pack_data, _) = build_pack("DataLocal", &[("a.csv", b"1\n")]);
        let garbage = Data::new(vec![0u8; 32]);
        assert!(matches!(
            PackFile::from_encrypted(&garbage, &pack_data, CC, "DataLocal", GV, None, None),
            Err(PackError::BadList { .. })
        ));
    }

    #[test]
    fn test_truncated_entry_is_rejected() {
        let (pack_data, list_data) = build_pack("DataLocal", &[("a.csv", b"1\n")]);
        let short_pack = pack_data.slice(0, pack_data.len() - 16);
        assert!(matches!(
            PackFile::from_encrypted(&list_data, &short_pack, CC, "DataLocal", GV, None, None),
            Err(PackError::Truncated { .. })
        ));
    }

    #[test]
    fn test_list_entry_names_are_basenames() {
        let mut pack = PackFile::new("DataLocal", CC, GV);
        pack.set_file("assets/sub/unit000.csv", Data::from("1\n"));
        let (pack_data, list_data) = pack.to_pack_list(None, None).unwrap();
        let reread =
            PackFile::from_encrypted(&list_data, &pack_data, CC, "DataLocal", GV, None, None)
                .unwrap();
        assert!(reread.get_file("unit000.csv").is_some());
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(PackFile::new("DataServer", CC, GV).kind(), PackKind::Server);
        assert_eq!(
            PackFile::new("ImageDataServer", CC, GV).kind(),
            PackKind::Server
        );
        assert_eq!(PackFile::new("DataLocal", CC, GV).kind(), PackKind::Local);
        assert_eq!(
            PackFile::new("ImageDataLocal", CC, GV).kind(),
            PackKind::ImageDataLocal
        );
    }

    #[test]
    fn test_server_to_local_name() {
        assert_eq!(PackFile::server_to_local_name("MapServer"), "MapLocal");
        assert_eq!(
            PackFile::server_to_local_name("ImageDataServer"),
            "ImageDataLocal"
        );
        assert_eq!(PackFile::server_to_local_name("DataLocal_es"), "DataLocal");
        assert_eq!(PackFile::server_to_local_name("DataLocal"), "DataLocal");
    }

    #[test]
    fn test_language_tag() {
        assert_eq!(
            PackFile::language_tag("DataLocal_ja"),
            Some(Language::Ja)
        );
        assert_eq!(PackFile::language_tag("DataLocal"), None);
        assert_eq!(PackFile::language_tag("Map_option"), None);
    }
}
