//! The multi-pack game-file catalog.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use tracing::{debug, warn};

use bc_data::csv::Delimiter;
use bc_data::{CountryCode, Csv, Data, GameVersion, Language};

use crate::Result;
use crate::cipher::FIRST_CBC_VERSION;
use crate::error::PackError;
use crate::game_file::GameFile;
use crate::pack_file::PackFile;

/// The in-memory union of every pack in an install.
///
/// Owns all packs and their files, resolves bare file names across
/// packs, caches parsed CSV views, and tracks which packs need
/// re-emission. `Clone` is a deep copy; forked catalogs share nothing,
/// which is how callers experiment with edits without disturbing the
/// canonical state.
#[derive(Debug, Clone)]
pub struct GamePacks {
    packs: IndexMap<String, PackFile>,
    pub country_code: CountryCode,
    pub game_version: GameVersion,
    lang: Language,
    modified_packs: BTreeSet<String>,
    csv_cache: RefCell<HashMap<String, Csv>>,
}

impl GamePacks {
    /// Build a catalog from already-decoded packs.
    pub fn new(packs: Vec<PackFile>, cc: CountryCode, gv: GameVersion) -> Self {
        let packs: IndexMap<String, PackFile> = packs
            .into_iter()
            .map(|pack| (pack.pack_name.clone(), pack))
            .collect();
        let lang = Self::detect_language(&packs, cc);
        Self {
            packs,
            country_code: cc,
            game_version: gv,
            lang,
            modified_packs: BTreeSet::new(),
            csv_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Build a catalog from encrypted `(pack_name, list, pack)` blobs,
    /// as handed over by the APK wrapper.
    ///
    /// A pack whose list cannot be decoded is skipped with a warning;
    /// one bad pack never takes down the catalog.
    pub fn from_encrypted_packs<I>(
        sources: I,
        cc: CountryCode,
        gv: GameVersion,
        key: Option<String>,
        iv: Option<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (String, Data, Data)>,
    {
        let mut packs = Vec::new();
        for (pack_name, enc_list, enc_pack) in sources {
            match PackFile::from_encrypted(
                &enc_list,
                &enc_pack,
                cc,
                &pack_name,
                gv,
                key.clone(),
                iv.clone(),
            ) {
                Ok(pack) => packs.push(pack),
                Err(e) => warn!("skipping malformed pack {pack_name}: {e}"),
            }
        }
        Self::new(packs, cc, gv)
    }

    /// The language per-locale file names resolve against.
    ///
    /// Taken from the `lang` key of `localizable.tsv` when present,
    /// otherwise from the country code.
    fn detect_language(packs: &IndexMap<String, PackFile>, cc: CountryCode) -> Language {
        for (pack_name, pack) in packs {
            if PackFile::language_tag(pack_name).is_some() {
                continue;
            }
            let Some(file) = pack.get_file("localizable.tsv") else {
                continue;
            };
            let Ok(data) = file.dec_data() else { continue };
            let table = Csv::parse(data, Delimiter::Tab);
            for row in &table.lines {
                if row.first().map(String::as_str) == Some("lang") {
                    if let Some(lang) = row.get(1).and_then(|c| Language::from_code(c)) {
                        debug!("catalog language from localizable.tsv: {lang}");
                        return lang;
                    }
                }
            }
        }
        cc.language()
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn set_language(&mut self, lang: Language) {
        self.lang = lang;
    }

    pub fn pack(&self, pack_name: &str) -> Option<&PackFile> {
        self.packs.get(pack_name)
    }

    pub fn packs(&self) -> impl Iterator<Item = &PackFile> {
        self.packs.values()
    }

    /// Names of packs that would be re-emitted.
    pub fn modified_pack_names(&self) -> impl Iterator<Item = &str> {
        self.modified_packs.iter().map(String::as_str)
    }

    /// Look up a file by bare name across every pack.
    ///
    /// Language-tagged packs for other languages are invisible. A hit
    /// in the pack tagged with the catalog's own language beats
    /// everything; otherwise Local beats Server, larger plaintext beats
    /// smaller, and ties keep the first pack inserted.
    pub fn find(&self, file_name: &str) -> Option<&GameFile> {
        let mut own_lang_hit: Option<&GameFile> = None;
        let mut candidates: Vec<&GameFile> = Vec::new();
        for (pack_name, pack) in &self.packs {
            let Some(file) = pack.get_file(file_name) else {
                continue;
            };
            match PackFile::language_tag(pack_name) {
                Some(tag) if tag != self.lang => continue,
                Some(_) => {
                    if own_lang_hit.is_none() {
                        own_lang_hit = Some(file);
                    }
                }
                None => candidates.push(file),
            }
        }
        if own_lang_hit.is_some() {
            return own_lang_hit;
        }

        let any_local = candidates
            .iter()
            .any(|f| !PackFile::is_server(&f.pack_name));
        let mut best: Option<&GameFile> = None;
        let mut best_len = 0usize;
        for file in candidates {
            if any_local && PackFile::is_server(&file.pack_name) {
                continue;
            }
            let len = file.dec_data().map(Data::len).unwrap_or(0);
            if best.is_none() || len > best_len {
                best = Some(file);
                best_len = len;
            }
        }
        best
    }

    /// Cached CSV view of a comma-delimited file.
    ///
    /// The returned table is a copy; mutations never leak between
    /// callers or into the cache.
    pub fn get_csv(&self, file_name: &str) -> Option<Csv> {
        self.get_csv_opts(file_name, Delimiter::Comma, false)
    }

    /// CSV view using the per-country resource delimiter.
    pub fn get_csv_localized(&self, file_name: &str, keep_empty: bool) -> Option<Csv> {
        self.get_csv_opts(
            file_name,
            Delimiter::for_country(self.country_code),
            keep_empty,
        )
    }

    pub fn get_csv_opts(
        &self,
        file_name: &str,
        delimiter: Delimiter,
        keep_empty: bool,
    ) -> Option<Csv> {
        if let Some(cached) = self.csv_cache.borrow().get(file_name) {
            return Some(cached.clone());
        }
        let file = self.find(file_name)?;
        let data = match file.dec_data() {
            Ok(data) => data,
            Err(e) => {
                warn!("cannot read {file_name}: {e}");
                return None;
            }
        };
        let csv = if keep_empty {
            Csv::parse_keep_empty(data, delimiter)
        } else {
            Csv::parse(data, delimiter)
        };
        self.csv_cache
            .borrow_mut()
            .insert(file_name.to_string(), csv.clone());
        Some(csv)
    }

    /// Write a CSV back by name and refresh the cache.
    pub fn set_csv(&mut self, file_name: &str, csv: &Csv) -> Result<()> {
        self.set_file(file_name, csv.to_data())?;
        self.csv_cache
            .borrow_mut()
            .insert(file_name.to_string(), csv.clone());
        Ok(())
    }

    /// Decode a PNG file from the catalog.
    pub fn get_img(&self, file_name: &str) -> Option<image::RgbaImage> {
        let file = self.find(file_name)?;
        let data = file.dec_data().ok()?;
        match image::load_from_memory(data.as_bytes()) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!("cannot decode image {file_name}: {e}");
                None
            }
        }
    }

    /// Encode an image as PNG and write it back by name.
    pub fn set_img(&mut self, file_name: &str, img: &image::RgbaImage) -> Result<()> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)?;
        self.set_file(file_name, Data::new(buf))
    }

    /// Write plaintext into the catalog by bare file name.
    ///
    /// The destination is the Local counterpart of wherever the file
    /// currently lives; new files route by kind (animations into
    /// `ImageDataLocal`, other PNGs into `ImageLocal`, everything else
    /// into `DataLocal`). Writing identical bytes is a no-op and does
    /// not dirty the pack.
    pub fn set_file(&mut self, file_name: &str, data: Data) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(PackError::EmptyFileName);
        }
        let mut dest: Option<String> = None;
        if let Some(existing) = self.find(file_name) {
            if let Ok(current) = existing.dec_data() {
                if current == &data {
                    return Ok(());
                }
            }
            dest = Some(PackFile::server_to_local_name(&existing.pack_name));
        }
        let dest = dest.unwrap_or_else(|| {
            if GameFile::is_anim(file_name) {
                "ImageDataLocal".to_string()
            } else if file_name.ends_with(".png") {
                "ImageLocal".to_string()
            } else {
                "DataLocal".to_string()
            }
        });
        let pack = self
            .packs
            .get_mut(&dest)
            .ok_or_else(|| PackError::MissingPack(dest.clone()))?;
        pack.set_file(file_name, data);
        self.modified_packs.insert(dest);
        self.csv_cache.borrow_mut().remove(file_name);
        Ok(())
    }

    /// Re-emit `(pack_name, pack_bytes, list_bytes)` for every pack
    /// that needs it.
    ///
    /// Only dirty packs are emitted, unless replacement key material is
    /// supplied on a modern install, in which case every local pack is
    /// re-encrypted under it. Server packs are never emitted; the game
    /// refuses modified server packs.
    pub fn to_packs_lists(
        &self,
        key: Option<&str>,
        iv: Option<&str>,
    ) -> Result<Vec<(String, Data, Data)>> {
        let reencrypt_all =
            (key.is_some() || iv.is_some()) && self.game_version >= FIRST_CBC_VERSION;
        let mut out = Vec::new();
        for (pack_name, pack) in &self.packs {
            if PackFile::is_server(pack_name) {
                continue;
            }
            if !(reencrypt_all
                || pack.modified()
                || self.modified_packs.contains(pack_name))
            {
                continue;
            }
            let (pack_data, list_data) = pack.to_pack_list(key, iv)?;
            out.push((pack_name.clone(), pack_data, list_data));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC: CountryCode = CountryCode::En;
    const GV: GameVersion = GameVersion::new(12, 0, 0);

    fn pack_with(pack_name: &str, entries: &[(&str, &[u8])]) -> PackFile {
        let mut pack = PackFile::new(pack_name, CC, GV);
        for (name, bytes) in entries {
            pack.set_file(name, Data::from(*bytes));
        }
        pack.set_modified(false);
        pack
    }

    fn catalog(packs: Vec<PackFile>) -> GamePacks {
        GamePacks::new(packs, CC, GV)
    }

    #[test]
    fn test_local_beats_server() {
        let packs = catalog(vec![
            pack_with("DataServer", &[("foo.csv", b"server" as &[u8])]),
            pack_with("DataLocal", &[("foo.csv", b"local" as &[u8])]),
        ]);
        let hit = packs.find("foo.csv").unwrap();
        assert_eq!(hit.pack_name, "DataLocal");
    }

    #[test]
    fn test_larger_plaintext_wins_between_locals() {
        let packs = catalog(vec![
            pack_with("DataLocal", &[("foo.csv", b"x" as &[u8])]),
            pack_with("NumberLocal", &[("foo.csv", b"a much longer copy" as &[u8])]),
        ]);
        assert_eq!(packs.find("foo.csv").unwrap().pack_name, "NumberLocal");
    }

    #[test]
    fn test_other_language_packs_are_invisible() {
        let packs = catalog(vec![
            pack_with("DataLocal_ja", &[("foo.csv", b"ja" as &[u8])]),
            pack_with("DataLocal", &[("bar.csv", b"base" as &[u8])]),
        ]);
        // Catalog language is `en` (from the country code)
        assert_eq!(packs.language(), Language::En);
        assert!(packs.find("foo.csv").is_none());
    }

    #[test]
    fn test_matching_language_pack_wins() {
        let packs = catalog(vec![
            pack_with("DataLocal", &[("foo.csv", b"base" as &[u8])]),
            pack_with("DataLocal_ja", &[("foo.csv", b"ja" as &[u8])]),
            pack_with("DataLocal_en", &[("foo.csv", b"en" as &[u8])]),
        ]);
        assert_eq!(packs.find("foo.csv").unwrap().pack_name, "DataLocal_en");
    }

    #[test]
    fn test_language_from_localizable() {
        let packs = catalog(vec![pack_with(
            "DataLocal",
            &[("localizable.tsv", b"lang\tfr\nother\tvalue\n" as &[u8])],
        )]);
        assert_eq!(packs.language(), Language::Fr);
    }

    #[test]
    fn test_csv_cache_returns_copies_and_stays_coherent() {
        let mut packs = catalog(vec![pack_with(
            "DataLocal",
            &[("table.csv", b"1,2\n" as &[u8])],
        )]);
        let mut first = packs.get_csv("table.csv").unwrap();
        first.set_row(0, vec!["9".into(), "9".into()]);
        // Mutating the returned copy must not affect the cache
        assert_eq!(
            packs.get_csv("table.csv").unwrap().get_row(0).unwrap(),
            &["1", "2"]
        );
        // After a write-back, reads observe the new value
        packs.set_csv("table.csv", &first).unwrap();
        assert_eq!(
            packs.get_csv("table.csv").unwrap().get_row(0).unwrap(),
            &["9", "9"]
        );
    }

    #[test]
    fn test_set_file_routes_by_kind() {
        let mut packs = catalog(vec![
            pack_with("DataLocal", &[]),
            pack_with("ImageLocal", &[]),
            pack_with("ImageDataLocal", &[]),
        ]);
        packs.set_file("stats.csv", Data::from("1\n")).unwrap();
        packs.set_file("icon.png", Data::from("png")).unwrap();
        packs.set_file("000_f.mamodel", Data::from("model")).unwrap();
        assert!(packs.pack("DataLocal").unwrap().get_file("stats.csv").is_some());
        assert!(packs.pack("ImageLocal").unwrap().get_file("icon.png").is_some());
        assert!(
            packs
                .pack("ImageDataLocal")
                .unwrap()
                .get_file("000_f.mamodel")
                .is_some()
        );
    }

    #[test]
    fn test_set_file_lands_in_local_counterpart() {
        let mut packs = catalog(vec![
            pack_with("UnitServer", &[("unit000.csv", b"old" as &[u8])]),
            pack_with("UnitLocal", &[]),
        ]);
        packs.set_file("unit000.csv", Data::from("new")).unwrap();
        assert!(packs.pack("UnitLocal").unwrap().get_file("unit000.csv").is_some());
        // The server copy is untouched
        assert_eq!(
            packs
                .pack("UnitServer")
                .unwrap()
                .get_file("unit000.csv")
                .unwrap()
                .dec_data()
                .unwrap()
                .as_bytes(),
            b"old"
        );
    }

    #[test]
    fn test_noop_repack_emits_nothing() {
        let mut local = PackFile::new("DataLocal", CC, GV);
        local.set_file("a.csv", Data::from("1\n"));
        let (pack_data, list_data) = local.to_pack_list(None, None).unwrap();

        let packs = GamePacks::from_encrypted_packs(
            [("DataLocal".to_string(), list_data, pack_data)],
            CC,
            GV,
            None,
            None,
        );
        assert!(packs.to_packs_lists(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_single_edit_dirties_one_pack() {
        let mut data_local = PackFile::new("DataLocal", CC, GV);
        data_local.set_file("unit000.csv", Data::from("100,3\n"));
        let (data_pack, data_list) = data_local.to_pack_list(None, None).unwrap();

        let mut image_local = PackFile::new("ImageLocal", CC, GV);
        image_local.set_file("icon.png", Data::from("png"));
        let (img_pack, img_list) = image_local.to_pack_list(None, None).unwrap();

        let mut packs = GamePacks::from_encrypted_packs(
            [
                ("DataLocal".to_string(), data_list, data_pack),
                ("ImageLocal".to_string(), img_list, img_pack),
            ],
            CC,
            GV,
            None,
            None,
        );
        packs.set_file("unit000.csv", Data::from("9999,3\n")).unwrap();

        let emitted = packs.to_packs_lists(None, None).unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, "DataLocal");

        let reread = PackFile::from_encrypted(
            &emitted[0].2,
            &emitted[0].1,
            CC,
            "DataLocal",
            GV,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            reread.get_file("unit000.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"9999,3\n"
        );
    }

    #[test]
    fn test_server_packs_never_emitted() {
        let mut server = PackFile::new("DataServer", CC, GV);
        server.set_file("a.csv", Data::from("1\n"));
        let packs = catalog(vec![server]);
        // The pack is marked modified, but server packs are skipped
        assert!(packs.to_packs_lists(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_new_key_material_reencrypts_every_local_pack() {
        let mut a = PackFile::new("DataLocal", CC, GV);
        a.set_file("a.csv", Data::from("1\n"));
        let (a_pack, a_list) = a.to_pack_list(None, None).unwrap();
        let mut b = PackFile::new("NumberLocal", CC, GV);
        b.set_file("b.csv", Data::from("2\n"));
        let (b_pack, b_list) = b.to_pack_list(None, None).unwrap();

        let packs = GamePacks::from_encrypted_packs(
            [
                ("DataLocal".to_string(), a_list, a_pack),
                ("NumberLocal".to_string(), b_list, b_pack),
            ],
            CC,
            GV,
            None,
            None,
        );
        let emitted = packs
            .to_packs_lists(
                Some("000102030405060708090a0b0c0d0e0f"),
                Some("101112131415161718191a1b1c1d1e1f"),
            )
            .unwrap();
        assert_eq!(emitted.len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_isolated() {
        let mut local = PackFile::new("DataLocal", CC, GV);
        local.set_file("good.csv", Data::from("1\n"));
        local.set_file("bad.csv", Data::from("2\n"));
        let (pack_data, list_data) = local.to_pack_list(None, None).unwrap();

        // Flip a byte inside bad.csv's ciphertext (the second 16-byte
        // entry of the blob)
        let mut corrupted = pack_data.clone().into_bytes();
        corrupted[31] ^= 0xFF;

        let packs = GamePacks::from_encrypted_packs(
            [("DataLocal".to_string(), list_data, Data::new(corrupted))],
            CC,
            GV,
            None,
            None,
        );
        assert!(packs.find("good.csv").is_some());
        let bad = packs.pack("DataLocal").unwrap().get_file("bad.csv").unwrap();
        assert!(bad.dec_data().is_err());
        // Not otherwise modified, so nothing is emitted
        assert!(packs.to_packs_lists(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_list_disables_only_that_pack() {
        let mut good = PackFile::new("DataLocal", CC, GV);
        good.set_file("a.csv", Data::from("1\n"));
        let (good_pack, good_list) = good.to_pack_list(None, None).unwrap();

        let packs = GamePacks::from_encrypted_packs(
            [
                ("Broken".to_string(), Data::new(vec![1u8; 32]), Data::empty()),
                ("DataLocal".to_string(), good_list, good_pack),
            ],
            CC,
            GV,
            None,
            None,
        );
        assert!(packs.pack("Broken").is_none());
        assert!(packs.find("a.csv").is_some());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut packs = catalog(vec![pack_with(
            "DataLocal",
            &[("a.csv", b"1\n" as &[u8])],
        )]);
        let fork = packs.clone();
        packs.set_file("a.csv", Data::from("2\n")).unwrap();
        assert_eq!(
            fork.find("a.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"1\n"
        );
        assert_eq!(
            packs.find("a.csv").unwrap().dec_data().unwrap().as_bytes(),
            b"2\n"
        );
    }

    #[test]
    fn test_find_corrupt_candidate_loses_ranking() {
        // A corrupt local copy ranks below a readable one instead of
        // erroring the lookup
        let mut good = PackFile::new("NumberLocal", CC, GV);
        good.set_file("foo.csv", Data::from("readable\n"));
        let (good_pack, good_list) = good.to_pack_list(None, None).unwrap();

        let mut bad = PackFile::new("DataLocal", CC, GV);
        bad.set_file("foo.csv", Data::from("corrupted-longer-content\n"));
        let (bad_pack, bad_list) = bad.to_pack_list(None, None).unwrap();
        let mut bad_bytes = bad_pack.into_bytes();
        let last = bad_bytes.len() - 1;
        bad_bytes[last] ^= 0xFF;

        let packs = GamePacks::from_encrypted_packs(
            [
                ("DataLocal".to_string(), bad_list, Data::new(bad_bytes)),
                ("NumberLocal".to_string(), good_list, good_pack),
            ],
            CC,
            GV,
            None,
            None,
        );
        assert_eq!(packs.find("foo.csv").unwrap().pack_name, "NumberLocal");
    }
}
