//! Localized UI strings (`localizable.tsv`).

use std::collections::BTreeMap;

use bc_data::csv::Delimiter;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

pub const FILE_NAME: &str = "localizable.tsv";

/// Key/value string table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Localizable {
    pub strings: BTreeMap<String, String>,
}

impl Localizable {
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv_opts(FILE_NAME, Delimiter::Tab, false) else {
            return Self::default();
        };
        let mut strings = BTreeMap::new();
        for row in &table.lines {
            let Some(key) = row.first() else { continue };
            let value = row.get(1).cloned().unwrap_or_default();
            strings.insert(key.clone(), value);
        }
        Self { strings }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.strings {
            self.strings
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Rewrite matched keys in place and append the rest.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.strings.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv_opts(FILE_NAME, Delimiter::Tab, false)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        let mut remaining = self.strings.clone();
        for index in 0..table.row_count() {
            let Some(row) = table.get_row(index) else {
                continue;
            };
            let Some(key) = row.first().cloned() else {
                continue;
            };
            if let Some(value) = remaining.remove(&key) {
                let mut row = row.to_vec();
                if row.len() < 2 {
                    row.resize(2, String::new());
                }
                row[1] = value;
                table.set_row(index, row);
            }
        }
        for (key, value) in &remaining {
            table.push_row(vec![key.clone(), value.clone()]);
        }
        packs.set_csv(FILE_NAME, &table)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// The language tag the install runs under.
    pub fn lang(&self) -> Option<&str> {
        self.get("lang")
    }
}

#[cfg(test)]
mod tests {
    use bc_data::{CountryCode, Data, GameVersion};
    use bc_pack::PackFile;

    use super::*;

    fn catalog(content: &str) -> GamePacks {
        let mut pack = PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        pack.set_file(FILE_NAME, Data::from(content));
        pack.set_modified(false);
        GamePacks::new(vec![pack], CountryCode::En, GameVersion::new(12, 0, 0))
    }

    #[test]
    fn test_read_and_lang() {
        let packs = catalog("lang\tfr\ntitle\tThe Battle Cats\n");
        let strings = Localizable::read(&packs);
        assert_eq!(strings.lang(), Some("fr"));
        assert_eq!(strings.get("title"), Some("The Battle Cats"));
    }

    #[test]
    fn test_merge_prefers_self() {
        let mut ours = Localizable::default();
        ours.set("title", "Modded Cats");
        let mut base = Localizable::default();
        base.set("title", "The Battle Cats");
        base.set("subtitle", "original");
        ours.merge(&base);
        assert_eq!(ours.get("title"), Some("Modded Cats"));
        assert_eq!(ours.get("subtitle"), Some("original"));
    }

    #[test]
    fn test_apply_rewrites_and_appends() {
        let mut packs = catalog("lang\ten\ntitle\tThe Battle Cats\n");
        let mut strings = Localizable::default();
        strings.set("title", "Modded Cats");
        strings.set("brand_new", "value");
        strings.apply(&mut packs).unwrap();

        let reread = Localizable::read(&packs);
        assert_eq!(reread.get("title"), Some("Modded Cats"));
        assert_eq!(reread.get("lang"), Some("en"));
        assert_eq!(reread.get("brand_new"), Some("value"));
    }
}
