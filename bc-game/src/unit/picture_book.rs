//! Cat guide entries (`nyankoPictureBookData.csv`).

use std::collections::BTreeMap;

use bc_data::csv;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

pub const FILE_NAME: &str = "nyankoPictureBookData.csv";

/// One cat's guide row. Row index is the cat id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PictureBookEntry {
    pub obtainable: bool,
    pub limited: bool,
    pub total_forms: i32,
    pub unknown: i32,
    pub scale_0: i32,
    pub scale_1: i32,
    pub scale_2: i32,
    pub scale_3: i32,
    pub other: Vec<i32>,
}

impl PictureBookEntry {
    pub fn from_raw(raw: &[i32]) -> Self {
        let mut r = raw.to_vec();
        r.resize(r.len().max(8), 0);
        Self {
            obtainable: r[0] != 0,
            limited: r[1] != 0,
            total_forms: r[2],
            unknown: r[3],
            scale_0: r[4],
            scale_1: r[5],
            scale_2: r[6],
            scale_3: r[7],
            other: r[8..].to_vec(),
        }
    }

    pub fn to_raw(&self) -> Vec<i32> {
        let mut r = vec![
            i32::from(self.obtainable),
            i32::from(self.limited),
            self.total_forms,
            self.unknown,
            self.scale_0,
            self.scale_1,
            self.scale_2,
            self.scale_3,
        ];
        r.extend_from_slice(&self.other);
        r
    }

    pub fn set_obtainable(&mut self, obtainable: bool) {
        self.obtainable = obtainable;
    }

    pub fn is_obtainable(&self) -> bool {
        self.obtainable
    }
}

/// All guide rows, keyed by cat id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NyankoPictureBook {
    pub entries: BTreeMap<usize, PictureBookEntry>,
}

impl NyankoPictureBook {
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv(FILE_NAME) else {
            return Self::default();
        };
        let entries = table
            .lines
            .iter()
            .enumerate()
            .map(|(cat_id, row)| (cat_id, PictureBookEntry::from_raw(&csv::row_ints(row))))
            .collect();
        Self { entries }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (cat_id, entry) in &other.entries {
            self.entries.entry(*cat_id).or_insert_with(|| entry.clone());
        }
    }

    /// Write the owned rows back by cat id.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv(FILE_NAME)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        for (cat_id, entry) in &self.entries {
            table.set_row(*cat_id, csv::ints_to_row(&entry.to_raw()));
        }
        packs.set_csv(FILE_NAME, &table)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let entry = PictureBookEntry::from_raw(&[1, 0, 3, 0, 100, 100, 100, 100, 7, 8]);
        assert!(entry.obtainable);
        assert_eq!(entry.total_forms, 3);
        assert_eq!(entry.other, vec![7, 8]);
        assert_eq!(
            PictureBookEntry::from_raw(&entry.to_raw()),
            entry
        );
    }

    #[test]
    fn test_short_row_extends() {
        let entry = PictureBookEntry::from_raw(&[1, 1]);
        assert_eq!(entry.total_forms, 0);
        assert!(entry.other.is_empty());
    }
}
