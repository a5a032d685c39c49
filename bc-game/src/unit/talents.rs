//! Unit talent data (`SkillAcquisition.csv`).

use std::collections::BTreeMap;

use bc_data::csv;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

pub const FILE_NAME: &str = "SkillAcquisition.csv";

/// Raw talent row for one unit. The slot layout shifts between client
/// versions, so the row is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talent {
    pub cat_id: i32,
    pub raw: Vec<i32>,
}

/// All talent rows, keyed by cat id (first cell of each row).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Talents {
    pub talents: BTreeMap<i32, Talent>,
}

impl Talents {
    /// Read every talent row; the first line is a header.
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv(FILE_NAME) else {
            return Self::default();
        };
        let mut talents = BTreeMap::new();
        for row in table.lines.iter().skip(1) {
            let ints = csv::row_ints(row);
            let Some((&cat_id, rest)) = ints.split_first() else {
                continue;
            };
            talents.insert(
                cat_id,
                Talent {
                    cat_id,
                    raw: rest.to_vec(),
                },
            );
        }
        Self { talents }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (cat_id, talent) in &other.talents {
            self.talents
                .entry(*cat_id)
                .or_insert_with(|| talent.clone());
        }
    }

    /// Rewrite matching rows in place and append rows for new cat ids.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.talents.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv(FILE_NAME)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        let mut remaining = self.talents.clone();
        for index in 1..table.row_count() {
            let Some(row) = table.get_row(index) else {
                continue;
            };
            let Some(cat_id) = row.first().map(|c| csv::parse_int(c)) else {
                continue;
            };
            if let Some(talent) = remaining.remove(&cat_id) {
                let mut cells = vec![cat_id.to_string()];
                cells.extend(csv::ints_to_row(&talent.raw));
                table.set_row(index, cells);
            }
        }
        for talent in remaining.values() {
            let mut cells = vec![talent.cat_id.to_string()];
            cells.extend(csv::ints_to_row(&talent.raw));
            table.push_row(cells);
        }
        packs.set_csv(FILE_NAME, &table)?;
        Ok(())
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
    fn test_read_skips_header() {
        let packs = catalog("header,row\n10,1,2,3\n25,4,5\n");
        let talents = Talents::read(&packs);
        assert_eq!(talents.talents.len(), 2);
        assert_eq!(talents.talents[&10].raw, vec![1, 2, 3]);
        assert_eq!(talents.talents[&25].raw, vec![4, 5]);
    }

    #[test]
    fn test_apply_rewrites_and_appends() {
        let mut packs = catalog("header,row\n10,1,2,3\n25,4,5\n");
        let mut talents = Talents::default();
        talents.talents.insert(
            10,
            Talent {
                cat_id: 10,
                raw: vec![9, 9, 9],
            },
        );
        talents.talents.insert(
            99,
            Talent {
                cat_id: 99,
                raw: vec![7],
            },
        );
        talents.apply(&mut packs).unwrap();

        let table = packs.get_csv(FILE_NAME).unwrap();
        assert_eq!(table.get_row(1).unwrap(), &["10", "9", "9", "9"]);
        // Untouched rows stay put; new ids land at the end
        assert_eq!(table.get_row(2).unwrap(), &["25", "4", "5"]);
        assert_eq!(table.get_row(3).unwrap(), &["99", "7"]);
    }
}
