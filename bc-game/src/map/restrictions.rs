//! Deploy restrictions per map (`Stage_option.csv`).

use std::collections::BTreeMap;

use bc_data::csv;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

pub const FILE_NAME: &str = "Stage_option.csv";

/// Restriction row: nine integer cells keyed by map id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageOptionSet {
    pub map_id: i32,
    pub support: i32,
    pub stage_index: i32,
    pub rarity_limit: i32,
    pub deploy_limit: i32,
    pub row_limit: i32,
    pub cost_limit_lower: i32,
    pub cost_limit_upper: i32,
    pub cat_group_id: i32,
}

impl StageOptionSet {
    pub fn from_row(r: &[i32]) -> Option<Self> {
        if r.len() < 9 {
            return None;
        }
        Some(Self {
            map_id: r[0],
            support: r[1],
            stage_index: r[2],
            rarity_limit: r[3],
            deploy_limit: r[4],
            row_limit: r[5],
            cost_limit_lower: r[6],
            cost_limit_upper: r[7],
            cat_group_id: r[8],
        })
    }

    pub fn to_row(self) -> Vec<i32> {
        vec![
            self.map_id,
            self.support,
            self.stage_index,
            self.rarity_limit,
            self.deploy_limit,
            self.row_limit,
            self.cost_limit_lower,
            self.cost_limit_upper,
            self.cat_group_id,
        ]
    }
}

/// All restriction rows, keyed by map id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageOption {
    pub sets: BTreeMap<i32, StageOptionSet>,
}

impl StageOption {
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv(FILE_NAME) else {
            return Self::default();
        };
        let mut sets = BTreeMap::new();
        for row in &table.lines {
            if let Some(set) = StageOptionSet::from_row(&csv::row_ints(row)) {
                sets.insert(set.map_id, set);
            }
        }
        Self { sets }
    }

    pub fn get(&self, map_id: i32) -> Option<&StageOptionSet> {
        self.sets.get(&map_id)
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (map_id, set) in &other.sets {
            self.sets.entry(*map_id).or_insert(*set);
        }
    }

    /// Rewrite matching rows in place, appending rows for new maps.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.sets.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv(FILE_NAME)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        let mut remaining = self.sets.clone();
        for index in 0..table.row_count() {
            let Some(row) = table.get_row(index) else {
                continue;
            };
            let Some(map_id) = row.first().map(|c| csv::parse_int(c)) else {
                continue;
            };
            if let Some(set) = remaining.remove(&map_id) {
                table.set_row(index, csv::ints_to_row(&set.to_row()));
            }
        }
        for set in remaining.values() {
            table.push_row(csv::ints_to_row(&set.to_row()));
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

    #[test]
    fn test_read_modify_apply() {
        let mut pack = PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        pack.set_file(FILE_NAME, Data::from("0,0,-1,0,10,0,0,0,0\n14,1,0,3,0,0,75,300,0\n"));
        pack.set_modified(false);
        let mut packs =
            GamePacks::new(vec![pack], CountryCode::En, GameVersion::new(12, 0, 0));

        let mut options = StageOption::read(&packs);
        assert_eq!(options.sets.len(), 2);
        assert_eq!(options.get(14).unwrap().rarity_limit, 3);

        options.sets.get_mut(&0).unwrap().deploy_limit = 5;
        options.sets.insert(
            99,
            StageOptionSet {
                map_id: 99,
                ..StageOptionSet::default()
            },
        );
        options.apply(&mut packs).unwrap();

        let reread = StageOption::read(&packs);
        assert_eq!(reread.get(0).unwrap().deploy_limit, 5);
        assert_eq!(reread.get(14).unwrap().cost_limit_upper, 300);
        assert!(reread.get(99).is_some());
    }
}
