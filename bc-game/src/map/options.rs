//! Per-map option rows (`Map_option.csv`).

use std::collections::BTreeMap;

use tracing::warn;

use bc_data::csv;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

pub const FILE_NAME: &str = "Map_option.csv";

/// What resets when a guerrilla map cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetType {
    #[default]
    None,
    Reward,
    ClearStatus,
    NumberOfPlays,
}

impl ResetType {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Reward),
            2 => Some(Self::ClearStatus),
            3 => Some(Self::NumberOfPlays),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Reward => 1,
            Self::ClearStatus => 2,
            Self::NumberOfPlays => 3,
        }
    }
}

/// One map's option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOption {
    pub stage_id: i32,
    pub number_of_stars: i32,
    pub star_mult_1: i32,
    pub star_mult_2: i32,
    pub star_mult_3: i32,
    pub star_mult_4: i32,
    pub guerrilla_set: i32,
    pub reset_type: ResetType,
    pub one_time_display: bool,
    pub display_order: i32,
    pub interval: i32,
    pub challenge_flag: bool,
    pub difficulty_mask: i32,
    pub hide_after_clear: bool,
    pub map_comment: String,
}

impl MapOption {
    fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < 15 {
            return None;
        }
        let int = |i: usize| csv::parse_int(&row[i]);
        let reset_type = ResetType::from_index(int(7)).unwrap_or_else(|| {
            warn!("unknown reset type {} in {FILE_NAME}, using None", int(7));
            ResetType::None
        });
        Some(Self {
            stage_id: int(0),
            number_of_stars: int(1),
            star_mult_1: int(2),
            star_mult_2: int(3),
            star_mult_3: int(4),
            star_mult_4: int(5),
            guerrilla_set: int(6),
            reset_type,
            one_time_display: csv::parse_bool(&row[8]),
            display_order: int(9),
            interval: int(10),
            challenge_flag: csv::parse_bool(&row[11]),
            difficulty_mask: int(12),
            hide_after_clear: csv::parse_bool(&row[13]),
            map_comment: row[14].clone(),
        })
    }

    fn to_row(&self) -> Vec<String> {
        let mut row = csv::ints_to_row(&[
            self.stage_id,
            self.number_of_stars,
            self.star_mult_1,
            self.star_mult_2,
            self.star_mult_3,
            self.star_mult_4,
            self.guerrilla_set,
            self.reset_type.index(),
            i32::from(self.one_time_display),
            self.display_order,
            self.interval,
            i32::from(self.challenge_flag),
            self.difficulty_mask,
            i32::from(self.hide_after_clear),
        ]);
        row.push(self.map_comment.clone());
        row
    }
}

/// All map option rows, keyed by stage id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapOptions {
    pub options: BTreeMap<i32, MapOption>,
}

impl MapOptions {
    /// Read every option row; the first line is a header.
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv(FILE_NAME) else {
            return Self::default();
        };
        let mut options = BTreeMap::new();
        for row in table.lines.iter().skip(1) {
            match MapOption::from_row(row) {
                Some(option) => {
                    options.insert(option.stage_id, option);
                }
                None => warn!("short row in {FILE_NAME}, skipping"),
            }
        }
        Self { options }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (stage_id, option) in &other.options {
            self.options
                .entry(*stage_id)
                .or_insert_with(|| option.clone());
        }
    }

    /// Rewrite matching rows in place, appending rows for new maps.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.options.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv(FILE_NAME)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        let mut remaining = self.options.clone();
        for index in 1..table.row_count() {
            let Some(row) = table.get_row(index) else {
                continue;
            };
            let Some(stage_id) = row.first().map(|c| csv::parse_int(c)) else {
                continue;
            };
            if let Some(option) = remaining.remove(&stage_id) {
                table.set_row(index, option.to_row());
            }
        }
        for option in remaining.values() {
            table.push_row(option.to_row());
        }
        packs.set_csv(FILE_NAME, &table)?;
        Ok(())
    }
}
