//! Evolution description text (`unitevolve_<lang>.csv`).

use std::collections::BTreeMap;

use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

/// File name for the catalog's language.
pub fn file_name(packs: &GamePacks) -> String {
    format!("unitevolve_{}.csv", packs.language())
}

/// Evolution text lines, keyed by cat id (= row index).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvolveText {
    pub text: BTreeMap<usize, Vec<String>>,
}

impl EvolveText {
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv_localized(&file_name(packs), true) else {
            return Self::default();
        };
        let text = table
            .lines
            .iter()
            .enumerate()
            .map(|(cat_id, row)| (cat_id, row.clone()))
            .collect();
        Self { text }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (cat_id, line) in &other.text {
            self.text.entry(*cat_id).or_insert_with(|| line.clone());
        }
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let name = file_name(packs);
        let mut table = packs
            .get_csv_localized(&name, true)
            .ok_or_else(|| GameError::MissingFile(name.clone()))?;
        for (cat_id, line) in &self.text {
            table.set_row(*cat_id, line.clone());
        }
        packs.set_csv(&name, &table)?;
        Ok(())
    }
}
