//! Stage and map names (`StageName_<code>_<lang>.csv`) and their
//! rendered name images.

use std::collections::BTreeMap;

use image::RgbaImage;

use bc_pack::GamePacks;

use super::index::{self, MapIndexType};
use crate::Result;
use crate::error::GameError;

/// Display name of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageName {
    pub stage_id: i32,
    pub stage_index: usize,
    pub name: String,
}

/// Names of every stage of one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNames {
    pub stage_id: i32,
    pub names: BTreeMap<usize, StageName>,
}

impl StageNames {
    pub fn get(&self, stage_index: usize) -> Option<&StageName> {
        self.names.get(&stage_index)
    }
}

/// Every map's stage names within one partition, keyed by stage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNameSet {
    pub partition: MapIndexType,
    pub names: BTreeMap<i32, StageNames>,
}

impl StageNameSet {
    pub fn file_name(partition: MapIndexType, packs: &GamePacks) -> Option<String> {
        index::stage_name_csv_name(partition, packs.language())
    }

    /// Read the partition's name table; row N holds the names of map
    /// `marker + N`, one cell per stage.
    pub fn read(partition: MapIndexType, packs: &GamePacks) -> Option<Self> {
        let file_name = Self::file_name(partition, packs)?;
        let table = packs.get_csv_localized(&file_name, false)?;
        let base = partition.marker();
        let mut names = BTreeMap::new();
        for (row_index, row) in table.lines.iter().enumerate() {
            let stage_id = base + row_index as i32;
            let stage_names = row
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    (
                        i,
                        StageName {
                            stage_id,
                            stage_index: i,
                            name: name.clone(),
                        },
                    )
                })
                .collect();
            names.insert(
                stage_id,
                StageNames {
                    stage_id,
                    names: stage_names,
                },
            );
        }
        Some(Self { partition, names })
    }

    /// Rewrite name cells for the maps this set owns; unknown maps are
    /// appended as new rows.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let file_name = Self::file_name(self.partition, packs)
            .ok_or_else(|| GameError::MissingFile("stage name csv (no code)".into()))?;
        let mut table = packs
            .get_csv_localized(&file_name, false)
            .ok_or_else(|| GameError::MissingFile(file_name.clone()))?;
        let base = self.partition.marker();
        let mut remaining = self.names.clone();
        for row_index in 0..table.row_count() {
            let stage_id = base + row_index as i32;
            let Some(names) = remaining.remove(&stage_id) else {
                continue;
            };
            let Some(row) = table.get_row(row_index) else {
                continue;
            };
            let mut row = row.to_vec();
            for (cell_index, cell) in row.iter_mut().enumerate() {
                if let Some(name) = names.names.get(&cell_index) {
                    *cell = name.name.clone();
                }
            }
            table.set_row(row_index, row);
        }
        for names in remaining.values() {
            table.push_row(names.names.values().map(|n| n.name.clone()).collect());
        }
        packs.set_csv(&file_name, &table)?;
        Ok(())
    }
}

/// Stage names across every partition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageNameSets {
    pub sets: BTreeMap<MapIndexType, StageNameSet>,
}

impl StageNameSets {
    pub fn read(packs: &GamePacks) -> Self {
        let mut sets = BTreeMap::new();
        for partition in MapIndexType::ALL {
            if let Some(set) = StageNameSet::read(partition, packs) {
                sets.insert(partition, set);
            }
        }
        Self { sets }
    }

    pub fn get(&self, stage_id: i32) -> Option<&StageNames> {
        let partition = MapIndexType::from_index(stage_id)?;
        self.sets.get(&partition)?.names.get(&stage_id)
    }

    pub fn set(&mut self, stage_id: i32, names: StageNames) {
        let Some(partition) = MapIndexType::from_index(stage_id) else {
            return;
        };
        self.sets
            .entry(partition)
            .or_insert_with(|| StageNameSet {
                partition,
                names: BTreeMap::new(),
            })
            .names
            .insert(stage_id, names);
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        for set in self.sets.values() {
            set.apply(packs)?;
        }
        Ok(())
    }
}

/// The rendered name image of one map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapNameImage {
    pub stage_id: i32,
    pub image: RgbaImage,
}

impl MapNameImage {
    pub fn read(packs: &GamePacks, stage_id: i32) -> Option<Self> {
        let file_name = index::map_name_image_name(stage_id, packs.language())?;
        Some(Self {
            stage_id,
            image: packs.get_img(&file_name)?,
        })
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if let Some(file_name) = index::map_name_image_name(self.stage_id, packs.language())
        {
            packs.set_img(&file_name, &self.image)?;
        }
        Ok(())
    }
}

/// The rendered name image of one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageNameImage {
    pub stage_id: i32,
    pub stage_index: usize,
    pub image: RgbaImage,
}

impl StageNameImage {
    pub fn read(packs: &GamePacks, stage_id: i32, stage_index: usize) -> Option<Self> {
        let file_name =
            index::stage_name_image_name(stage_id, stage_index, packs.language())?;
        Some(Self {
            stage_id,
            stage_index,
            image: packs.get_img(&file_name)?,
        })
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if let Some(file_name) =
            index::stage_name_image_name(self.stage_id, self.stage_index, packs.language())
        {
            packs.set_img(&file_name, &self.image)?;
        }
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
        pack.set_file("StageName_RN_en.csv", Data::from(content));
        pack.set_modified(false);
        GamePacks::new(vec![pack], CountryCode::En, GameVersion::new(12, 0, 0))
    }

    #[test]
    fn test_read_names() {
        let packs = catalog("The Legend Begins,Passion Land\nSecond Map Stage\n");
        let sets = StageNameSets::read(&packs);
        let names = sets.get(0).unwrap();
        assert_eq!(names.get(0).unwrap().name, "The Legend Begins");
        assert_eq!(names.get(1).unwrap().name, "Passion Land");
        let second = sets.get(1).unwrap();
        assert_eq!(second.get(0).unwrap().name, "Second Map Stage");
        assert!(sets.get(2).is_none());
    }

    #[test]
    fn test_apply_rewrites_and_appends() {
        let mut packs = catalog("Old Name,Old Two\n");
        let mut sets = StageNameSets::read(&packs);
        // Rename stage 0 of map 0
        sets.set(
            0,
            StageNames {
                stage_id: 0,
                names: BTreeMap::from([(
                    0,
                    StageName {
                        stage_id: 0,
                        stage_index: 0,
                        name: "New Name".into(),
                    },
                )]),
            },
        );
        // And add a brand-new map 1
        sets.set(
            1,
            StageNames {
                stage_id: 1,
                names: BTreeMap::from([(
                    0,
                    StageName {
                        stage_id: 1,
                        stage_index: 0,
                        name: "Added Map".into(),
                    },
                )]),
            },
        );
        sets.apply(&mut packs).unwrap();

        let reread = StageNameSets::read(&packs);
        assert_eq!(reread.get(0).unwrap().get(0).unwrap().name, "New Name");
        // Cells the record does not own survive
        assert_eq!(reread.get(0).unwrap().get(1).unwrap().name, "Old Two");
        assert_eq!(reread.get(1).unwrap().get(0).unwrap().name, "Added Map");
    }
}
