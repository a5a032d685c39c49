//! The map aggregate: option row, stage list, stages and name images.

use std::collections::BTreeMap;

use bc_pack::GamePacks;

use super::names::{MapNameImage, StageNameSets, StageNames};
use super::options::{MapOption, MapOptions};
use super::restrictions::{StageOption, StageOptionSet};
use super::stage::Stage;
use super::stage_data::MapStageData;
use crate::Result;

/// One map: everything addressable through its stage id.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub stage_id: i32,
    pub option: MapOption,
    pub stage_data: MapStageData,
    pub stages: BTreeMap<usize, Stage>,
    pub name_image: MapNameImage,
    pub restriction: Option<StageOptionSet>,
}

impl Map {
    /// Assemble one map. The option row, stage list and name image are
    /// required; stages accumulate until the first gap.
    pub fn read(
        packs: &GamePacks,
        stage_id: i32,
        options: &MapOptions,
        stage_names: &StageNames,
        restrictions: &StageOption,
    ) -> Option<Self> {
        let option = options.options.get(&stage_id)?.clone();
        let stage_data = MapStageData::read(packs, stage_id)?;
        let name_image = MapNameImage::read(packs, stage_id)?;
        let restriction = restrictions.get(stage_id).copied();

        let mut stages = BTreeMap::new();
        let mut stage_index = 0usize;
        while let Some(name) = stage_names.get(stage_index) {
            let Some(stage) = Stage::read(packs, stage_id, stage_index, name.clone())
            else {
                break;
            };
            stages.insert(stage_index, stage);
            stage_index += 1;
        }

        Some(Self {
            stage_id,
            option,
            stage_data,
            stages,
            name_image,
            restriction,
        })
    }

    /// Write the map's own files back. Collection rows (options, names,
    /// restrictions) are written by [`Maps::apply`].
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        self.stage_data.apply(packs)?;
        self.name_image.apply(packs)?;
        for stage in self.stages.values() {
            stage.apply(packs)?;
        }
        Ok(())
    }

    /// The stage names this map carries.
    pub fn names(&self) -> StageNames {
        StageNames {
            stage_id: self.stage_id,
            names: self
                .stages
                .iter()
                .map(|(index, stage)| (*index, stage.name.clone()))
                .collect(),
        }
    }
}

/// A set of maps read from (or destined for) one catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Maps {
    pub maps: BTreeMap<i32, Map>,
}

impl Maps {
    /// Read every map that has a stage-name entry and a readable stage
    /// list. Maps that fail to assemble are skipped.
    pub fn read(packs: &GamePacks) -> Self {
        let options = MapOptions::read(packs);
        let name_sets = StageNameSets::read(packs);
        let restrictions = StageOption::read(packs);

        let mut maps = BTreeMap::new();
        for set in name_sets.sets.values() {
            for (stage_id, stage_names) in &set.names {
                if let Some(map) =
                    Map::read(packs, *stage_id, &options, stage_names, &restrictions)
                {
                    maps.insert(*stage_id, map);
                }
            }
        }
        Self { maps }
    }

    /// Combine with a base set; maps on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (stage_id, map) in &other.maps {
            self.maps.entry(*stage_id).or_insert_with(|| map.clone());
        }
    }

    /// Write every map and rebuild the collection rows they own.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let mut options = MapOptions::default();
        let mut name_sets = StageNameSets::default();
        let mut restrictions = StageOption::default();
        for map in self.maps.values() {
            map.apply(packs)?;
            options.options.insert(map.stage_id, map.option.clone());
            name_sets.set(map.stage_id, map.names());
            if let Some(restriction) = map.restriction {
                restrictions.sets.insert(restriction.map_id, restriction);
            }
        }
        options.apply(packs)?;
        name_sets.apply(packs)?;
        restrictions.apply(packs)?;
        Ok(())
    }
}
