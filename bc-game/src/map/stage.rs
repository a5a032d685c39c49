//! Per-stage stats (`stage<code>NNN_SS.csv`) and the stage aggregate.

use image::RgbaImage;
use tracing::warn;

use bc_data::csv;
use bc_pack::GamePacks;

use super::index;
use super::names::StageName;
use crate::Result;
use crate::error::GameError;

/// One enemy line of a stage's spawn table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyRow {
    pub enemy_id: i32,
    pub total_spawn_count: i32,
    pub start_frame: i32,
    pub min_spawn_interval: i32,
    pub max_spawn_interval: i32,
    pub spawn_base_percentage: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub boss_flag: bool,
    pub magnification: i32,
    pub spawn_1: Option<i32>,
    pub castle_1: Option<i32>,
    pub group: Option<i32>,
    pub kill_count: Option<i32>,
}

impl EnemyRow {
    fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < 10 {
            return None;
        }
        let int = |i: usize| csv::parse_int(&row[i]);
        let opt = |i: usize| row.get(i).map(|c| csv::parse_int(c));
        Some(Self {
            enemy_id: int(0),
            total_spawn_count: int(1),
            start_frame: int(2),
            min_spawn_interval: int(3),
            max_spawn_interval: int(4),
            spawn_base_percentage: int(5),
            min_z: int(6),
            max_z: int(7),
            boss_flag: csv::parse_bool(&row[8]),
            magnification: int(9),
            spawn_1: opt(10),
            castle_1: opt(11),
            group: opt(12),
            kill_count: opt(13),
        })
    }

    fn to_row(&self) -> Vec<String> {
        let mut values = vec![
            self.enemy_id,
            self.total_spawn_count,
            self.start_frame,
            self.min_spawn_interval,
            self.max_spawn_interval,
            self.spawn_base_percentage,
            self.min_z,
            self.max_z,
            i32::from(self.boss_flag),
            self.magnification,
        ];
        for extra in [self.spawn_1, self.castle_1, self.group, self.kill_count] {
            if let Some(value) = extra {
                values.push(value);
            }
        }
        csv::ints_to_row(&values)
    }
}

/// Stats of one stage: terrain line, base line, then spawn rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub stage_id: i32,
    pub stage_index: usize,
    pub castle_type: i32,
    pub no_continues: bool,
    pub unknowns: Vec<i32>,
    pub stage_width: i32,
    pub base_health: i32,
    pub min_production_frames: i32,
    pub max_production_frames: i32,
    pub background_type: i32,
    pub max_enemy_count: i32,
    pub unused: i32,
    pub enemies: Vec<EnemyRow>,
}

impl StageStats {
    pub fn file_name(stage_id: i32, stage_index: usize) -> Option<String> {
        index::stage_csv_name(stage_id, stage_index)
    }

    pub fn read(packs: &GamePacks, stage_id: i32, stage_index: usize) -> Option<Self> {
        let file_name = Self::file_name(stage_id, stage_index)?;
        let mut table = packs.get_csv(&file_name)?;

        let line_1 = table.read_line()?.to_vec();
        if line_1.len() < 2 {
            warn!("{file_name}: malformed terrain line");
            return None;
        }
        let castle_type = csv::parse_int(&line_1[0]);
        let no_continues = csv::parse_bool(&line_1[1]);
        let unknowns = csv::row_ints(&line_1[2..]);

        let line_2 = table.read_line()?.to_vec();
        if line_2.len() < 7 {
            warn!("{file_name}: malformed base line");
            return None;
        }
        let b = csv::row_ints(&line_2);

        let enemies = table
            .lines
            .iter()
            .skip(2)
            .filter_map(|row| EnemyRow::from_row(row))
            .collect();

        Some(Self {
            stage_id,
            stage_index,
            castle_type,
            no_continues,
            unknowns,
            stage_width: b[0],
            base_health: b[1],
            min_production_frames: b[2],
            max_production_frames: b[3],
            background_type: b[4],
            max_enemy_count: b[5],
            unused: b[6],
            enemies,
        })
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let file_name = Self::file_name(self.stage_id, self.stage_index)
            .ok_or_else(|| GameError::MissingFile("stage csv (unknown partition)".into()))?;
        let mut table = packs
            .get_csv(&file_name)
            .ok_or_else(|| GameError::MissingFile(file_name.clone()))?;

        let mut line_1 = vec![self.castle_type, i32::from(self.no_continues)];
        line_1.extend_from_slice(&self.unknowns);
        table.set_row(0, csv::ints_to_row(&line_1));
        table.set_row(
            1,
            csv::ints_to_row(&[
                self.stage_width,
                self.base_health,
                self.min_production_frames,
                self.max_production_frames,
                self.background_type,
                self.max_enemy_count,
                self.unused,
            ]),
        );
        for (i, enemy) in self.enemies.iter().enumerate() {
            table.set_row(i + 2, enemy.to_row());
        }
        packs.set_csv(&file_name, &table)?;
        Ok(())
    }
}

/// One stage: its stats, display name and name image.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub stage_id: i32,
    pub stage_index: usize,
    pub stats: StageStats,
    pub name: StageName,
    pub name_image: RgbaImage,
}

impl Stage {
    pub fn read(
        packs: &GamePacks,
        stage_id: i32,
        stage_index: usize,
        name: StageName,
    ) -> Option<Self> {
        let stats = StageStats::read(packs, stage_id, stage_index)?;
        let image_name =
            index::stage_name_image_name(stage_id, stage_index, packs.language())?;
        let name_image = packs.get_img(&image_name)?;
        Some(Self {
            stage_id,
            stage_index,
            stats,
            name,
            name_image,
        })
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        self.stats.apply(packs)?;
        if let Some(image_name) =
            index::stage_name_image_name(self.stage_id, self.stage_index, packs.language())
        {
            packs.set_img(&image_name, &self.name_image)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bc_data::{CountryCode, Data, GameVersion};
    use bc_pack::PackFile;

    use super::*;

    fn catalog(file_name: &str, content: &str) -> GamePacks {
        let mut pack = PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        pack.set_file(file_name, Data::from(content));
        pack.set_modified(false);
        GamePacks::new(vec![pack], CountryCode::En, GameVersion::new(12, 0, 0))
    }

    #[test]
    fn test_read_and_apply_stage_stats() {
        // SOL map 0 stage 0
        let mut packs = catalog(
            "stageRN000_00.csv",
            "0,0,1,2\n4200,10000,30,60,0,7,0\n5,10,300,60,120,100,0,9,0,100\n\
             8,0,0,30,60,100,0,9,1,300,1\n",
        );
        let mut stats = StageStats::read(&packs, 0, 0).unwrap();
        assert_eq!(stats.stage_width, 4200);
        assert_eq!(stats.base_health, 10000);
        assert_eq!(stats.enemies.len(), 2);
        assert!(stats.enemies[1].boss_flag);
        assert_eq!(stats.enemies[1].spawn_1, Some(1));
        assert_eq!(stats.enemies[0].kill_count, None);

        stats.base_health = 99999;
        stats.apply(&mut packs).unwrap();
        let reread = StageStats::read(&packs, 0, 0).unwrap();
        assert_eq!(reread.base_health, 99999);
        assert_eq!(reread.enemies, stats.enemies);
    }

    #[test]
    fn test_missing_stage_file_reads_none() {
        let packs = catalog("unrelated.csv", "1\n");
        assert!(StageStats::read(&packs, 0, 0).is_none());
    }
}
