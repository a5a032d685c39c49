//! Per-map stage lists (`MapStageData<code>_NNN.csv`): energy, rewards
//! and music per stage.
//!
//! The reward tail of a stage row has two mutually exclusive layouts:
//! a multi-drop list, or a time-score list flagged by seven `-2`
//! sentinel cells. The parser and writer mirror the game's layout
//! exactly, quirks included.

use std::collections::BTreeMap;

use bc_data::csv;
use bc_pack::GamePacks;

use super::index;
use crate::Result;
use crate::error::GameError;

/// One reward drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDrop {
    pub probability: i32,
    pub item_id: i32,
    pub amount: i32,
}

/// One timed-score reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeScoreReward {
    pub score: i32,
    pub item_id: i32,
    pub amount: i32,
}

/// One stage's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStageDataStage {
    pub energy_cost: i32,
    pub xp_gain: i32,
    pub start_music: i32,
    pub base_percentage_boss_music: i32,
    pub boss_music: i32,
    pub rand: i32,
    pub item_drops: Vec<ItemDrop>,
    pub max_reward_claims: i32,
    pub time_score_rewards: Vec<TimeScoreReward>,
}

/// The stage list of one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStageData {
    pub stage_id: i32,
    pub map_number: i32,
    pub item_reward_type: i32,
    pub score_reward_type: i32,
    pub unknown_1: i32,
    pub unknown_2: i32,
    pub map_pattern: i32,
    pub stages: BTreeMap<usize, MapStageDataStage>,
}

impl MapStageData {
    pub fn file_name(stage_id: i32) -> Option<String> {
        index::map_stage_data_name(stage_id)
    }

    pub fn read(packs: &GamePacks, stage_id: i32) -> Option<Self> {
        let file_name = Self::file_name(stage_id)?;
        let mut table = packs.get_csv(&file_name)?;

        let line_1 = csv::row_ints(table.read_line()?);
        if line_1.len() < 5 {
            return None;
        }
        let line_2 = csv::row_ints(table.read_line()?);
        let map_pattern = line_2.first().copied()?;

        let mut stages = BTreeMap::new();
        for (stage_index, row) in table.lines.iter().skip(2).enumerate() {
            let r = csv::row_ints(row);
            if r.len() < 8 {
                continue;
            }
            let max_reward_claims = *r.last().unwrap_or(&0);

            let mut is_time = r.len() > 15;
            if is_time {
                for cell in &r[8..15] {
                    if *cell != -2 {
                        is_time = false;
                        break;
                    }
                }
            }
            let mut time_score_rewards = Vec::new();
            if is_time {
                let count = (r.len() - 17) / 3;
                for i in 0..count {
                    time_score_rewards.push(TimeScoreReward {
                        score: r[16 + i * 3],
                        item_id: r[17 + i * 3],
                        amount: r[18 + i * 3],
                    });
                }
            }

            let is_multi = !is_time && r.len() > 9;
            let mut rand = 0;
            let mut item_drops = Vec::new();
            if is_multi {
                rand = r[8];
                let count = (r.len() - 7) / 3;
                for i in 0..count {
                    item_drops.push(ItemDrop {
                        probability: r[6 + i * 3],
                        item_id: r[7 + i * 3],
                        amount: r[8 + i * 3],
                    });
                }
            }
            // The first drop always lives in cells 5..8, whether or not
            // a multi-drop tail follows.
            if !item_drops.is_empty() || !is_multi {
                let first = ItemDrop {
                    probability: r[5],
                    item_id: r[6],
                    amount: r[7],
                };
                if item_drops.is_empty() {
                    item_drops.push(first);
                } else {
                    item_drops[0] = first;
                }
            }

            stages.insert(
                stage_index,
                MapStageDataStage {
                    energy_cost: r[0],
                    xp_gain: r[1],
                    start_music: r[2],
                    base_percentage_boss_music: r[3],
                    boss_music: r[4],
                    rand,
                    item_drops,
                    max_reward_claims,
                    time_score_rewards,
                },
            );
        }

        Some(Self {
            stage_id,
            map_number: line_1[0],
            item_reward_type: line_1[1],
            score_reward_type: line_1[2],
            unknown_1: line_1[3],
            unknown_2: line_1[4],
            map_pattern,
            stages,
        })
    }

    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let file_name = Self::file_name(self.stage_id)
            .ok_or_else(|| GameError::MissingFile("map stage data (unknown partition)".into()))?;
        let mut table = packs
            .get_csv(&file_name)
            .ok_or_else(|| GameError::MissingFile(file_name.clone()))?;

        table.set_row(
            0,
            csv::ints_to_row(&[
                self.map_number,
                self.item_reward_type,
                self.score_reward_type,
                self.unknown_1,
                self.unknown_2,
            ]),
        );
        table.set_row(1, csv::ints_to_row(&[self.map_pattern]));

        for (stage_index, stage) in &self.stages {
            let mut line = vec![
                stage.energy_cost,
                stage.xp_gain,
                stage.start_music,
                stage.base_percentage_boss_music,
                stage.boss_music,
            ];
            if let Some(first) = stage.item_drops.first() {
                line.extend([first.probability, first.item_id, first.amount]);
            } else {
                line.extend([0, 0, 0]);
            }
            if stage.item_drops.len() > 1 {
                line.push(stage.rand);
                for drop in &stage.item_drops[1..] {
                    line.extend([drop.probability, drop.item_id, drop.amount]);
                }
            }
            if !stage.time_score_rewards.is_empty() {
                if line.len() < 15 {
                    line.resize(15, 0);
                }
                for cell in &mut line[8..15] {
                    *cell = -2;
                }
                line.push(1);
                for reward in &stage.time_score_rewards {
                    line.extend([reward.score, reward.item_id, reward.amount]);
                }
            }
            line.push(stage.max_reward_claims);
            table.set_row(stage_index + 2, csv::ints_to_row(&line));
        }
        packs.set_csv(&file_name, &table)?;
        Ok(())
    }
}
