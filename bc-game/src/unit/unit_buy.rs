//! Unit purchase and upgrade data (`unitbuy.csv`).

use std::collections::BTreeMap;

use tracing::warn;

use bc_data::csv;
use bc_pack::GamePacks;

use crate::Result;
use crate::error::GameError;

/// Canonical width of a unitbuy row.
pub const UNIT_BUY_SLOTS: usize = 63;

pub const FILE_NAME: &str = "unitbuy.csv";

/// Unit rarity (slot 13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rarity {
    #[default]
    Normal,
    Special,
    Rare,
    SuperRare,
    UberRare,
    LegendRare,
}

impl Rarity {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Normal),
            1 => Some(Self::Special),
            2 => Some(Self::Rare),
            3 => Some(Self::SuperRare),
            4 => Some(Self::UberRare),
            5 => Some(Self::LegendRare),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Special => 1,
            Self::Rare => 2,
            Self::SuperRare => 3,
            Self::UberRare => 4,
            Self::LegendRare => 5,
        }
    }
}

/// Gacha pool rarity (slot 17).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GachaRarity {
    #[default]
    None,
    Rare,
    SuperRare,
    UberRare,
    LegendRare,
}

impl GachaRarity {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Rare),
            2 => Some(Self::SuperRare),
            3 => Some(Self::UberRare),
            4 => Some(Self::LegendRare),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Rare => 1,
            Self::SuperRare => 2,
            Self::UberRare => 3,
            Self::LegendRare => 4,
        }
    }
}

/// Evolution item requirements: ten `(item_id, amount)` pairs in slots
/// 28..48.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvolveItems {
    pub items: [(i32, i32); 10],
}

impl EvolveItems {
    fn from_row(r: &[i32]) -> Self {
        let mut items = [(0, 0); 10];
        for (i, item) in items.iter_mut().enumerate() {
            *item = (r[28 + i * 2], r[29 + i * 2]);
        }
        Self { items }
    }

    fn write_row(&self, r: &mut [i32]) {
        for (i, (id, amount)) in self.items.iter().enumerate() {
            r[28 + i * 2] = *id;
            r[29 + i * 2] = *amount;
        }
    }
}

/// One unit's row of `unitbuy.csv`, 63 slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitBuyData {
    pub stage_unlock: i32,
    pub purchase_cost: i32,
    pub upgrade_costs: [i32; 10],
    pub unlock_source: i32,
    pub rarity: Rarity,
    pub position_order: i32,
    pub chapter_unlock: i32,
    pub sell_price: i32,
    pub gacha_rarity: GachaRarity,
    pub original_max_level: i32,
    pub unknown_19: i32,
    pub force_true_form_level: i32,
    pub second_form_levels: (i32, i32),
    pub true_form_id: i32,
    pub unknown_24: i32,
    pub third_form_levels: (i32, i32),
    pub evolve_cost: i32,
    pub evolve_items: EvolveItems,
    pub unknown_48: i32,
    pub max_upgrade_level_no_catseye: i32,
    pub max_upgrade_level_catseye: i32,
    pub max_plus_upgrade_level: i32,
    pub unknown_52: i32,
    pub unknown_53: i32,
    pub unknown_54: i32,
    pub unknown_55: i32,
    pub evolve_count: i32,
    /// Client version the unit first appeared in; `-1` marks the unit
    /// unobtainable.
    pub game_version: i32,
    pub np_sell_price: i32,
    pub unknown_59: i32,
    pub unknown_60: i32,
    pub unknown_61: i32,
    pub unknown_62: i32,
}

impl UnitBuyData {
    /// Decode a raw slot row, zero-extending to the canonical width.
    pub fn from_raw(raw: &[i32]) -> Self {
        let mut r = raw.to_vec();
        r.resize(UNIT_BUY_SLOTS, 0);
        let rarity = Rarity::from_index(r[13]).unwrap_or_else(|| {
            warn!("unknown rarity {} in unitbuy row, using Normal", r[13]);
            Rarity::Normal
        });
        let gacha_rarity = GachaRarity::from_index(r[17]).unwrap_or_else(|| {
            warn!("unknown gacha rarity {} in unitbuy row, using None", r[17]);
            GachaRarity::None
        });
        let mut upgrade_costs = [0i32; 10];
        upgrade_costs.copy_from_slice(&r[2..12]);
        Self {
            stage_unlock: r[0],
            purchase_cost: r[1],
            upgrade_costs,
            unlock_source: r[12],
            rarity,
            position_order: r[14],
            chapter_unlock: r[15],
            sell_price: r[16],
            gacha_rarity,
            original_max_level: r[18],
            unknown_19: r[19],
            force_true_form_level: r[20],
            second_form_levels: (r[21], r[22]),
            true_form_id: r[23],
            unknown_24: r[24],
            third_form_levels: (r[25], r[26]),
            evolve_cost: r[27],
            evolve_items: EvolveItems::from_row(&r),
            unknown_48: r[48],
            max_upgrade_level_no_catseye: r[49],
            max_upgrade_level_catseye: r[50],
            max_plus_upgrade_level: r[51],
            unknown_52: r[52],
            unknown_53: r[53],
            unknown_54: r[54],
            unknown_55: r[55],
            evolve_count: r[56],
            game_version: r[57],
            np_sell_price: r[58],
            unknown_59: r[59],
            unknown_60: r[60],
            unknown_61: r[61],
            unknown_62: r[62],
        }
    }

    /// Encode back to the canonical 63-slot row.
    pub fn to_raw(&self) -> Vec<i32> {
        let mut r = vec![0i32; UNIT_BUY_SLOTS];
        r[0] = self.stage_unlock;
        r[1] = self.purchase_cost;
        r[2..12].copy_from_slice(&self.upgrade_costs);
        r[12] = self.unlock_source;
        r[13] = self.rarity.index();
        r[14] = self.position_order;
        r[15] = self.chapter_unlock;
        r[16] = self.sell_price;
        r[17] = self.gacha_rarity.index();
        r[18] = self.original_max_level;
        r[19] = self.unknown_19;
        r[20] = self.force_true_form_level;
        r[21] = self.second_form_levels.0;
        r[22] = self.second_form_levels.1;
        r[23] = self.true_form_id;
        r[24] = self.unknown_24;
        r[25] = self.third_form_levels.0;
        r[26] = self.third_form_levels.1;
        r[27] = self.evolve_cost;
        self.evolve_items.write_row(&mut r);
        r[48] = self.unknown_48;
        r[49] = self.max_upgrade_level_no_catseye;
        r[50] = self.max_upgrade_level_catseye;
        r[51] = self.max_plus_upgrade_level;
        r[52] = self.unknown_52;
        r[53] = self.unknown_53;
        r[54] = self.unknown_54;
        r[55] = self.unknown_55;
        r[56] = self.evolve_count;
        r[57] = self.game_version;
        r[58] = self.np_sell_price;
        r[59] = self.unknown_59;
        r[60] = self.unknown_60;
        r[61] = self.unknown_61;
        r[62] = self.unknown_62;
        r
    }

    /// Flip obtainability. The `game_version` slot doubles as the
    /// unobtainable sentinel.
    pub fn set_obtainable(&mut self, obtainable: bool) {
        if obtainable {
            if self.game_version == -1 {
                self.game_version = 0;
            }
        } else {
            self.game_version = -1;
        }
    }

    pub fn is_obtainable(&self) -> bool {
        self.game_version != -1
    }
}

/// All unitbuy rows, keyed by cat id (= row index).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitBuy {
    pub units: BTreeMap<usize, UnitBuyData>,
}

impl UnitBuy {
    /// Read every row from the catalog. Absent file yields an empty
    /// record.
    pub fn read(packs: &GamePacks) -> Self {
        let Some(table) = packs.get_csv(FILE_NAME) else {
            return Self::default();
        };
        let units = table
            .lines
            .iter()
            .enumerate()
            .map(|(cat_id, row)| (cat_id, UnitBuyData::from_raw(&csv::row_ints(row))))
            .collect();
        Self { units }
    }

    /// Combine with a base record; entries on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (cat_id, data) in &other.units {
            self.units.entry(*cat_id).or_insert_with(|| data.clone());
        }
    }

    /// Write the owned rows back, leaving all other rows untouched.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        if self.units.is_empty() {
            return Ok(());
        }
        let mut table = packs
            .get_csv(FILE_NAME)
            .ok_or_else(|| GameError::MissingFile(FILE_NAME.to_string()))?;
        for (cat_id, data) in &self.units {
            table.set_row(*cat_id, csv::ints_to_row(&data.to_raw()));
        }
        packs.set_csv(FILE_NAME, &table)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_width_round_trip() {
        let data = UnitBuyData::from_raw(&[5, 100]);
        let raw = data.to_raw();
        assert_eq!(raw.len(), UNIT_BUY_SLOTS);
        assert_eq!(raw[0], 5);
        assert_eq!(raw[1], 100);
        assert_eq!(UnitBuyData::from_raw(&raw), data);
    }

    #[test]
    fn test_every_slot_survives_round_trip() {
        let mut raw: Vec<i32> = (0..UNIT_BUY_SLOTS as i32).map(|i| i + 100).collect();
        raw[13] = 4;
        raw[17] = 2;
        let data = UnitBuyData::from_raw(&raw);
        assert_eq!(data.rarity, Rarity::UberRare);
        assert_eq!(data.gacha_rarity, GachaRarity::SuperRare);
        assert_eq!(data.to_raw(), raw);
    }

    #[test]
    fn test_unknown_rarity_degrades() {
        let mut raw = vec![0i32; UNIT_BUY_SLOTS];
        raw[13] = 99;
        let data = UnitBuyData::from_raw(&raw);
        assert_eq!(data.rarity, Rarity::Normal);
    }

    #[test]
    fn test_obtainable_sentinel() {
        let mut data = UnitBuyData::from_raw(&[]);
        assert!(data.is_obtainable());
        data.set_obtainable(false);
        assert_eq!(data.game_version, -1);
        assert!(!data.is_obtainable());
        data.set_obtainable(true);
        assert_eq!(data.game_version, 0);
        assert!(data.is_obtainable());
    }

    #[test]
    fn test_merge_prefers_self() {
        let mut ours = UnitBuy::default();
        let mut our_unit = UnitBuyData::from_raw(&[]);
        our_unit.purchase_cost = 500;
        ours.units.insert(0, our_unit);

        let mut base = UnitBuy::default();
        let mut base_unit = UnitBuyData::from_raw(&[]);
        base_unit.purchase_cost = 50;
        base.units.insert(0, base_unit.clone());
        base.units.insert(1, base_unit);

        ours.merge(&base);
        assert_eq!(ours.units[&0].purchase_cost, 500);
        assert_eq!(ours.units[&1].purchase_cost, 50);
    }
}
