//! Stat sub-records.
//!
//! The 108-slot stat row packs related slots into small groups: an
//! ability is usually a probability plus a duration and sometimes a
//! magnitude. These types name those groups; the slot indices live in
//! [`super::stats`].

/// Frame count. Two slots (attack interval, recharge time) store half
/// the real frame count; use [`Frames::from_pair`]/[`Frames::to_pair`]
/// for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frames(pub i32);

impl Frames {
    /// Decode a slot that stores half-resolution frames.
    pub fn from_pair(raw: i32) -> Self {
        Self(raw * 2)
    }

    /// Encode back to half-resolution.
    pub fn to_pair(self) -> i32 {
        self.0 / 2
    }
}

/// Activation probability in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prob {
    pub percent: i32,
}

impl Prob {
    pub fn new(percent: i32) -> Self {
        Self { percent }
    }
}

/// A range value in raw units (the game renders four units per tile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub raw: i32,
}

impl Range {
    pub fn new(raw: i32) -> Self {
        Self { raw }
    }
}

/// Render-order band. Slot 14 is the minimum layer, 15 the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZLayers {
    pub min: i32,
    pub max: i32,
}

/// One of the up-to-three hits of an attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attack {
    pub damage: i32,
    pub foreswing: Frames,
    pub use_ability: bool,
    pub long_distance_flag: bool,
    pub long_distance_start: Range,
    pub long_distance_range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Knockback {
    pub prob: Prob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Freeze {
    pub prob: Prob,
    pub time: Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slow {
    pub prob: Prob,
    pub time: Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crit {
    pub prob: Prob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wave {
    pub prob: Prob,
    pub level: i32,
    pub is_mini: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weaken {
    pub prob: Prob,
    pub time: Frames,
    pub multiplier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strengthen {
    pub hp_percent: i32,
    pub multiplier_percent: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LethalStrike {
    pub prob: Prob,
}

/// Attack-state switch: after `attacks_before` attacks the unit changes
/// to `state_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackState {
    pub attacks_before: i32,
    pub state_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnAnim {
    pub model_id: i32,
    pub has_entry_maanim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoulAnim {
    pub model_id: i32,
    pub has_death_maanim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarrierBreak {
    pub prob: Prob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Warp {
    pub prob: Prob,
    pub time: Frames,
    pub min_distance: i32,
    pub max_distance: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavageBlow {
    pub prob: Prob,
    pub multiplier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dodge {
    pub prob: Prob,
    pub time: Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Surge {
    pub prob: Prob,
    pub start: Range,
    pub range: Range,
    pub level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Curse {
    pub prob: Prob,
    pub time: Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShieldPierce {
    pub prob: Prob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehemothDodge {
    pub prob: Prob,
    pub time: Frames,
}

/// Enemy-only: burrow underground and resurface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Burrow {
    pub count: i32,
    pub distance: i32,
}

/// Enemy-only: revive after death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revive {
    pub count: i32,
    pub time: Frames,
    pub hp_remain_percent: i32,
}

/// Enemy-only barrier hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Barrier {
    pub hp: i32,
}

/// Enemy-only toxic attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toxic {
    pub prob: Prob,
    pub hp_percent: i32,
}

/// Enemy-only aku shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shield {
    pub hp: i32,
    pub percent_heal_kb: i32,
}
