//! Enemy stats.
//!
//! Enemies are not addressed through the catalog by this toolkit; the
//! record exists in memory for bundle imports, which either carry an
//! enemy directly or graft its stats onto a unit form via
//! [`super::Stats::import_enemy_stats`].

use super::slots::{
    Attack, AttackState, Barrier, Burrow, Crit, Curse, Dodge, Frames, Freeze, Knockback,
    LethalStrike, Prob, Range, Revive, SavageBlow, Shield, Slow, SoulAnim, SpawnAnim,
    Strengthen, Surge, Toxic, Warp, Wave, Weaken,
};

/// Stats of one enemy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnemyStats {
    pub hp: i32,
    pub kbs: i32,
    pub speed: i32,
    pub attack_interval: Frames,
    pub range: Range,
    pub money_drop: i32,
    pub collision_start: i32,
    pub collision_width: Range,
    pub unused: i32,
    pub area_attack: bool,
    pub metal: bool,
    pub red: bool,
    pub floating: bool,
    pub black: bool,
    pub traitless: bool,
    pub angel: bool,
    pub alien: bool,
    pub zombie: bool,
    pub knockback: Knockback,
    pub freeze: Freeze,
    pub slow: Slow,
    pub crit: Crit,
    pub base_destroyer: bool,
    pub wave: Wave,
    pub weaken: Weaken,
    pub strengthen: Strengthen,
    pub survive_lethal_strike: LethalStrike,
    pub wave_immunity: bool,
    pub wave_blocker: bool,
    pub knockback_immunity: bool,
    pub freeze_immunity: bool,
    pub slow_immunity: bool,
    pub weaken_immunity: bool,
    pub burrow: Burrow,
    pub revive: Revive,
    pub witch: bool,
    pub base: bool,
    pub attack_state: AttackState,
    pub time_before_death: Frames,
    pub attack_1: Attack,
    pub attack_2: Attack,
    pub attack_3: Attack,
    pub spawn_anim: SpawnAnim,
    pub soul_anim: SoulAnim,
    pub barrier: Barrier,
    pub warp: Warp,
    pub starred_alien: bool,
    pub warp_blocker: bool,
    pub eva_angel: bool,
    pub relic: bool,
    pub curse: Curse,
    pub surge: Surge,
    pub savage_blow: SavageBlow,
    pub dodge: Dodge,
    pub toxic: Toxic,
    pub surge_immunity: bool,
    pub shield: Shield,
    pub death_surge: Surge,
    pub aku: bool,
    pub baron: bool,
    pub behemoth: bool,
}

/// An enemy entity assembled by an importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub enemy_id: i32,
    pub name: String,
    pub description: Vec<String>,
    pub stats: EnemyStats,
}
