//! The 108-slot unit stat row.

use super::enemy::EnemyStats;
use super::slots::{
    Attack, AttackState, BarrierBreak, BehemothDodge, Crit, Curse, Dodge, Frames, Freeze,
    Knockback, LethalStrike, Prob, Range, SavageBlow, ShieldPierce, Slow, SoulAnim,
    SpawnAnim, Strengthen, Surge, Warp, Wave, Weaken, ZLayers,
};

/// Canonical width of a stat row.
///
/// Shorter rows (assets authored under an older schema) are
/// zero-extended on read and always emitted at full width.
pub const STAT_SLOTS: usize = 108;

/// Stats of one unit form (or an enemy translated into unit form).
///
/// Each field is tied to fixed slot indices; the reader and writer
/// mirror the same map. See `from_raw`/`to_raw`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub hp: i32,
    pub kbs: i32,
    pub speed: i32,
    pub attack_interval: Frames,
    pub range: Range,
    pub cost: i32,
    pub recharge_time: Frames,
    pub collision_start: i32,
    pub collision_width: Range,
    pub target_red: bool,
    pub unused: i32,
    pub area_attack: bool,
    pub z_layers: ZLayers,
    pub target_floating: bool,
    pub target_black: bool,
    pub target_metal: bool,
    pub target_traitless: bool,
    pub target_angel: bool,
    pub target_alien: bool,
    pub target_zombie: bool,
    pub strong: bool,
    pub knockback: Knockback,
    pub freeze: Freeze,
    pub slow: Slow,
    pub resistant: bool,
    pub massive_damage: bool,
    pub crit: Crit,
    pub attacks_only: bool,
    pub extra_money: bool,
    pub base_destroyer: bool,
    pub wave: Wave,
    pub weaken: Weaken,
    pub strengthen: Strengthen,
    pub lethal_strike: LethalStrike,
    pub is_metal: bool,
    pub wave_immunity: bool,
    pub wave_blocker: bool,
    pub knockback_immunity: bool,
    pub freeze_immunity: bool,
    pub slow_immunity: bool,
    pub weaken_immunity: bool,
    pub zombie_killer: bool,
    pub witch_killer: bool,
    pub target_witch: bool,
    pub attack_state: AttackState,
    pub shockwave_immune: bool,
    pub time_before_death: Frames,
    pub attack_1: Attack,
    pub attack_2: Attack,
    pub attack_3: Attack,
    pub spawn_anim: SpawnAnim,
    pub soul_anim: SoulAnim,
    pub barrier_breaker: BarrierBreak,
    pub warp: Warp,
    pub warp_blocker: bool,
    pub target_eva: bool,
    pub eva_killer: bool,
    pub target_relic: bool,
    pub curse_immunity: bool,
    pub insanely_tough: bool,
    pub insane_damage: bool,
    pub savage_blow: SavageBlow,
    pub dodge: Dodge,
    pub surge: Surge,
    pub toxic_immunity: bool,
    pub surge_immunity: bool,
    pub curse: Curse,
    pub shield_pierce: ShieldPierce,
    pub target_aku: bool,
    pub colossus_slayer: bool,
    pub soul_strike: bool,
    pub behemoth_slayer: bool,
    pub behemoth_dodge: BehemothDodge,
}

impl Stats {
    /// Decode a raw slot row, zero-extending to the canonical width.
    pub fn from_raw(raw: &[i32]) -> Self {
        let mut r = raw.to_vec();
        r.resize(STAT_SLOTS, 0);
        let b = |i: usize| r[i] != 0;
        Self {
            hp: r[0],
            kbs: r[1],
            speed: r[2],
            attack_interval: Frames::from_pair(r[4]),
            range: Range::new(r[5]),
            cost: r[6],
            recharge_time: Frames::from_pair(r[7]),
            collision_start: r[8],
            collision_width: Range::new(r[9]),
            target_red: b(10),
            unused: r[11],
            area_attack: b(12),
            z_layers: ZLayers {
                min: r[14],
                max: r[15],
            },
            target_floating: b(16),
            target_black: b(17),
            target_metal: b(18),
            target_traitless: b(19),
            target_angel: b(20),
            target_alien: b(21),
            target_zombie: b(22),
            strong: b(23),
            knockback: Knockback {
                prob: Prob::new(r[24]),
            },
            freeze: Freeze {
                prob: Prob::new(r[25]),
                time: Frames(r[26]),
            },
            slow: Slow {
                prob: Prob::new(r[27]),
                time: Frames(r[28]),
            },
            resistant: b(29),
            massive_damage: b(30),
            crit: Crit {
                prob: Prob::new(r[31]),
            },
            attacks_only: b(32),
            extra_money: b(33),
            base_destroyer: b(34),
            wave: Wave {
                prob: Prob::new(r[35]),
                level: r[36],
                is_mini: b(94),
            },
            weaken: Weaken {
                prob: Prob::new(r[37]),
                time: Frames(r[38]),
                multiplier: r[39],
            },
            strengthen: Strengthen {
                hp_percent: r[40],
                multiplier_percent: r[41],
            },
            lethal_strike: LethalStrike {
                prob: Prob::new(r[42]),
            },
            is_metal: b(43),
            wave_immunity: b(46),
            wave_blocker: b(47),
            knockback_immunity: b(48),
            freeze_immunity: b(49),
            slow_immunity: b(50),
            weaken_immunity: b(51),
            zombie_killer: b(52),
            witch_killer: b(53),
            target_witch: b(54),
            attack_state: AttackState {
                attacks_before: r[55],
                state_id: r[58],
            },
            shockwave_immune: b(56),
            time_before_death: Frames(r[57]),
            attack_1: Attack {
                damage: r[3],
                foreswing: Frames(r[13]),
                use_ability: b(63),
                long_distance_flag: true,
                long_distance_start: Range::new(r[44]),
                long_distance_range: Range::new(r[45]),
            },
            attack_2: Attack {
                damage: r[59],
                foreswing: Frames(r[61]),
                use_ability: b(64),
                long_distance_flag: b(99),
                long_distance_start: Range::new(r[100]),
                long_distance_range: Range::new(r[101]),
            },
            attack_3: Attack {
                damage: r[60],
                foreswing: Frames(r[62]),
                use_ability: b(65),
                long_distance_flag: b(102),
                long_distance_start: Range::new(r[103]),
                long_distance_range: Range::new(r[104]),
            },
            spawn_anim: SpawnAnim {
                model_id: r[66],
                has_entry_maanim: b(68),
            },
            soul_anim: SoulAnim {
                model_id: r[67],
                has_death_maanim: b(69),
            },
            barrier_breaker: BarrierBreak {
                prob: Prob::new(r[70]),
            },
            warp: Warp {
                prob: Prob::new(r[71]),
                time: Frames(r[72]),
                min_distance: r[73],
                max_distance: r[74],
            },
            warp_blocker: b(75),
            target_eva: b(76),
            eva_killer: b(77),
            target_relic: b(78),
            curse_immunity: b(79),
            insanely_tough: b(80),
            insane_damage: b(81),
            savage_blow: SavageBlow {
                prob: Prob::new(r[82]),
                multiplier: r[83],
            },
            dodge: Dodge {
                prob: Prob::new(r[84]),
                time: Frames(r[85]),
            },
            surge: Surge {
                prob: Prob::new(r[86]),
                start: Range::new(r[87]),
                range: Range::new(r[88]),
                level: r[89],
            },
            toxic_immunity: b(90),
            surge_immunity: b(91),
            curse: Curse {
                prob: Prob::new(r[92]),
                time: Frames(r[93]),
            },
            shield_pierce: ShieldPierce {
                prob: Prob::new(r[95]),
            },
            target_aku: b(96),
            colossus_slayer: b(97),
            soul_strike: b(98),
            behemoth_slayer: b(105),
            behemoth_dodge: BehemothDodge {
                prob: Prob::new(r[106]),
                time: Frames(r[107]),
            },
        }
    }

    /// Encode back to the canonical 108-slot row.
    pub fn to_raw(&self) -> Vec<i32> {
        let mut r = vec![0i32; STAT_SLOTS];
        r[0] = self.hp;
        r[1] = self.kbs;
        r[2] = self.speed;
        r[3] = self.attack_1.damage;
        r[4] = self.attack_interval.to_pair();
        r[5] = self.range.raw;
        r[6] = self.cost;
        r[7] = self.recharge_time.to_pair();
        r[8] = self.collision_start;
        r[9] = self.collision_width.raw;
        r[10] = i32::from(self.target_red);
        r[11] = self.unused;
        r[12] = i32::from(self.area_attack);
        r[13] = self.attack_1.foreswing.0;
        r[14] = self.z_layers.min;
        r[15] = self.z_layers.max;
        r[16] = i32::from(self.target_floating);
        r[17] = i32::from(self.target_black);
        r[18] = i32::from(self.target_metal);
        r[19] = i32::from(self.target_traitless);
        r[20] = i32::from(self.target_angel);
        r[21] = i32::from(self.target_alien);
        r[22] = i32::from(self.target_zombie);
        r[23] = i32::from(self.strong);
        r[24] = self.knockback.prob.percent;
        r[25] = self.freeze.prob.percent;
        r[26] = self.freeze.time.0;
        r[27] = self.slow.prob.percent;
        r[28] = self.slow.time.0;
        r[29] = i32::from(self.resistant);
        r[30] = i32::from(self.massive_damage);
        r[31] = self.crit.prob.percent;
        r[32] = i32::from(self.attacks_only);
        r[33] = i32::from(self.extra_money);
        r[34] = i32::from(self.base_destroyer);
        r[35] = self.wave.prob.percent;
        r[36] = self.wave.level;
        r[37] = self.weaken.prob.percent;
        r[38] = self.weaken.time.0;
        r[39] = self.weaken.multiplier;
        r[40] = self.strengthen.hp_percent;
        r[41] = self.strengthen.multiplier_percent;
        r[42] = self.lethal_strike.prob.percent;
        r[43] = i32::from(self.is_metal);
        r[44] = self.attack_1.long_distance_start.raw;
        r[45] = self.attack_1.long_distance_range.raw;
        r[46] = i32::from(self.wave_immunity);
        r[47] = i32::from(self.wave_blocker);
        r[48] = i32::from(self.knockback_immunity);
        r[49] = i32::from(self.freeze_immunity);
        r[50] = i32::from(self.slow_immunity);
        r[51] = i32::from(self.weaken_immunity);
        r[52] = i32::from(self.zombie_killer);
        r[53] = i32::from(self.witch_killer);
        r[54] = i32::from(self.target_witch);
        r[55] = self.attack_state.attacks_before;
        r[56] = i32::from(self.shockwave_immune);
        r[57] = self.time_before_death.0;
        r[58] = self.attack_state.state_id;
        r[59] = self.attack_2.damage;
        r[60] = self.attack_3.damage;
        r[61] = self.attack_2.foreswing.0;
        r[62] = self.attack_3.foreswing.0;
        r[63] = i32::from(self.attack_1.use_ability);
        r[64] = i32::from(self.attack_2.use_ability);
        r[65] = i32::from(self.attack_3.use_ability);
        r[66] = self.spawn_anim.model_id;
        r[67] = self.soul_anim.model_id;
        r[68] = i32::from(self.spawn_anim.has_entry_maanim);
        r[69] = i32::from(self.soul_anim.has_death_maanim);
        r[70] = self.barrier_breaker.prob.percent;
        r[71] = self.warp.prob.percent;
        r[72] = self.warp.time.0;
        r[73] = self.warp.min_distance;
        r[74] = self.warp.max_distance;
        r[75] = i32::from(self.warp_blocker);
        r[76] = i32::from(self.target_eva);
        r[77] = i32::from(self.eva_killer);
        r[78] = i32::from(self.target_relic);
        r[79] = i32::from(self.curse_immunity);
        r[80] = i32::from(self.insanely_tough);
        r[81] = i32::from(self.insane_damage);
        r[82] = self.savage_blow.prob.percent;
        r[83] = self.savage_blow.multiplier;
        r[84] = self.dodge.prob.percent;
        r[85] = self.dodge.time.0;
        r[86] = self.surge.prob.percent;
        r[87] = self.surge.start.raw;
        r[88] = self.surge.range.raw;
        r[89] = self.surge.level;
        r[90] = i32::from(self.toxic_immunity);
        r[91] = i32::from(self.surge_immunity);
        r[92] = self.curse.prob.percent;
        r[93] = self.curse.time.0;
        r[94] = i32::from(self.wave.is_mini);
        r[95] = self.shield_pierce.prob.percent;
        r[96] = i32::from(self.target_aku);
        r[97] = i32::from(self.colossus_slayer);
        r[98] = i32::from(self.soul_strike);
        r[99] = i32::from(self.attack_2.long_distance_flag);
        r[100] = self.attack_2.long_distance_start.raw;
        r[101] = self.attack_2.long_distance_range.raw;
        r[102] = i32::from(self.attack_3.long_distance_flag);
        r[103] = self.attack_3.long_distance_start.raw;
        r[104] = self.attack_3.long_distance_range.raw;
        r[105] = i32::from(self.behemoth_slayer);
        r[106] = self.behemoth_dodge.prob.percent;
        r[107] = self.behemoth_dodge.time.0;
        r
    }

    /// Whether any status effect that needs a target trait is active.
    pub fn has_targeted_effect(&self) -> bool {
        [
            self.knockback.prob.percent,
            self.freeze.prob.percent,
            self.slow.prob.percent,
            self.weaken.prob.percent,
            self.warp.prob.percent,
            self.curse.prob.percent,
            self.dodge.prob.percent,
        ]
        .iter()
        .any(|&p| p != 0)
    }

    /// Reset every slot to zero.
    pub fn wipe(&mut self) {
        *self = Self::from_raw(&[]);
    }

    /// Transfer enemy stats onto this unit form.
    ///
    /// Targeting traits have no enemy equivalent; when the receiving
    /// form had any targeted effect before the wipe, every trait is
    /// turned on so those effects keep firing.
    pub fn import_enemy_stats(&mut self, enemy: &EnemyStats) {
        let has_targeted_effect = self.has_targeted_effect();
        self.wipe();
        self.hp = enemy.hp;
        self.kbs = enemy.kbs;
        self.speed = enemy.speed;
        self.attack_1 = enemy.attack_1;
        self.range = enemy.range;
        self.cost = enemy.money_drop / 2;
        self.recharge_time = Frames(0);
        self.collision_start = enemy.collision_start;
        self.collision_width = enemy.collision_width;
        self.target_red = has_targeted_effect;
        self.unused = enemy.unused;
        self.area_attack = enemy.area_attack;
        self.target_floating = has_targeted_effect;
        self.target_black = has_targeted_effect;
        self.target_metal = has_targeted_effect;
        self.target_traitless = has_targeted_effect;
        self.target_angel = has_targeted_effect;
        self.target_alien = has_targeted_effect;
        self.target_zombie = has_targeted_effect;
        self.knockback = enemy.knockback;
        self.freeze = enemy.freeze;
        self.slow = enemy.slow;
        self.crit = enemy.crit;
        self.base_destroyer = enemy.base_destroyer;
        self.wave = enemy.wave;
        self.weaken = enemy.weaken;
        self.strengthen = enemy.strengthen;
        self.is_metal = enemy.metal;
        self.wave_immunity = enemy.wave_immunity;
        self.wave_blocker = enemy.wave_blocker;
        self.knockback_immunity = enemy.knockback_immunity;
        self.freeze_immunity = enemy.freeze_immunity;
        self.slow_immunity = enemy.slow_immunity;
        self.weaken_immunity = enemy.weaken_immunity;
        self.target_witch = has_targeted_effect;
        self.attack_state = enemy.attack_state;
        self.time_before_death = enemy.time_before_death;
        self.attack_2 = enemy.attack_2;
        self.attack_3 = enemy.attack_3;
        self.spawn_anim = enemy.spawn_anim;
        self.soul_anim = enemy.soul_anim;
        self.warp = enemy.warp;
        self.warp_blocker = enemy.warp_blocker;
        self.target_eva = has_targeted_effect;
        self.target_relic = has_targeted_effect;
        self.savage_blow = enemy.savage_blow;
        self.dodge = enemy.dodge;
        self.surge = enemy.surge;
        self.surge_immunity = enemy.surge_immunity;
        self.curse = enemy.curse;
        self.target_aku = has_targeted_effect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_width_round_trip() {
        // A short legacy row extends to full width
        let stats = Stats::from_raw(&[100, 3, 10, 250]);
        let raw = stats.to_raw();
        assert_eq!(raw.len(), STAT_SLOTS);
        assert_eq!(raw[0], 100);
        assert_eq!(raw[3], 250);
        assert_eq!(raw[107], 0);
        assert_eq!(Stats::from_raw(&raw), stats);
    }

    #[test]
    fn test_every_slot_survives_round_trip() {
        // Distinct values per slot expose any index mix-up. Slots that
        // pair with booleans collapse to 0/1 and the two half-frame
        // slots must stay even, so use 0/1 and even values there.
        let mut raw: Vec<i32> = (0..STAT_SLOTS as i32).map(|i| i + 2).collect();
        for &slot in &[
            10, 12, 16, 17, 18, 19, 20, 21, 22, 23, 29, 30, 32, 33, 34, 43, 46, 47, 48,
            49, 50, 51, 52, 53, 54, 56, 63, 64, 65, 68, 69, 75, 76, 77, 78, 79, 80, 81,
            90, 91, 94, 96, 97, 98, 99, 102, 105,
        ] {
            raw[slot] = 1;
        }
        raw[4] = 40;
        raw[7] = 60;
        let stats = Stats::from_raw(&raw);
        assert_eq!(stats.to_raw(), raw);
    }

    #[test]
    fn test_pair_frame_slots() {
        let stats = Stats::from_raw(&[0, 0, 0, 0, 20, 0, 0, 30]);
        assert_eq!(stats.attack_interval, Frames(40));
        assert_eq!(stats.recharge_time, Frames(60));
        let raw = stats.to_raw();
        assert_eq!(raw[4], 20);
        assert_eq!(raw[7], 30);
    }

    #[test]
    fn test_has_targeted_effect() {
        let mut stats = Stats::from_raw(&[]);
        assert!(!stats.has_targeted_effect());
        stats.freeze.prob = Prob::new(30);
        assert!(stats.has_targeted_effect());
    }

    #[test]
    fn test_import_enemy_stats_targets_follow_effects() {
        let enemy = EnemyStats {
            hp: 5000,
            kbs: 2,
            money_drop: 900,
            freeze: Freeze {
                prob: Prob::new(100),
                time: Frames(60),
            },
            ..EnemyStats::default()
        };

        // Receiver without targeted effects: traits stay off
        let mut plain = Stats::from_raw(&[]);
        plain.import_enemy_stats(&enemy);
        assert_eq!(plain.hp, 5000);
        assert_eq!(plain.cost, 450);
        assert!(!plain.target_red);

        // Receiver with a targeted effect: every trait turns on
        let mut targeted = Stats::from_raw(&[]);
        targeted.slow.prob = Prob::new(10);
        targeted.import_enemy_stats(&enemy);
        assert!(targeted.target_red);
        assert!(targeted.target_aku);
        assert_eq!(targeted.freeze.prob.percent, 100);
    }
}
