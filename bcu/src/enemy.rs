//! Translate bundled enemies into enemy stat records.

use serde_json::Value;

use bc_data::Data;
use bc_game::unit::EnemyStats;
use bc_game::unit::enemy::Enemy;
use bc_game::unit::slots::{Frames, Range};

use crate::Result;
use crate::cat::{
    attack_value, check_ability, get_flag, get_i32, proc_health, proc_level, proc_mult,
    proc_prob, proc_time, proc_value, trait_by_id,
};
use crate::error::BundleError;
use crate::file::BcuFile;

/// One bundled enemy.
#[derive(Debug, Clone)]
pub struct BcuEnemy {
    pub local_id: i32,
    pub name: String,
    pub description: Vec<String>,
    pub stats: EnemyStats,
    pub sprite: Option<Data>,
    pub imgcut: Option<Data>,
    pub mamodel: Option<Data>,
    pub maanims: Vec<(String, Data)>,
}

impl BcuEnemy {
    pub fn from_value<F>(enemy: &Value, files_by_dir: &F) -> Result<Self>
    where
        F: Fn(&str) -> Vec<BcuFile>,
    {
        let anim_id = match enemy.pointer("/anim/id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(BundleError::MalformedEntity(
                    "enemy has no animation id".into(),
                ));
            }
        };
        let files = files_by_dir(&anim_id);
        let by_name = |name: &str| -> Option<Data> {
            files
                .iter()
                .find(|file| file.name == name)
                .map(|file| file.data.clone())
        };

        let de = enemy
            .get("de")
            .ok_or_else(|| BundleError::MalformedEntity("enemy has no de block".into()))?;

        Ok(Self {
            local_id: enemy
                .pointer("/id/id")
                .and_then(Value::as_i64)
                .unwrap_or(0) as i32,
            name: enemy
                .pointer("/names/dat/0/val")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            description: enemy
                .pointer("/description/dat/0/val")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .split("<br>")
                .map(str::to_string)
                .collect(),
            stats: stats_from_de(de),
            sprite: by_name("sprite.png"),
            imgcut: by_name("imgcut.txt"),
            mamodel: by_name("mamodel.txt"),
            maanims: files
                .iter()
                .filter(|file| file.name.starts_with("maanim"))
                .map(|file| (file.name.clone(), file.data.clone()))
                .collect(),
        })
    }

    /// Materialize as an enemy entity.
    pub fn to_enemy(&self, enemy_id: i32) -> Enemy {
        Enemy {
            enemy_id,
            name: self.name.clone(),
            description: self.description.clone(),
            stats: self.stats.clone(),
        }
    }
}

/// Map a bundled enemy's stat block onto the enemy record.
fn stats_from_de(de: &Value) -> EnemyStats {
    let empty = Value::Null;
    let traits = de.get("traits").unwrap_or(&empty);
    let procs = de.pointer("/rep/proc").unwrap_or(&empty);
    let pool = de.pointer("/atks/pool").unwrap_or(&empty);
    let abi = de.get("abi").and_then(Value::as_i64).unwrap_or(0);

    let mut stats = EnemyStats::default();
    stats.hp = get_i32(de, "hp");
    stats.kbs = get_i32(de, "hb");
    stats.speed = get_i32(de, "speed");
    stats.attack_1.damage = attack_value(pool, 0, "atk");
    stats.attack_interval = Frames(get_i32(de, "tba"));
    stats.range = Range::new(get_i32(de, "range"));
    stats.money_drop = get_i32(de, "drop");
    stats.collision_width = Range::new(get_i32(de, "width"));
    stats.red = trait_by_id(traits, 0);
    stats.area_attack = crate::cat::attack_flag(pool, 0, "range");
    stats.floating = trait_by_id(traits, 1);
    stats.black = trait_by_id(traits, 2);
    stats.metal = trait_by_id(traits, 3);
    stats.traitless = trait_by_id(traits, 9);
    stats.angel = trait_by_id(traits, 4);
    stats.alien = trait_by_id(traits, 5);
    stats.zombie = trait_by_id(traits, 6);
    stats.knockback.prob = proc_prob(procs, "KB");
    stats.freeze.prob = proc_prob(procs, "STOP");
    stats.freeze.time = proc_time(procs, "STOP");
    stats.slow.prob = proc_prob(procs, "SLOW");
    stats.slow.time = proc_time(procs, "SLOW");
    stats.crit.prob = proc_prob(procs, "CRIT");
    stats.base_destroyer = proc_mult(procs, "ATKBASE") / 300 != 0;
    stats.wave.is_mini = proc_prob(procs, "WAVE")
        .percent
        .max(proc_prob(procs, "MINIWAVE").percent)
        != 0;
    stats.wave.level = proc_level(procs, "WAVE").max(proc_level(procs, "MINIWAVE"));
    stats.weaken.prob = proc_prob(procs, "WEAK");
    stats.weaken.time = proc_time(procs, "WEAK");
    stats.strengthen.hp_percent = proc_health(procs, "STRONG");
    stats.strengthen.multiplier_percent = proc_mult(procs, "STRONG");
    stats.survive_lethal_strike.prob = proc_prob(procs, "LETHAL");
    stats.attack_1.long_distance_start = Range::new(attack_value(pool, 0, "ld0"));
    stats.attack_1.long_distance_range =
        Range::new(attack_value(pool, 0, "ld1") - attack_value(pool, 0, "ld0"));
    stats.wave_immunity = proc_mult(procs, "IMUWAVE") != 0;
    stats.wave_blocker = check_ability(abi, 5);
    stats.knockback_immunity = proc_mult(procs, "IMUKB") != 0;
    stats.freeze_immunity = proc_mult(procs, "IMUSTOP") != 0;
    stats.slow_immunity = proc_mult(procs, "IMUSLOW") != 0;
    stats.weaken_immunity = proc_mult(procs, "IMUWEAK") != 0;
    stats.burrow.count = proc_value(procs, "BURROW", "count");
    stats.burrow.distance = proc_value(procs, "BURROW", "dis") * 4;
    stats.revive.count = proc_value(procs, "REVIVE", "count");
    stats.revive.time = proc_time(procs, "REVIVE");
    stats.revive.hp_remain_percent = proc_health(procs, "REVIVE");
    stats.witch = trait_by_id(traits, 10);
    stats.base = trait_by_id(traits, 14);
    stats.attack_state.attacks_before = get_i32(de, "loop");
    stats.attack_state.state_id = if check_ability(abi, 11) { 2 } else { 0 };
    stats.attack_2.damage = attack_value(pool, 1, "atk");
    stats.attack_3.damage = attack_value(pool, 2, "atk");
    stats.attack_1.foreswing = Frames(attack_value(pool, 0, "pre"));
    stats.attack_2.foreswing = Frames(attack_value(pool, 1, "pre"));
    stats.attack_3.foreswing = Frames(attack_value(pool, 2, "pre"));
    stats.attack_2.use_ability = true;
    stats.attack_3.use_ability = true;
    stats.soul_anim.model_id = de
        .pointer("/death/id")
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32;
    stats.barrier.hp = proc_health(procs, "BARRIER");
    stats.warp.prob = proc_prob(procs, "WARP");
    stats.warp.time = proc_time(procs, "WARP");
    stats.warp.min_distance = proc_value(procs, "WARP", "dis") * 4;
    stats.warp.max_distance = proc_value(procs, "WARP", "dis") * 4;
    stats.starred_alien = get_flag(de, "star");
    stats.warp_blocker = proc_mult(procs, "IMUWARP") != 0;
    // Trait id 10 feeds both the witch flag above and eva_angel here;
    // the editor's exporter conflates them and this mirrors it.
    stats.eva_angel = trait_by_id(traits, 10);
    stats.relic = trait_by_id(traits, 8);
    stats.curse.prob = proc_prob(procs, "CURSE");
    stats.curse.time = proc_time(procs, "CURSE");
    stats.surge.prob = proc_prob(procs, "VOLC");
    stats.savage_blow.prob = proc_prob(procs, "SATK");
    stats.savage_blow.multiplier = proc_mult(procs, "SATK");
    stats.dodge.prob = proc_prob(procs, "IMUATK");
    stats.dodge.time = proc_time(procs, "IMUATK");
    stats.toxic.prob = proc_prob(procs, "POIATK");
    stats.toxic.hp_percent = proc_mult(procs, "POIATK");
    stats.surge.start = Range::new(proc_value(procs, "VOLC", "dis_0"));
    stats.surge.range =
        Range::new(proc_value(procs, "VOLC", "dis_1") - proc_value(procs, "VOLC", "dis_0"));
    stats.surge.level = proc_value(procs, "VOLC", "time") / 20;
    stats.surge_immunity = proc_mult(procs, "IMUVOLC") != 0;
    stats.wave.is_mini = proc_prob(procs, "MINIWAVE").percent != 0;
    stats.shield.hp = proc_health(procs, "SHIELD");
    stats.shield.percent_heal_kb = proc_value(procs, "SHIELD", "regen");
    stats.death_surge.prob = proc_prob(procs, "DEATHSURGE");
    stats.death_surge.start = Range::new(proc_value(procs, "DEATHSURGE", "dis_0"));
    stats.death_surge.range = Range::new(
        proc_value(procs, "DEATHSURGE", "dis_1") - proc_value(procs, "DEATHSURGE", "dis_0"),
    );
    stats.death_surge.level = proc_value(procs, "DEATHSURGE", "time") / 20;
    stats.aku = trait_by_id(traits, 7);
    stats.baron = trait_by_id(traits, 12);
    stats.attack_2.long_distance_flag =
        attack_value(pool, 1, "ld0") != 0 || attack_value(pool, 1, "ld1") != 0;
    stats.attack_2.long_distance_start = Range::new(attack_value(pool, 1, "ld0"));
    stats.attack_2.long_distance_range =
        Range::new(attack_value(pool, 1, "ld1") - attack_value(pool, 1, "ld0"));
    stats.attack_3.long_distance_flag =
        attack_value(pool, 2, "ld0") != 0 || attack_value(pool, 2, "ld1") != 0;
    stats.attack_3.long_distance_start = Range::new(attack_value(pool, 2, "ld0"));
    stats.attack_3.long_distance_range =
        Range::new(attack_value(pool, 2, "ld1") - attack_value(pool, 2, "ld0"));
    stats.behemoth = trait_by_id(traits, 13);
    stats
}
