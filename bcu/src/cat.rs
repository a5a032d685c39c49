//! Translate bundled units into catalog cat records.

use image::RgbaImage;
use serde_json::Value;
use tracing::warn;

use bc_data::Data;
use bc_game::unit::cats::{AnimType, Cat, Cats, Form, FormType, UnitAnim, punch_upgrade_triangle};
use bc_game::unit::slots::{Frames, Prob, Range};
use bc_game::unit::stats::Stats;
use bc_game::unit::unit_buy::Rarity;
use bc_game::unit::{EvolveText, NyankoPictureBook, Talents, UnitBuy};
use bc_pack::GamePacks;

use crate::Result;
use crate::error::BundleError;
use crate::file::BcuFile;

// --- JSON access helpers shared with the enemy translation ---

pub(crate) fn get_i32(v: &Value, key: &str) -> i32 {
    v.get(key).and_then(Value::as_i64).unwrap_or(0) as i32
}

pub(crate) fn get_flag(v: &Value, key: &str) -> bool {
    match v.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(other) => other.as_i64().unwrap_or(0) != 0,
        None => false,
    }
}

/// Whether a trait with the given id is present.
pub(crate) fn trait_by_id(traits: &Value, id: i64) -> bool {
    traits
        .as_array()
        .is_some_and(|list| {
            list.iter()
                .any(|t| t.get("id").and_then(Value::as_i64) == Some(id))
        })
}

/// Whether an ability bit is set.
pub(crate) fn check_ability(abi: i64, bit: u32) -> bool {
    abi & (1 << bit) != 0
}

/// Numeric field of a named proc, zero when the proc is absent.
pub(crate) fn proc_value(procs: &Value, name: &str, key: &str) -> i32 {
    procs
        .get(name)
        .and_then(|proc| proc.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32
}

pub(crate) fn proc_prob(procs: &Value, name: &str) -> Prob {
    Prob::new(proc_value(procs, name, "prob"))
}

pub(crate) fn proc_time(procs: &Value, name: &str) -> Frames {
    Frames(proc_value(procs, name, "time"))
}

pub(crate) fn proc_level(procs: &Value, name: &str) -> i32 {
    proc_value(procs, name, "lv")
}

pub(crate) fn proc_health(procs: &Value, name: &str) -> i32 {
    proc_value(procs, name, "health")
}

pub(crate) fn proc_mult(procs: &Value, name: &str) -> i32 {
    proc_value(procs, name, "mult")
}

/// Field of the `idx`-th attack in the pool, zero when out of range.
pub(crate) fn attack_value(pool: &Value, idx: usize, key: &str) -> i32 {
    pool.get(idx)
        .and_then(|attack| attack.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32
}

pub(crate) fn attack_flag(pool: &Value, idx: usize, key: &str) -> bool {
    match pool.get(idx).and_then(|attack| attack.get(key)) {
        Some(Value::Bool(b)) => *b,
        Some(other) => other.as_i64().unwrap_or(0) != 0,
        None => false,
    }
}

// --- icon composition ---

/// Deploy icons sit at (9,21) on a 128×128 canvas.
pub fn compose_deploy_icon(raw: &RgbaImage) -> RgbaImage {
    let mut base = RgbaImage::new(128, 128);
    image::imageops::replace(&mut base, raw, 9, 21);
    base
}

/// Display icons are scaled 3.5× onto a 512×128 canvas at (13,1), with
/// the chrome triangle punched transparent.
pub fn compose_upgrade_icon(raw: &RgbaImage) -> RgbaImage {
    let scaled = image::imageops::resize(
        raw,
        (raw.width() as f32 * 3.5) as u32,
        (raw.height() as f32 * 3.5) as u32,
        image::imageops::FilterType::Nearest,
    );
    let mut base = RgbaImage::new(512, 128);
    image::imageops::replace(&mut base, &scaled, 13, 1);
    punch_upgrade_triangle(&mut base);
    base
}

fn decode_png(data: &Data, what: &str) -> Result<RgbaImage> {
    image::load_from_memory(data.as_bytes())
        .map(|img| img.to_rgba8())
        .map_err(|e| BundleError::MalformedEntity(format!("{what}: {e}")))
}

// --- the form itself ---

/// One bundled unit form.
#[derive(Debug, Clone)]
pub struct BcuForm {
    /// Cat id and form the bundle authored this model for, when its
    /// image-cut header carries one.
    pub source: Option<(usize, FormType)>,
    pub form: FormType,
    pub name: String,
    pub description: Vec<String>,
    pub stats: Stats,
    pub sprite: Data,
    pub imgcut: Data,
    pub mamodel: Data,
    /// Animations under their bundle names.
    pub maanims: Vec<(String, Data)>,
    pub upgrade_icon: RgbaImage,
    pub deploy_icon: RgbaImage,
}

impl BcuForm {
    pub fn from_value(form_json: &Value, files: &[BcuFile]) -> Result<Self> {
        let by_name = |name: &str| -> Result<Data> {
            files
                .iter()
                .find(|file| file.name == name)
                .map(|file| file.data.clone())
                .ok_or_else(|| BundleError::MissingFile(name.to_string()))
        };

        let name = form_json
            .pointer("/names/dat/0/val")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let description: Vec<String> = form_json
            .pointer("/description/dat/0/val")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .split("<br>")
            .map(str::to_string)
            .collect();

        let sprite = by_name("sprite.png")?;
        let imgcut = by_name("imgcut.txt")?;
        let mamodel = by_name("mamodel.txt")?;
        let maanims: Vec<(String, Data)> = files
            .iter()
            .filter(|file| file.name.starts_with("maanim"))
            .map(|file| (file.name.clone(), file.data.clone()))
            .collect();

        let upgrade_icon =
            compose_upgrade_icon(&decode_png(&by_name("icon_display.png")?, "icon_display")?);
        let deploy_icon =
            compose_deploy_icon(&decode_png(&by_name("icon_deploy.png")?, "icon_deploy")?);

        let source = source_id_from_imgcut(&imgcut);
        let form = source.map_or(FormType::First, |(_, form)| form);

        let du = form_json
            .get("du")
            .ok_or_else(|| BundleError::MalformedEntity("form has no du block".into()))?;

        Ok(Self {
            source,
            form,
            name,
            description,
            stats: stats_from_du(du),
            sprite,
            imgcut,
            mamodel,
            maanims,
            upgrade_icon,
            deploy_icon,
        })
    }

    /// Turn this form into a catalog form for `cat_id`, renaming the
    /// model files to the game's scheme. Animations whose bundle name
    /// does not identify a known kind are dropped.
    pub fn to_form(&self, cat_id: usize) -> Form {
        let mut maanims = Vec::new();
        for (bundle_name, data) in &self.maanims {
            let Some(anim_type) = AnimType::from_bcu_name(bundle_name) else {
                warn!("unrecognized animation {bundle_name}, dropping");
                continue;
            };
            maanims.push((
                UnitAnim::maanim_name(cat_id, self.form, anim_type),
                data.clone(),
            ));
        }
        Form {
            form: self.form,
            stats: self.stats.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            anim: UnitAnim {
                sprite: self.sprite.clone(),
                imgcut: self.imgcut.clone(),
                mamodel: self.mamodel.clone(),
                maanims,
            },
            upgrade_icon: self.upgrade_icon.clone(),
            deploy_icon: self.deploy_icon.clone(),
        }
    }
}

/// Recover `(cat_id, form)` from the sprite-sheet name inside an
/// image-cut file (`NNN_<form>.png`).
fn source_id_from_imgcut(imgcut: &Data) -> Option<(usize, FormType)> {
    let text = imgcut.to_utf8_lossy();
    let image_name = text
        .lines()
        .map(str::trim)
        .find(|line| line.ends_with(".png"))?;
    let cat_id: usize = image_name.get(..3)?.parse().ok()?;
    let form = FormType::from_code(image_name.get(4..5)?)?;
    Some((cat_id, form))
}

/// Map a bundled unit form's stat block onto the 108-slot layout.
fn stats_from_du(du: &Value) -> Stats {
    let empty = Value::Null;
    let traits = du.get("traits").unwrap_or(&empty);
    let procs = du.pointer("/rep/proc").unwrap_or(&empty);
    let pool = du.pointer("/atks/pool").unwrap_or(&empty);
    let abi = du.get("abi").and_then(Value::as_i64).unwrap_or(0);

    let mut stats = Stats::from_raw(&[]);
    stats.hp = get_i32(du, "hp");
    stats.kbs = get_i32(du, "hb");
    stats.speed = get_i32(du, "speed");
    stats.attack_1.damage = attack_value(pool, 0, "atk");
    stats.attack_interval = Frames(get_i32(du, "tba"));
    stats.range = Range::new(get_i32(du, "range"));
    stats.cost = get_i32(du, "price");
    stats.recharge_time = Frames(get_i32(du, "resp"));
    stats.collision_width = Range::new(get_i32(du, "width"));
    stats.target_red = trait_by_id(traits, 0);
    stats.area_attack = attack_flag(pool, 0, "range");
    stats.z_layers.min = get_i32(du, "front");
    stats.z_layers.max = get_i32(du, "back");
    stats.target_floating = trait_by_id(traits, 1);
    stats.target_black = trait_by_id(traits, 2);
    stats.target_metal = trait_by_id(traits, 3);
    stats.target_traitless = trait_by_id(traits, 9);
    stats.target_angel = trait_by_id(traits, 4);
    stats.target_alien = trait_by_id(traits, 5);
    stats.target_zombie = trait_by_id(traits, 6);
    stats.strong = check_ability(abi, 0);
    stats.knockback.prob = proc_prob(procs, "KB");
    stats.freeze.prob = proc_prob(procs, "STOP");
    stats.freeze.time = proc_time(procs, "STOP");
    stats.slow.prob = proc_prob(procs, "SLOW");
    stats.slow.time = proc_time(procs, "SLOW");
    stats.resistant = check_ability(abi, 1);
    // insane_damage is written from ability bit 2 here and again from
    // bit 16 below; the editor's own exporter does the same and the
    // second write wins.
    stats.insane_damage = check_ability(abi, 2);
    stats.crit.prob = proc_prob(procs, "CRIT");
    stats.attacks_only = check_ability(abi, 3);
    stats.extra_money = proc_mult(procs, "BOUNTY") / 100 != 0;
    stats.base_destroyer = proc_mult(procs, "ATKBASE") / 300 != 0;
    // Wave probability itself is not transferred; the editor's format
    // only surfaces the mini flag and level here.
    stats.wave.is_mini = proc_prob(procs, "WAVE")
        .percent
        .max(proc_prob(procs, "MINIWAVE").percent)
        != 0;
    stats.wave.level = proc_level(procs, "WAVE").max(proc_level(procs, "MINIWAVE"));
    stats.weaken.prob = proc_prob(procs, "WEAK");
    stats.weaken.time = proc_time(procs, "WEAK");
    stats.strengthen.hp_percent = proc_health(procs, "STRONG");
    stats.strengthen.multiplier_percent = proc_mult(procs, "STRONG");
    stats.lethal_strike.prob = proc_prob(procs, "LETHAL");
    stats.is_metal = check_ability(abi, 4);
    stats.attack_1.long_distance_start = Range::new(attack_value(pool, 0, "ld0"));
    stats.attack_1.long_distance_range =
        Range::new(attack_value(pool, 0, "ld1") - attack_value(pool, 0, "ld0"));
    stats.wave_immunity = proc_mult(procs, "IMUWAVE") != 0;
    stats.wave_blocker = check_ability(abi, 5);
    stats.knockback_immunity = proc_mult(procs, "IMUKB") != 0;
    stats.freeze_immunity = proc_mult(procs, "IMUSTOP") != 0;
    stats.slow_immunity = proc_mult(procs, "IMUSLOW") != 0;
    stats.weaken_immunity = proc_mult(procs, "IMUWEAK") != 0;
    stats.zombie_killer = check_ability(abi, 9);
    stats.witch_killer = check_ability(abi, 10);
    // Ability bit 10 doubles as the witch-target flag at this call
    // site; the catalog treats slot 54 as a plain trait.
    stats.target_witch = check_ability(abi, 10);
    stats.attack_state.attacks_before = get_i32(du, "loop");
    stats.attack_state.state_id = if check_ability(abi, 11) { 2 } else { 0 };
    stats.attack_2.damage = attack_value(pool, 1, "atk");
    stats.attack_3.damage = attack_value(pool, 2, "atk");
    stats.attack_1.foreswing = Frames(attack_value(pool, 0, "pre"));
    stats.attack_2.foreswing = Frames(attack_value(pool, 1, "pre"));
    stats.attack_3.foreswing = Frames(attack_value(pool, 2, "pre"));
    stats.attack_2.use_ability = true;
    stats.attack_3.use_ability = true;
    stats.soul_anim.model_id = du
        .pointer("/death/id")
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32;
    stats.barrier_breaker.prob = proc_prob(procs, "BREAK");
    stats.warp.prob = proc_prob(procs, "WARP");
    stats.warp.time = proc_time(procs, "WARP");
    stats.warp.min_distance = proc_value(procs, "WARP", "dis") * 4;
    stats.warp.max_distance = proc_value(procs, "WARP", "dis") * 4;
    stats.warp_blocker = proc_mult(procs, "IMUWARP") != 0;
    stats.target_eva = check_ability(abi, 13);
    stats.eva_killer = check_ability(abi, 13);
    stats.target_relic = trait_by_id(traits, 8);
    stats.curse_immunity = proc_mult(procs, "IMUCURSE") != 0;
    stats.insanely_tough = check_ability(abi, 15);
    stats.insane_damage = check_ability(abi, 16);
    stats.savage_blow.prob = proc_prob(procs, "SATK");
    stats.savage_blow.multiplier = proc_mult(procs, "SATK");
    stats.dodge.prob = proc_prob(procs, "IMUATK");
    stats.dodge.time = proc_time(procs, "IMUATK");
    stats.surge.prob = proc_prob(procs, "VOLC");
    stats.surge.start = Range::new(proc_value(procs, "VOLC", "dis_0"));
    stats.surge.range =
        Range::new(proc_value(procs, "VOLC", "dis_1") - proc_value(procs, "VOLC", "dis_0"));
    stats.surge.level = proc_value(procs, "VOLC", "time") / 20;
    stats.toxic_immunity = proc_mult(procs, "IMUPOIATK") != 0;
    stats.surge_immunity = proc_mult(procs, "IMUVOLC") != 0;
    stats.curse.prob = proc_prob(procs, "CURSE");
    stats.curse.time = proc_time(procs, "CURSE");
    stats.wave.is_mini = proc_prob(procs, "MINIWAVE").percent != 0;
    stats.shield_pierce.prob = proc_prob(procs, "SHIELDBREAK");
    stats.target_aku = trait_by_id(traits, 7);
    stats.colossus_slayer = check_ability(abi, 17);
    stats.soul_strike = check_ability(abi, 18);
    stats.attack_2.long_distance_flag = attack_value(pool, 1, "ld") != 0;
    stats.attack_2.long_distance_start = Range::new(attack_value(pool, 1, "ld0"));
    stats.attack_2.long_distance_range =
        Range::new(attack_value(pool, 1, "ld1") - attack_value(pool, 1, "ld0"));
    stats.attack_3.long_distance_flag = attack_value(pool, 2, "ld") != 0;
    stats.attack_3.long_distance_start = Range::new(attack_value(pool, 2, "ld0"));
    stats.attack_3.long_distance_range =
        Range::new(attack_value(pool, 2, "ld1") - attack_value(pool, 2, "ld0"));
    stats.behemoth_slayer = proc_prob(procs, "BSTHUNT").percent != 0;
    stats.behemoth_dodge.prob = proc_prob(procs, "BSTHUNT");
    stats.behemoth_dodge.time = proc_time(procs, "BSTHUNT");
    stats.attack_1.use_ability = true;
    stats
}

/// One bundled unit.
#[derive(Debug, Clone)]
pub struct BcuCat {
    pub local_id: i32,
    pub rarity: i32,
    pub max_base_level: i32,
    pub max_plus_level: i32,
    pub forms: Vec<BcuForm>,
}

impl BcuCat {
    pub fn from_value<F>(unit: &Value, files_by_dir: &F) -> Result<Self>
    where
        F: Fn(&str) -> Vec<BcuFile>,
    {
        let val = unit.get("val").unwrap_or(unit);
        let forms_json = val
            .get("forms")
            .and_then(Value::as_array)
            .ok_or_else(|| BundleError::MalformedEntity("unit has no forms".into()))?;

        let mut forms = Vec::with_capacity(forms_json.len());
        for form_json in forms_json {
            let anim_id = match form_json.pointer("/anim/id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(BundleError::MalformedEntity(
                        "form has no animation id".into(),
                    ));
                }
            };
            forms.push(BcuForm::from_value(form_json, &files_by_dir(&anim_id))?);
        }

        Ok(Self {
            local_id: val
                .pointer("/id/id")
                .and_then(Value::as_i64)
                .unwrap_or(0) as i32,
            rarity: get_i32(val, "rarity"),
            max_base_level: get_i32(val, "max"),
            max_plus_level: get_i32(val, "maxp"),
            forms,
        })
    }

    /// Build a catalog cat for `cat_id`, inheriting the per-unit rows
    /// the catalog already has for that id.
    pub fn to_cat(&self, packs: &GamePacks, cat_id: usize) -> Cat {
        let unit_buy = UnitBuy::read(packs);
        let talents = Talents::read(packs);
        let picture_book = NyankoPictureBook::read(packs);
        let evolve_text = EvolveText::read(packs);

        let mut buy = unit_buy.units.get(&cat_id).cloned().unwrap_or_default();
        buy.rarity = Rarity::from_index(self.rarity).unwrap_or_else(|| {
            warn!("bundle unit carries unknown rarity {}, using Normal", self.rarity);
            Rarity::Normal
        });
        buy.max_upgrade_level_no_catseye = self.max_base_level;
        buy.max_upgrade_level_catseye = self.max_base_level;
        buy.max_plus_upgrade_level = self.max_plus_level;
        if buy.game_version == -1 {
            buy.game_version = 0;
        }

        let mut book = picture_book.entries.get(&cat_id).cloned().unwrap_or_default();
        book.obtainable = true;

        let mut forms = std::collections::BTreeMap::new();
        for form in &self.forms {
            forms.insert(form.form, form.to_form(cat_id));
        }

        Cat {
            cat_id,
            forms,
            unit_buy: buy,
            talent: talents.talents.get(&(cat_id as i32)).cloned(),
            picture_book: book,
            evolve_text: evolve_text.text.get(&cat_id).cloned().or(Some(Vec::new())),
        }
    }
}

/// Import bundled units into the catalog.
///
/// `assignments` pairs a bundle unit index with the cat id it should
/// land on.
pub fn import_cats(
    bundle: &crate::bundle::BcuBundle,
    packs: &mut GamePacks,
    assignments: &[(usize, usize)],
) -> Result<()> {
    let mut cats = Cats::default();
    for (bundle_index, cat_id) in assignments {
        let bcu_cat = bundle.cats.get(*bundle_index).ok_or_else(|| {
            BundleError::MalformedEntity(format!("bundle has no unit {bundle_index}"))
        })?;
        cats.cats.insert(*cat_id, bcu_cat.to_cat(packs, *cat_id));
    }
    cats.apply(packs)?;
    Ok(())
}
