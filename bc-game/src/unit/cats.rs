//! The cat aggregate: forms, stats, names, animations and icons.

use std::collections::BTreeMap;

use image::RgbaImage;
use image::imageops;
use tracing::debug;

use bc_data::{Data, PaddedInt};
use bc_pack::GamePacks;

use super::evolve_text::EvolveText;
use super::picture_book::{NyankoPictureBook, PictureBookEntry};
use super::stats::Stats;
use super::talents::{Talent, Talents};
use super::unit_buy::{UnitBuy, UnitBuyData};
use crate::Result;
use crate::error::GameError;
use bc_data::csv;

/// Form of a cat. The fourth form is only half-supported by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormType {
    First,
    Second,
    Third,
    Fourth,
}

impl FormType {
    pub const ALL: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Single-letter form tag used in resource filenames.
    pub fn code(self) -> &'static str {
        match self {
            Self::First => "f",
            Self::Second => "c",
            Self::Third => "s",
            Self::Fourth => "u",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|form| form.code() == code)
    }
}

/// Animation kind; the numeric value is the filename suffix index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimType {
    Walk,
    Idle,
    Attack,
    KnockBack,
}

impl AnimType {
    pub const ALL: [Self; 4] = [Self::Walk, Self::Idle, Self::Attack, Self::KnockBack];

    pub fn index(self) -> usize {
        match self {
            Self::Walk => 0,
            Self::Idle => 1,
            Self::Attack => 2,
            Self::KnockBack => 3,
        }
    }

    /// Recognize an animation kind from a foreign editor's maanim file
    /// name.
    pub fn from_bcu_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.contains("walk") {
            Some(Self::Walk)
        } else if name.contains("idle") {
            Some(Self::Idle)
        } else if name.contains("atk") || name.contains("attack") {
            Some(Self::Attack)
        } else if name.contains("kb") || name.contains("knock") {
            Some(Self::KnockBack)
        } else {
            None
        }
    }
}

/// Zero-padded cat id as it appears in filenames.
pub fn cat_id_str(cat_id: usize) -> String {
    PaddedInt::new(cat_id as i64, 3).to_string()
}

/// Model files for one form: sprite sheet, cut table, model and
/// animations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAnim {
    pub sprite: Data,
    pub imgcut: Data,
    pub mamodel: Data,
    /// `(file_name, content)` pairs; names are already canonical.
    pub maanims: Vec<(String, Data)>,
}

impl UnitAnim {
    pub fn sprite_name(cat_id: usize, form: FormType) -> String {
        format!("{}_{}.png", cat_id_str(cat_id), form.code())
    }

    pub fn imgcut_name(cat_id: usize, form: FormType) -> String {
        format!("{}_{}.imgcut", cat_id_str(cat_id), form.code())
    }

    pub fn mamodel_name(cat_id: usize, form: FormType) -> String {
        format!("{}_{}.mamodel", cat_id_str(cat_id), form.code())
    }

    pub fn maanim_name(cat_id: usize, form: FormType, anim: AnimType) -> String {
        format!(
            "{}_{}{}.maanim",
            cat_id_str(cat_id),
            form.code(),
            PaddedInt::new(anim.index() as i64, 2)
        )
    }

    /// Every maanim name a form may carry, including the entry and soul
    /// animations.
    pub fn maanim_names(cat_id: usize, form: FormType) -> Vec<String> {
        let mut names: Vec<String> = AnimType::ALL
            .into_iter()
            .map(|anim| Self::maanim_name(cat_id, form, anim))
            .collect();
        names.push(format!("{}_{}_entry.maanim", cat_id_str(cat_id), form.code()));
        names.push(format!("{}_{}_soul.maanim", cat_id_str(cat_id), form.code()));
        names
    }

    /// Read a form's model files. The sprite, cut table and model are
    /// required; animations are collected as available.
    pub fn read(packs: &GamePacks, cat_id: usize, form: FormType) -> Option<Self> {
        let read = |name: &str| -> Option<Data> {
            packs.find(name).and_then(|f| f.dec_data().ok()).cloned()
        };
        let sprite = read(&Self::sprite_name(cat_id, form))?;
        let imgcut = read(&Self::imgcut_name(cat_id, form))?;
        let mamodel = read(&Self::mamodel_name(cat_id, form))?;
        let maanims = Self::maanim_names(cat_id, form)
            .into_iter()
            .filter_map(|name| read(&name).map(|data| (name, data)))
            .collect();
        Some(Self {
            sprite,
            imgcut,
            mamodel,
            maanims,
        })
    }

    /// Write the model files back under their canonical names.
    pub fn apply(&self, packs: &mut GamePacks, cat_id: usize, form: FormType) -> Result<()> {
        packs.set_file(&Self::sprite_name(cat_id, form), self.sprite.clone())?;
        packs.set_file(&Self::imgcut_name(cat_id, form), self.imgcut.clone())?;
        packs.set_file(&Self::mamodel_name(cat_id, form), self.mamodel.clone())?;
        for (name, data) in &self.maanims {
            packs.set_file(name, data.clone())?;
        }
        Ok(())
    }
}

/// One form of a cat.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub form: FormType,
    pub stats: Stats,
    pub name: String,
    pub description: Vec<String>,
    pub anim: UnitAnim,
    pub upgrade_icon: RgbaImage,
    pub deploy_icon: RgbaImage,
}

impl Form {
    pub fn upgrade_icon_name(cat_id: usize, form: FormType) -> String {
        format!("udi{}_{}.png", cat_id_str(cat_id), form.code())
    }

    pub fn deploy_icon_name(cat_id: usize, form: FormType) -> String {
        format!("uni{}_{}00.png", cat_id_str(cat_id), form.code())
    }

    /// Fit a raw deploy icon onto the 128×128 in-game canvas.
    pub fn format_deploy_icon(&mut self) {
        if self.deploy_icon.width() == 128 && self.deploy_icon.height() == 128 {
            return;
        }
        let mut base = RgbaImage::new(128, 128);
        imageops::replace(&mut base, &self.deploy_icon, 9, 21);
        self.deploy_icon = base;
    }

    /// Fit a raw upgrade icon onto the 512×128 in-game canvas and punch
    /// the triangular chrome area transparent.
    pub fn format_upgrade_icon(&mut self) {
        if self.upgrade_icon.width() == 85 && self.upgrade_icon.height() == 32 {
            let scaled = imageops::resize(
                &self.upgrade_icon,
                (85.0 * 3.5) as u32,
                (32.0 * 3.5) as u32,
                imageops::FilterType::Nearest,
            );
            self.upgrade_icon = scaled;
        }
        let mut base = RgbaImage::new(512, 128);
        imageops::replace(&mut base, &self.upgrade_icon, 13, 1);
        punch_upgrade_triangle(&mut base);
        self.upgrade_icon = base;
    }

    pub fn format_icons(&mut self) {
        self.format_deploy_icon();
        self.format_upgrade_icon();
    }
}

/// Clear the triangular region `(146,112) → (118,70)` that the in-game
/// chrome overlays.
pub fn punch_upgrade_triangle(img: &mut RgbaImage) {
    let start = (146i32, 112i32);
    let end_y = 70i32;
    let mut offset = 0i32;
    let mut width = 311 - start.0;
    for i in 0..(start.1 - end_y) {
        for j in 0..width {
            let x = (start.0 + j + offset) as u32;
            let y = (start.1 - i) as u32;
            if x < img.width() && y < img.height() {
                img.put_pixel(x, y, image::Rgba([0, 0, 0, 0]));
            }
        }
        offset += 1;
        width -= 1;
    }
}

/// A cat: its forms plus the per-unit rows of the collection files.
#[derive(Debug, Clone, PartialEq)]
pub struct Cat {
    pub cat_id: usize,
    pub forms: BTreeMap<FormType, Form>,
    pub unit_buy: UnitBuyData,
    pub talent: Option<Talent>,
    pub picture_book: PictureBookEntry,
    pub evolve_text: Option<Vec<String>>,
}

impl Cat {
    /// Stat filename; ids there are one-based.
    pub fn stat_file_name(cat_id: usize) -> String {
        format!("unit{}.csv", PaddedInt::new(cat_id as i64 + 1, 3))
    }

    /// Name/description filename; ids there are one-based and
    /// unpadded.
    pub fn name_file_name(cat_id: usize, packs: &GamePacks) -> String {
        format!("Unit_Explanation{}_{}.csv", cat_id + 1, packs.language())
    }

    /// Assemble one cat from the catalog.
    ///
    /// The read is tolerant: a form missing its stats row, name row,
    /// model files or icons is skipped without dropping the cat.
    pub fn read(
        packs: &GamePacks,
        cat_id: usize,
        unit_buy: &UnitBuy,
        talents: &Talents,
        picture_book: &NyankoPictureBook,
        evolve_text: &EvolveText,
    ) -> Option<Self> {
        let stat_table = packs.get_csv(&Self::stat_file_name(cat_id))?;
        let name_table = packs.get_csv_localized(&Self::name_file_name(cat_id, packs), true);

        let buy = unit_buy.units.get(&cat_id)?.clone();
        let book = picture_book.entries.get(&cat_id)?.clone();
        let talent = talents.talents.get(&(cat_id as i32)).cloned();
        let text = evolve_text.text.get(&cat_id).cloned();

        let mut forms = BTreeMap::new();
        let total_forms = book.total_forms.max(0) as usize;
        for form in FormType::ALL {
            if forms.len() >= total_forms {
                break;
            }
            let Some(stat_row) = stat_table.get_row(form.index()) else {
                continue;
            };
            let Some(name_row) = name_table.as_ref().and_then(|t| t.get_row(form.index()))
            else {
                continue;
            };
            let Some(name) = name_row.first().cloned() else {
                continue;
            };
            let Some(anim) = UnitAnim::read(packs, cat_id, form) else {
                debug!("cat {cat_id} form {form:?}: model files missing, skipping");
                continue;
            };
            let Some(upgrade_icon) = packs.get_img(&Form::upgrade_icon_name(cat_id, form))
            else {
                continue;
            };
            let Some(deploy_icon) = packs.get_img(&Form::deploy_icon_name(cat_id, form))
            else {
                continue;
            };
            forms.insert(
                form,
                Form {
                    form,
                    stats: Stats::from_raw(&csv::row_ints(stat_row)),
                    name,
                    description: name_row[1..].to_vec(),
                    anim,
                    upgrade_icon,
                    deploy_icon,
                },
            );
        }
        Some(Self {
            cat_id,
            forms,
            unit_buy: buy,
            talent,
            picture_book: book,
            evolve_text: text,
        })
    }

    /// Write the cat's per-form files back. Collection rows are written
    /// by [`Cats::apply`].
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let stat_name = Self::stat_file_name(self.cat_id);
        let name_name = Self::name_file_name(self.cat_id, packs);
        let mut stat_table = packs
            .get_csv(&stat_name)
            .ok_or_else(|| GameError::MissingFile(stat_name.clone()))?;
        let mut name_table = packs
            .get_csv_localized(&name_name, true)
            .ok_or_else(|| GameError::MissingFile(name_name.clone()))?;

        for (form_type, form) in &self.forms {
            stat_table.set_row(form_type.index(), csv::ints_to_row(&form.stats.to_raw()));
            let mut name_row = vec![form.name.clone()];
            name_row.extend(form.description.iter().cloned());
            name_table.set_row(form_type.index(), name_row);
            form.anim.apply(packs, self.cat_id, *form_type)?;
            packs.set_img(
                &Form::upgrade_icon_name(self.cat_id, *form_type),
                &form.upgrade_icon,
            )?;
            packs.set_img(
                &Form::deploy_icon_name(self.cat_id, *form_type),
                &form.deploy_icon,
            )?;
        }
        packs.set_csv(&stat_name, &stat_table)?;
        packs.set_csv(&name_name, &name_table)?;
        Ok(())
    }

    /// Flip obtainability on both files that encode it (the unitbuy
    /// `game_version` sentinel and the picture-book flag always agree).
    pub fn set_obtainable(&mut self, obtainable: bool) {
        self.unit_buy.set_obtainable(obtainable);
        self.picture_book.set_obtainable(obtainable);
    }

    pub fn is_obtainable(&self) -> bool {
        self.unit_buy.is_obtainable() && self.picture_book.is_obtainable()
    }
}

/// A set of cats read from (or destined for) one catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cats {
    pub cats: BTreeMap<usize, Cat>,
}

impl Cats {
    /// Read cats from the catalog. With `cat_ids` unset, every id the
    /// picture book knows is tried; unreadable cats are skipped.
    pub fn read(packs: &GamePacks, cat_ids: Option<&[usize]>) -> Self {
        let unit_buy = UnitBuy::read(packs);
        let talents = Talents::read(packs);
        let picture_book = NyankoPictureBook::read(packs);
        let evolve_text = EvolveText::read(packs);

        let ids: Vec<usize> = match cat_ids {
            Some(ids) => ids.to_vec(),
            None => (0..picture_book.entries.len()).collect(),
        };
        let mut cats = BTreeMap::new();
        for cat_id in ids {
            if let Some(cat) = Cat::read(
                packs,
                cat_id,
                &unit_buy,
                &talents,
                &picture_book,
                &evolve_text,
            ) {
                cats.insert(cat_id, cat);
            }
        }
        Self { cats }
    }

    /// Combine with a base set; cats on `self` win.
    pub fn merge(&mut self, other: &Self) {
        for (cat_id, cat) in &other.cats {
            self.cats.entry(*cat_id).or_insert_with(|| cat.clone());
        }
    }

    /// Write every cat and rebuild the collection rows they own.
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        let mut unit_buy = UnitBuy::default();
        let mut talents = Talents::default();
        let mut picture_book = NyankoPictureBook::default();
        let mut evolve_text = EvolveText::default();
        for cat in self.cats.values() {
            cat.apply(packs)?;
            unit_buy.units.insert(cat.cat_id, cat.unit_buy.clone());
            if let Some(talent) = &cat.talent {
                talents.talents.insert(talent.cat_id, talent.clone());
            }
            picture_book
                .entries
                .insert(cat.cat_id, cat.picture_book.clone());
            evolve_text
                .text
                .insert(cat.cat_id, cat.evolve_text.clone().unwrap_or_default());
        }
        unit_buy.apply(packs)?;
        talents.apply(packs)?;
        picture_book.apply(packs)?;
        evolve_text.apply(packs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bc_data::{CountryCode, GameVersion};
    use bc_pack::PackFile;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Data {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        Data::new(buf)
    }

    fn one_cat_catalog() -> GamePacks {
        const CC: CountryCode = CountryCode::En;
        const GV: GameVersion = GameVersion::new(12, 0, 0);
        let mut data = PackFile::new("DataLocal", CC, GV);
        data.set_file("unit001.csv", Data::from("100,3,10,250\n200,3,10,250\n"));
        data.set_file(
            "Unit_Explanation1_en.csv",
            Data::from("Cat,desc line\nTank Cat,tank desc\n"),
        );
        data.set_file("unitbuy.csv", Data::from("0,150\n"));
        data.set_file("nyankoPictureBookData.csv", Data::from("1,0,2,0,100,100,100,100\n"));
        data.set_file("unitevolve_en.csv", Data::from("evolve text\n"));
        data.set_file("SkillAcquisition.csv", Data::from("header\n0,1,2\n"));

        let mut image_data = PackFile::new("ImageDataLocal", CC, GV);
        for form in ["f", "c"] {
            image_data.set_file(&format!("000_{form}.png"), png_bytes(8, 8));
            image_data.set_file(&format!("000_{form}.imgcut"), Data::from("imgcut"));
            image_data.set_file(&format!("000_{form}.mamodel"), Data::from("mamodel"));
            image_data.set_file(&format!("000_{form}00.maanim"), Data::from("walk"));
        }

        let mut image = PackFile::new("ImageLocal", CC, GV);
        for form in ["f", "c"] {
            image.set_file(&format!("udi000_{form}.png"), png_bytes(512, 128));
            image.set_file(&format!("uni000_{form}00.png"), png_bytes(128, 128));
        }

        for pack in [&mut data, &mut image_data, &mut image] {
            pack.set_modified(false);
        }
        GamePacks::new(vec![data, image_data, image], CC, GV)
    }

    #[test]
    fn test_read_one_cat() {
        let packs = one_cat_catalog();
        let cats = Cats::read(&packs, None);
        assert_eq!(cats.cats.len(), 1);
        let cat = &cats.cats[&0];
        assert_eq!(cat.forms.len(), 2);
        let first = &cat.forms[&FormType::First];
        assert_eq!(first.stats.hp, 100);
        assert_eq!(first.name, "Cat");
        assert_eq!(first.description, vec!["desc line"]);
        assert_eq!(cat.unit_buy.purchase_cost, 150);
        assert_eq!(cat.talent.as_ref().unwrap().raw, vec![1, 2]);
        assert_eq!(cat.evolve_text.as_ref().unwrap(), &vec!["evolve text"]);
    }

    #[test]
    fn test_edit_hp_round_trips() {
        let mut packs = one_cat_catalog();
        let mut cats = Cats::read(&packs, None);
        cats.cats
            .get_mut(&0)
            .unwrap()
            .forms
            .get_mut(&FormType::First)
            .unwrap()
            .stats
            .hp = 9999;
        cats.apply(&mut packs).unwrap();

        let reread = Cats::read(&packs, None);
        let stats = &reread.cats[&0].forms[&FormType::First].stats;
        assert_eq!(stats.hp, 9999);
        // The edited row is emitted at canonical width
        let table = packs.get_csv(&Cat::stat_file_name(0)).unwrap();
        assert_eq!(table.get_row(0).unwrap().len(), super::super::stats::STAT_SLOTS);
        // The untouched second form keeps its values
        assert_eq!(reread.cats[&0].forms[&FormType::Second].stats.hp, 200);
    }

    #[test]
    fn test_missing_icon_skips_form_not_cat() {
        let mut packs = one_cat_catalog();
        // Clobber the second form's deploy icon with undecodable bytes
        packs
            .set_file("uni000_c00.png", Data::from("not a png"))
            .unwrap();
        let cats = Cats::read(&packs, None);
        let cat = &cats.cats[&0];
        assert_eq!(cat.forms.len(), 1);
        assert!(cat.forms.contains_key(&FormType::First));
    }

    #[test]
    fn test_obtainability_link() {
        let packs = one_cat_catalog();
        let mut cats = Cats::read(&packs, None);
        let cat = cats.cats.get_mut(&0).unwrap();
        assert!(cat.is_obtainable());
        cat.set_obtainable(false);
        assert!(!cat.unit_buy.is_obtainable());
        assert!(!cat.picture_book.is_obtainable());
        assert_eq!(cat.unit_buy.game_version, -1);
        cat.set_obtainable(true);
        assert!(cat.is_obtainable());
    }

    #[test]
    fn test_form_type_codes() {
        assert_eq!(FormType::from_index(0), Some(FormType::First));
        assert_eq!(FormType::from_index(3), Some(FormType::Fourth));
        assert_eq!(FormType::from_index(4), None);
        assert_eq!(FormType::from_code("s"), Some(FormType::Third));
        assert_eq!(FormType::from_code("x"), None);
    }

    #[test]
    fn test_anim_names() {
        assert_eq!(UnitAnim::sprite_name(43, FormType::Second), "043_c.png");
        assert_eq!(
            UnitAnim::maanim_name(7, FormType::First, AnimType::Attack),
            "007_f02.maanim"
        );
        let names = UnitAnim::maanim_names(0, FormType::First);
        assert!(names.contains(&"000_f00.maanim".to_string()));
        assert!(names.contains(&"000_f_entry.maanim".to_string()));
        assert!(names.contains(&"000_f_soul.maanim".to_string()));
    }

    #[test]
    fn test_icon_formatting() {
        let mut form = Form {
            form: FormType::First,
            stats: Stats::from_raw(&[]),
            name: String::new(),
            description: Vec::new(),
            anim: UnitAnim {
                sprite: Data::empty(),
                imgcut: Data::empty(),
                mamodel: Data::empty(),
                maanims: Vec::new(),
            },
            upgrade_icon: RgbaImage::from_pixel(85, 32, image::Rgba([9, 9, 9, 255])),
            deploy_icon: RgbaImage::from_pixel(110, 85, image::Rgba([9, 9, 9, 255])),
        };
        form.format_icons();
        assert_eq!(form.deploy_icon.dimensions(), (128, 128));
        assert_eq!(form.upgrade_icon.dimensions(), (512, 128));
        // The punched chrome triangle is transparent
        assert_eq!(form.upgrade_icon.get_pixel(150, 112).0[3], 0);
        // A pixel inside the pasted icon area is opaque
        assert_eq!(form.upgrade_icon.get_pixel(20, 10).0[3], 255);
    }
}
