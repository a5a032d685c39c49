//! Three-way record merge.
//!
//! A mod authored against the stock game carries mostly-default fields;
//! blindly applying it to an already-modified catalog would clobber
//! earlier edits with base values. The import therefore compares three
//! views of each record: the base B (fresh catalog), the current state
//! S, and the incoming mod M. Per field, `M != B` means the mod really
//! changed it, so M wins; otherwise the current value S is preserved.

use bc_game::unit::{Cat, Cats, Stats, UnitBuyData};
use bc_game::map::Maps;
use bc_game::localizable::Localizable;
use bc_pack::GamePacks;

use crate::Result;

/// Slot-wise three-way merge of raw integer rows.
pub fn merge_rows(base: &[i32], current: &[i32], incoming: &[i32]) -> Vec<i32> {
    let len = base.len().max(current.len()).max(incoming.len());
    let cell = |row: &[i32], i: usize| row.get(i).copied().unwrap_or(0);
    (0..len)
        .map(|i| {
            if cell(incoming, i) != cell(base, i) {
                cell(incoming, i)
            } else {
                cell(current, i)
            }
        })
        .collect()
}

/// Three-way merge of stat rows.
pub fn merge_stats(base: &Stats, current: &Stats, incoming: &Stats) -> Stats {
    Stats::from_raw(&merge_rows(
        &base.to_raw(),
        &current.to_raw(),
        &incoming.to_raw(),
    ))
}

/// Three-way merge of unitbuy rows.
pub fn merge_unit_buy(
    base: &UnitBuyData,
    current: &UnitBuyData,
    incoming: &UnitBuyData,
) -> UnitBuyData {
    UnitBuyData::from_raw(&merge_rows(
        &base.to_raw(),
        &current.to_raw(),
        &incoming.to_raw(),
    ))
}

/// Whole-value three-way choice for fields without slot structure.
fn pick<T: PartialEq + Clone>(base: Option<&T>, current: Option<&T>, incoming: &T) -> T {
    if base == Some(incoming) {
        current.unwrap_or(incoming).clone()
    } else {
        incoming.clone()
    }
}

fn merge_cat(base: Option<&Cat>, current: Option<&Cat>, incoming: &Cat) -> Cat {
    let mut merged = incoming.clone();
    for (form_type, form) in &mut merged.forms {
        let base_form = base.and_then(|cat| cat.forms.get(form_type));
        let current_form = current.and_then(|cat| cat.forms.get(form_type));
        if let (Some(base_form), Some(current_form)) = (base_form, current_form) {
            form.stats = merge_stats(&base_form.stats, &current_form.stats, &form.stats);
            form.name = pick(
                Some(&base_form.name),
                Some(&current_form.name),
                &form.name,
            );
            form.description = pick(
                Some(&base_form.description),
                Some(&current_form.description),
                &form.description,
            );
            form.anim = pick(Some(&base_form.anim), Some(&current_form.anim), &form.anim);
            form.upgrade_icon = pick(
                Some(&base_form.upgrade_icon),
                Some(&current_form.upgrade_icon),
                &form.upgrade_icon,
            );
            form.deploy_icon = pick(
                Some(&base_form.deploy_icon),
                Some(&current_form.deploy_icon),
                &form.deploy_icon,
            );
        }
    }
    // Forms the incoming mod does not carry but the current state does
    // are kept.
    if let Some(current) = current {
        for (form_type, form) in &current.forms {
            merged
                .forms
                .entry(*form_type)
                .or_insert_with(|| form.clone());
        }
    }
    if let (Some(base), Some(current)) = (base, current) {
        merged.unit_buy = merge_unit_buy(&base.unit_buy, &current.unit_buy, &incoming.unit_buy);
        merged.talent = pick(
            Some(&base.talent),
            Some(&current.talent),
            &incoming.talent,
        );
        merged.picture_book = pick(
            Some(&base.picture_book),
            Some(&current.picture_book),
            &incoming.picture_book,
        );
        merged.evolve_text = pick(
            Some(&base.evolve_text),
            Some(&current.evolve_text),
            &incoming.evolve_text,
        );
    }
    merged
}

/// Import a cat set into `packs` as a delta against `base_packs`.
///
/// Each incoming cat is merged against the base and current views of
/// the same id, then written back.
pub fn import_cats(
    packs: &mut GamePacks,
    base_packs: &GamePacks,
    incoming: &Cats,
) -> Result<()> {
    let ids: Vec<usize> = incoming.cats.keys().copied().collect();
    let base = Cats::read(base_packs, Some(&ids));
    let current = Cats::read(packs, Some(&ids));

    let mut merged = Cats::default();
    for (cat_id, cat) in &incoming.cats {
        merged.cats.insert(
            *cat_id,
            merge_cat(base.cats.get(cat_id), current.cats.get(cat_id), cat),
        );
    }
    merged.apply(packs)?;
    Ok(())
}

/// Import a map set as a delta: an incoming map that differs from base
/// wins over the current state, an unchanged one leaves the current
/// state alone.
pub fn import_maps(
    packs: &mut GamePacks,
    base_packs: &GamePacks,
    incoming: &Maps,
) -> Result<()> {
    let base = Maps::read(base_packs);
    let mut changed = Maps::default();
    for (stage_id, map) in &incoming.maps {
        if base.maps.get(stage_id) != Some(map) {
            changed.maps.insert(*stage_id, map.clone());
        }
    }
    changed.apply(packs)?;
    Ok(())
}

/// Import localized strings as a delta against the base table.
pub fn import_localizable(
    packs: &mut GamePacks,
    base_packs: &GamePacks,
    incoming: &Localizable,
) -> Result<()> {
    let base = Localizable::read(base_packs);
    let mut changed = Localizable::default();
    for (key, value) in &incoming.strings {
        if base.get(key) != Some(value.as_str()) {
            changed.set(key.clone(), value.clone());
        }
    }
    changed.apply(packs)?;
    Ok(())
}
