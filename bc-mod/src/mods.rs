//! The mod descriptor and application engine.

use bc_data::Data;
use bc_game::localizable::Localizable;
use bc_game::map::{MapOptions, Maps, StageOption};
use bc_game::unit::Cats;
use bc_pack::GamePacks;
use tracing::debug;

use crate::Result;

/// One record-typed modification.
#[derive(Debug, Clone, PartialEq)]
pub enum ModEdit {
    Cats(Cats),
    Maps(Maps),
    MapOptions(MapOptions),
    StageOptions(StageOption),
    Localizable(Localizable),
}

impl ModEdit {
    fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        match self {
            Self::Cats(cats) => cats.apply(packs)?,
            Self::Maps(maps) => maps.apply(packs)?,
            Self::MapOptions(options) => options.apply(packs)?,
            Self::StageOptions(options) => options.apply(packs)?,
            Self::Localizable(strings) => strings.apply(packs)?,
        }
        Ok(())
    }
}

/// A runtime script destined for the injector. Opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPayload {
    pub name: String,
    pub content: Data,
}

/// An audio file to drop into the APK assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub file_name: String,
    pub data: Data,
}

/// A native-library patch record. Opaque here; consumed by the binary
/// patcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibPatch {
    pub architecture: String,
    pub patch: Data,
}

/// A declarative modification bundle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mod {
    pub name: String,
    pub author: String,
    pub description: String,
    /// Record edits, applied in order.
    pub edits: Vec<ModEdit>,
    pub scripts: Vec<ScriptPayload>,
    pub audio: Vec<AudioFile>,
    pub lib_patches: Vec<LibPatch>,
}

impl Mod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Apply this mod's record edits to the catalog, in insertion
    /// order. Auxiliary payloads are not touched here; they flow out
    /// through [`crate::apk::ApkOutputs`].
    pub fn apply(&self, packs: &mut GamePacks) -> Result<()> {
        debug!("applying mod {}: {} edits", self.name, self.edits.len());
        for edit in &self.edits {
            edit.apply(packs)?;
        }
        Ok(())
    }

    /// Apply several mods in sequence. A later mod observes every edit
    /// an earlier one made.
    pub fn apply_all(mods: &[Self], packs: &mut GamePacks) -> Result<()> {
        for r#mod in mods {
            r#mod.apply(packs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bc_data::{CountryCode, GameVersion};
    use bc_pack::PackFile;

    use super::*;

    #[test]
    fn test_ordered_application() {
        let mut pack = PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        pack.set_file("localizable.tsv", Data::from("lang\ten\ntitle\tBase\n"));
        pack.set_modified(false);
        let mut packs =
            GamePacks::new(vec![pack], CountryCode::En, GameVersion::new(12, 0, 0));

        let mut first = Mod::new("first");
        let mut strings = Localizable::default();
        strings.set("title", "First");
        strings.set("first_key", "1");
        first.edits.push(ModEdit::Localizable(strings));

        let mut second = Mod::new("second");
        let mut strings = Localizable::default();
        strings.set("title", "Second");
        second.edits.push(ModEdit::Localizable(strings));

        Mod::apply_all(&[first, second], &mut packs).unwrap();
        let result = Localizable::read(&packs);
        // Later mod wins on the contested key; earlier mod's other edit
        // survives
        assert_eq!(result.get("title"), Some("Second"));
        assert_eq!(result.get("first_key"), Some("1"));
    }
}
