//! The narrow interface to the APK wrapper.
//!
//! The data plane never touches APK unpacking, signing or device
//! tooling. It consumes encrypted `(pack, list)` pairs plus install
//! metadata from an [`ApkSource`], and hands back an [`ApkOutputs`]
//! with the re-emitted packs and the payloads the wrapper routes to
//! the asset folder, script injector and binary patcher.

use bc_data::{CountryCode, Data, GameVersion};
use bc_pack::GamePacks;

use crate::Result;
use crate::mods::{AudioFile, LibPatch, Mod, ScriptPayload};

/// What the core needs from an unpacked APK.
pub trait ApkSource {
    fn country_code(&self) -> CountryCode;

    fn game_version(&self) -> GameVersion;

    /// Replacement key material, when the APK was built with
    /// non-standard keys.
    fn key(&self) -> Option<String> {
        None
    }

    fn iv(&self) -> Option<String> {
        None
    }

    /// Encrypted `(pack_name, list_bytes, pack_bytes)` tuples.
    fn packs_lists(&self) -> bc_pack::Result<Vec<(String, Data, Data)>>;
}

/// Build a catalog from an APK source. Malformed packs are skipped.
pub fn load_catalog(apk: &impl ApkSource) -> Result<GamePacks> {
    let sources = apk.packs_lists()?;
    Ok(GamePacks::from_encrypted_packs(
        sources,
        apk.country_code(),
        apk.game_version(),
        apk.key(),
        apk.iv(),
    ))
}

/// One re-emitted pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOutput {
    pub pack_name: String,
    pub pack_data: Data,
    pub list_data: Data,
}

/// Everything the APK wrapper writes back into the package.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApkOutputs {
    pub packs: Vec<PackOutput>,
    pub audio: Vec<AudioFile>,
    pub scripts: Vec<ScriptPayload>,
    pub lib_patches: Vec<LibPatch>,
}

/// Apply `mods` to the catalog and collect every output the wrapper
/// needs: dirty packs re-encoded, plus the mods' auxiliary payloads in
/// mod order.
pub fn run_mods(
    packs: &mut GamePacks,
    mods: &[Mod],
    key: Option<&str>,
    iv: Option<&str>,
) -> Result<ApkOutputs> {
    Mod::apply_all(mods, packs)?;

    let mut outputs = ApkOutputs::default();
    for (pack_name, pack_data, list_data) in packs.to_packs_lists(key, iv)? {
        outputs.packs.push(PackOutput {
            pack_name,
            pack_data,
            list_data,
        });
    }
    for r#mod in mods {
        outputs.audio.extend(r#mod.audio.iter().cloned());
        outputs.scripts.extend(r#mod.scripts.iter().cloned());
        outputs.lib_patches.extend(r#mod.lib_patches.iter().cloned());
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use bc_game::localizable::Localizable;
    use bc_pack::PackFile;

    use super::*;
    use crate::mods::ModEdit;

    struct MemoryApk {
        packs: Vec<(String, Data, Data)>,
    }

    impl ApkSource for MemoryApk {
        fn country_code(&self) -> CountryCode {
            CountryCode::En
        }

        fn game_version(&self) -> GameVersion {
            GameVersion::new(12, 0, 0)
        }

        fn packs_lists(&self) -> bc_pack::Result<Vec<(String, Data, Data)>> {
            Ok(self.packs.clone())
        }
    }

    fn memory_apk() -> MemoryApk {
        let mut pack =
            PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        pack.set_file("localizable.tsv", Data::from("lang\ten\ntitle\tBase\n"));
        let (pack_data, list_data) = pack.to_pack_list(None, None).unwrap();
        MemoryApk {
            packs: vec![("DataLocal".to_string(), list_data, pack_data)],
        }
    }

    #[test]
    fn test_full_run() {
        let apk = memory_apk();
        let mut packs = load_catalog(&apk).unwrap();

        let mut r#mod = Mod::new("rename");
        let mut strings = Localizable::default();
        strings.set("title", "Modded");
        r#mod.edits.push(ModEdit::Localizable(strings));
        r#mod.audio.push(AudioFile {
            file_name: "snd001.ogg".into(),
            data: Data::from("ogg"),
        });

        let outputs = run_mods(&mut packs, &[r#mod], None, None).unwrap();
        assert_eq!(outputs.packs.len(), 1);
        assert_eq!(outputs.packs[0].pack_name, "DataLocal");
        assert_eq!(outputs.audio.len(), 1);

        // The emitted pack decodes back with the edit in place
        let reread = PackFile::from_encrypted(
            &outputs.packs[0].list_data,
            &outputs.packs[0].pack_data,
            CountryCode::En,
            "DataLocal",
            GameVersion::new(12, 0, 0),
            None,
            None,
        )
        .unwrap();
        let text = reread
            .get_file("localizable.tsv")
            .unwrap()
            .dec_data()
            .unwrap()
            .to_utf8_lossy();
        assert!(text.contains("Modded"));
    }

    #[test]
    fn test_no_edits_no_outputs() {
        let apk = memory_apk();
        let mut packs = load_catalog(&apk).unwrap();
        let outputs = run_mods(&mut packs, &[], None, None).unwrap();
        assert!(outputs.packs.is_empty());
    }
}
