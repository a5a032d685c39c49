//! Dump decrypted pack contents to a directory tree.

use std::fs;
use std::path::Path;

use crate::Result;
use crate::catalog::GamePacks;
use crate::game_file::GameFile;
use crate::pack_file::PackFile;

impl GameFile {
    /// Write this file into `dir`.
    ///
    /// With `encrypt` set, the content is re-encrypted under the server
    /// key so the output matches what the game's own updater would
    /// download.
    pub fn extract(&self, dir: &Path, encrypt: bool) -> Result<()> {
        let path = dir.join(&self.file_name);
        let data = if encrypt {
            self.encrypt(true, None, None)?
        } else {
            self.dec_data()?.clone()
        };
        fs::write(path, data.as_bytes())?;
        Ok(())
    }
}

impl PackFile {
    /// Extract every entry into `dir/<pack_name>/`.
    pub fn extract(&self, dir: &Path, encrypt: bool) -> Result<()> {
        let pack_dir = dir.join(&self.pack_name);
        fs::create_dir_all(&pack_dir)?;
        for file in self.files() {
            file.extract(&pack_dir, encrypt)?;
        }
        Ok(())
    }
}

impl GamePacks {
    /// Extract every pack into `dir`, one subdirectory per pack.
    pub fn extract(&self, dir: &Path, only_local: bool) -> Result<()> {
        for pack in self.packs() {
            if only_local && PackFile::is_server(&pack.pack_name) {
                continue;
            }
            pack.extract(dir, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bc_data::{CountryCode, Data, GameVersion};

    use super::*;

    #[test]
    fn test_extract_tree() {
        let mut local = PackFile::new("DataLocal", CountryCode::En, GameVersion::new(12, 0, 0));
        local.set_file("a.csv", Data::from("1,2\n"));
        let mut server =
            PackFile::new("DataServer", CountryCode::En, GameVersion::new(12, 0, 0));
        server.set_file("b.csv", Data::from("3,4\n"));
        let packs = GamePacks::new(
            vec![local, server],
            CountryCode::En,
            GameVersion::new(12, 0, 0),
        );

        let dir = tempfile::tempdir().unwrap();
        packs.extract(dir.path(), true).unwrap();
        assert_eq!(
            fs::read(dir.path().join("DataLocal/a.csv")).unwrap(),
            b"1,2\n"
        );
        assert!(!dir.path().join("DataServer").exists());
    }
}
