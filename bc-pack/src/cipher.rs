//! Pack cipher selection.
//!
//! Which cipher a pack uses depends on its kind, the game version and
//! the country:
//! - server packs, pre-8.9.0 clients and forced server mode use the
//!   legacy ECB key
//! - modern local packs use the per-country CBC pair, unless the caller
//!   supplies replacement key material
//! - `ImageDataLocal` ships plaintext; its cipher is a passthrough
//!   except when the caller forces server mode or rewrites the pack
//!   under new key material

use bc_crypto::aes::AesCipher;
use bc_crypto::keys;
use bc_data::{CountryCode, GameVersion};

use crate::Result;
use crate::pack_file::PackFile;

/// First client version whose local packs are CBC-encrypted.
pub const FIRST_CBC_VERSION: GameVersion = GameVersion::new(8, 9, 0);

/// Select the cipher for one pack.
///
/// `key` and `iv` are optional 32-char hex overrides; they only apply to
/// the modern CBC path.
pub fn pack_cipher(
    cc: CountryCode,
    pack_name: &str,
    gv: GameVersion,
    force_server: bool,
    key: Option<&str>,
    iv: Option<&str>,
) -> Result<AesCipher> {
    let has_override = key.is_some() || iv.is_some();
    let enabled =
        !PackFile::is_image_data_local(pack_name) || force_server || has_override;

    if PackFile::is_server(pack_name) || gv < FIRST_CBC_VERSION || force_server {
        if !enabled {
            return Ok(AesCipher::passthrough());
        }
        return Ok(AesCipher::ecb(&keys::server_key()));
    }

    if !enabled {
        return Ok(AesCipher::passthrough());
    }
    let (default_key, default_iv) = keys::country_key_iv(cc);
    let key = keys::parse_key(key.unwrap_or(default_key))?;
    let iv = keys::parse_key(iv.unwrap_or(default_iv))?;
    Ok(AesCipher::cbc(&key, &iv))
}
