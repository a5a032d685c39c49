//! Country and language enums.
//!
//! The country code is the tenancy key for pack key material and for
//! per-locale resource files. The language set covers every suffix the
//! game uses for language-tagged packs and filenames.

use std::fmt;

/// Regional release of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryCode {
    En,
    Jp,
    Kr,
    Tw,
}

impl CountryCode {
    pub const ALL: [Self; 4] = [Self::En, Self::Jp, Self::Kr, Self::Tw];

    /// Two-letter lowercase country code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Jp => "jp",
            Self::Kr => "kr",
            Self::Tw => "tw",
        }
    }

    /// Country code as used in patch filenames; the JP build uses no tag.
    pub fn patching_code(self) -> &'static str {
        match self {
            Self::Jp => "",
            other => other.code(),
        }
    }

    /// Country code as used in server requests; JP is `ja` there.
    pub fn request_code(self) -> &'static str {
        match self {
            Self::Jp => "ja",
            other => other.code(),
        }
    }

    /// Resource-file language for this region.
    pub fn language(self) -> Language {
        match self {
            Self::En => Language::En,
            Self::Jp => Language::Ja,
            Self::Kr => Language::Ko,
            Self::Tw => Language::Tw,
        }
    }

    /// Parse a two-letter code. Case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|cc| cc.code() == code)
    }

    /// Parse a patching code, where the empty string means JP.
    pub fn from_patching_code(code: &str) -> Option<Self> {
        if code.is_empty() {
            return Some(Self::Jp);
        }
        Self::from_code(code)
    }

    /// Infer the region from an Android package name suffix.
    pub fn from_package_name(package_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cc| package_name.ends_with(cc.code()))
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resource-file language tag.
///
/// Covers both the regional languages and the extra EU languages the EN
/// build ships language-tagged packs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ja,
    Ko,
    Tw,
    De,
    Es,
    Fr,
    It,
    Th,
}

impl Language {
    pub const ALL: [Self; 9] = [
        Self::En,
        Self::Ja,
        Self::Ko,
        Self::Tw,
        Self::De,
        Self::Es,
        Self::Fr,
        Self::It,
        Self::Th,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Tw => "tw",
            Self::De => "de",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Th => "th",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
