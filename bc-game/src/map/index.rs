//! Stage-id partitioning.
//!
//! The 32-bit stage id space is partitioned into numeric buckets; the
//! bucket selects the filename templates for a map's stage list, stage
//! names and per-stage CSVs.

use bc_data::{Language, PaddedInt};

/// A stage-id partition. The discriminating marker is the lowest stage
/// id of the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapIndexType {
    Sol,
    RegularEvent,
    Collab,
    Story,
    Extra,
    DojoCatclaw,
    Tower,
    Challenge,
    Uncanny,
    Drink,
    LegendQuest,
    OutbreaksEoc,
    OutbreaksItf,
    OutbreaksCotc,
    Filibuster,
    Gauntlet,
    Enigma,
    CollabGauntlet,
    Behemoth,
}

impl MapIndexType {
    /// All partitions in ascending marker order.
    pub const ALL: [Self; 19] = [
        Self::Sol,
        Self::RegularEvent,
        Self::Collab,
        Self::Story,
        Self::Extra,
        Self::DojoCatclaw,
        Self::Tower,
        Self::Challenge,
        Self::Uncanny,
        Self::Drink,
        Self::LegendQuest,
        Self::OutbreaksEoc,
        Self::OutbreaksItf,
        Self::OutbreaksCotc,
        Self::Filibuster,
        Self::Gauntlet,
        Self::Enigma,
        Self::CollabGauntlet,
        Self::Behemoth,
    ];

    /// Lowest stage id of this partition.
    pub fn marker(self) -> i32 {
        match self {
            Self::Sol => 0,
            Self::RegularEvent => 1000,
            Self::Collab => 2000,
            Self::Story => 3000,
            Self::Extra => 4000,
            Self::DojoCatclaw => 6000,
            Self::Tower => 7000,
            Self::Challenge => 12000,
            Self::Uncanny => 13000,
            Self::Drink => 14000,
            Self::LegendQuest => 16000,
            Self::OutbreaksEoc => 20000,
            Self::OutbreaksItf => 21000,
            Self::OutbreaksCotc => 22000,
            Self::Filibuster => 23000,
            Self::Gauntlet => 24000,
            Self::Enigma => 25000,
            Self::CollabGauntlet => 27000,
            Self::Behemoth => 31000,
        }
    }

    /// Partition containing a stage id: the largest marker ≤ `index`.
    /// Negative ids belong to no partition.
    pub fn from_index(index: i32) -> Option<Self> {
        if index < 0 {
            return None;
        }
        Self::ALL
            .into_iter()
            .rev()
            .find(|partition| partition.marker() <= index)
    }

    /// Code used in `StageName_<code>_<lang>.csv`.
    pub fn stage_name_code(self) -> Option<&'static str> {
        match self {
            Self::Story => Some(""),
            Self::Gauntlet => Some("RA"),
            Self::Drink => Some("RB"),
            Self::Collab => Some("RC"),
            Self::CollabGauntlet => Some("RCA"),
            Self::Extra => Some("RE"),
            Self::Enigma => Some("RH"),
            Self::Challenge => Some("RM"),
            Self::Sol => Some("RN"),
            Self::Uncanny => Some("RNA"),
            Self::Behemoth => Some("RQ"),
            Self::RegularEvent => Some("RS"),
            Self::DojoCatclaw => Some("RT"),
            Self::Tower => Some("RV"),
            _ => None,
        }
    }

    /// Code used in `MapStageData<code>_NNN.csv` and the name-image
    /// templates.
    pub fn map_stage_data_code(self) -> Option<&'static str> {
        match self {
            Self::Story => Some(""),
            Self::Sol => Some("N"),
            Self::RegularEvent => Some("S"),
            Self::Collab => Some("C"),
            Self::Extra => Some("E"),
            Self::DojoCatclaw => Some("T"),
            Self::Tower => Some("V"),
            Self::Challenge => Some("M"),
            Self::Uncanny => Some("A"),
            Self::Drink => Some("B"),
            Self::Gauntlet => Some("RA"),
            Self::Enigma => Some("H"),
            Self::CollabGauntlet => Some("CA"),
            Self::Behemoth => Some("Q"),
            _ => None,
        }
    }

    /// Code used in the per-stage `stage<code>NNN_SS.csv` template.
    pub fn map_name_code(self) -> Option<&'static str> {
        match self {
            Self::Story => Some(""),
            Self::Extra => Some("EX"),
            Self::Gauntlet => Some("RA"),
            Self::Drink => Some("RB"),
            Self::Collab => Some("RC"),
            Self::CollabGauntlet => Some("RCA"),
            Self::Enigma => Some("RH"),
            Self::Challenge => Some("RM"),
            Self::Sol => Some("RN"),
            Self::Uncanny => Some("RNA"),
            Self::Behemoth => Some("RQ"),
            Self::RegularEvent => Some("RS"),
            Self::DojoCatclaw => Some("RT"),
            Self::Tower => Some("RV"),
            _ => None,
        }
    }
}

fn relative_id(stage_id: i32) -> Option<(MapIndexType, String)> {
    let partition = MapIndexType::from_index(stage_id)?;
    let relative = stage_id - partition.marker();
    Some((partition, PaddedInt::new(relative, 3).to_string()))
}

/// `stage<code>NNN_SS.csv`: per-stage stats file.
pub fn stage_csv_name(stage_id: i32, stage_index: usize) -> Option<String> {
    let (partition, relative) = relative_id(stage_id)?;
    let code = partition.map_name_code()?;
    Some(format!(
        "stage{code}{relative}_{}.csv",
        PaddedInt::new(stage_index as i64, 2)
    ))
}

/// `MapStageData<code>_NNN.csv`: per-map stage list.
pub fn map_stage_data_name(stage_id: i32) -> Option<String> {
    let (partition, relative) = relative_id(stage_id)?;
    let code = partition.map_stage_data_code()?;
    Some(format!("MapStageData{code}_{relative}.csv"))
}

/// `StageName_<code>_<lang>.csv`: stage names for a partition.
pub fn stage_name_csv_name(partition: MapIndexType, lang: Language) -> Option<String> {
    let code = partition.stage_name_code()?;
    Some(format!("StageName_{code}_{lang}.csv"))
}

/// `mapsnNNN_SS_<code>_<lang>.png`: stage name image.
pub fn stage_name_image_name(
    stage_id: i32,
    stage_index: usize,
    lang: Language,
) -> Option<String> {
    let (partition, relative) = relative_id(stage_id)?;
    let code = partition.map_stage_data_code()?.to_ascii_lowercase();
    Some(format!(
        "mapsn{relative}_{}_{code}_{lang}.png",
        PaddedInt::new(stage_index as i64, 2)
    ))
}

/// `mapnameNNN_<code>_<lang>.png`: map name image.
pub fn map_name_image_name(stage_id: i32, lang: Language) -> Option<String> {
    let (partition, relative) = relative_id(stage_id)?;
    let code = partition.map_stage_data_code()?.to_ascii_lowercase();
    Some(format!("mapname{relative}_{code}_{lang}.png"))
}
