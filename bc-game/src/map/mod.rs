//! Stage and map records: the stage-id partition table, per-map option
//! rows, stage stats, reward tables, names and restrictions.

pub mod index;
pub mod maps;
pub mod names;
pub mod options;
pub mod restrictions;
pub mod stage;
pub mod stage_data;

pub use index::MapIndexType;
pub use maps::{Map, Maps};
pub use names::{MapNameImage, StageName, StageNameImage, StageNameSet, StageNameSets, StageNames};
pub use options::{MapOption, MapOptions, ResetType};
pub use restrictions::{StageOption, StageOptionSet};
pub use stage::{EnemyRow, Stage, StageStats};
pub use stage_data::{ItemDrop, MapStageData, MapStageDataStage, TimeScoreReward};
