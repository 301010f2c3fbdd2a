//! Legacy layout decoders
//!
//! Pure functions from raw legacy text to records or upgraded text. No I/O
//! happens here; the steps own reading and writing.

pub mod bots;
pub mod duration;
pub mod name_list;
pub mod properties;
pub mod temp_rank;

pub use bots::{decode_bots, group_by_level, BotProperties};
pub use duration::{parse_legacy_duration, upgrade_time_spent, DurationParseError};
pub use name_list::{upgrade_name_list, LINE_ENDING};
pub use properties::merge_property_lines;
pub use temp_rank::{upgrade_temp_rank_line, LegacyTempRank, TempRankEntry};
