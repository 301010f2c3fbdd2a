//! Global bot-property arrays

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One bot as stored in the bots file
///
/// Only `Level` is interpreted; every other property is carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotProperties {
    #[serde(rename = "Level", default)]
    pub level: Option<String>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl BotProperties {
    /// Level this bot lives on, if any
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref().filter(|level| !level.is_empty())
    }
}

/// Decode a serialized array of bots
pub fn decode_bots(json: &str) -> serde_json::Result<Vec<BotProperties>> {
    serde_json::from_str(json)
}

/// Group bots by level
///
/// Bots without a level are dropped. Groups come back in first-seen order and
/// keep input order within each group.
pub fn group_by_level(bots: Vec<BotProperties>) -> Vec<(String, Vec<BotProperties>)> {
    let mut groups: Vec<(String, Vec<BotProperties>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for bot in bots {
        let level = match bot.level() {
            Some(level) => level.to_string(),
            None => continue,
        };

        match index.get(&level) {
            Some(&i) => groups[i].1.push(bot),
            None => {
                index.insert(level.clone(), groups.len());
                groups.push((level, vec![bot]));
            }
        }
    }

    groups
}
