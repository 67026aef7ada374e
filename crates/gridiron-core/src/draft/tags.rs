// Operator tags on players (favorites, busts). Display and filtering only.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerTag {
    Favorite,
    Bust,
}

impl PlayerTag {
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fav" | "favorite" | "favourite" => Some(PlayerTag::Favorite),
            "bust" => Some(PlayerTag::Bust),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerTag::Favorite => f.write_str("favorite"),
            PlayerTag::Bust => f.write_str("bust"),
        }
    }
}

/// Tags keyed by player name. Names are stored as given (the canonical
/// record name) and compared case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagBook {
    tags: BTreeMap<PlayerTag, BTreeSet<String>>,
}

impl TagBook {
    pub fn add(&mut self, tag: PlayerTag, name: &str) -> bool {
        if self.has(tag, name) {
            return false;
        }
        self.tags.entry(tag).or_default().insert(name.to_string())
    }

    pub fn remove(&mut self, tag: PlayerTag, name: &str) -> bool {
        let Some(names) = self.tags.get_mut(&tag) else {
            return false;
        };
        let before = names.len();
        names.retain(|n| !n.eq_ignore_ascii_case(name.trim()));
        names.len() != before
    }

    pub fn has(&self, tag: PlayerTag, name: &str) -> bool {
        self.tags
            .get(&tag)
            .is_some_and(|names| names.iter().any(|n| n.eq_ignore_ascii_case(name.trim())))
    }

    pub fn names(&self, tag: PlayerTag) -> impl Iterator<Item = &str> {
        self.tags.get(&tag).into_iter().flatten().map(String::as_str)
    }
}
