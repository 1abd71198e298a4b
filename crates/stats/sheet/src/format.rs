//! On-disk sheet format.
//!
//! ```ron
//! (
//!     stats: [
//!         (name: "strength", value: 3),
//!         (name: "craft", descriptor: "smithing", value: 2),
//!     ],
//!     totals: [
//!         (name: "melee", members: ["strength", "craft:smithing"]),
//!         (name: "attack", members: ["melee", "strength"]),
//!     ],
//! )
//! ```
//!
//! A member reference is a stat key (`name` or `name:descriptor`) or the name
//! of a total declared earlier in the list.

use serde::{Deserialize, Serialize};
use stat_core::{NamedSnapshot, SkillKey};

/// Separator between name and descriptor in a stat reference.
pub const DESCRIPTOR_SEPARATOR: char = ':';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    #[serde(default)]
    pub stats: Vec<NamedSnapshot>,
    #[serde(default)]
    pub totals: Vec<TotalSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSpec {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Parses `name` or `name:descriptor`.
pub fn parse_reference(reference: &str) -> SkillKey {
    match reference.split_once(DESCRIPTOR_SEPARATOR) {
        Some((name, descriptor)) => SkillKey::new(name.trim(), descriptor.trim()),
        None => SkillKey::new(reference.trim(), ""),
    }
}

/// Inverse of [`parse_reference`].
pub fn format_reference(key: &SkillKey) -> String {
    if key.descriptor().is_empty() {
        key.name().to_owned()
    } else {
        format!("{}{}{}", key.name(), DESCRIPTOR_SEPARATOR, key.descriptor())
    }
}
