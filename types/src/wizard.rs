use serde::{Deserialize, Serialize};

use crate::goal::Goal;

/// A player character: identity, progression track, resource pools, and
/// per-profile goal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wizard {
    pub name: String,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    pub mana: u32,
    pub max_mana: u32,
    pub mind: u32,
    pub max_mind: u32,
    /// Ids of unlocked spells, in unlock order. Never shrinks.
    pub spells: Vec<String>,
    /// Claim-state overrides for builtin goals plus full records of custom
    /// goals. Builtin goal definitions live in the catalog, not here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<Goal>,
}

impl Wizard {
    /// Starting stats for a freshly created profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            experience: 0,
            experience_to_next: 100,
            mana: 10,
            max_mana: 10,
            mind: 10,
            max_mind: 10,
            spells: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Whether the given spell id has been unlocked.
    pub fn has_spell(&self, id: &str) -> bool {
        self.spells.iter().any(|s| s == id)
    }
}
