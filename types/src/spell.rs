use serde::{Deserialize, Serialize};

/// Criteria for unlocking a spell. Meeting any single one suffices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Count of tasks currently marked completed in the active list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_completed: Option<u32>,
    /// Unlocks the moment this exact task id is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_task: Option<String>,
}

/// An unlockable ability. Definitions are catalog data; a wizard only
/// stores the ids it has unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "unlockRequirement")]
    pub unlock: UnlockRequirement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_requirement_wire_shape() {
        let spell = Spell {
            id: "healing".into(),
            name: "Healing Light".into(),
            description: "Mend wounds".into(),
            icon: "✨".into(),
            unlock: UnlockRequirement {
                level: None,
                tasks_completed: Some(5),
                special_task: None,
            },
        };
        let v = serde_json::to_value(&spell).unwrap();
        assert_eq!(v["unlockRequirement"]["tasksCompleted"], 5);
        assert!(v["unlockRequirement"].get("level").is_none());
        assert!(v["unlockRequirement"].get("specialTask").is_none());
    }
}
