use std::collections::HashMap;

use missions_definitions::missions::{ObjectiveStatus, Quest, QuestStatus};
use serde::{Deserialize, Serialize};

/// Persisted progress shape. Definitions are not stored; the snapshot is
/// applied back onto the registered quest catalog, so a quest missing here is
/// simply "not yet offered" and a stored quest missing from the catalog is
/// skipped on restore.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub completed: Vec<String>,
    pub active_main: Option<String>,
    pub active_subs: Vec<String>,
    pub quests: HashMap<String, QuestProgress>,
}

impl Snapshot {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    pub status: QuestStatus,
    #[serde(default)]
    pub objectives: Vec<ObjectiveProgress>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveProgress {
    pub id: String,
    pub current_count: u32,
    pub status: ObjectiveStatus,
}

impl QuestProgress {
    pub fn capture(quest: &Quest) -> Self {
        Self {
            status: quest.status,
            objectives: quest
                .objectives
                .iter()
                .map(|objective| ObjectiveProgress {
                    id: objective.id.clone(),
                    current_count: objective.current_count,
                    status: objective.status,
                })
                .collect(),
        }
    }

    /// Restores saved counts and statuses onto a quest definition. Saved
    /// objectives unknown to the definition are ignored; counts are clamped
    /// so a stale save can't overshoot a lowered `required_count`.
    pub fn apply_to(&self, quest: &mut Quest) {
        quest.status = self.status;
        for saved in &self.objectives {
            if let Some(objective) = quest
                .objectives
                .iter_mut()
                .find(|objective| objective.id == saved.id)
            {
                objective.current_count = saved.current_count.min(objective.required_count);
                objective.status = saved.status;
            }
        }
    }
}
