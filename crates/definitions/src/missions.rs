use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prerequisites::PrerequisiteGraph;

pub type QuestId = String;
pub type ObjectiveId = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Main,
    Sub,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Pending,
    Offered,
    Active,
    Completed,
    Abandoned,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    Pending,
    Active,
    Completed,
}

/// Kind-specific completion condition of an objective.
///
/// Optional fields widen the match: a `Deliver` without an `npc_id` accepts
/// any recipient NPC, a `UseAbility` without a `blocker_id` accepts any
/// blocker cleared with that ability.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveKind {
    Talk {
        npc_id: String,
    },
    Collect {
        item_id: String,
    },
    Deliver {
        item_id: String,
        npc_id: Option<String>,
        building_id: Option<String>,
    },
    Explore {
        area: String,
    },
    UseAbility {
        ability: String,
        blocker_id: Option<String>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub id: ObjectiveId,
    pub kind: ObjectiveKind,
    pub title: String,
    pub description: String,
    pub required_count: u32,
    pub current_count: u32,
    /// Restricts which controlled character's actions count, if set.
    pub assigned_character: Option<String>,
    /// Objective ids that must be Completed before this one activates.
    /// Empty means the objective activates as soon as the quest does.
    pub prerequisites: Vec<ObjectiveId>,
    pub status: ObjectiveStatus,
}

impl Objective {
    pub fn new(id: impl Into<String>, kind: ObjectiveKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: String::new(),
            description: String::new(),
            required_count: 1,
            current_count: 0,
            assigned_character: None,
            prerequisites: Vec::new(),
            status: ObjectiveStatus::Pending,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_count(mut self, required_count: u32) -> Self {
        self.required_count = required_count;
        self
    }

    pub fn assigned_to(mut self, character: impl Into<String>) -> Self {
        self.assigned_character = Some(character.into());
        self
    }

    pub fn after(mut self, objective_id: impl Into<String>) -> Self {
        self.prerequisites.push(objective_id.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == ObjectiveStatus::Completed
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewards {
    pub money: u32,
    pub experience: u32,
    pub items: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub quest_id: QuestId,
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    /// Declaration order is preserved for display; evaluation is concurrent
    /// unless `prerequisites` gate an objective.
    pub objectives: Vec<Objective>,
    /// NPC ids relevant for dialogue context building.
    pub related_npcs: Vec<String>,
    pub quest_giver_npc: Option<String>,
    pub rewards: Rewards,
    pub status: QuestStatus,
}

impl Quest {
    pub fn new(quest_id: impl Into<String>, quest_type: QuestType) -> Self {
        Self {
            quest_id: quest_id.into(),
            title: String::new(),
            description: String::new(),
            quest_type,
            objectives: Vec::new(),
            related_npcs: Vec::new(),
            quest_giver_npc: None,
            rewards: Rewards::default(),
            status: QuestStatus::Pending,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_related_npc(mut self, npc_id: impl Into<String>) -> Self {
        self.related_npcs.push(npc_id.into());
        self
    }

    pub fn given_by(mut self, npc_id: impl Into<String>) -> Self {
        self.quest_giver_npc = Some(npc_id.into());
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn contains_objective(&self, objective_id: &str) -> bool {
        self.objectives.iter().any(|o| o.id == objective_id)
    }

    pub fn get_objective(&self, objective_id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == objective_id)
    }

    pub fn is_completed(&self) -> bool {
        self.objectives.iter().all(Objective::is_completed)
    }

    /// Pending → Offered. Any other starting status is a no-op.
    pub fn offer(&mut self) -> bool {
        if self.status != QuestStatus::Pending {
            return false;
        }
        self.status = QuestStatus::Offered;
        true
    }

    /// Offered → Active. Activates every objective whose prerequisites are
    /// already satisfied; gated objectives stay Pending until unlocked.
    pub fn accept(&mut self) -> bool {
        if self.status != QuestStatus::Offered {
            return false;
        }
        self.status = QuestStatus::Active;
        self.unlock_ready_objectives();
        true
    }

    /// Active → Abandoned. Any other starting status is a no-op.
    pub fn abandon(&mut self) -> bool {
        if self.status != QuestStatus::Active {
            return false;
        }
        self.status = QuestStatus::Abandoned;
        true
    }

    /// Moves every Pending objective whose prerequisites are all Completed
    /// to Active.
    pub(crate) fn unlock_ready_objectives(&mut self) {
        let completed: Vec<ObjectiveId> = self
            .objectives
            .iter()
            .filter(|o| o.is_completed())
            .map(|o| o.id.clone())
            .collect();
        for objective in &mut self.objectives {
            if objective.status == ObjectiveStatus::Pending
                && objective
                    .prerequisites
                    .iter()
                    .all(|id| completed.contains(id))
            {
                objective.status = ObjectiveStatus::Active;
            }
        }
    }

    /// Validates a Quest to check if it meets all the requirements the engine
    /// relies on before it can be offered.
    pub fn is_valid(&self) -> Result<(), QuestValidationError> {
        if self.objectives.is_empty() {
            return Err(QuestValidationError::NoObjectives);
        }

        for objective in &self.objectives {
            if objective.required_count == 0 {
                return Err(QuestValidationError::ZeroRequiredCount(
                    objective.id.clone(),
                ));
            }

            if self
                .objectives
                .iter()
                .filter(|other| other.id == objective.id)
                .count()
                > 1
            {
                return Err(QuestValidationError::NotUniqueObjectiveId(
                    objective.id.clone(),
                ));
            }

            for prerequisite in &objective.prerequisites {
                if !self.contains_objective(prerequisite) {
                    return Err(QuestValidationError::UnknownPrerequisite {
                        objective: objective.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        // Cycle detection happens while building the DAG
        PrerequisiteGraph::try_from(self)?;

        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuestValidationError {
    /// A quest with nothing to do can never complete
    #[error("Quest has no objectives")]
    NoObjectives,
    /// Required count must be at least 1
    #[error("Objective requires a count of zero - Objective ID: {0}")]
    ZeroRequiredCount(ObjectiveId),
    /// Not unique ID for the objective
    #[error("Objective ID is not unique - Objective ID: {0}")]
    NotUniqueObjectiveId(ObjectiveId),
    /// A prerequisite references an objective that isn't defined
    #[error("Objective {objective} requires undefined objective {prerequisite}")]
    UnknownPrerequisite {
        objective: ObjectiveId,
        prerequisite: ObjectiveId,
    },
    /// The prerequisite relation must be a DAG
    #[error("Prerequisite cycle involving objective {0}")]
    PrerequisiteCycle(ObjectiveId),
}
