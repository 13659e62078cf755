use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::missions::{Objective, ObjectiveKind, ObjectiveStatus, Quest, QuestId, QuestStatus, Rewards};

/// Emitted by [`Quest::route_event`] when the last objective completes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub quest_id: QuestId,
    pub rewards: Rewards,
}

/// What routing one event did to one quest.
pub enum RouteOutcome {
    /// No objective condition matched; the quest is untouched.
    Ignored,
    /// At least one objective advanced but the quest is still Active.
    Progressed,
    /// Every objective is now Completed.
    Completed(QuestCompletion),
}

/// How many units of progress `event` contributes to an objective with this
/// kind. `None` means the conditions don't match. Every declared condition
/// must match the event exactly; conditions left unspecified accept anything.
fn match_amount(kind: &ObjectiveKind, event: &GameEvent) -> Option<u32> {
    match (kind, event) {
        (
            ObjectiveKind::Talk { npc_id },
            GameEvent::NpcInteraction {
                npc_id: event_npc, ..
            },
        ) if npc_id == event_npc => Some(1),
        (
            ObjectiveKind::Collect { item_id },
            GameEvent::ItemCollected {
                item_id: event_item,
                quantity,
                ..
            },
        ) if item_id == event_item => Some((*quantity).max(1)),
        (
            ObjectiveKind::Deliver {
                item_id,
                npc_id,
                building_id,
            },
            GameEvent::ItemDelivered {
                item_id: event_item,
                npc_id: event_npc,
                building_id: event_building,
                ..
            },
        ) if item_id == event_item
            && optional_matches(npc_id, event_npc)
            && optional_matches(building_id, event_building) =>
        {
            Some(1)
        }
        (
            ObjectiveKind::Explore { area },
            GameEvent::PortalEntered {
                area: event_area, ..
            },
        ) if area == event_area => Some(1),
        (
            ObjectiveKind::UseAbility {
                ability,
                blocker_id,
            },
            GameEvent::AbilityUsed {
                ability: event_ability,
                blocker_id: event_blocker,
                ..
            },
        ) if ability == event_ability && optional_matches(blocker_id, event_blocker) => Some(1),
        _ => None,
    }
}

fn optional_matches(required: &Option<String>, actual: &Option<String>) -> bool {
    match required {
        None => true,
        Some(required) => actual.as_deref() == Some(required.as_str()),
    }
}

impl Objective {
    /// Applies a gameplay event to this objective.
    ///
    /// Only Active objectives advance; Pending (gated) and Completed ones are
    /// no-ops. The count is clamped to `required_count` and the objective
    /// flips to Completed exactly when the cap is reached. Returns whether
    /// this call changed state so the caller knows to re-check the quest.
    pub fn record_progress(&mut self, event: &GameEvent) -> bool {
        if self.status != ObjectiveStatus::Active {
            return false;
        }
        if let Some(required_actor) = &self.assigned_character {
            if event.actor_id() != Some(required_actor.as_str()) {
                return false;
            }
        }
        let Some(amount) = match_amount(&self.kind, event) else {
            return false;
        };

        self.current_count = (self.current_count + amount).min(self.required_count);
        if self.current_count == self.required_count {
            self.status = ObjectiveStatus::Completed;
        }
        true
    }
}

impl Quest {
    /// Forwards an event to every objective and recomputes quest completion.
    ///
    /// Only Active quests route; every matching objective advances
    /// independently (two Collect objectives wanting the same item both
    /// count). A non-matching event is ignored, not an error.
    pub fn route_event(&mut self, event: &GameEvent) -> RouteOutcome {
        if self.status != QuestStatus::Active {
            return RouteOutcome::Ignored;
        }

        let mut changed = false;
        for objective in &mut self.objectives {
            changed |= objective.record_progress(event);
        }
        if !changed {
            return RouteOutcome::Ignored;
        }

        self.unlock_ready_objectives();

        if self.is_completed() {
            self.status = QuestStatus::Completed;
            RouteOutcome::Completed(QuestCompletion {
                quest_id: self.quest_id.clone(),
                rewards: self.rewards.clone(),
            })
        } else {
            RouteOutcome::Progressed
        }
    }
}
