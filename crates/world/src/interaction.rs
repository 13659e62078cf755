use missions_definitions::events::GameEvent;
use missions_engine::manager::MissionManager;

use crate::entities::{Actor, InteractionTarget, WorldEntity};
use crate::grid::SpatialGrid;

/// Result of a single interaction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// No entity with that id exists in the grid.
    NotFound,
    /// The entity exists but is farther than the interaction range.
    OutOfRange,
    /// The target is an ability blocker the actor cannot clear.
    MissingAbility { required: String },
    /// A delivery was attempted while carrying nothing.
    NotCarrying,
    /// The interaction produced exactly one event and it was routed.
    Triggered {
        event: GameEvent,
        quests_progressed: usize,
    },
}

/// Resolves discrete world interactions into mission events.
///
/// Each successful interaction emits exactly one [`GameEvent`] and routes it
/// through the manager exactly once. Holding a key or standing next to an
/// entity never re-triggers; callers invoke [`InteractionSystem::interact`]
/// on the discrete press.
pub struct InteractionSystem {
    range: f32,
}

impl InteractionSystem {
    pub fn new(range: f32) -> Self {
        Self { range }
    }

    /// The closest entity the actor could currently interact with.
    pub fn nearest_interactable<'g>(
        &self,
        grid: &'g SpatialGrid,
        actor: &Actor,
    ) -> Option<&'g WorldEntity> {
        grid.nearest_within(actor.position, self.range)
    }

    /// Performs the default interaction with `entity_id`.
    ///
    /// NPCs emit a talk event, items are picked up and removed from the
    /// world, building entrances emit an area-entered event, and ability
    /// blockers emit a use-ability event only when the actor owns the
    /// required ability.
    pub fn interact(
        &self,
        grid: &mut SpatialGrid,
        manager: &mut MissionManager,
        actor: &Actor,
        entity_id: &str,
    ) -> InteractionOutcome {
        let Some(entity) = grid.get(entity_id) else {
            return InteractionOutcome::NotFound;
        };
        if entity.position.distance_to(actor.position) > self.range {
            return InteractionOutcome::OutOfRange;
        }

        let event = match &entity.target {
            InteractionTarget::Npc { npc_id, .. } => GameEvent::NpcInteraction {
                npc_id: npc_id.clone(),
                actor_id: Some(actor.id.clone()),
            },
            InteractionTarget::Item { item_id, quantity } => GameEvent::ItemCollected {
                item_id: item_id.clone(),
                quantity: *quantity,
                actor_id: Some(actor.id.clone()),
            },
            InteractionTarget::Building { building_id, .. } => GameEvent::PortalEntered {
                area: building_id.clone(),
                actor_id: Some(actor.id.clone()),
            },
            InteractionTarget::AbilityBlocker {
                blocker_id,
                required_ability,
            } => {
                if !actor.has_ability(required_ability) {
                    return InteractionOutcome::MissingAbility {
                        required: required_ability.clone(),
                    };
                }
                GameEvent::AbilityUsed {
                    ability: required_ability.clone(),
                    blocker_id: Some(blocker_id.clone()),
                    actor_id: Some(actor.id.clone()),
                }
            }
        };

        // Picked-up items and cleared blockers leave the world.
        let consumed = matches!(
            entity.target,
            InteractionTarget::Item { .. } | InteractionTarget::AbilityBlocker { .. }
        );
        if consumed {
            grid.remove(entity_id);
        }
        log::debug!(
            "InteractionSystem > interact > {} emitted {}",
            entity_id,
            event.event_type()
        );

        let quests_progressed = manager.route_progress_event(&event);
        InteractionOutcome::Triggered {
            event,
            quests_progressed,
        }
    }

    /// Hands the actor's carried item to an NPC or building.
    ///
    /// Delivery is explicit rather than the default interaction so that
    /// talking to an NPC while carrying a parcel does not silently consume it.
    pub fn deliver(
        &self,
        grid: &SpatialGrid,
        manager: &mut MissionManager,
        actor: &mut Actor,
        entity_id: &str,
    ) -> InteractionOutcome {
        let Some(entity) = grid.get(entity_id) else {
            return InteractionOutcome::NotFound;
        };
        if entity.position.distance_to(actor.position) > self.range {
            return InteractionOutcome::OutOfRange;
        }
        let (npc_id, building_id) = match &entity.target {
            InteractionTarget::Npc { npc_id, .. } => (Some(npc_id.clone()), None),
            InteractionTarget::Building { building_id, .. } => (None, Some(building_id.clone())),
            _ => return InteractionOutcome::NotFound,
        };
        let Some(item_id) = actor.carried_item.take() else {
            return InteractionOutcome::NotCarrying;
        };

        let event = GameEvent::ItemDelivered {
            item_id,
            npc_id,
            building_id,
            actor_id: Some(actor.id.clone()),
        };
        log::debug!(
            "InteractionSystem > deliver > {} received {}",
            entity_id,
            event.event_type()
        );
        let quests_progressed = manager.route_progress_event(&event);
        InteractionOutcome::Triggered {
            event,
            quests_progressed,
        }
    }
}
