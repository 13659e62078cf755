use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NPC_INTERACTION: &str = "NPC_INTERACTION";
pub const ITEM_COLLECTED: &str = "ITEM_COLLECTED";
pub const DELIVER_ITEM: &str = "DELIVER_ITEM";
pub const PORTAL_ENTERED: &str = "PORTAL_ENTERED";
pub const USE_ABILITY_ON_BLOCKER: &str = "USE_ABILITY_ON_BLOCKER";

/// A discrete gameplay event consumed by the mission engine.
///
/// The `actor_id` identifies which controlled character performed the action.
/// It is optional because some callers only know the action happened, not who
/// did it; objectives restricted to a character never match such events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    NpcInteraction {
        npc_id: String,
        actor_id: Option<String>,
    },
    ItemCollected {
        item_id: String,
        quantity: u32,
        actor_id: Option<String>,
    },
    ItemDelivered {
        item_id: String,
        npc_id: Option<String>,
        building_id: Option<String>,
        actor_id: Option<String>,
    },
    PortalEntered {
        area: String,
        actor_id: Option<String>,
    },
    AbilityUsed {
        ability: String,
        blocker_id: Option<String>,
        actor_id: Option<String>,
    },
}

impl GameEvent {
    pub fn actor_id(&self) -> Option<&str> {
        match self {
            GameEvent::NpcInteraction { actor_id, .. }
            | GameEvent::ItemCollected { actor_id, .. }
            | GameEvent::ItemDelivered { actor_id, .. }
            | GameEvent::PortalEntered { actor_id, .. }
            | GameEvent::AbilityUsed { actor_id, .. } => actor_id.as_deref(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::NpcInteraction { .. } => NPC_INTERACTION,
            GameEvent::ItemCollected { .. } => ITEM_COLLECTED,
            GameEvent::ItemDelivered { .. } => DELIVER_ITEM,
            GameEvent::PortalEntered { .. } => PORTAL_ENTERED,
            GameEvent::AbilityUsed { .. } => USE_ABILITY_ON_BLOCKER,
        }
    }

    /// Builds a typed event from an untyped `(event_type, payload)` pair.
    ///
    /// This is the single place where payload shapes are normalized: callers
    /// historically supplied both flat (`npcId`) and nested (`npc.npcId`)
    /// identifiers and both are accepted here. Unknown event types and
    /// payloads missing the identifying field yield `None`, never an error.
    pub fn parse(event_type: &str, payload: &Value) -> Option<GameEvent> {
        let actor_id = string_field(payload, "actorId", &["actor", "id"]);
        match event_type {
            NPC_INTERACTION => Some(GameEvent::NpcInteraction {
                npc_id: string_field(payload, "npcId", &["npc", "npcId"])?,
                actor_id,
            }),
            ITEM_COLLECTED => Some(GameEvent::ItemCollected {
                item_id: string_field(payload, "itemId", &["item", "id"])?,
                quantity: count_field(payload, "quantity").unwrap_or(1),
                actor_id,
            }),
            DELIVER_ITEM => Some(GameEvent::ItemDelivered {
                item_id: string_field(payload, "itemId", &["item", "id"])?,
                npc_id: string_field(payload, "npcId", &["npc", "npcId"]),
                building_id: string_field(payload, "buildingId", &["building", "buildingId"]),
                actor_id,
            }),
            PORTAL_ENTERED => Some(GameEvent::PortalEntered {
                area: string_field(payload, "area", &["portal", "area"])?,
                actor_id,
            }),
            USE_ABILITY_ON_BLOCKER => Some(GameEvent::AbilityUsed {
                ability: string_field(payload, "ability", &["blocker", "requiredAbility"])?,
                blocker_id: string_field(payload, "blockerId", &["blocker", "blockerId"]),
                actor_id,
            }),
            _ => None,
        }
    }
}

fn string_field(payload: &Value, flat: &str, nested: &[&str; 2]) -> Option<String> {
    if let Some(value) = payload.get(flat).and_then(Value::as_str) {
        return Some(value.to_string());
    }
    payload
        .get(nested[0])
        .and_then(|inner| inner.get(nested[1]))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn count_field(payload: &Value, key: &str) -> Option<u32> {
    payload.get(key).and_then(Value::as_u64).map(|n| n as u32)
}
