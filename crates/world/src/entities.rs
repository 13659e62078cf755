use serde::{Deserialize, Serialize};

pub type EntityId = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.y >= self.min_y
            && position.y <= self.max_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Npc,
    Item,
    Building,
    AbilityBlocker,
}

/// Type-specific interaction data of a world entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum InteractionTarget {
    Npc {
        npc_id: String,
        name: String,
        dialogue: Vec<String>,
    },
    Item {
        item_id: String,
        quantity: u32,
    },
    Building {
        building_id: String,
        entrance: Bounds,
    },
    AbilityBlocker {
        blocker_id: String,
        required_ability: String,
    },
}

impl InteractionTarget {
    pub fn entity_type(&self) -> EntityType {
        match self {
            InteractionTarget::Npc { .. } => EntityType::Npc,
            InteractionTarget::Item { .. } => EntityType::Item,
            InteractionTarget::Building { .. } => EntityType::Building,
            InteractionTarget::AbilityBlocker { .. } => EntityType::AbilityBlocker,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldEntity {
    pub id: EntityId,
    pub position: Position,
    pub target: InteractionTarget,
}

impl WorldEntity {
    pub fn new(id: impl Into<String>, position: Position, target: InteractionTarget) -> Self {
        Self {
            id: id.into(),
            position,
            target,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.target.entity_type()
    }
}

/// A controlled character able to trigger interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: String,
    pub position: Position,
    pub carried_item: Option<String>,
    pub abilities: Vec<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            carried_item: None,
            abilities: Vec::new(),
        }
    }

    pub fn carrying(mut self, item_id: impl Into<String>) -> Self {
        self.carried_item = Some(item_id.into());
        self
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.abilities.push(ability.into());
        self
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|owned| owned == ability)
    }
}
