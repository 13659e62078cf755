pub mod entities;
pub mod grid;
pub mod interaction;

pub use entities::{Actor, Bounds, EntityType, InteractionTarget, Position, WorldEntity};
pub use grid::SpatialGrid;
pub use interaction::{InteractionOutcome, InteractionSystem};
