pub mod events;
pub mod missions;
pub mod prerequisites;
pub mod progress;

pub use events::GameEvent;
pub use missions::{
    Objective, ObjectiveKind, ObjectiveStatus, Quest, QuestStatus, QuestType,
    QuestValidationError, Rewards,
};
pub use prerequisites::PrerequisiteGraph;
pub use progress::{QuestCompletion, RouteOutcome};
