pub mod configuration;
pub mod manager;
pub mod rewards;
pub mod snapshot;
pub mod storage;

pub use manager::{MissionManager, NpcQuestContext, QuestStats, StateTransition, TransitionKind};
pub use rewards::{LogRewardSink, RecordingRewardSink, RewardSink};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
