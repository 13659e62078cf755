use missions_definitions::missions::Rewards;

/// Collaborator boundary for applying a completed quest's reward payload.
/// The engine only decides *when* a reward is due; economy and inventory
/// mutation belong to the host game.
pub trait RewardSink {
    fn apply(&mut self, quest_id: &str, rewards: &Rewards);
}

/// Default sink: reports the grant and nothing else.
#[derive(Default)]
pub struct LogRewardSink;

impl RewardSink for LogRewardSink {
    fn apply(&mut self, quest_id: &str, rewards: &Rewards) {
        log::debug!(
            "apply_rewards > quest {} > money: {} experience: {} items: {:?}",
            quest_id,
            rewards.money,
            rewards.experience,
            rewards.items
        );
    }
}

/// Sink that keeps every grant. Clones share the record, so a test can hold
/// one clone while the manager owns the other.
#[derive(Clone, Default)]
pub struct RecordingRewardSink {
    granted: std::sync::Arc<std::sync::Mutex<Vec<(String, Rewards)>>>,
}

impl RecordingRewardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&self) -> Vec<(String, Rewards)> {
        self.granted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl RewardSink for RecordingRewardSink {
    fn apply(&mut self, quest_id: &str, rewards: &Rewards) {
        self.granted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((quest_id.to_string(), rewards.clone()));
    }
}
