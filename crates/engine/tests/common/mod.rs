use missions_definitions::missions::{Objective, ObjectiveKind, Quest, QuestType, Rewards};
use missions_engine::configuration::Config;
use missions_engine::manager::MissionManager;
use missions_engine::rewards::RecordingRewardSink;
use missions_engine::storage::{MemoryStorage, SnapshotStorage, StorageError, StorageResult};

pub const STORAGE_KEY: &str = "missions-test";

pub fn test_config() -> Config {
    Config {
        storage_dir: String::new(),
        storage_key: STORAGE_KEY.to_string(),
    }
}

pub struct TestHarness {
    pub manager: MissionManager,
    pub storage: MemoryStorage,
    pub rewards: RecordingRewardSink,
}

/// Manager wired to shared storage/reward handles so tests can inspect what
/// it persisted and granted, and reload a fresh manager from the same store.
pub fn harness() -> TestHarness {
    let storage = MemoryStorage::new();
    let rewards = RecordingRewardSink::new();
    let manager = MissionManager::new(
        &test_config(),
        Box::new(storage.clone()),
        Box::new(rewards.clone()),
    );
    TestHarness {
        manager,
        storage,
        rewards,
    }
}

pub fn reload_from(storage: &MemoryStorage) -> MissionManager {
    MissionManager::new(
        &test_config(),
        Box::new(storage.clone()),
        Box::new(RecordingRewardSink::new()),
    )
}

/// Storage that always fails, for the persistence-failure path.
pub struct BrokenStorage;

impl SnapshotStorage for BrokenStorage {
    fn load(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::ReadFailed(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }

    fn store(&mut self, _key: &str, _payload: &str) -> StorageResult<()> {
        Err(StorageError::WriteFailed(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }
}

pub fn talk_quest(quest_id: &str, quest_type: QuestType, npc_id: &str) -> Quest {
    Quest::new(quest_id, quest_type)
        .with_title("Talk it over")
        .given_by(npc_id)
        .with_related_npc(npc_id)
        .with_rewards(Rewards {
            money: 50,
            experience: 20,
            items: vec![],
        })
        .with_objective(Objective::new(
            "talk",
            ObjectiveKind::Talk {
                npc_id: npc_id.to_string(),
            },
        ))
}

pub fn four_step_quest(quest_id: &str) -> Quest {
    Quest::new(quest_id, QuestType::Main)
        .with_title("The Long Errand")
        .given_by("npc_elder")
        .with_related_npc("npc_elder")
        .with_objective(Objective::new(
            "talk_elder",
            ObjectiveKind::Talk {
                npc_id: "npc_elder".to_string(),
            },
        ))
        .with_objective(Objective::new(
            "collect_herbs",
            ObjectiveKind::Collect {
                item_id: "herb".to_string(),
            },
        ))
        .with_objective(Objective::new(
            "reach_grove",
            ObjectiveKind::Explore {
                area: "grove".to_string(),
            },
        ))
        .with_objective(Objective::new(
            "deliver_herbs",
            ObjectiveKind::Deliver {
                item_id: "herb".to_string(),
                npc_id: Some("npc_elder".to_string()),
                building_id: None,
            },
        ))
}
