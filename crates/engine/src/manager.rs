use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use missions_definitions::{
    events::GameEvent,
    missions::{Quest, QuestId, QuestStatus, QuestType},
    progress::RouteOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::configuration::Config;
use crate::rewards::RewardSink;
use crate::snapshot::{QuestProgress, Snapshot};
use crate::storage::SnapshotStorage;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Offered,
    Accepted,
    Completed,
    Abandoned,
}

/// One entry of the append-only diagnostics log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub id: String,
    pub quest_id: QuestId,
    pub transition: TransitionKind,
    pub at: u64,
}

/// Per-quest bookkeeping timestamps (unix seconds).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestRecord {
    pub offered_at: Option<u64>,
    pub accepted_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub abandoned_at: Option<u64>,
}

/// Read-only answer for the dialogue/content generator about one NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpcQuestContext {
    pub is_quest_npc: bool,
    pub has_offered_quest: bool,
    pub active_quest_id: Option<QuestId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestStats {
    pub known: usize,
    pub offered: usize,
    pub active: usize,
    pub completed: usize,
    pub abandoned: usize,
}

/// Session-owned orchestrator for every known quest.
///
/// Constructed once per game session and passed by reference to the systems
/// that emit events into it; there is no module-level singleton. All
/// mutation goes through `&mut self`, which also serializes event routing —
/// one `route_progress_event` call is fully processed, persistence included,
/// before the next can start.
pub struct MissionManager {
    quests: HashMap<QuestId, Quest>,
    records: HashMap<QuestId, QuestRecord>,
    offered: HashSet<QuestId>,
    completed: HashSet<QuestId>,
    abandoned: HashSet<QuestId>,
    active_main: Option<QuestId>,
    active_subs: HashSet<QuestId>,
    state_log: Vec<StateTransition>,
    initialized: bool,
    storage_key: String,
    storage: Box<dyn SnapshotStorage>,
    reward_sink: Box<dyn RewardSink>,
    saved: Snapshot,
}

impl MissionManager {
    pub fn new(
        config: &Config,
        storage: Box<dyn SnapshotStorage>,
        reward_sink: Box<dyn RewardSink>,
    ) -> Self {
        Self {
            quests: HashMap::new(),
            records: HashMap::new(),
            offered: HashSet::new(),
            completed: HashSet::new(),
            abandoned: HashSet::new(),
            active_main: None,
            active_subs: HashSet::new(),
            state_log: Vec::new(),
            initialized: false,
            storage_key: config.storage_key.clone(),
            storage,
            reward_sink,
            saved: Snapshot::default(),
        }
    }

    /// Resets all in-memory structures and registers the quest catalog,
    /// restoring any persisted snapshot over it. Idempotent: calling it
    /// again starts over from the stored snapshot.
    pub fn initialize(&mut self, catalog: Vec<Quest>) {
        self.reset();

        self.saved = match self.storage.load(&self.storage_key) {
            Ok(Some(payload)) => match Snapshot::parse(&payload) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    log::warn!("initialize > corrupt snapshot discarded: {error}");
                    Snapshot::default()
                }
            },
            Ok(None) => Snapshot::default(),
            Err(error) => {
                log::error!("initialize > failed to load snapshot: {error}");
                Snapshot::default()
            }
        };

        for quest in catalog {
            self.register_quest(quest);
        }

        self.initialized = true;
        log::info!(
            "initialize > {} quests known, active main: {:?}",
            self.quests.len(),
            self.active_main
        );
    }

    /// Clears every structure. Exists for test isolation; `initialize`
    /// calls it first.
    pub fn reset(&mut self) {
        self.quests.clear();
        self.records.clear();
        self.offered.clear();
        self.completed.clear();
        self.abandoned.clear();
        self.active_main = None;
        self.active_subs.clear();
        self.state_log.clear();
        self.saved = Snapshot::default();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Makes a quest known to the manager without offering it, applying any
    /// saved progress recorded under its id. Returns false for invalid or
    /// already-known quests.
    pub fn register_quest(&mut self, mut quest: Quest) -> bool {
        let quest_id = quest.quest_id.clone();
        if self.quests.contains_key(&quest_id) {
            log::warn!("register_quest > quest {quest_id} > already known");
            return false;
        }
        if let Err(error) = quest.is_valid() {
            log::warn!("register_quest > quest {quest_id} > invalid: {error}");
            return false;
        }

        if let Some(progress) = self.saved.quests.get(&quest_id) {
            progress.apply_to(&mut quest);
        }
        self.adopt_restored_status(&mut quest);
        self.quests.insert(quest_id, quest);
        true
    }

    /// Rebuilds set membership from a restored quest status, keeping the
    /// single-active-main invariant even against a corrupt snapshot.
    fn adopt_restored_status(&mut self, quest: &mut Quest) {
        let quest_id = quest.quest_id.clone();
        match quest.status {
            QuestStatus::Pending => {}
            QuestStatus::Offered => {
                self.offered.insert(quest_id);
            }
            QuestStatus::Active => {
                self.offered.insert(quest_id.clone());
                match quest.quest_type {
                    QuestType::Sub => {
                        self.active_subs.insert(quest_id);
                    }
                    QuestType::Main => {
                        let preferred = self.saved.active_main.as_deref() == Some(quest_id.as_str());
                        match self.active_main.clone() {
                            None => self.active_main = Some(quest_id),
                            Some(current) if preferred => {
                                log::warn!(
                                    "restore > demoting {current} in favor of saved main {quest_id}"
                                );
                                if let Some(previous) = self.quests.get_mut(&current) {
                                    previous.status = QuestStatus::Offered;
                                }
                                self.active_main = Some(quest_id);
                            }
                            Some(current) => {
                                log::warn!(
                                    "restore > main slot held by {current}, {quest_id} demoted to offered"
                                );
                                quest.status = QuestStatus::Offered;
                            }
                        }
                    }
                }
            }
            QuestStatus::Completed => {
                self.offered.insert(quest_id.clone());
                self.completed.insert(quest_id);
            }
            QuestStatus::Abandoned => {
                self.offered.insert(quest_id.clone());
                self.abandoned.insert(quest_id);
            }
        }
    }

    /// Registers (if needed) and offers a quest. Returns false when the
    /// quest is invalid or not in a state that can be offered.
    pub fn offer_quest(&mut self, quest: Quest) -> bool {
        let quest_id = quest.quest_id.clone();
        if !self.quests.contains_key(&quest_id) && !self.register_quest(quest) {
            return false;
        }
        let Some(stored) = self.quests.get_mut(&quest_id) else {
            return false;
        };
        if !stored.offer() {
            log::warn!(
                "offer_quest > quest {quest_id} > cannot offer in status {:?}",
                stored.status
            );
            return false;
        }
        self.offered.insert(quest_id.clone());
        self.record_transition(&quest_id, TransitionKind::Offered);
        self.save_to_storage();
        true
    }

    /// Accepts an offered quest. A second Main quest is rejected while one
    /// is active; `active_main` is never silently overwritten.
    pub fn accept_quest(&mut self, quest_id: &str) -> bool {
        let Some(quest) = self.quests.get(quest_id) else {
            log::warn!("accept_quest > quest {quest_id} > unknown");
            return false;
        };
        if quest.quest_type == QuestType::Main {
            if let Some(current) = &self.active_main {
                if current != quest_id {
                    log::warn!(
                        "accept_quest > quest {quest_id} > main slot already held by {current}"
                    );
                    return false;
                }
            }
        }

        let Some(quest) = self.quests.get_mut(quest_id) else {
            return false;
        };
        if !quest.accept() {
            log::warn!(
                "accept_quest > quest {quest_id} > cannot accept in status {:?}",
                quest.status
            );
            return false;
        }
        match quest.quest_type {
            QuestType::Main => self.active_main = Some(quest_id.to_string()),
            QuestType::Sub => {
                self.active_subs.insert(quest_id.to_string());
            }
        }
        self.record_transition(quest_id, TransitionKind::Accepted);
        self.save_to_storage();
        true
    }

    /// Abandons an active quest, freeing the main slot if it held it.
    pub fn abandon_quest(&mut self, quest_id: &str) -> bool {
        let Some(quest) = self.quests.get_mut(quest_id) else {
            log::warn!("abandon_quest > quest {quest_id} > unknown");
            return false;
        };
        if !quest.abandon() {
            log::warn!(
                "abandon_quest > quest {quest_id} > cannot abandon in status {:?}",
                quest.status
            );
            return false;
        }
        if self.active_main.as_deref() == Some(quest_id) {
            self.active_main = None;
        }
        self.active_subs.remove(quest_id);
        self.abandoned.insert(quest_id.to_string());
        self.record_transition(quest_id, TransitionKind::Abandoned);
        self.save_to_storage();
        true
    }

    /// The single entry point for gameplay events.
    ///
    /// Routes the event to the active main quest plus every active sub
    /// quest, settles completions (sets, rewards, log) and persists before
    /// returning, so a following event always observes consistent state.
    /// Returns how many quests the event applied to.
    pub fn route_progress_event(&mut self, event: &GameEvent) -> usize {
        let mut targets: Vec<QuestId> = Vec::new();
        if let Some(quest_id) = &self.active_main {
            targets.push(quest_id.clone());
        }
        targets.extend(self.active_subs.iter().cloned());

        let mut applied = 0;
        let mut completions = Vec::new();
        for quest_id in targets {
            let Some(quest) = self.quests.get_mut(&quest_id) else {
                continue;
            };
            match quest.route_event(event) {
                RouteOutcome::Ignored => {}
                RouteOutcome::Progressed => applied += 1,
                RouteOutcome::Completed(completion) => {
                    applied += 1;
                    completions.push(completion);
                }
            }
        }

        for completion in completions {
            if self.active_main.as_deref() == Some(completion.quest_id.as_str()) {
                self.active_main = None;
            }
            self.active_subs.remove(&completion.quest_id);
            self.completed.insert(completion.quest_id.clone());
            self.reward_sink.apply(&completion.quest_id, &completion.rewards);
            self.record_transition(&completion.quest_id, TransitionKind::Completed);
        }

        if applied > 0 {
            self.save_to_storage();
        }
        applied
    }

    /// Entry point for callers still holding `(event_type, payload)` pairs.
    /// Unknown types and malformed payloads are ignored.
    pub fn route_raw_event(&mut self, event_type: &str, payload: &Value) -> usize {
        match GameEvent::parse(event_type, payload) {
            Some(event) => self.route_progress_event(&event),
            None => {
                log::debug!("route_raw_event > {event_type} > ignored");
                0
            }
        }
    }

    pub fn get_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.get(quest_id)
    }

    pub fn active_main(&self) -> Option<&str> {
        self.active_main.as_deref()
    }

    /// Active quests, main quest first, subs in stable id order.
    pub fn get_active_quests(&self) -> Vec<&Quest> {
        let mut quests = Vec::new();
        if let Some(quest_id) = &self.active_main {
            if let Some(quest) = self.quests.get(quest_id) {
                quests.push(quest);
            }
        }
        let mut sub_ids: Vec<&QuestId> = self.active_subs.iter().collect();
        sub_ids.sort();
        for quest_id in sub_ids {
            if let Some(quest) = self.quests.get(quest_id) {
                quests.push(quest);
            }
        }
        quests
    }

    /// Read-only context for the dialogue/content generator. Never mutates.
    pub fn build_context_for_npc(&self, npc_id: &str) -> NpcQuestContext {
        let mut context = NpcQuestContext::default();
        for quest in self.get_active_quests() {
            if quest.quest_giver_npc.as_deref() == Some(npc_id)
                || quest.related_npcs.iter().any(|id| id == npc_id)
            {
                context.active_quest_id = Some(quest.quest_id.clone());
                break;
            }
        }
        for quest in self.quests.values() {
            if quest.quest_giver_npc.as_deref() == Some(npc_id) {
                context.is_quest_npc = true;
                if quest.status != QuestStatus::Pending {
                    context.has_offered_quest = true;
                }
            }
        }
        context
    }

    pub fn quest_stats(&self) -> QuestStats {
        QuestStats {
            known: self.quests.len(),
            offered: self.offered.len(),
            active: self.active_subs.len() + usize::from(self.active_main.is_some()),
            completed: self.completed.len(),
            abandoned: self.abandoned.len(),
        }
    }

    pub fn state_log(&self) -> &[StateTransition] {
        &self.state_log
    }

    pub fn get_record(&self, quest_id: &str) -> Option<&QuestRecord> {
        self.records.get(quest_id)
    }

    /// The snapshot that would be persisted right now.
    pub fn snapshot(&self) -> Snapshot {
        let mut completed: Vec<QuestId> = self.completed.iter().cloned().collect();
        completed.sort();
        let mut active_subs: Vec<QuestId> = self.active_subs.iter().cloned().collect();
        active_subs.sort();
        Snapshot {
            completed,
            active_main: self.active_main.clone(),
            active_subs,
            quests: self
                .quests
                .iter()
                .map(|(quest_id, quest)| (quest_id.clone(), QuestProgress::capture(quest)))
                .collect(),
        }
    }

    /// Persists the current snapshot. A storage failure is logged and
    /// swallowed; the in-memory state stays authoritative for the session.
    fn save_to_storage(&mut self) {
        let snapshot = self.snapshot();
        let payload = match snapshot.to_json() {
            Ok(payload) => payload,
            Err(error) => {
                log::error!("save_to_storage > failed to serialize snapshot: {error}");
                return;
            }
        };
        if let Err(error) = self.storage.store(&self.storage_key, &payload) {
            log::error!("save_to_storage > failed to persist snapshot: {error}");
        }
    }

    fn record_transition(&mut self, quest_id: &str, transition: TransitionKind) {
        let at = unix_now();
        let record = self.records.entry(quest_id.to_string()).or_default();
        match transition {
            TransitionKind::Offered => record.offered_at = Some(at),
            TransitionKind::Accepted => record.accepted_at = Some(at),
            TransitionKind::Completed => record.completed_at = Some(at),
            TransitionKind::Abandoned => record.abandoned_at = Some(at),
        }
        log::debug!("quest {quest_id} > {transition:?} at {at}");
        self.state_log.push(StateTransition {
            id: uuid::Uuid::new_v4().to_string(),
            quest_id: quest_id.to_string(),
            transition,
            at,
        });
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}
