use async_trait::async_trait;
use missions_definitions::missions::{QuestValidationError, Rewards};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Couldn't call the content server: {0}")]
    RequestFailed(String),
    #[error("Couldn't decode the content server response: {0}")]
    DecodeFailed(String),
    #[error("Content server returned status {0}")]
    BadStatus(u16),
    #[error("Node {node} is missing its {field}")]
    MissingNodeField { node: String, field: &'static str },
    #[error("Generated mission is not playable: {0}")]
    InvalidMission(QuestValidationError),
}

pub type ContentResult<T> = Result<T, ContentError>;

/// What the game asks the generator for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionRequest {
    pub destination: String,
    pub difficulty: u32,
    pub available_characters: Vec<String>,
    pub world_context: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Talk,
    Collect,
    Deliver,
    Explore,
    UseAbility,
}

/// One step of a generated mission.
///
/// Target fields are optional on the wire; which ones a node needs depends
/// on its kind and is checked during conversion, not during decoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub npc_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub blocker_id: Option<String>,
    #[serde(default)]
    pub required_count: Option<u32>,
    #[serde(default)]
    pub assigned_character: Option<String>,
    /// Interchangeable phrasings of the same step, for dialogue variety.
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// A complete generated mission, ready to convert into a quest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionGraph {
    #[serde(default)]
    pub mission_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quest_giver_npc: Option<String>,
    #[serde(default)]
    pub rewards: Rewards,
    pub nodes: Vec<MissionNode>,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn generate(&self, request: &MissionRequest) -> ContentResult<MissionGraph>;
}

/// Tries `primary` and falls back to `fallback` when it fails.
///
/// A generation failure is logged and absorbed here; callers only ever see a
/// usable mission graph or the fallback's error.
pub async fn generate_with_fallback(
    primary: &dyn ContentSource,
    fallback: &dyn ContentSource,
    request: &MissionRequest,
) -> ContentResult<MissionGraph> {
    match primary.generate(request).await {
        Ok(graph) => Ok(graph),
        Err(error) => {
            log::warn!(
                "Content > Generate > Primary source failed, using fallback: {error}"
            );
            fallback.generate(request).await
        }
    }
}
