use async_trait::async_trait;
use missions_definitions::missions::Rewards;

use crate::source::{ContentResult, ContentSource, MissionGraph, MissionNode, MissionRequest, NodeKind};

/// Deterministic generator used when the content server is unreachable.
///
/// Produces the same wire shape as the HTTP source so the rest of the
/// pipeline cannot tell the two apart. The same request always yields the
/// same mission.
pub struct TemplateContentSource {
    quest_giver: String,
}

impl TemplateContentSource {
    pub fn new(quest_giver: impl Into<String>) -> Self {
        Self {
            quest_giver: quest_giver.into(),
        }
    }
}

impl Default for TemplateContentSource {
    fn default() -> Self {
        Self::new("npc_dispatcher")
    }
}

fn node(id: &str, kind: NodeKind, title: String) -> MissionNode {
    MissionNode {
        id: id.to_string(),
        kind,
        title,
        description: String::new(),
        npc_id: None,
        item_id: None,
        building_id: None,
        area: None,
        ability: None,
        blocker_id: None,
        required_count: None,
        assigned_character: None,
        alternatives: vec![],
        prerequisites: vec![],
    }
}

#[async_trait]
impl ContentSource for TemplateContentSource {
    async fn generate(&self, request: &MissionRequest) -> ContentResult<MissionGraph> {
        let destination = &request.destination;
        let supplies_needed = request.difficulty.clamp(1, 5);

        let briefing = MissionNode {
            npc_id: Some(self.quest_giver.clone()),
            ..node(
                "briefing",
                NodeKind::Talk,
                format!("Get the briefing for {destination}"),
            )
        };
        let gather = MissionNode {
            item_id: Some("supplies".to_string()),
            required_count: Some(supplies_needed),
            prerequisites: vec!["briefing".to_string()],
            ..node(
                "gather_supplies",
                NodeKind::Collect,
                format!("Gather {supplies_needed} supplies"),
            )
        };
        let travel = MissionNode {
            area: Some(destination.clone()),
            prerequisites: vec!["briefing".to_string()],
            ..node("travel", NodeKind::Explore, format!("Reach {destination}"))
        };
        let mut drop_off = MissionNode {
            item_id: Some("supplies".to_string()),
            npc_id: Some(self.quest_giver.clone()),
            prerequisites: vec!["gather_supplies".to_string(), "travel".to_string()],
            ..node(
                "drop_off",
                NodeKind::Deliver,
                "Hand over the supplies".to_string(),
            )
        };
        // Pin the final step to a named character when the caller has one.
        if let Some(character) = request.available_characters.first() {
            drop_off.assigned_character = Some(character.clone());
        }

        Ok(MissionGraph {
            mission_id: Some(format!("m_{destination}_{}", request.difficulty)),
            title: format!("Supply run to {destination}"),
            description: format!(
                "Collect supplies and bring them through {destination}."
            ),
            quest_giver_npc: Some(self.quest_giver.clone()),
            rewards: Rewards {
                money: 25 * supplies_needed,
                experience: 10 * supplies_needed,
                items: vec![],
            },
            nodes: vec![briefing, gather, travel, drop_off],
        })
    }
}
