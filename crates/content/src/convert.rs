use missions_definitions::missions::{Objective, ObjectiveKind, Quest, QuestType};
use uuid::Uuid;

use crate::source::{ContentError, ContentResult, MissionGraph, MissionNode, NodeKind};

fn required_string(node: &MissionNode, value: &Option<String>, field: &'static str) -> ContentResult<String> {
    value.clone().ok_or_else(|| ContentError::MissingNodeField {
        node: node.id.clone(),
        field,
    })
}

fn objective_kind(node: &MissionNode) -> ContentResult<ObjectiveKind> {
    let kind = match node.kind {
        NodeKind::Talk => ObjectiveKind::Talk {
            npc_id: required_string(node, &node.npc_id, "npcId")?,
        },
        NodeKind::Collect => ObjectiveKind::Collect {
            item_id: required_string(node, &node.item_id, "itemId")?,
        },
        NodeKind::Deliver => ObjectiveKind::Deliver {
            item_id: required_string(node, &node.item_id, "itemId")?,
            npc_id: node.npc_id.clone(),
            building_id: node.building_id.clone(),
        },
        NodeKind::Explore => ObjectiveKind::Explore {
            area: required_string(node, &node.area, "area")?,
        },
        NodeKind::UseAbility => ObjectiveKind::UseAbility {
            ability: required_string(node, &node.ability, "ability")?,
            blocker_id: node.blocker_id.clone(),
        },
    };
    Ok(kind)
}

/// Turns a generated mission graph into a playable quest.
///
/// Node prerequisites become objective prerequisites unchanged, so the
/// engine's gating and cycle checks apply to generated content exactly as
/// they do to authored quests. An unplayable graph is rejected here and
/// never reaches the manager.
pub fn quest_from_graph(graph: &MissionGraph, quest_type: QuestType) -> ContentResult<Quest> {
    let quest_id = graph
        .mission_id
        .clone()
        .unwrap_or_else(|| format!("m_{}", Uuid::new_v4()));

    let mut quest = Quest::new(quest_id, quest_type)
        .with_title(&graph.title)
        .with_description(&graph.description)
        .with_rewards(graph.rewards.clone());
    if let Some(npc_id) = &graph.quest_giver_npc {
        quest = quest.given_by(npc_id).with_related_npc(npc_id);
    }

    for node in &graph.nodes {
        let mut objective = Objective::new(&node.id, objective_kind(node)?)
            .with_title(&node.title)
            .with_description(&node.description);
        if let Some(count) = node.required_count {
            objective = objective.with_count(count);
        }
        if let Some(character) = &node.assigned_character {
            objective = objective.assigned_to(character);
        }
        if let ObjectiveKind::Talk { npc_id } = &objective.kind {
            if !quest.related_npcs.contains(npc_id) {
                quest = quest.with_related_npc(npc_id);
            }
        }
        for prerequisite in &node.prerequisites {
            objective = objective.after(prerequisite);
        }
        quest = quest.with_objective(objective);
    }

    quest.is_valid().map_err(ContentError::InvalidMission)?;
    Ok(quest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ContentSource, MissionRequest};
    use crate::template::TemplateContentSource;
    use missions_definitions::missions::QuestValidationError;
    use serde_json::json;

    fn graph(nodes: serde_json::Value) -> MissionGraph {
        serde_json::from_value(json!({
            "missionId": "m_test",
            "title": "Test mission",
            "questGiverNpc": "npc_elder",
            "nodes": nodes,
        }))
        .unwrap()
    }

    #[test]
    fn node_prerequisites_become_objective_prerequisites() {
        let graph = graph(json!([
            { "id": "talk", "type": "talk", "title": "Talk", "npcId": "npc_elder" },
            {
                "id": "fetch", "type": "collect", "title": "Fetch", "itemId": "herb",
                "requiredCount": 2, "prerequisites": ["talk"]
            }
        ]));
        let quest = quest_from_graph(&graph, QuestType::Sub).unwrap();
        assert_eq!(quest.quest_id, "m_test");
        assert_eq!(quest.quest_giver_npc.as_deref(), Some("npc_elder"));
        assert_eq!(quest.objectives[1].required_count, 2);
        assert_eq!(quest.objectives[1].prerequisites, vec!["talk".to_string()]);
    }

    #[test]
    fn missing_target_field_is_rejected() {
        let graph = graph(json!([
            { "id": "talk", "type": "talk", "title": "Talk" }
        ]));
        let error = quest_from_graph(&graph, QuestType::Sub).unwrap_err();
        assert!(matches!(
            error,
            ContentError::MissingNodeField { field: "npcId", .. }
        ));
    }

    #[test]
    fn unknown_prerequisite_is_rejected_by_validation() {
        let graph = graph(json!([
            {
                "id": "talk", "type": "talk", "title": "Talk", "npcId": "npc_elder",
                "prerequisites": ["ghost"]
            }
        ]));
        let error = quest_from_graph(&graph, QuestType::Sub).unwrap_err();
        assert!(matches!(
            error,
            ContentError::InvalidMission(QuestValidationError::UnknownPrerequisite { .. })
        ));
    }

    #[test]
    fn graph_without_an_id_gets_a_generated_one() {
        let mut graph = graph(json!([
            { "id": "talk", "type": "talk", "title": "Talk", "npcId": "npc_elder" }
        ]));
        graph.mission_id = None;
        let quest = quest_from_graph(&graph, QuestType::Sub).unwrap();
        assert!(quest.quest_id.starts_with("m_"));
    }

    #[tokio::test]
    async fn template_output_converts_into_a_valid_quest() {
        let request = MissionRequest {
            destination: "ruins".to_string(),
            difficulty: 2,
            available_characters: vec!["dizzy".to_string()],
            world_context: String::new(),
        };
        let graph = TemplateContentSource::default()
            .generate(&request)
            .await
            .unwrap();
        let quest = quest_from_graph(&graph, QuestType::Main).unwrap();
        assert_eq!(quest.objectives.len(), 4);
        assert!(quest.contains_objective("drop_off"));
    }
}
