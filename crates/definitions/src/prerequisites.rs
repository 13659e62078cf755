use std::collections::HashSet;

use daggy::{
    petgraph::dot::{Config, Dot},
    Dag, NodeIndex, Walker,
};

use crate::missions::{ObjectiveId, Quest, QuestValidationError};

/// DAG over a quest's objectives where an edge `a -> b` means `b` lists `a`
/// as a prerequisite. Building it rejects cyclic prerequisite declarations.
#[derive(Debug)]
pub struct PrerequisiteGraph {
    graph: Dag<ObjectiveId, u32>,
}

impl PrerequisiteGraph {
    /// Objectives unlocked directly by completing `objective_id`.
    pub fn unlocked_by(&self, objective_id: &str) -> Option<Vec<ObjectiveId>> {
        let index = self.get_node_index_by_objective_id(objective_id)?;
        let unlocked = self
            .graph
            .children(index)
            .iter(&self.graph)
            .filter_map(|(_, node)| self.graph.node_weight(node).cloned())
            .collect::<Vec<ObjectiveId>>();

        Some(unlocked)
    }

    /// Prerequisites declared on `objective_id`.
    pub fn requirements_of(&self, objective_id: &str) -> Option<Vec<ObjectiveId>> {
        let index = self.get_node_index_by_objective_id(objective_id)?;
        let requirements = self
            .graph
            .parents(index)
            .iter(&self.graph)
            .filter_map(|(_, node)| self.graph.node_weight(node).cloned())
            .collect::<Vec<ObjectiveId>>();

        Some(requirements)
    }

    /// Objective ids whose every prerequisite appears in `completed`.
    pub fn ready(&self, completed: &HashSet<ObjectiveId>) -> Vec<ObjectiveId> {
        self.graph
            .graph()
            .node_indices()
            .filter_map(|index| {
                let id = self.graph.node_weight(index)?;
                if completed.contains(id) {
                    return None;
                }
                let gated = self
                    .graph
                    .parents(index)
                    .iter(&self.graph)
                    .any(|(_, parent)| {
                        self.graph
                            .node_weight(parent)
                            .map(|parent_id| !completed.contains(parent_id))
                            .unwrap_or(false)
                    });
                if gated {
                    None
                } else {
                    Some(id.clone())
                }
            })
            .collect()
    }

    fn get_node_index_by_objective_id(&self, objective_id: &str) -> Option<NodeIndex> {
        self.graph
            .graph()
            .node_indices()
            .find(|index| {
                self.graph
                    .node_weight(*index)
                    .map(|weight| weight.as_str() == objective_id)
                    .unwrap_or(false)
            })
    }

    pub fn get_graph_draw(&self) -> Dot<&Dag<ObjectiveId, u32>> {
        Dot::with_config(&self.graph, &[Config::EdgeNoLabel])
    }
}

impl TryFrom<&Quest> for PrerequisiteGraph {
    type Error = QuestValidationError;

    fn try_from(quest: &Quest) -> Result<Self, Self::Error> {
        let mut dag = Dag::<ObjectiveId, u32, u32>::new();
        let mut nodes = Vec::with_capacity(quest.objectives.len());

        for objective in &quest.objectives {
            nodes.push(dag.add_node(objective.id.clone()));
        }

        for (index, objective) in quest.objectives.iter().enumerate() {
            for prerequisite in &objective.prerequisites {
                let parent = quest
                    .objectives
                    .iter()
                    .position(|other| other.id == *prerequisite)
                    .ok_or_else(|| QuestValidationError::UnknownPrerequisite {
                        objective: objective.id.clone(),
                        prerequisite: prerequisite.clone(),
                    })?;
                dag.add_edge(nodes[parent], nodes[index], 0).map_err(|_| {
                    QuestValidationError::PrerequisiteCycle(objective.id.clone())
                })?;
            }
        }

        Ok(Self { graph: dag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missions::{Objective, ObjectiveKind, QuestType};

    fn chained_quest() -> Quest {
        Quest::new("q_chain", QuestType::Main)
            .with_objective(Objective::new(
                "talk",
                ObjectiveKind::Talk {
                    npc_id: "npc_contact".to_string(),
                },
            ))
            .with_objective(
                Objective::new(
                    "collect",
                    ObjectiveKind::Collect {
                        item_id: "parcel".to_string(),
                    },
                )
                .after("talk"),
            )
            .with_objective(
                Objective::new(
                    "deliver",
                    ObjectiveKind::Deliver {
                        item_id: "parcel".to_string(),
                        npc_id: Some("npc_contact".to_string()),
                        building_id: None,
                    },
                )
                .after("collect"),
            )
    }

    #[test]
    fn builds_prerequisite_graph_properly() {
        let quest = chained_quest();
        let graph = PrerequisiteGraph::try_from(&quest).unwrap();

        let unlocked = graph.unlocked_by("talk").unwrap();
        assert_eq!(unlocked, vec!["collect".to_string()]);
        let unlocked = graph.unlocked_by("collect").unwrap();
        assert_eq!(unlocked, vec!["deliver".to_string()]);
        let unlocked = graph.unlocked_by("deliver").unwrap();
        assert!(unlocked.is_empty());

        let requirements = graph.requirements_of("deliver").unwrap();
        assert_eq!(requirements, vec!["collect".to_string()]);
        let requirements = graph.requirements_of("talk").unwrap();
        assert!(requirements.is_empty());
    }

    #[test]
    fn ready_respects_completed_set() {
        let quest = chained_quest();
        let graph = PrerequisiteGraph::try_from(&quest).unwrap();

        let ready = graph.ready(&HashSet::new());
        assert_eq!(ready, vec!["talk".to_string()]);

        let mut completed = HashSet::new();
        completed.insert("talk".to_string());
        let ready = graph.ready(&completed);
        assert_eq!(ready, vec!["collect".to_string()]);

        completed.insert("collect".to_string());
        let ready = graph.ready(&completed);
        assert_eq!(ready, vec!["deliver".to_string()]);
    }

    #[test]
    fn independent_objectives_are_all_ready() {
        let quest = Quest::new("q_flat", QuestType::Sub)
            .with_objective(Objective::new(
                "a",
                ObjectiveKind::Explore {
                    area: "ruins".to_string(),
                },
            ))
            .with_objective(Objective::new(
                "b",
                ObjectiveKind::Explore {
                    area: "caves".to_string(),
                },
            ));
        let graph = PrerequisiteGraph::try_from(&quest).unwrap();

        let ready = graph.ready(&HashSet::new());
        assert_eq!(ready.len(), 2);
        assert!(ready.contains(&"a".to_string()));
        assert!(ready.contains(&"b".to_string()));
    }

    #[test]
    fn cycle_is_rejected() {
        let quest = Quest::new("q_cycle", QuestType::Sub)
            .with_objective(
                Objective::new(
                    "a",
                    ObjectiveKind::Explore {
                        area: "ruins".to_string(),
                    },
                )
                .after("b"),
            )
            .with_objective(
                Objective::new(
                    "b",
                    ObjectiveKind::Explore {
                        area: "caves".to_string(),
                    },
                )
                .after("a"),
            );

        assert!(matches!(
            PrerequisiteGraph::try_from(&quest).unwrap_err(),
            QuestValidationError::PrerequisiteCycle(_)
        ));
    }
}
