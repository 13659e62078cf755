use missions_definitions::{
    missions::{Objective, ObjectiveKind, Quest, QuestType, Rewards},
    prerequisites::PrerequisiteGraph,
};

fn main() {
    println!("Mission definitions:");

    let supply_run = Quest::new("q_supply_run", QuestType::Main)
        .with_title("Supply Run")
        .with_description("Bring the outpost what it needs to survive the week")
        .given_by("npc_quartermaster")
        .with_related_npc("npc_quartermaster")
        .with_rewards(Rewards {
            money: 150,
            experience: 80,
            items: vec!["compass".to_string()],
        })
        .with_objective(
            Objective::new(
                "talk_quartermaster",
                ObjectiveKind::Talk {
                    npc_id: "npc_quartermaster".to_string(),
                },
            )
            .with_title("Report to the quartermaster"),
        )
        .with_objective(
            Objective::new(
                "collect_rations",
                ObjectiveKind::Collect {
                    item_id: "ration".to_string(),
                },
            )
            .with_title("Gather rations")
            .with_count(3)
            .after("talk_quartermaster"),
        )
        .with_objective(
            Objective::new(
                "deliver_rations",
                ObjectiveKind::Deliver {
                    item_id: "ration".to_string(),
                    npc_id: None,
                    building_id: Some("outpost_storehouse".to_string()),
                },
            )
            .with_title("Stock the storehouse")
            .after("collect_rations"),
        );

    print_quest(&supply_run);

    match PrerequisiteGraph::try_from(&supply_run) {
        Ok(graph) => println!("{}", graph.get_graph_draw()),
        Err(error) => println!("invalid quest: {error}"),
    }
}

fn print_quest(quest: &Quest) {
    match serde_json::to_string(quest) {
        Ok(json) => println!("{json}"),
        Err(error) => println!("failed to serialize quest: {error}"),
    }
}
