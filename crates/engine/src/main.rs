use env_logger::init as initialize_logger;
use missions_definitions::{
    events::GameEvent,
    missions::{Objective, ObjectiveKind, Quest, QuestType, Rewards},
};
use missions_engine::{
    configuration::Config, manager::MissionManager, rewards::LogRewardSink, storage::FileStorage,
};

fn main() {
    initialize_logger();

    let config = Config::new().expect("Can parse config");
    let storage = FileStorage::new(&config.storage_dir);
    let mut manager =
        MissionManager::new(&config, Box::new(storage), Box::<LogRewardSink>::default());

    let quest = Quest::new("q_supply_run", QuestType::Main)
        .with_title("Supply Run")
        .given_by("npc_quartermaster")
        .with_related_npc("npc_quartermaster")
        .with_rewards(Rewards {
            money: 150,
            experience: 80,
            items: vec![],
        })
        .with_objective(Objective::new(
            "talk_quartermaster",
            ObjectiveKind::Talk {
                npc_id: "npc_quartermaster".to_string(),
            },
        ))
        .with_objective(
            Objective::new(
                "collect_rations",
                ObjectiveKind::Collect {
                    item_id: "ration".to_string(),
                },
            )
            .with_count(3),
        );

    manager.initialize(vec![quest.clone()]);
    manager.offer_quest(quest);
    manager.accept_quest("q_supply_run");

    manager.route_progress_event(&GameEvent::NpcInteraction {
        npc_id: "npc_quartermaster".to_string(),
        actor_id: Some("jett".to_string()),
    });
    manager.route_progress_event(&GameEvent::ItemCollected {
        item_id: "ration".to_string(),
        quantity: 3,
        actor_id: Some("jett".to_string()),
    });

    match manager.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(error) => println!("failed to serialize snapshot: {error}"),
    }
    println!("stats: {:?}", manager.quest_stats());
}
