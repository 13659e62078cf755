use missions_content::configuration::Config;
use missions_content::{
    generate_with_fallback, quest_from_graph, ContentError, ContentSource, HttpContentSource,
    MissionRequest, TemplateContentSource,
};
use missions_definitions::missions::QuestType;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        content_api_url: server.uri(),
        request_timeout_seconds: 5,
    }
}

fn request() -> MissionRequest {
    MissionRequest {
        destination: "ruins".to_string(),
        difficulty: 2,
        available_characters: vec!["jett".to_string()],
        world_context: "The village is short on herbs.".to_string(),
    }
}

#[tokio::test]
async fn generated_graph_is_decoded_and_convertible() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/missions"))
        .and(body_partial_json(json!({ "destination": "ruins" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "missionId": "m_herbs",
            "title": "Herbs for the Healer",
            "questGiverNpc": "npc_healer",
            "rewards": { "money": 80, "experience": 30, "items": [] },
            "nodes": [
                { "id": "talk", "type": "talk", "title": "Speak with the healer", "npcId": "npc_healer" },
                {
                    "id": "gather", "type": "collect", "title": "Gather herbs",
                    "itemId": "herb", "requiredCount": 3, "prerequisites": ["talk"]
                },
                {
                    "id": "return", "type": "deliver", "title": "Bring them back",
                    "itemId": "herb", "npcId": "npc_healer", "prerequisites": ["gather"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpContentSource::new(&config_for(&server));
    let graph = source.generate(&request()).await.unwrap();
    assert_eq!(graph.title, "Herbs for the Healer");

    let quest = quest_from_graph(&graph, QuestType::Main).unwrap();
    assert_eq!(quest.quest_id, "m_herbs");
    assert_eq!(quest.objectives.len(), 3);
    assert_eq!(quest.rewards.money, 80);
}

#[tokio::test]
async fn server_errors_surface_as_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/missions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = HttpContentSource::new(&config_for(&server));
    let error = source.generate(&request()).await.unwrap_err();
    assert!(matches!(error, ContentError::BadStatus(500)));
}

#[tokio::test]
async fn malformed_body_surfaces_as_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/missions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = HttpContentSource::new(&config_for(&server));
    let error = source.generate(&request()).await.unwrap_err();
    assert!(matches!(error, ContentError::DecodeFailed(_)));
}

#[tokio::test]
async fn fallback_covers_an_unreachable_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/missions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let primary = HttpContentSource::new(&config_for(&server));
    let fallback = TemplateContentSource::default();
    let graph = generate_with_fallback(&primary, &fallback, &request())
        .await
        .unwrap();
    assert_eq!(graph.mission_id.as_deref(), Some("m_ruins_2"));
    assert!(quest_from_graph(&graph, QuestType::Sub).is_ok());
}
