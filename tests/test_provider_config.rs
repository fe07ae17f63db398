use graphlens::{
    list_models, test_connection, AnalysisError, ChartAnalyzer, ConnectionTestError,
    CustomProvider, FileSettingsStore, ProviderConfig, SettingsStore,
};
use mockito::{Matcher, Server};
use serde_json::json;

fn endpoint(server: &Server, api_key: &str) -> CustomProvider {
    CustomProvider::new(server.url(), api_key, "local-model")
}

#[tokio::test]
async fn test_incomplete_custom_provider_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = ChartAnalyzer::builder()
        .data("a,b\n1,2")
        .provider(ProviderConfig::custom(CustomProvider::new(
            server.url(),
            "",
            "local-model",
        )))
        .build()
        .await;

    match result {
        Err(AnalysisError::Configuration(message)) => assert!(message.contains("api_key")),
        other => panic!("expected Configuration error, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_custom_kind_without_endpoint() {
    let config = ProviderConfig {
        custom: None,
        ..ProviderConfig::custom(CustomProvider::new("u", "k", "m"))
    };
    let err = graphlens::suggest_graphs("a,b\n1,2", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Configuration(_)));
}

#[tokio::test]
async fn test_list_models_sorted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-local")
        .with_status(200)
        .with_body(
            json!({"object": "list", "data": [{"id": "qwen2.5"}, {"id": "llama3.2-vision"}]})
                .to_string(),
        )
        .create_async()
        .await;

    let models = list_models(&endpoint(&server, "sk-local")).await.unwrap();
    assert_eq!(models, vec!["llama3.2-vision", "qwen2.5"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_models_soft_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/models")
        .with_status(500)
        .create_async()
        .await;

    let models = list_models(&endpoint(&server, "sk-local")).await.unwrap();
    assert!(models.is_empty());

    let err = list_models(&CustomProvider::new("", "k", "m"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Configuration(_)));
}

#[tokio::test]
async fn test_connection_ok_is_repeatable() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "local-model"})))
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "pong"}}]}).to_string())
        .expect(2)
        .create_async()
        .await;

    let endpoint = endpoint(&server, "sk-local");
    test_connection(&endpoint).await.unwrap();
    test_connection(&endpoint).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_wrong_key() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
        .create_async()
        .await;

    match test_connection(&endpoint(&server, "wrong")).await.unwrap_err() {
        ConnectionTestError::Authentication { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("expected Authentication, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_missing_field() {
    let err = test_connection(&CustomProvider::new("http://localhost:1", "k", " "))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectionTestError::Configuration(_)));
}

#[tokio::test]
async fn test_saved_settings_drive_the_analysis() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({"choices": [{"message": {"content":
                r#"[{"chartType": "bar", "title": "Saved", "data": [{"a": 1}]}]"#}}]})
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileSettingsStore::new(dir.path().join("settings.json"));
    store
        .save(&ProviderConfig::custom(endpoint(&server, "sk-local")))
        .unwrap();

    let suggestions = graphlens::suggest_graphs("a\n1", &store.load().unwrap())
        .await
        .unwrap();
    assert_eq!(suggestions.suggestions[0].title, "Saved");
    mock.assert_async().await;
}
