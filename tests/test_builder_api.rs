use graphlens::{
    AnalysisError, AnalysisResult, ChartAnalyzer, CustomProvider, HostedConfig, ProviderConfig,
};

/// Test data → suggestions against the hosted provider
/// This test is ignored by default since it requires GEMINI_API_KEY
#[tokio::test]
#[ignore]
async fn test_builder_data_to_suggestions() {
    let result = ChartAnalyzer::builder()
        .data("month,sales\nJan,120\nFeb,135\nMar,160")
        .build()
        .await;

    match result.unwrap() {
        AnalysisResult::Suggestions(suggestions) => {
            assert!(!suggestions.suggestions.is_empty());
            assert!(suggestions.suggestions.len() <= 3);
        }
        AnalysisResult::ChartData(_) => panic!("Expected suggestions"),
    }
}

#[tokio::test]
async fn test_builder_no_input_error() {
    let result = ChartAnalyzer::builder().build().await;

    match result {
        Err(AnalysisError::InvalidInput(message)) => assert!(message.contains("No input")),
        other => panic!("Expected InvalidInput error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_builder_blank_data_error() {
    let result = ChartAnalyzer::builder()
        .data("   \n")
        .provider(ProviderConfig::custom(CustomProvider::new(
            "http://localhost:1/v1",
            "key",
            "model",
        )))
        .build()
        .await;

    assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
}

#[tokio::test]
async fn test_builder_invalid_base64_image() {
    let result = ChartAnalyzer::builder()
        .image_base64("not base64!!", Some("image/png".to_string()))
        .provider(ProviderConfig::custom(CustomProvider::new(
            "http://localhost:1/v1",
            "key",
            "model",
        )))
        .build()
        .await;

    assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
}

#[tokio::test]
async fn test_builder_missing_image_file() {
    let result = ChartAnalyzer::builder()
        .image_file("/nonexistent/chart.png")
        .provider(ProviderConfig::custom(CustomProvider::new(
            "http://localhost:1/v1",
            "key",
            "model",
        )))
        .build()
        .await;

    assert!(matches!(result, Err(AnalysisError::Io(_))));
}

#[tokio::test]
async fn test_builder_unreachable_endpoint_is_transport() {
    let result = ChartAnalyzer::builder()
        .data("a,b\n1,2")
        .provider(ProviderConfig::custom(CustomProvider::new(
            "http://127.0.0.1:9/v1",
            "key",
            "model",
        )))
        .build()
        .await;

    match result {
        Err(e) => {
            assert_eq!(e.kind(), "transport");
            assert!(e.is_transient());
        }
        Ok(_) => panic!("Expected transport error"),
    }
}

#[tokio::test]
async fn test_builder_hosted_without_key() {
    let result = ChartAnalyzer::builder()
        .data("a,b\n1,2")
        .provider(ProviderConfig::hosted())
        .hosted(HostedConfig {
            api_key: Some(String::new()),
            ..Default::default()
        })
        .build()
        .await;

    // An environment key makes this a real request; only check the keyless case
    if std::env::var("GEMINI_API_KEY").is_err() && std::env::var("GOOGLE_API_KEY").is_err() {
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));
    }
}
