//! Advanced builder API usage
//!
//! Runs against an OpenAI-compatible endpoint (a local Ollama server by
//! default) with a timeout, retries and Vega-Lite output, after checking the
//! endpoint the same way a settings screen would.
//!
//! Override the endpoint with GRAPHLENS_DEMO_URL, GRAPHLENS_DEMO_KEY and
//! GRAPHLENS_DEMO_MODEL.

use graphlens::{
    AnalysisError, AnalysisResult, ChartAnalyzer, CustomProvider, ProviderConfig,
    SuggestionFormat,
};
use std::time::Duration;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let endpoint = CustomProvider::new(
        env_or("GRAPHLENS_DEMO_URL", "http://localhost:11434/v1"),
        env_or("GRAPHLENS_DEMO_KEY", "ollama"),
        env_or("GRAPHLENS_DEMO_MODEL", "llama3.2"),
    );

    println!("=== Endpoint check ===");
    println!("Models: {:?}", graphlens::list_models(&endpoint).await?);
    if let Err(e) = graphlens::test_connection(&endpoint).await {
        println!("Connection test failed: {}", e);
        return Ok(());
    }

    println!("\n=== Vega-Lite suggestions with retry ===");
    let result = ChartAnalyzer::builder()
        .data("city,population\nOslo,709000\nBergen,286000\nTrondheim,212000")
        .provider(ProviderConfig::custom(endpoint))
        .format(SuggestionFormat::ChartSpec)
        .max_suggestions(2)
        .timeout(Duration::from_secs(120))
        .retry(3, Duration::from_secs(2))
        .build()
        .await;

    match result {
        Ok(AnalysisResult::Suggestions(suggestions)) => {
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Ok(AnalysisResult::ChartData(_)) => unreachable!(),
        Err(AnalysisError::MalformedJson { candidate, source, .. }) => {
            println!("Model answered with broken JSON ({}):\n{}", source, candidate);
        }
        Err(e) => println!("Analysis failed ({}): {}", e.kind(), e),
    }

    Ok(())
}
