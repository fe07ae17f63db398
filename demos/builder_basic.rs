//! Basic usage of the ChartAnalyzer builder API
//!
//! Demonstrates the two analysis tasks against the hosted provider:
//! 1. Data → chart suggestions
//! 2. Chart image → data
//!
//! Set GEMINI_API_KEY before running.

use graphlens::{AnalysisResult, ChartAnalyzer, SuggestionBody};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Data → Suggestions ===");
    let data = "month,sales,returns\nJan,120,4\nFeb,135,6\nMar,160,3\nApr,150,8";
    let result = ChartAnalyzer::builder().data(data).with_report().build().await?;

    match result {
        AnalysisResult::Suggestions(suggestions) => {
            if let Some(report) = &suggestions.report {
                println!("Report:\n{}\n", report);
            }
            for suggestion in &suggestions.suggestions {
                match &suggestion.body {
                    SuggestionBody::Chart {
                        chart_type, data, ..
                    } => println!("- {} ({}, {} rows)", suggestion.title, chart_type, data.len()),
                    SuggestionBody::Spec { .. } => println!("- {} (spec)", suggestion.title),
                }
            }
        }
        AnalysisResult::ChartData(_) => unreachable!(),
    }

    if let Some(path) = std::env::args().nth(1) {
        println!("\n=== Image → Data ===");
        match ChartAnalyzer::builder().image_file(path).build().await? {
            AnalysisResult::ChartData(chart) => {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            }
            AnalysisResult::Suggestions(_) => unreachable!(),
        }
    }

    Ok(())
}
