use clap::{Parser, Subcommand};
use graphlens::{
    analyze_chart_image, data_to_graph_suggestions, AppConfig, CustomProvider,
    ExtractedDataResponse, FileSettingsStore, ImageInput, ProviderConfig, ProviderFactory,
    SettingsStore, SuggestionFormat, SuggestionOptions,
};
use log::error;
use serde::Serialize;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "graphlens", version, about = "Chart suggestions from data, data from charts")]
struct Cli {
    /// Provider settings file
    #[arg(long, global = true, default_value = "graphlens-settings.json")]
    settings: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest charts for a dataset (use - to read stdin)
    Suggest {
        file: String,
        /// typed or spec (Vega-Lite)
        #[arg(long, default_value = "typed")]
        format: SuggestionFormat,
        /// Include a prose analysis of the data
        #[arg(long)]
        report: bool,
        /// Maximum number of suggestions
        #[arg(long, default_value_t = 3)]
        max: usize,
    },
    /// Read the data shown in a chart image
    Extract { image: String },
    /// List models offered by the configured custom endpoint
    Models,
    /// Check the configured custom endpoint
    TestConnection,
    /// Save provider settings
    Configure {
        /// Use the hosted provider
        #[arg(long, conflicts_with_all = ["base_url", "api_key", "model"])]
        hosted: bool,
        #[arg(long, required_unless_present = "hosted")]
        base_url: Option<String>,
        #[arg(long, required_unless_present = "hosted")]
        api_key: Option<String>,
        #[arg(long, required_unless_present = "hosted")]
        model: Option<String>,
    },
    /// Print the saved provider settings
    ShowConfig,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileSettingsStore::new(&cli.settings);

    match cli.command {
        Command::Suggest {
            file,
            format,
            report,
            max,
        } => {
            let data = read_input(&file).await?;
            let provider = ProviderFactory::for_provider(&store.load()?, &AppConfig::load()?)?;
            let options = SuggestionOptions {
                format,
                with_report: report,
                max_suggestions: max,
            };
            let suggestions =
                data_to_graph_suggestions(&data, provider.as_ref(), &options).await?;
            print_json(&suggestions)?;
        }
        Command::Extract { image } => {
            let image = ImageInput::from_file(&image).await?;
            let provider = ProviderFactory::for_provider(&store.load()?, &AppConfig::load()?)?;
            let extracted = analyze_chart_image(&image, provider.as_ref()).await?;
            print_json(&ExtractedDataResponse::from(extracted))?;
        }
        Command::Models => {
            let settings = store.load()?;
            let models = graphlens::list_models(settings.require_custom()?).await?;
            for model in models {
                println!("{}", model);
            }
        }
        Command::TestConnection => {
            let settings = store.load()?;
            graphlens::test_connection(settings.require_custom()?).await?;
            println!("Connection OK");
        }
        Command::Configure {
            hosted,
            base_url,
            api_key,
            model,
        } => {
            let config = if hosted {
                ProviderConfig::hosted()
            } else {
                ProviderConfig::custom(CustomProvider::new(
                    base_url.unwrap_or_default(),
                    api_key.unwrap_or_default(),
                    model.unwrap_or_default(),
                ))
            };
            config.validate()?;
            store.save(&config)?;
            println!("Saved settings to {}", store.path().display());
        }
        Command::ShowConfig => {
            let mut config = store.load()?;
            if let Some(custom) = config.custom.as_mut() {
                custom.api_key = mask(&custom.api_key);
            }
            print_json(&config)?;
        }
    }

    Ok(())
}

async fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut data = String::new();
        tokio::io::stdin().read_to_string(&mut data).await?;
        Ok(data)
    } else {
        tokio::fs::read_to_string(path).await
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Show the last four characters of keys long enough to keep them secret
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", visible)
}
