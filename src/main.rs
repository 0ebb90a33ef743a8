use std::path::PathBuf;

use clap::Parser;
use model_hub::core::config;
use model_hub::{ModelProvider, Prompter};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "model-hub", about = "Send a prompt to whichever provider serves the model")]
struct Args {
    /// Config file (defaults to ~/.model-hub/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to use; overrides the configured default
    #[arg(short, long)]
    model: Option<String>,

    /// List the usable models of every configured provider and exit
    #[arg(short, long)]
    list: bool,

    /// Prompt text
    #[arg(required_unless_present = "list")]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to model-hub.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("model-hub.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config(args.config.as_deref())?;
    let resolved = config::resolve(&file_config, args.model.as_deref());
    log::info!(
        "model-hub starting: default_model={:?}, providers={:?}",
        resolved.default_model,
        resolved.providers.keys().collect::<Vec<_>>()
    );

    let prompter = Prompter::new(resolved.default_model, &resolved.providers)?;

    if args.list {
        for provider in prompter.providers() {
            for model in usable_models(provider.as_ref()).await? {
                println!("{}\t{}", provider.kind(), model);
            }
        }
        return Ok(());
    }

    let prompt = args.prompt.unwrap_or_default();
    let response = prompter.send(&prompt, None).await?;
    println!("{response}");
    Ok(())
}

/// Models a provider both allows and offers, in allowlist order.
async fn usable_models(
    provider: &dyn ModelProvider,
) -> Result<Vec<String>, model_hub::ProviderError> {
    let available = provider.all_models().await?;
    let mut usable: Vec<String> = Vec::new();
    for model in provider.supported_models() {
        if available.contains(model) && !usable.contains(model) {
            usable.push(model.clone());
        }
    }
    Ok(usable)
}
