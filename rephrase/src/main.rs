mod actions;
mod llm;

use std::io::Read;
use std::process::ExitCode;

use actions::{Action, SUGGESTION_PROMPT, parse_suggestions};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use llm::LlmClient;
use log::debug;
use rephrase_core::{Config, Provider, UsageInfo};

#[derive(Parser, Debug)]
#[command(
    name = "rephrase",
    about = "Rephrase, fix, summarize or explain text with an LLM",
    long_about = "Sends text to OpenAI, Gemini or DeepSeek with one of a few fixed instructions"
)]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply an action to text (reads stdin when TEXT is omitted)
    Run {
        #[arg(value_enum)]
        action: Action,
        text: Option<String>,
        /// Provider (openai, gemini, deepseek)
        #[arg(short, long)]
        provider: Option<String>,
        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List models offered by a provider
    Models {
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Show key status and usage for every provider
    Usage {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ask for prompt suggestions
    Suggest {
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the default provider
    SetDefault { provider: String },
    /// Set the selected model for a provider
    SetModel { provider: String, model: String },
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let path = Config::config_path()?;
            println!("Config file: {}", path.display());
            println!("Default provider: {}", config.default_provider);
            println!("Honor selected model: {}", config.honor_selected_model);
            for provider in Provider::ALL {
                let has_key = config
                    .get_provider_config(provider)
                    .and_then(|c| c.api_key.as_ref())
                    .is_some();
                println!(
                    "  {} - model {}, key {}, base {}",
                    provider,
                    config.selected_model(provider),
                    if has_key { "in config" } else { provider.env_var() },
                    config.base_url(provider)
                );
            }
        }
        ConfigAction::SetDefault { provider } => {
            let parsed: Provider = provider.parse()?;
            let mut config = Config::load()?;
            config.default_provider = parsed.config_key().to_string();
            config.save()?;
            println!("Default provider set to: {}", parsed);
        }
        ConfigAction::SetModel { provider, model } => {
            let parsed: Provider = provider.parse()?;
            let mut config = Config::load()?;
            config.set_selected_model(parsed, model);
            config.save()?;
            println!("Model for {} set to: {}", parsed, model);
        }
    }
    Ok(())
}

fn read_input(text: Option<String>) -> Result<String> {
    let input = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    if input.trim().is_empty() {
        anyhow::bail!("No input text");
    }
    Ok(input)
}

/// Format one usage row the way the usage screen lays it out
fn render_usage(usage: &UsageInfo) -> String {
    let mut lines = vec![
        usage.provider.clone(),
        format!("  {:.4} {}", usage.total_used, usage.unit),
    ];
    if let Some(details) = &usage.details {
        lines.push(format!("  {}", details));
    }
    if let (Some(limit), Some(fraction)) = (usage.limit, usage.fraction_used()) {
        let warning = if fraction > 0.8 { " (!)" } else { "" };
        lines.push(format!(
            "  {}% of {:.2} {}{}",
            (fraction * 100.0) as i64,
            limit,
            usage.unit,
            warning
        ));
    }
    lines.join("\n")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Handle config subcommands first (before client initialization)
    if let Commands::Config { action } = &args.command {
        handle_config_command(action)?;
        return Ok(ExitCode::SUCCESS);
    }

    let llm = LlmClient::new()?;

    match args.command {
        Commands::Run {
            action,
            text,
            provider,
            model,
        } => {
            let input = read_input(text)?;
            let provider = llm.resolve_provider(provider.as_deref())?;
            let model = llm.resolve_model(provider, model.as_deref());
            let prompt = action.compose(&input);

            match llm.complete(&prompt, provider, &model).await {
                Ok(reply) => println!("{}", reply),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Models { provider } => {
            let provider = llm.resolve_provider(provider.as_deref())?;
            let selected = llm.resolve_model(provider, None);
            for model in llm.client().fetch_models_or_default(provider).await {
                let marker = if model == selected { " (selected)" } else { "" };
                println!("{}{}", model, marker);
            }
        }
        Commands::Usage { json } => {
            let report = llm.client().fetch_all_usage().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.rows())?);
            } else {
                let rows: Vec<String> = report.rows().iter().map(|u| render_usage(u)).collect();
                println!("{}", rows.join("\n\n"));
            }
        }
        Commands::Suggest { provider } => {
            let provider = llm.resolve_provider(provider.as_deref())?;
            let model = llm.resolve_model(provider, None);
            match llm.complete(SUGGESTION_PROMPT, provider, &model).await {
                Ok(reply) => {
                    for suggestion in parse_suggestions(&reply) {
                        println!("{}", suggestion);
                    }
                }
                Err(e) => debug!("No suggestions: {}", e),
            }
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(ExitCode::SUCCESS)
}
