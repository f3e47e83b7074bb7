use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use converter_core::{ConversionHistory, ConverterConfig};
use converter_llm::OpenAIService;
use converter_pipeline::Pipeline;

mod chat;
mod logging;
mod render;

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "sql-convert")]
#[command(about = "Convert dialect-specific SQL into standard SQL")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Config file (JSON or TOML); defaults to ~/.sql-convert/config.json or ./config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL of the chat-completions service
    #[arg(long, env = "API_BASE")]
    api_base: Option<String>,

    /// API key of the chat-completions service
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, env = "MODEL")]
    model: Option<String>,

    /// Source SQL dialect
    #[arg(long, env = "SOURCE_DIALECT")]
    source_dialect: Option<String>,

    /// Target SQL dialect
    #[arg(long, env = "TARGET_DIALECT")]
    target_dialect: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a single statement (`-` reads it from stdin)
    Convert {
        sql: String,

        /// Also print the structured intermediate form
        #[arg(long)]
        show_ast: bool,

        /// Print the history entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert statements interactively
    Chat,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ConverterConfig::load(),
        };

        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(source) = &self.source_dialect {
            config.dialects.source = source.clone();
        }
        if let Some(target) = &self.target_dialect {
            config.dialects.target = target.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = cli.resolve_config()?;
    log::info!(
        "Converting {} -> {} with model {} at {}",
        config.dialects.source,
        config.dialects.target,
        config.model,
        config.api_base
    );

    let service = OpenAIService::from_config(&config)
        .context("set API_KEY, pass --api-key, or add api_key to the config file")?;
    let pipeline = Pipeline::standard(Arc::new(service), &config.dialects);
    let history = ConversionHistory::new();

    match cli.command {
        Commands::Convert {
            sql,
            show_ast,
            json,
        } => {
            let sql = if sql == "-" {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                sql
            };

            let outcome = pipeline.convert(&sql).await;
            let entry = history.record(sql.trim(), &outcome);

            if json {
                println!("{}", serde_json::to_string_pretty(entry.as_ref())?);
            } else {
                render::print_entry(&entry, show_ast);
            }

            if !entry.succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Chat => {
            println!(
                "{}",
                format!(
                    "{} -> {} SQL converter",
                    config.dialects.source, config.dialects.target
                )
                .cyan()
                .bold()
            );
            chat::run_interactive(&pipeline, &history).await?;
        }
    }

    Ok(())
}
