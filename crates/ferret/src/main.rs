mod commands;

use clap::{Parser, Subcommand};
use ferret_engine::config::ConfigLoader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ferret", version, about = "Semantic element resolution and test compilation")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./ferret.yaml, then ~/.ferret/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile validation instructions into test source
    Compile {
        /// YAML list of instructions
        instructions: PathBuf,
        /// Discovered element inventory (JSON) used to detect UI patterns
        #[arg(long)]
        inventory: Option<PathBuf>,
        /// Target framework (overrides config)
        #[arg(long)]
        framework: Option<String>,
        /// Write the compilation report (JSON) here
        #[arg(long)]
        report: Option<PathBuf>,
        /// Ignore detected UI patterns
        #[arg(long)]
        no_facts: bool,
    },
    /// Detect UI patterns and candidate selectors in an inventory
    Detect {
        /// Discovered element inventory (JSON)
        inventory: PathBuf,
        /// Also propose page-specific candidate selectors
        #[arg(long)]
        proposals: bool,
    },
    /// Validate the selector registry and show lookups
    Registry {
        /// Extra registry file layered over the built-in table
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the ordered candidates for one semantic type
        #[arg(long)]
        lookup: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries generated output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };

    match args.command {
        Command::Compile {
            instructions,
            inventory,
            framework,
            report,
            no_facts,
        } => {
            let options = commands::CompileOptions {
                instructions,
                inventory,
                framework,
                report,
                no_facts,
            };
            commands::compile(&config, options).await
        }
        Command::Detect {
            inventory,
            proposals,
        } => commands::detect(&inventory, proposals).await,
        Command::Registry { file, lookup } => {
            commands::registry(&config, file.as_deref(), lookup.as_deref()).await
        }
    }
}
