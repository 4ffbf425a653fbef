use clap::{Parser, Subcommand};
use colored::Colorize;
use muse_core::config::LogLevel;
use muse_core::Config;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "muse")]
#[command(author, version, about = "Brainstorming assistant and friends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to use instead of the agent's default
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Config file to load instead of the default search path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive brainstorming session
    Brainstorm,
    /// Ask the assistant for a poem and print it
    Poem {
        /// What to ask for
        #[arg(default_value = muse_brainstorm::POEM_PROMPT)]
        prompt: String,
    },
}

fn init_tracing(verbose: u8, configured: LogLevel) {
    let level = match verbose {
        0 => configured.as_filter(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stderr keeps log lines out of the conversation on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_default()?,
    };
    let mut config = config.merge_env();

    if let Some(key) = &cli.api_key {
        config.llm.api_key = Some(key.clone());
    }
    if let Some(model) = &cli.model {
        config.llm.model = Some(model.clone());
    }

    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_tracing(cli.verbose, config.general.log_level);

    match cli.command {
        Commands::Brainstorm => commands::brainstorm::run(&config).await?,
        Commands::Poem { prompt } => commands::poem::run(&config, &prompt).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // A `.env` in the working directory fills in variables that are not
    // already set; the real environment wins.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n\n{} {}", "An error occurred:".red().bold(), e);
        std::process::exit(1);
    }
}
