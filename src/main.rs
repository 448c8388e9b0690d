use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use scipaper_cli::api::ApiClient;
use scipaper_cli::config::{find_config_file, get_config, load_config, user_config_path, Config};
use scipaper_cli::console::Console;
use scipaper_cli::models::Paper;
use scipaper_cli::ops::{Analyze, Collaborate, Controller, Ingest, OperationError, Search};
use scipaper_cli::render;
use scipaper_cli::ui::{self, Status};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// SciPaper - Terminal client for the SciPaper research discovery service
#[derive(Parser, Debug)]
#[command(name = "scipaper")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "SciPaper Developers")]
#[command(about = "Ingest, search, and analyze research papers from the terminal", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the discovery service (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (text if TTY, JSON otherwise)
    Auto,
    /// Plain text format (human-readable)
    Text,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    /// Fold `Auto` into a concrete format
    fn resolve(self) -> OutputFormat {
        if self == OutputFormat::Auto {
            if std::io::stdout().is_terminal() {
                OutputFormat::Text
            } else {
                OutputFormat::Json
            }
        } else {
            self
        }
    }
}

/// Sources the service can ingest from
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SourceArg {
    #[value(name = "arxiv")]
    Arxiv,
    #[value(name = "pubmed")]
    Pubmed,
}

fn source_to_id(source: SourceArg) -> &'static str {
    match source {
        SourceArg::Arxiv => "arxiv",
        SourceArg::Pubmed => "pubmed",
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest papers on a topic from an upstream source
    #[command(alias = "i")]
    Ingest {
        /// Topic to ingest papers for
        query: String,

        /// Source to ingest from (default: from config)
        #[arg(long, short, value_enum)]
        source: Option<SourceArg>,

        /// Maximum number of papers to ingest (default: from config)
        #[arg(long, short)]
        max_results: Option<u32>,
    },

    /// Search ingested papers by keyword
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,
    },

    /// Find authors who publish on a topic
    #[command(alias = "c")]
    Collaborators {
        /// Topic to find collaborators for
        topic: String,
    },

    /// Run AI analysis over a stored paper
    #[command(alias = "a")]
    Analyze {
        /// Paper ID (as stored by the service)
        paper_id: String,
    },

    /// Fetch one stored paper by ID
    Paper {
        /// Paper ID (as stored by the service)
        paper_id: String,
    },

    /// List stored papers
    Papers {
        /// Number of papers to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum number of papers to list
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Start an interactive console session (the default)
    Console,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file to the user config directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,

    /// Print the path of the configuration file in use
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scipaper_cli={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }

    let api = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;

    match cli.command {
        Some(Commands::Ingest {
            query,
            source,
            max_results,
        }) => {
            let source = source
                .map(|s| source_to_id(s).to_string())
                .unwrap_or_else(|| config.ingest.default_source.clone());
            let max_results = max_results.unwrap_or(config.ingest.max_results);
            let op = Ingest::new(&query, source).max_results(max_results);

            let spinner = spinner(
                cli.quiet,
                cli.output,
                &format!("Ingesting papers on '{}'...", query),
            );
            let mut controller = Controller::new();
            match controller.run(&op, &api).await {
                Ok(papers) => {
                    clear(spinner);
                    match cli.output.resolve() {
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::to_string_pretty(
                                &serde_json::json!({ "ingested": papers.len() })
                            )
                            .unwrap()
                        ),
                        _ => ui::print_status(
                            Status::Success,
                            &format!("Successfully ingested {} paper(s).", papers.len()),
                        ),
                    }
                }
                Err(e) => fail(spinner, failure_message(&e)),
            }
        }

        Some(Commands::Search { query }) => {
            let op = Search::new(&query);
            let spinner = spinner(cli.quiet, cli.output, "Searching...");
            let mut controller = Controller::new();
            match controller.run(&op, &api).await {
                Ok(papers) => {
                    clear(spinner);
                    output_papers(&papers, cli.output);
                }
                Err(e) => fail(spinner, failure_message(&e)),
            }
        }

        Some(Commands::Collaborators { topic }) => {
            let op = Collaborate::new(&topic);
            let spinner = spinner(cli.quiet, cli.output, "Finding experts...");
            let mut controller = Controller::new();
            match controller.run(&op, &api).await {
                Ok(rows) => {
                    clear(spinner);
                    match cli.output.resolve() {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&rows).unwrap())
                        }
                        _ => ui::print_fragment(&render::collaborators(&rows)),
                    }
                }
                Err(e) => fail(spinner, failure_message(&e)),
            }
        }

        Some(Commands::Analyze { paper_id }) => {
            let op = Analyze::new(&paper_id);
            let spinner = spinner(cli.quiet, cli.output, "Analyzing with AI...");
            let mut controller = Controller::new();
            match controller.run(&op, &api).await {
                Ok(analysis) => {
                    clear(spinner);
                    match cli.output.resolve() {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&analysis).unwrap())
                        }
                        _ => ui::print_fragment(&render::analysis(&analysis)),
                    }
                }
                Err(e) => fail(spinner, format!("AI analysis failed: {}", e)),
            }
        }

        Some(Commands::Paper { paper_id }) => {
            let path = format!("/api/v1/papers/{}", urlencoding::encode(&paper_id));
            match api.get::<Paper>(&path, &[]).await {
                Ok(paper) => match cli.output.resolve() {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&paper).unwrap())
                    }
                    _ => ui::print_fragment(&render::paper_detail(&paper)),
                },
                Err(e) => fail(None, format!("Error: {}", e)),
            }
        }

        Some(Commands::Papers { skip, limit }) => {
            let query = [("skip", skip.to_string()), ("limit", limit.to_string())];
            match api.get::<Vec<Paper>>("/api/v1/papers/", &query).await {
                Ok(papers) => output_papers(&papers, cli.output),
                Err(e) => fail(None, format!("Error: {}", e)),
            }
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init { force } => {
                let path = user_config_path()
                    .ok_or_else(|| anyhow::anyhow!("Could not determine the user config directory"))?;
                if path.exists() && !force {
                    anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
                }
                Config::default().save(&path)?;
                ui::print_status(Status::Success, &format!("Wrote {}", path.display()));
            }
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Path => match cli.config.or_else(find_config_file) {
                Some(path) => println!("{}", path.display()),
                None => ui::print_status(Status::Info, "No configuration file found (using defaults)"),
            },
        },

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }

        Some(Commands::Console) | None => {
            Console::new(
                api,
                config.ingest.default_source.clone(),
                config.ingest.max_results,
            )
            .run()
            .await?;
        }
    }

    Ok(())
}

/// Spinner for one-shot commands; only when output is interactive text
fn spinner(quiet: bool, output: OutputFormat, message: &str) -> Option<ui::Spinner> {
    if !quiet && output.resolve() == OutputFormat::Text && ui::is_terminal() {
        Some(ui::Spinner::new(message))
    } else {
        None
    }
}

fn clear(spinner: Option<ui::Spinner>) {
    if let Some(spinner) = spinner {
        spinner.finish();
    }
}

/// User-facing line for a failed operation
///
/// Validation messages are shown as-is; API failures get the `Error:` frame.
fn failure_message(error: &OperationError) -> String {
    match error {
        OperationError::Validation(message) => message.clone(),
        OperationError::Api(e) => format!("Error: {}", e),
    }
}

fn fail(spinner: Option<ui::Spinner>, message: String) -> ! {
    clear(spinner);
    ui::print_status(Status::Error, &message);
    std::process::exit(1);
}

fn output_papers(papers: &[Paper], format: OutputFormat) {
    match format.resolve() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(papers).unwrap()),
        _ => ui::print_fragment(&render::search_results(papers)),
    }
}
