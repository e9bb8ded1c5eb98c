use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_ledger::config::Config;
use project_ledger::models::*;
use project_ledger::render::{render_details, render_results, render_value};
use project_ledger::repository::{FetchedDetails, ProjectRepository};

#[derive(Parser)]
#[command(name = "pledger")]
#[command(about = "Bookkeeping for personal project directories")]
struct Cli {
    /// Settings file [default: $PROJECT_LEDGER_CONFIG or the platform config directory]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project directory with a details.json
    Create {
        name: String,
        /// Technology used (repeatable)
        #[arg(long = "tech")]
        technologies: Vec<String>,
        #[arg(short, long)]
        summary: Option<String>,
        /// Create under this directory instead of the configured root
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Difficulty label [default: Undefined]
        #[arg(short, long)]
        difficulty: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Template to copy into the project (repeatable)
        #[arg(long = "template")]
        templates: Vec<String>,
    },
    /// List projects matching a keyword and/or creation date range
    Search {
        #[arg(short, long)]
        keyword: Option<String>,
        /// Created on or after (YYYY-MM-DD)
        #[arg(long, value_parser = SearchQuery::parse_date)]
        from: Option<NaiveDate>,
        /// Created on or before (YYYY-MM-DD)
        #[arg(long, value_parser = SearchQuery::parse_date)]
        to: Option<NaiveDate>,
        /// Search this directory instead of the configured root
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Add technologies or tags, or replace the summary or difficulty
    Update {
        name: String,
        #[arg(long = "tech")]
        technologies: Vec<String>,
        #[arg(short, long)]
        summary: Option<String>,
        #[arg(short, long)]
        path: Option<PathBuf>,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show a project's details, or one field of them
    Fetch {
        name: String,
        /// Sidecar key, e.g. "Summary" or "Date Created On"
        #[arg(short, long)]
        key: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the settings in effect
    Show,
    /// Set the directory projects are created in
    SetPath { path: PathBuf },
    /// List registered templates
    Templates,
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "project_ledger=info,pledger=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_init(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;

    match cli.command {
        Commands::Create {
            name,
            technologies,
            summary,
            path,
            difficulty,
            tags,
            templates,
        } => {
            let created = ProjectRepository::from_config(&config)
                .context("Invalid template settings")?
                .create_project(CreateProjectInput {
                    name,
                    technologies,
                    summary,
                    root: path,
                    difficulty,
                    tags,
                    templates,
                })
                .context("Failed to create project")?;

            println!("Project created successfully at {}", created.path.display());
            for outcome in &created.templates {
                println!("{}", outcome);
            }
        }
        Commands::Search {
            keyword,
            from,
            to,
            path,
        } => {
            let results = ProjectRepository::open(&config)
                .search_projects(&SearchQuery {
                    keyword,
                    start_date: from,
                    end_date: to,
                    root: path,
                })
                .context("Search failed")?;
            print!("{}", render_results(&results));
        }
        Commands::Update {
            name,
            technologies,
            summary,
            path,
            difficulty,
            tags,
        } => {
            ProjectRepository::open(&config)
                .update_project(UpdateProjectInput {
                    name,
                    technologies,
                    summary,
                    root: path,
                    difficulty,
                    tags,
                })
                .context("Failed to update project")?;
            println!("Project details updated successfully");
        }
        Commands::Fetch { name, key, json } => {
            match ProjectRepository::open(&config).fetch_project(&name, key.as_deref())? {
                FetchedDetails::Record(details) if json => {
                    println!("{}", serde_json::to_string_pretty(&details)?);
                }
                FetchedDetails::Record(details) => print!("{}", render_details(&details)),
                FetchedDetails::Field(value) if json => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                FetchedDetails::Field(value) => println!("{}", render_value(&value)),
                FetchedDetails::KeyNotFound(key) => {
                    anyhow::bail!("Key not found: {}", key);
                }
            }
        }
        Commands::Config { action } => run_config(&mut config, action)?,
    }

    Ok(())
}

fn run_config(config: &mut Config, action: ConfigCommand) -> anyhow::Result<()> {
    match action {
        ConfigCommand::Show => {
            println!("{:<21}{}", "Settings file:", config.path().display());
            println!("{:<21}{}", "Projects root:", config.root_path().display());
            println!("{:<21}{}", "Templates directory:", config.templates_dir().display());
        }
        ConfigCommand::SetPath { path } => {
            config
                .set_root_path(&path)
                .context("Failed to save settings")?;
            println!("Path set successfully");
        }
        ConfigCommand::Templates => {
            let registry = config.templates()?;
            for (name, file) in registry.iter() {
                println!("{} -> {}", name, file);
            }
        }
    }
    Ok(())
}
