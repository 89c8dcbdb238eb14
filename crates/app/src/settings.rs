//! Handles settings for the application. Configuration is read from
//! `config/ledger_tree.toml` (optional), then `LEDGER_TREE_*` environment
//! variables, then command line flags.

use clap::Parser;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/ledger_tree.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON forest document to load (and write back when `persist` is set).
    pub forest_path: String,
    /// Bucket moves are resolved against.
    pub bucket: String,
    /// Log level for the `ledger_tree` and `engine` targets.
    pub level: String,
    /// Write the forest back after every applied move.
    pub persist: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forest_path: "data/forest.json".to_string(),
            bucket: "expenses".to_string(),
            level: "info".to_string(),
            persist: false,
        }
    }
}

/// Where the drags to replay come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    /// Nothing to apply, only print the active bucket.
    None,
    /// A JSON `MoveScript` file.
    Script(String),
    /// A single drag given on the command line.
    Single { source: Uuid, target: Option<Uuid> },
}

#[derive(Debug)]
pub struct Settings {
    pub app: AppConfig,
    pub input: MoveInput,
}

#[derive(Debug, Parser)]
#[command(name = "ledger_tree", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the forest document path.
    #[arg(long)]
    forest: Option<String>,
    /// Override the active bucket (e.g. expenses, income).
    #[arg(long)]
    bucket: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
    /// Write the forest back after each applied move.
    #[arg(long)]
    persist: bool,
    /// Replay the drags listed in a JSON move script.
    #[arg(long, conflicts_with = "source")]
    script: Option<String>,
    /// Id of the dragged subcategory.
    #[arg(long)]
    source: Option<Uuid>,
    /// Id of the row the drag was released over; omit for a cancelled drag.
    #[arg(long, requires = "source")]
    target: Option<Uuid>,
}

pub fn load() -> Result<Settings> {
    settings_from(Args::parse())
}

fn settings_from(args: Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGER_TREE"));
    let mut app: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(forest) = args.forest {
        app.forest_path = forest;
    }
    if let Some(bucket) = args.bucket {
        app.bucket = bucket;
    }
    if let Some(level) = args.level {
        app.level = level;
    }
    if args.persist {
        app.persist = true;
    }

    let input = match (args.script, args.source) {
        (Some(path), _) => MoveInput::Script(path),
        (None, Some(source)) => MoveInput::Single {
            source,
            target: args.target,
        },
        (None, None) => MoveInput::None,
    };

    Ok(Settings { app, input })
}
