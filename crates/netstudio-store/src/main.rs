//! Net Studio network store: headless command-line entry point.
//!
//! Runs the same use cases the desktop UI calls, against the same data
//! directory, and prints records as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! netstudio [--data-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   list                                    List networks in sidebar order
//!   create   [--model-type <TYPE>]          Create a network from its template
//!   show     <ID>                           Print a full network record
//!   rename   <ID> <NAME>                    Rename a network
//!   save     <ID> <CONFIG.json> [--dataset <FILE.csv>]
//!   delete   <ID>                           Delete a network and its files
//!   dataset  <ID> [--purpose <P>] [--out <FILE>]
//!   attach   <ID> <FILE.csv> [--purpose <P>]
//!   settings [--init]                       Show or initialise settings.toml
//!                                           and the resolved data directory
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable             | Description                                   |
//! |----------------------|-----------------------------------------------|
//! | `NETSTUDIO_DATA_DIR` | Data root; same as `--data-dir`               |
//! | `RUST_LOG`           | `tracing` filter; overrides `logging.level`   |

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use netstudio_core::{DatasetFormat, DatasetPurpose, ModelType, NetId, NetUpdate};
use netstudio_store::infrastructure::storage::settings::{
    load_settings, resolve_data_dir, save_settings_to, settings_file_path, AppSettings,
};
use netstudio_store::infrastructure::ui_bridge::AppState;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Manage saved Net Studio networks from the command line.
#[derive(Debug, Parser)]
#[command(name = "netstudio", about = "Net Studio network store", version)]
struct Cli {
    /// Data root holding `nets.json` and the per-network files.
    ///
    /// Defaults to `storage.data_dir` from settings.toml, then the platform
    /// application-data directory.
    #[arg(long, global = true, env = "NETSTUDIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every network in sidebar order.
    List,

    /// Create a network from the default template of a model type.
    Create {
        #[arg(long, default_value_t = ModelType::MultilayerPerceptron)]
        model_type: ModelType,
    },

    /// Print the full record of a network.
    Show { id: NetId },

    /// Rename a network.
    Rename { id: NetId, name: String },

    /// Save settings from a JSON file, optionally attaching a training CSV.
    ///
    /// The file uses the same camelCase shape as `show` prints; `name`,
    /// `initialSetting` and `trainingFileSaved` are ignored.
    Save {
        id: NetId,
        config: PathBuf,
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Delete a network.
    Delete { id: NetId },

    /// Print (or write to `--out`) a stored dataset.
    Dataset {
        id: NetId,
        #[arg(long, default_value_t = DatasetPurpose::Training)]
        purpose: DatasetPurpose,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Store a dataset without changing any network setting.
    Attach {
        id: NetId,
        file: PathBuf,
        #[arg(long, default_value_t = DatasetPurpose::Training)]
        purpose: DatasetPurpose,
    },

    /// Show the settings file location and effective settings.
    Settings {
        /// Write a default settings file if none exists yet.
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings().context("failed to load settings")?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let data_dir = resolve_data_dir(&settings, cli.data_dir)
        .context("failed to resolve the data directory")?;
    debug!(data_dir = %data_dir.display(), "using data directory");

    let state = AppState::new(settings, data_dir);
    let service = &state.service;

    match cli.command {
        Command::List => print_json(&service.list_nets().await?),
        Command::Create { model_type } => {
            let config = service.create_net(model_type).await?;
            info!(id = %config.id, "created");
            print_json(&config)
        }
        Command::Show { id } => print_json(&service.get_net(id).await?),
        Command::Rename { id, name } => print_json(&service.rename_net(id, &name).await?),
        Command::Save {
            id,
            config,
            dataset,
        } => {
            let raw = tokio::fs::read(&config)
                .await
                .with_context(|| format!("failed to read {}", config.display()))?;
            let mut update: NetUpdate = serde_json::from_slice(&raw)
                .with_context(|| format!("{} is not a valid network config", config.display()))?;
            update.id = id;

            let bytes = match &dataset {
                Some(path) => Some(
                    tokio::fs::read(path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?,
                ),
                None => None,
            };
            print_json(&service.save_net(update, bytes.as_deref()).await?)
        }
        Command::Delete { id } => print_json(&service.delete_net(id).await?),
        Command::Dataset { id, purpose, out } => {
            let bytes = service
                .read_dataset(purpose, id, DatasetFormat::Csv)
                .await?;
            match out {
                Some(path) => tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("failed to write {}", path.display())),
                None => std::io::stdout()
                    .write_all(&bytes)
                    .context("failed to write dataset to stdout"),
            }
        }
        Command::Attach { id, file, purpose } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            service.save_dataset(id, purpose, &bytes).await?;
            print_json(&service.get_net(id).await?)
        }
        Command::Settings { init } => run_settings(&state.settings, &state.data_dir, init),
    }
}

fn run_settings(settings: &AppSettings, data_dir: &Path, init: bool) -> anyhow::Result<()> {
    let path = settings_file_path()?;
    if init && !path.exists() {
        save_settings_to(&path, settings)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "default settings written");
    }
    println!("# settings: {}", path.display());
    println!("# data dir: {}", data_dir.display());
    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
