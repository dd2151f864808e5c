//! Linkvault CLI

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use linkvault::prelude::*;
use std::path::PathBuf;

/// Linkvault - index an Obsidian-style vault into a link graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the vault directory
    #[arg(env = "LINKVAULT_ROOT")]
    root: Option<PathBuf>,

    /// YAML configuration file; flags and environment take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile used when no file is given (default, attachments, minimal)
    #[arg(short, long, default_value = "default")]
    profile: String,

    /// Include media files as graph nodes
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    attachments: bool,

    /// Output format (json, csv)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Table or list to print
    #[arg(short, long, value_enum, default_value_t = Table::Notes)]
    table: Table,

    /// Target identity for the backlinks table
    #[arg(short, long)]
    note: Option<String>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Table {
    Notes,
    Media,
    Canvas,
    Isolated,
    IsolatedCanvas,
    Nonexistent,
    NonexistentMedia,
    NonexistentCanvas,
    Backlinks,
    Stats,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<ConnectConfig> {
        let mut config = match &self.config {
            Some(path) => ConnectConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => {
                let profile = ConfigProfile::from_name(&self.profile)
                    .with_context(|| format!("Unknown profile '{}'", self.profile))?;
                profile.create_config(PathBuf::new())
            }
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if self.attachments {
            config.attachments = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        if config.root.as_os_str().is_empty() {
            bail!("No vault root given: pass ROOT, set LINKVAULT_ROOT or set `root` in the config file");
        }

        Ok(config)
    }

    fn view(&self) -> anyhow::Result<View> {
        let view = match self.table {
            Table::Notes => View::Notes,
            Table::Media => View::Media,
            Table::Canvas => View::Canvas,
            Table::Isolated => View::Isolated,
            Table::IsolatedCanvas => View::IsolatedCanvas,
            Table::Nonexistent => View::Nonexistent,
            Table::NonexistentMedia => View::NonexistentMedia,
            Table::NonexistentCanvas => View::NonexistentCanvas,
            Table::Backlinks => match &self.note {
                Some(note) => View::Backlinks(note.clone()),
                None => bail!("--table backlinks requires --note NAME"),
            },
            Table::Stats => View::Stats,
        };
        Ok(view)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = args.format.parse::<ExportFormat>()?;
    let view = args.view()?;
    let config = args.load_config()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_lowercase()),
    )
    .init();

    log::info!("Linkvault v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Root: {} | attachments: {} | format: {:?}",
        config.root.display(),
        config.attachments,
        format
    );

    let root = config.root.clone();
    let vault = Vault::connect(config)
        .with_context(|| format!("Failed to connect to vault at {}", root.display()))?;

    let output = render(&vault, &view, format)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
