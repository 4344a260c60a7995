mod compose;
mod config;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use mm_core::{
    DEFAULT_GRAPH_NODES, DEFAULT_MIN_EDGE_WEIGHT, EngineConfig, analyze, build_keyword_graph,
    detect_themes, find_patterns_at, generate_clusters, get_top_keywords,
};
use mm_store::EntryStore;
use rmcp::{ServiceExt, transport::stdio};
use serde::Serialize;

use crate::compose::{EntryKind, compose_entry};
use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "mm", about = "Journal pattern engine CLI and MCP server")]
struct Cli {
    /// Config file (default: <data dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Import entries from JSON array files
    Import {
        /// File path(s) to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Add a single entry
    Add {
        #[arg(long, value_enum)]
        kind: EntryKind,

        /// Answer text for a reflection, notes for an incident
        #[arg(long)]
        text: String,

        /// Reflection stage the text answers
        #[arg(long)]
        stage: Option<String>,

        /// ISO-8601 date (default: now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List stored entries
    List,

    /// Most frequent keywords
    Keywords {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Groups of co-occurring keywords
    Themes {
        #[arg(long)]
        min_size: Option<usize>,
    },

    /// Recurring, emerging and fading keywords
    Patterns {
        /// Time window in days
        #[arg(long)]
        window: Option<u32>,
    },

    /// Keyword clusters around the best-connected words
    Clusters,

    /// Keyword graph as nodes and edges
    Graph {
        #[arg(long, default_value_t = DEFAULT_GRAPH_NODES)]
        nodes: usize,

        #[arg(long, default_value_t = DEFAULT_MIN_EDGE_WEIGHT)]
        min_weight: u32,
    },

    /// All queries in one document
    Report,

    /// Export entries to a JSON file
    Export {
        /// Output file path
        path: PathBuf,
    },
}

fn data_dir() -> PathBuf {
    std::env::var("MM_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(mm_store::default_data_dir)
}

fn open_store() -> Result<EntryStore> {
    EntryStore::open_data_dir(Some(&data_dir())).context("failed to open entry store")
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    Ok(FileConfig::load(cli.config.as_deref(), &data_dir())?.analysis)
}

fn load_entries() -> Result<Vec<mm_core::Entry>> {
    open_store()?
        .load_entries()
        .context("failed to load entries")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Serve => cmd_serve(config).await,
        Commands::Import { files } => cmd_import(files),
        Commands::Add {
            kind,
            text,
            stage,
            date,
        } => cmd_add(*kind, text, stage.as_deref(), date.as_deref()),
        Commands::List => cmd_list(),
        Commands::Keywords { limit } => {
            print_json(&get_top_keywords(&load_entries()?, limit.unwrap_or(config.keyword_limit)))
        }
        Commands::Themes { min_size } => print_json(&detect_themes(
            &load_entries()?,
            min_size.unwrap_or(config.min_theme_size),
        )),
        Commands::Patterns { window } => print_json(&find_patterns_at(
            &load_entries()?,
            window.unwrap_or(config.time_window_days),
            Utc::now(),
        )),
        Commands::Clusters => print_json(&generate_clusters(&load_entries()?)),
        Commands::Graph { nodes, min_weight } => {
            print_json(&build_keyword_graph(&load_entries()?, *nodes, *min_weight))
        }
        Commands::Report => print_json(&analyze(&load_entries()?, &config, Utc::now())),
        Commands::Export { path } => cmd_export(path),
    }
}

async fn cmd_serve(config: EngineConfig) -> Result<()> {
    let store = open_store()?;
    tracing::info!(
        "starting MCP server over {} entries",
        store.count().context("failed to count entries")?
    );

    let server = server::MmServer::new(store, config);
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn cmd_import(files: &[PathBuf]) -> Result<()> {
    let store = open_store()?;
    for path in files {
        let imported = store
            .import_json_file(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        println!("imported {imported} entries from {}", path.display());
    }
    println!("done. entries={}", store.count().context("failed to count entries")?);
    Ok(())
}

fn cmd_add(kind: EntryKind, text: &str, stage: Option<&str>, date: Option<&str>) -> Result<()> {
    let entry = compose_entry(kind, text, stage, date)?;
    let store = open_store()?;
    store
        .upsert_entry(&entry)
        .context("failed to store entry")?;
    println!("{}", entry.id);
    Ok(())
}

fn cmd_list() -> Result<()> {
    for entry in load_entries()? {
        println!("{}\t{}\t{}", entry.id, entry.date, entry.kind());
    }
    Ok(())
}

fn cmd_export(path: &Path) -> Result<()> {
    let store = open_store()?;
    store
        .export_json_file(path)
        .context("failed to export entries")?;
    println!(
        "exported {} entries to {}",
        store.count().context("failed to count entries")?,
        path.display()
    );
    Ok(())
}
