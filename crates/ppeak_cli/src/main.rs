//! CLI probe for the ppeak site core.
//!
//! # Responsibility
//! - Drive `ppeak_core` against a local asset directory and SQLite store.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use log::error;
use ppeak_core::db::open_db;
use ppeak_core::{
    AttributeMap, ContentCache, ContentCacheOptions, DocumentRoot, SiteConfig, SqliteLocalStore,
    StaticAssetFetcher, ThemeStore, World, ATTR_AESTHETIC, ATTR_THEME,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ppeak", version, about = "ppeak site core probe")]
struct Cli {
    /// JSON site config; defaults plus `PPEAK_*` overrides when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Health check.
    Ping,
    /// Print the core version.
    Version,
    /// Load one content document through the two-tier cache.
    Load {
        /// Logical content path, e.g. `/content/works.json`.
        path: String,
    },
    /// Show or change the persisted world.
    World {
        #[command(subcommand)]
        action: Option<WorldAction>,
    },
}

#[derive(Debug, Subcommand)]
enum WorldAction {
    Set {
        /// `classical` or `gaming`.
        world: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(ppeak_core::default_log_level());
        ppeak_core::init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    match cli.command {
        Command::Ping => {
            println!("ppeak_core ping={}", ppeak_core::ping());
            Ok(())
        }
        Command::Version => {
            println!("ppeak_core version={}", ppeak_core::core_version());
            Ok(())
        }
        Command::Load { path } => {
            let config = load_config(cli.config)?;
            load(&config, &path)
        }
        Command::World { action } => {
            let config = load_config(cli.config)?;
            world(&config, action)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SiteConfig, String> {
    match path {
        Some(path) => SiteConfig::load(path),
        None => SiteConfig::from_env(),
    }
    .map_err(|err| err.to_string())
}

fn load(config: &SiteConfig, path: &str) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let fetcher = StaticAssetFetcher::new(&config.content_root)
        .with_mount_path(config.base_path.as_str());
    let mut cache = ContentCache::new(
        fetcher,
        SqliteLocalStore::new(&conn),
        ContentCacheOptions::from(config),
    );

    let value = cache.load_content(path);
    let rendered = match &value {
        Some(value) => serde_json::to_string_pretty(value).map_err(|err| err.to_string())?,
        None => "null".to_string(),
    };
    println!("{rendered}");

    for record in cache.errors() {
        eprintln!(
            "content_error file={} timestamp_ms={} message={}",
            record.file, record.timestamp_ms, record.message
        );
    }
    Ok(())
}

fn world(config: &SiteConfig, action: Option<WorldAction>) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let mut theme = ThemeStore::init(
        SqliteLocalStore::new(&conn),
        AttributeMap::new(),
        config.namespace.as_str(),
    );

    if let Some(WorldAction::Set { world }) = action {
        let world = World::parse(&world)
            .ok_or_else(|| format!("unknown world `{world}`; expected classical|gaming"))?;
        theme.set_world(world);
        if theme.persist_failures() > 0 {
            return Err("world selection could not be persisted".to_string());
        }
    }

    let document = theme.document();
    println!(
        "{}={} {}={}",
        ATTR_AESTHETIC,
        document.attribute(ATTR_AESTHETIC).unwrap_or_default(),
        ATTR_THEME,
        document.attribute(ATTR_THEME).unwrap_or_default()
    );
    Ok(())
}
