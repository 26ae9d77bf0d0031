//! Jobsheet CLI - run the record server and manage its data directory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobsheet_server::{serve, ServerConfig, SyncService};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobsheet")]
#[command(author, version, about = "Manufacturing job record server")]
struct Cli {
    /// Data directory holding the job table and refined lists
    #[arg(short, long, default_value = "db", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        bind: String,
    },

    /// Create the data directory, table file, and refined lists
    Init,

    /// Re-derive every refined list from the current table
    Resync,

    /// Show the schema and row/suggestion counts
    Info,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ServerConfig {
        data_dir: cli.data_dir,
        ..ServerConfig::default()
    };

    match cli.command {
        Commands::Serve { bind } => run_serve(ServerConfig { bind_addr: bind, ..config }),
        Commands::Init => run_init(config),
        Commands::Resync => run_resync(config),
        Commands::Info => run_info(config),
    }
}

fn run_serve(config: ServerConfig) -> Result<()> {
    let service = SyncService::initialize(config).context("Failed to initialize data directory")?;
    serve(&service).context("Server stopped")?;
    Ok(())
}

fn run_init(config: ServerConfig) -> Result<()> {
    let data_dir = config.data_dir.clone();
    SyncService::initialize(config).context("Failed to initialize data directory")?;
    println!("Initialized data directory at '{}'", data_dir.display());
    Ok(())
}

fn run_resync(config: ServerConfig) -> Result<()> {
    let service = SyncService::initialize(config).context("Failed to initialize data directory")?;
    let message = service.resync().context("Failed to resync refined lists")?;
    println!("{message}");
    Ok(())
}

fn run_info(config: ServerConfig) -> Result<()> {
    let service = SyncService::initialize(config).context("Failed to initialize data directory")?;

    let (fields, rows) = service.records().context("Failed to load the table")?;
    println!("Data directory: {}", service.config().data_dir.display());
    println!("Rows: {}", rows.len());
    println!("Fields: {}", fields.len());

    let lists = service
        .refined_lists()
        .context("Failed to read refined lists")?;
    for field in &fields {
        let token = jobsheet_server::field_token(field);
        let count = lists.get(&token).map(Vec::len).unwrap_or(0);
        println!("  {field}\t{count} suggestions");
    }

    Ok(())
}
