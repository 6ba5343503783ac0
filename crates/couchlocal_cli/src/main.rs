//! couchlocal CLI
//!
//! Command-line access to a file-backed replication target.
//!
//! # Commands
//!
//! - `get` - Send a GET request to the target
//! - `post` - Send a POST request with a JSON body
//! - `compact` - Rewrite the store log keeping only live documents

mod commands;

use clap::{Parser, Subcommand};
use couchlocal_protocol::Method;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Drive a local CouchDB replication target from the shell.
#[derive(Parser)]
#[command(name = "couchlocal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the document store log
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Database name reported by `GET /`
    #[arg(global = true, long)]
    db_name: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get {
        /// Request path, e.g. `/`, `/_changes` or `/doc-id`
        request_path: String,

        /// Query parameter as `name=value` (repeatable)
        #[arg(short, long)]
        query: Vec<String>,
    },

    /// Send a POST request
    Post {
        /// Request path, e.g. `/_bulk_docs` or `/_revs_diff`
        request_path: String,

        /// JSON request body
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,

        /// File holding the JSON request body
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Query parameter as `name=value` (repeatable)
        #[arg(short, long)]
        query: Vec<String>,
    },

    /// Rewrite the store log keeping only live documents
    Compact,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Get {
            request_path,
            query,
        } => {
            let store = cli.store.ok_or("Store path required for get")?;
            commands::request::run(
                &store,
                cli.db_name,
                Method::Get,
                &request_path,
                &query,
                None,
            )?;
        }
        Commands::Post {
            request_path,
            body,
            body_file,
            query,
        } => {
            let store = cli.store.ok_or("Store path required for post")?;
            let body = match (body, body_file) {
                (Some(body), _) => Some(body),
                (None, Some(file)) => Some(std::fs::read_to_string(file)?),
                (None, None) => None,
            };
            commands::request::run(
                &store,
                cli.db_name,
                Method::Post,
                &request_path,
                &query,
                body.as_deref(),
            )?;
        }
        Commands::Compact => {
            let store = cli.store.ok_or("Store path required for compact")?;
            commands::compact::run(&store)?;
        }
        Commands::Version => {
            println!("couchlocal CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
