//! DocStore CLI
//!
//! Command-line tools for DocStore documents.
//!
//! # Commands
//!
//! - `init` - Create an empty document
//! - `get` - Print the value at a path
//! - `set` - Write a JSON value at a path
//! - `remove` - Remove the value at a path
//! - `dump` - Pretty-print the whole document
//! - `inspect` - Display document statistics
//! - `convert` - Re-encode the document in another format

mod commands;

use clap::{Parser, Subcommand};
use docstore_core::Format;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// DocStore command-line document tools.
#[derive(Parser)]
#[command(name = "docstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the document file
    #[arg(global = true, short, long)]
    file: Option<PathBuf>,

    /// Encoding of the document file (json, cbor)
    #[arg(global = true, long, default_value = "json")]
    format: Format,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty document
    Init,

    /// Print the value at a path as JSON
    Get {
        /// Path such as `server.ports[0]`
        path: String,
    },

    /// Write a JSON value at a path
    Set {
        /// Path such as `server.ports[0]`
        path: String,

        /// Value as JSON text
        value: String,
    },

    /// Remove an object key or array element
    Remove {
        /// Path such as `server.ports[0]`
        path: String,
    },

    /// Pretty-print the whole document
    Dump,

    /// Display document statistics
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Re-encode the document in another format
    Convert {
        /// Target encoding (json, cbor)
        #[arg(long)]
        to: Format,

        /// Output file
        output: PathBuf,
    },

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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let format = cli.format;
    match cli.command {
        Commands::Init => {
            let file = cli.file.ok_or("Document file required for init")?;
            commands::init::run(&file, format)?;
        }
        Commands::Get { path } => {
            let file = cli.file.ok_or("Document file required for get")?;
            commands::get::run(&file, format, &path)?;
        }
        Commands::Set { path, value } => {
            let file = cli.file.ok_or("Document file required for set")?;
            commands::set::run(&file, format, &path, &value)?;
        }
        Commands::Remove { path } => {
            let file = cli.file.ok_or("Document file required for remove")?;
            commands::remove::run(&file, format, &path)?;
        }
        Commands::Dump => {
            let file = cli.file.ok_or("Document file required for dump")?;
            commands::dump::run(&file, format)?;
        }
        Commands::Inspect { output } => {
            let file = cli.file.ok_or("Document file required for inspect")?;
            commands::inspect::run(&file, format, &output)?;
        }
        Commands::Convert { to, output } => {
            let file = cli.file.ok_or("Document file required for convert")?;
            commands::convert::run(&file, format, to, &output)?;
        }
        Commands::Version => {
            println!("DocStore CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
