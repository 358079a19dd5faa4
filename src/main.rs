//! CLI entry point for postshelf

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postshelf")]
#[command(version)]
#[command(about = "Browse and check the posts of a Hexo-style blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site information
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show a single post
    Show {
        /// Post id, as printed by `list`
        id: String,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report posts that fail to load
    Check,

    /// Display version information
    Version,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postshelf=debug,info"
    } else {
        "postshelf=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let site = postshelf::Site::new(&base_dir)?;
            postshelf::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { id, json } => {
            let site = postshelf::Site::new(&base_dir)?;
            postshelf::commands::show::run(&site, &id, json)?;
        }

        Commands::Check => {
            let site = postshelf::Site::new(&base_dir)?;
            if postshelf::commands::check::run(&site)? > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Version => {
            println!("postshelf version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(ExitCode::SUCCESS)
}
