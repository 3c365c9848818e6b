//! CLI entry point for openliquid-docs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openliquid_docs::{commands, server, Docs};

#[derive(Parser)]
#[command(name = "openliquid-docs")]
#[command(version)]
#[command(about = "Documentation pages for the OpenLiquid website", long_about = None)]
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
    /// List documents, newest first
    #[command(alias = "ls")]
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single document
    Show {
        /// Document slug
        slug: String,

        /// Print the rendered HTML body instead of the markdown
        #[arg(long)]
        html: bool,
    },

    /// Print the detail page path of every document
    Paths,

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "openliquid_docs=debug,info"
    } else {
        "openliquid_docs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { json } => {
            let docs = Docs::new(&base_dir)?;
            commands::list::run(&docs, json)?;
        }

        Commands::Show { slug, html } => {
            let docs = Docs::new(&base_dir)?;
            commands::show::run(&docs, &slug, html)?;
        }

        Commands::Paths => {
            let docs = Docs::new(&base_dir)?;
            commands::paths::run(&docs)?;
        }

        Commands::Generate { watch } => {
            let docs = Docs::new(&base_dir)?;
            tracing::info!("Generating static files...");

            docs.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || commands::generate::watch(&docs)).await??;
            }
        }

        Commands::Clean => {
            let docs = Docs::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            docs.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Server { port, ip } => {
            let docs = Docs::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&docs, &ip, port).await?;
        }

        Commands::Version => {
            println!("openliquid-docs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
