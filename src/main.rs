//! CLI entry point for course-site

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_site::{commands, server, Course};

#[derive(Parser)]
#[command(name = "course-site")]
#[command(version)]
#[command(about = "A static site generator for course websites", long_about = None)]
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
    /// Initialize a new course site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new lecture note
    New {
        /// Title of the new note
        title: String,

        /// Route of the note, e.g. /basics (defaults to the slugified title)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Deploy after generation
        #[arg(long)]
        deploy: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (notes, pages, routes)
        #[arg(default_value = "notes")]
        r#type: String,
    },

    /// Publish the public folder to the configured git remote
    Deploy {
        /// Print the deploy commands without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "course_site=debug,info"
    } else {
        "course_site=info"
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
        None => std::env::current_dir().context("reading the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing course site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized course site in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let course = Course::new(&base_dir)?;
            let file = commands::new::create_note(&course, &title, path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Generate { watch, deploy } => {
            let course = Course::new(&base_dir)?;
            tracing::info!("Generating static files...");

            course.generate()?;
            println!("Generated successfully!");

            if deploy {
                course.deploy()?;
            }

            if watch {
                tracing::info!("Watching for file changes...");
                commands::generate::watch(&course).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let course = Course::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            course.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&course, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let course = Course::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            course.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let course = Course::new(&base_dir)?;
            commands::list::run(&course, &r#type)?;
        }

        Commands::Deploy { dry_run } => {
            let course = Course::new(&base_dir)?;
            commands::deploy::run(&course, dry_run)?;
        }

        Commands::Version => {
            println!("course-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
