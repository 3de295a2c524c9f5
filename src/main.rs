//! CLI entry point for prismic-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prismic-blog")]
#[command(author = "Yukang Chen")]
#[command(version = "0.1.0")]
#[command(about = "A blog renderer for posts stored in a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read posts from a JSON fixture instead of the remote API
    #[arg(short, long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve the existing public folder without generating first
        #[arg(long)]
        no_generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (posts, slugs)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "prismic_blog=debug,info"
    } else {
        "prismic_blog=info"
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
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let fixture = cli.fixture.as_deref();

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            prismic_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Generate => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            let store = blog.store(fixture)?;
            tracing::info!("Generating static files...");
            blog.generate(store.as_ref()).await?;
            println!("Generated successfully!");
        }

        Commands::Server {
            port,
            ip,
            no_generate,
        } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            let store = blog.store(fixture)?;

            if !no_generate {
                tracing::info!("Generating static files...");
                blog.generate(store.as_ref()).await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            prismic_blog::server::start(&blog, store, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            let store = blog.store(fixture)?;
            prismic_blog::commands::list::run(&blog, store.as_ref(), &r#type).await?;
        }

        Commands::Version => {
            println!("prismic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
