use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use umlkit::{api, config::Config, render};
use umlkit_core::{Snapshot, Store};

#[derive(Parser)]
#[command(name = "umlk")]
#[command(about = "UML class model editor with saved snapshots")]
struct Cli {
    /// SQLite file holding saved models (overrides UMLKIT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (overrides UMLKIT_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List saved models
    Saves,
    /// Print a saved model as a tree
    Show { name: String },
    /// Print a saved model as JSON
    Export { name: String },
    /// Check a JSON snapshot file and save it under a name
    Import { name: String, path: PathBuf },
    /// Delete a saved model
    Delete { name: String },
}

/// Initialize tracing with output to stderr (for printing commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "umlkit=debug,umlkit_core=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout clean for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting umlkit server on port {}", config.port);

    let db = config.open_database()?;
    let app = api::create_router(api::AppState::new(db, config.event_log_capacity));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("umlkit listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config).await?;
        }
        None => serve(&config).await?,
        Some(Commands::Saves) => {
            let db = config.open_database()?;
            for saved in db.list_saves()? {
                let marker = if saved.active { "*" } else { " " };
                println!(
                    "{} {}  (updated {})",
                    marker,
                    saved.name,
                    saved.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Some(Commands::Show { name }) => {
            let db = config.open_database()?;
            let snapshot = db
                .get_snapshot(&name)?
                .with_context(|| format!("No saved model named '{}'", name))?;
            print!("{}", render::render_model(&snapshot));
        }
        Some(Commands::Export { name }) => {
            let db = config.open_database()?;
            let snapshot = db
                .get_snapshot(&name)?
                .with_context(|| format!("No saved model named '{}'", name))?;
            println!("{}", snapshot.to_json_pretty());
        }
        Some(Commands::Import { name, path }) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let snapshot = Snapshot::from_json(&json)?;
            // Replaying proves the snapshot satisfies every store invariant.
            let store = Store::from_snapshot(&snapshot)?;

            let db = config.open_database()?;
            db.save_snapshot(&name, &store.export_snapshot())?;
            println!(
                "Saved '{}' ({} classes, {} relationships)",
                name,
                snapshot.classes.len(),
                snapshot.relationships.len()
            );
        }
        Some(Commands::Delete { name }) => {
            let db = config.open_database()?;
            if db.delete_snapshot(&name)? {
                println!("Deleted '{}'", name);
            } else {
                anyhow::bail!("No saved model named '{}'", name);
            }
        }
    }

    Ok(())
}
