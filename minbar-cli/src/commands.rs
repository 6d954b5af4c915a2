//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use minbar_core::config::MinbarConfig;
use minbar_core::counters::InMemoryCounterSink;
use minbar_core::delivery::mime_for_filename;
use minbar_core::lecture::ManifestLectureStore;
use minbar_core::storage::{FileStorage, LocalFileStorage};
use minbar_core::tracing_setup::{CliLogLevel, init_tracing};
use minbar_web::AppState;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the audio delivery server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory holding lecture audio files
        #[arg(long)]
        library: Option<PathBuf>,
        /// Lecture manifest path (defaults to <library>/lectures.json)
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Console log level
        #[arg(long, default_value = "info")]
        log_level: CliLogLevel,
        /// Directory for the persistent debug log (console-only if unset)
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },
    /// Inspect an audio file reference in the library
    Inspect {
        /// File reference (bare filename inside the library)
        file_ref: String,
        /// Directory holding lecture audio files
        #[arg(long)]
        library: Option<PathBuf>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            library,
            manifest,
            log_level,
            logs_dir,
        } => serve(host, port, library, manifest, log_level, logs_dir).await,
        Commands::Inspect { file_ref, library } => inspect(file_ref, library).await,
    }
}

/// Start the delivery server over a manifest-backed lecture store.
///
/// # Errors
/// - Manifest missing or invalid
/// - Listener bind failure
async fn serve(
    host: Option<String>,
    port: Option<u16>,
    library: Option<PathBuf>,
    manifest: Option<PathBuf>,
    log_level: CliLogLevel,
    logs_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = MinbarConfig::from_env()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(library) = library {
        config.storage.manifest_path = library.join("lectures.json");
        config.storage.library_dir = library;
    }
    if let Some(manifest) = manifest {
        config.storage.manifest_path = manifest;
    }

    init_tracing(log_level, logs_dir.as_deref())?;

    let lectures = ManifestLectureStore::load(&config.storage.manifest_path).await?;
    println!(
        "Loaded {} lectures from {}",
        lectures.len(),
        config.storage.manifest_path.display()
    );
    println!(
        "Serving audio from {}",
        config.storage.library_dir.display()
    );

    let state = AppState::new(
        Arc::new(lectures),
        Arc::new(LocalFileStorage::new(config.storage.library_dir.clone())),
        Arc::new(InMemoryCounterSink::new()),
        config.delivery.clone(),
    );

    println!(
        "Stream:   http://{}:{}/stream/<id>",
        config.server.host, config.server.port
    );
    println!(
        "Download: http://{}:{}/download/<id>",
        config.server.host, config.server.port
    );
    println!("Press Ctrl+C to stop the server");

    minbar_web::run_server(&config, state).await?;

    Ok(())
}

/// Resolve and stat a file reference the way the server would.
///
/// # Errors
/// - Invalid file reference or missing file
async fn inspect(file_ref: String, library: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = MinbarConfig::from_env()?;
    if let Some(library) = library {
        config.storage.library_dir = library;
    }

    let storage = LocalFileStorage::new(config.storage.library_dir.clone());
    let path = storage.resolve(&file_ref)?;
    let stat = storage.stat(&path).await?;

    println!("File:     {file_ref}");
    println!("Size:     {} bytes", stat.size);
    println!("MIME:     {}", mime_for_filename(&file_ref));
    match stat.modified {
        Some(modified) => println!("Modified: {modified:?}"),
        None => println!("Modified: unknown"),
    }

    Ok(())
}
