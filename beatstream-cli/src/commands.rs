//! CLI command implementations

use std::path::PathBuf;

use anyhow::Context;
use beatstream_core::{AudioLibrary, BeatstreamConfig, BeatstreamError, Page, PageRequest};
use clap::Subcommand;
use tracing::info;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        #[command(flatten)]
        library: LibraryArgs,
        /// Expose the attachment download endpoint
        #[arg(long)]
        enable_downloads: bool,
    },
    /// Print one page of the audio library as JSON
    List {
        /// RFC3339 cursor returned by a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Maximum number of files to print
        #[arg(short, long)]
        limit: Option<String>,
        #[command(flatten)]
        library: LibraryArgs,
    },
}

/// Library directory overrides shared by all commands.
#[derive(clap::Args, Debug, Default)]
pub struct LibraryArgs {
    /// Directory containing audio files
    #[arg(long)]
    audio_dir: Option<PathBuf>,
    /// Directory containing `<audio file>.json` metadata
    #[arg(long)]
    metadata_dir: Option<PathBuf>,
}

impl LibraryArgs {
    fn apply(self, config: &mut BeatstreamConfig) {
        if let Some(dir) = self.audio_dir {
            config.library.audio_dir = dir;
        }
        if let Some(dir) = self.metadata_dir {
            config.library.metadata_dir = dir;
        }
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns the error of the command that failed, with context
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = BeatstreamConfig::from_env();

    match command {
        Commands::Server {
            host,
            port,
            library,
            enable_downloads,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.server.enable_downloads |= enable_downloads;
            library.apply(&mut config);

            start_server(config).await
        }
        Commands::List {
            cursor,
            limit,
            library,
        } => {
            library.apply(&mut config);
            let page = list_page(&config, cursor.as_deref(), limit.as_deref())
                .await
                .map_err(|e| cli_error(e, "failed to list audio library"))?;
            let rendered =
                serde_json::to_string_pretty(&page).context("failed to encode page as JSON")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

/// Run the API server until interrupted
///
/// # Errors
/// - Listen address invalid, socket bind failure or server I/O failure
pub async fn start_server(config: BeatstreamConfig) -> anyhow::Result<()> {
    info!(
        "Starting Beatstream on {}:{}",
        config.server.host, config.server.port
    );
    beatstream_web::run_server(config)
        .await
        .map_err(|e| cli_error(e, "server terminated with an error"))
}

/// Input mistakes are reported as their plain message; anything else keeps
/// its source chain under `action`.
fn cli_error(err: BeatstreamError, action: &'static str) -> anyhow::Error {
    if err.is_user_error() {
        anyhow::anyhow!(err.user_message())
    } else {
        anyhow::Error::new(err).context(action)
    }
}

/// Build the same page the listing endpoint would return
///
/// # Errors
/// - Invalid cursor or limit, or unreadable audio directory
pub async fn list_page(
    config: &BeatstreamConfig,
    cursor: Option<&str>,
    limit: Option<&str>,
) -> beatstream_core::Result<Page> {
    let request = PageRequest::parse(cursor, limit, config.library.default_page_limit)?;
    let library = AudioLibrary::from_config(&config.library);
    Ok(library.page(&request).await?)
}
