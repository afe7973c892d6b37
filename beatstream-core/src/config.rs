//! Centralized configuration for Beatstream.
//!
//! Directory locations, listen address and streaming parameters live here
//! instead of being hard-coded in handlers, so tests can point the whole
//! server at temporary directories.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::BeatstreamError;

/// Central configuration for all Beatstream components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct BeatstreamConfig {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub streaming: StreamingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Register the attachment download route
    pub enable_downloads: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_downloads: false,
        }
    }
}

impl ServerConfig {
    /// Resolves host and port into a bindable socket address.
    ///
    /// # Errors
    ///
    /// - `BeatstreamError::Configuration` - If host is not a valid IP address
    pub fn socket_addr(&self) -> Result<SocketAddr, BeatstreamError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| BeatstreamError::Configuration {
                reason: format!("invalid listen address {}:{}: {e}", self.host, self.port),
            })
    }
}

/// Audio library locations and listing defaults.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Flat directory holding the audio files
    pub audio_dir: PathBuf,
    /// Directory holding `<audio file>.json` sidecars
    pub metadata_dir: PathBuf,
    /// Page size used when the client sends no limit
    pub default_page_limit: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("./audio_files"),
            metadata_dir: PathBuf::from("./meta_data_files"),
            default_page_limit: 10,
        }
    }
}

/// Partial-content streaming parameters.
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// Read buffer size for range responses
    pub chunk_size: usize,
    /// Content type announced for streamed audio
    pub content_type: &'static str,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16 * 1024, // 16 KiB
            content_type: "audio/mpeg",
        }
    }
}

impl BeatstreamConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("BEATSTREAM_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("BEATSTREAM_PORT")
            && let Ok(port) = port.parse::<u16>()
        {
            config.server.port = port;
        }

        if let Ok(enabled) = std::env::var("BEATSTREAM_ENABLE_DOWNLOADS") {
            config.server.enable_downloads = enabled.parse().unwrap_or(false);
        }

        if let Ok(dir) = std::env::var("BEATSTREAM_AUDIO_DIR") {
            config.library.audio_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("BEATSTREAM_METADATA_DIR") {
            config.library.metadata_dir = PathBuf::from(dir);
        }

        if let Ok(limit) = std::env::var("BEATSTREAM_PAGE_LIMIT")
            && let Ok(limit) = limit.parse::<usize>()
            && limit > 0
        {
            config.library.default_page_limit = limit;
        }

        config
    }

    /// Creates a configuration rooted at the given library directories.
    pub fn for_library(audio_dir: impl AsRef<Path>, metadata_dir: impl AsRef<Path>) -> Self {
        Self {
            library: LibraryConfig {
                audio_dir: audio_dir.as_ref().to_path_buf(),
                metadata_dir: metadata_dir.as_ref().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = BeatstreamConfig::default();

        assert_eq!(config.server.port, 8080);
        assert!(!config.server.enable_downloads);
        assert_eq!(config.library.audio_dir, PathBuf::from("./audio_files"));
        assert_eq!(config.library.metadata_dir, PathBuf::from("./meta_data_files"));
        assert_eq!(config.library.default_page_limit, 10);
        assert_eq!(config.streaming.chunk_size, 16384);
        assert_eq!(config.streaming.content_type, "audio/mpeg");
    }

    #[test]
    fn test_for_library() {
        let config = BeatstreamConfig::for_library("/tmp/a", "/tmp/m");
        assert_eq!(config.library.audio_dir, PathBuf::from("/tmp/a"));
        assert_eq!(config.library.metadata_dir, PathBuf::from("/tmp/m"));
        assert_eq!(config.library.default_page_limit, 10);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad.socket_addr(),
            Err(BeatstreamError::Configuration { .. })
        ));
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("BEATSTREAM_PORT", "9090");
            std::env::set_var("BEATSTREAM_AUDIO_DIR", "/srv/audio");
            std::env::set_var("BEATSTREAM_PAGE_LIMIT", "0");
            std::env::set_var("BEATSTREAM_ENABLE_DOWNLOADS", "true");
        }

        let config = BeatstreamConfig::from_env();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.library.audio_dir, PathBuf::from("/srv/audio"));
        assert_eq!(config.library.default_page_limit, 10);
        assert!(config.server.enable_downloads);

        // Cleanup
        unsafe {
            std::env::remove_var("BEATSTREAM_PORT");
            std::env::remove_var("BEATSTREAM_AUDIO_DIR");
            std::env::remove_var("BEATSTREAM_PAGE_LIMIT");
            std::env::remove_var("BEATSTREAM_ENABLE_DOWNLOADS");
        }
    }
}
