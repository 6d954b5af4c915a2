//! Centralized configuration for Minbar.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::{MinbarError, Result};

/// Central configuration for all Minbar components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MinbarConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub delivery: DeliveryConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Graceful shutdown grace period
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Audio file storage configuration.
///
/// Controls where lecture audio lives on disk and how the lecture
/// manifest is located.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding lecture audio files
    pub library_dir: PathBuf,
    /// Lecture manifest path (JSON), relative paths resolve against cwd
    pub manifest_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("library"),
            manifest_path: PathBuf::from("library/lectures.json"),
        }
    }
}

/// Response shaping for the delivery endpoints.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Cache-Control max-age for inline streamed audio
    pub cache_max_age: Duration,
    /// Whether streamed responses advertise byte-range support
    pub accept_ranges: bool,
    /// Chunk size for streamed response bodies
    pub read_buffer_size: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            cache_max_age: Duration::from_secs(31_536_000), // 1 year
            accept_ranges: true,
            read_buffer_size: 65536, // 64 KiB
        }
    }
}

impl MinbarConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    ///
    /// # Errors
    ///
    /// - `MinbarError::Configuration` - An override is set but not a
    ///   valid value for its setting
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("MINBAR_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("MINBAR_PORT") {
            config.server.port = port.parse().map_err(|_| MinbarError::Configuration {
                reason: format!("MINBAR_PORT must be a port number, got {port:?}"),
            })?;
        }

        if let Ok(dir) = std::env::var("MINBAR_LIBRARY_DIR") {
            config.storage.library_dir = PathBuf::from(&dir);
            config.storage.manifest_path = PathBuf::from(dir).join("lectures.json");
        }

        if let Ok(manifest) = std::env::var("MINBAR_MANIFEST") {
            config.storage.manifest_path = PathBuf::from(manifest);
        }

        if let Ok(max_age) = std::env::var("MINBAR_CACHE_MAX_AGE") {
            let seconds: u64 = max_age.parse().map_err(|_| MinbarError::Configuration {
                reason: format!("MINBAR_CACHE_MAX_AGE must be seconds, got {max_age:?}"),
            })?;
            config.delivery.cache_max_age = Duration::from_secs(seconds);
        }

        if let Ok(size) = std::env::var("MINBAR_READ_BUFFER_SIZE") {
            config.delivery.read_buffer_size =
                size.parse().map_err(|_| MinbarError::Configuration {
                    reason: format!("MINBAR_READ_BUFFER_SIZE must be bytes, got {size:?}"),
                })?;
        }

        Ok(config)
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Binds to an ephemeral port and disables the long cache lifetime
    /// so header assertions stay readable.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.server.port = 0;
        config.delivery.cache_max_age = Duration::from_secs(60);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MinbarConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.delivery.read_buffer_size, 65536);
        assert_eq!(
            config.delivery.cache_max_age,
            Duration::from_secs(31_536_000)
        );
        assert!(config.delivery.accept_ranges);
    }

    #[test]
    fn test_testing_preset_uses_ephemeral_port() {
        let config = MinbarConfig::for_testing();
        assert_eq!(config.server.port, 0);
        assert_eq!(config.delivery.cache_max_age, Duration::from_secs(60));
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("MINBAR_PORT", "8080");
            std::env::set_var("MINBAR_LIBRARY_DIR", "/srv/lectures");
            std::env::set_var("MINBAR_CACHE_MAX_AGE", "600");
        }

        let config = MinbarConfig::from_env().expect("valid overrides");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.library_dir, PathBuf::from("/srv/lectures"));
        assert_eq!(
            config.storage.manifest_path,
            PathBuf::from("/srv/lectures/lectures.json")
        );
        assert_eq!(config.delivery.cache_max_age, Duration::from_secs(600));

        // A set-but-invalid override is an error, not a silent default.
        unsafe {
            std::env::set_var("MINBAR_PORT", "audio");
        }
        let err = MinbarConfig::from_env().unwrap_err();
        assert!(matches!(err, MinbarError::Configuration { .. }));

        // Cleanup
        unsafe {
            std::env::remove_var("MINBAR_PORT");
            std::env::remove_var("MINBAR_LIBRARY_DIR");
            std::env::remove_var("MINBAR_CACHE_MAX_AGE");
        }
    }
}
