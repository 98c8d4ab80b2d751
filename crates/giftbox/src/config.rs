//! Configuration management for Giftbox.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use giftbox_common::constants::{
    DEFAULT_REPLAY_INTERVAL_MS, DEFAULT_SCAN_ARGS, DEFAULT_SCAN_COMMAND, DEFAULT_SCAN_SECRET,
    DEFAULT_STORE_PATH, qr,
};
use giftbox_common::{CelebrationMessage, default_celebration_messages};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// JSON file backing the persistent key-value store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Text the scanned code must equal to unlock the quiz
    #[serde(default = "default_scan_secret")]
    pub scan_secret: String,

    /// Camera decoder configuration
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Printable QR link configuration
    #[serde(default)]
    pub qr: QrConfig,

    /// Final page content
    #[serde(default)]
    pub celebration: CelebrationConfig,
}

/// External decoder process settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Program that prints one decoded code per stdout line
    #[serde(default = "default_scan_command")]
    pub command: String,

    /// Arguments for the decoder program
    #[serde(default = "default_scan_args")]
    pub args: Vec<String>,

    /// Delay between codes replayed with `run --code`
    #[serde(default = "default_replay_interval")]
    pub replay_interval_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            command: default_scan_command(),
            args: default_scan_args(),
            replay_interval_ms: default_replay_interval(),
        }
    }
}

/// QR image link settings
#[derive(Debug, Clone, Deserialize)]
pub struct QrConfig {
    /// Image endpoint taking `size`, `data`, `bgcolor` and `color` parameters
    #[serde(default = "default_qr_generator")]
    pub generator_url: String,

    /// Square image size in pixels
    #[serde(default = "default_qr_size")]
    pub size: u32,

    /// Background color (hex)
    #[serde(default = "default_qr_background")]
    pub background: String,

    /// Foreground color (hex)
    #[serde(default = "default_qr_foreground")]
    pub foreground: String,

    /// Image download timeout (ms)
    #[serde(default = "default_qr_timeout")]
    pub timeout_ms: u64,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            generator_url: default_qr_generator(),
            size: default_qr_size(),
            background: default_qr_background(),
            foreground: default_qr_foreground(),
            timeout_ms: default_qr_timeout(),
        }
    }
}

/// Celebration page settings
#[derive(Debug, Clone, Deserialize)]
pub struct CelebrationConfig {
    #[serde(default = "default_celebration_messages")]
    pub messages: Vec<CelebrationMessage>,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            messages: default_celebration_messages(),
        }
    }
}

// Default value functions
fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }
fn default_scan_secret() -> String { DEFAULT_SCAN_SECRET.to_string() }
fn default_scan_command() -> String { DEFAULT_SCAN_COMMAND.to_string() }
fn default_scan_args() -> Vec<String> { DEFAULT_SCAN_ARGS.iter().map(|a| a.to_string()).collect() }
fn default_replay_interval() -> u64 { DEFAULT_REPLAY_INTERVAL_MS }
fn default_qr_generator() -> String { qr::GENERATOR_URL.to_string() }
fn default_qr_size() -> u32 { qr::DEFAULT_SIZE }
fn default_qr_background() -> String { qr::DEFAULT_BACKGROUND.to_string() }
fn default_qr_foreground() -> String { qr::DEFAULT_FOREGROUND.to_string() }
fn default_qr_timeout() -> u64 { qr::DOWNLOAD_TIMEOUT_MS }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref store) = args.store {
            config.store_path = store.clone();
        }
        if let Some(ref secret) = args.secret {
            config.scan_secret = secret.clone();
        }

        if config.celebration.messages.is_empty() {
            config.celebration.messages = default_celebration_messages();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            scan_secret: default_scan_secret(),
            scanner: ScannerConfig::default(),
            qr: QrConfig::default(),
            celebration: CelebrationConfig::default(),
        }
    }
}
