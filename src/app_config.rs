use anyhow::{Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::encoding::OutputEncoding;
use crate::errors::AppError;
use crate::formats::SubtitleFormat;

/// Application configuration module
/// This module handles loading, validating and saving the settings that control
/// how subtitle files are written back to disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Encoding for written .srt files
    #[serde(default = "default_srt_encoding")]
    pub srt_encoding: OutputEncoding,

    /// Encoding for written .ass files
    #[serde(default = "default_ass_encoding")]
    pub ass_encoding: OutputEncoding,

    /// Keep a `.bak` copy when an operation rewrites its own input
    #[serde(default)]
    pub create_backup: bool,
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_srt_encoding() -> OutputEncoding {
    OutputEncoding::Utf16le
}

fn default_ass_encoding() -> OutputEncoding {
    OutputEncoding::Utf8Bom
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AppError> {
        // UTF-16BE is not accepted for ASS output
        if self.ass_encoding == OutputEncoding::Utf16be {
            return Err(AppError::Config(
                "ass_encoding 'utf16be' is not supported".to_string(),
            ));
        }
        Ok(())
    }

    /// Output encoding for a format
    pub fn encoding_for(&self, format: SubtitleFormat) -> OutputEncoding {
        match format {
            SubtitleFormat::Srt => self.srt_encoding,
            SubtitleFormat::Ass => self.ass_encoding,
            SubtitleFormat::Sub => OutputEncoding::Utf8,
        }
    }

    /// Load the configuration at `path`, or write and return the defaults if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            srt_encoding: default_srt_encoding(),
            ass_encoding: default_ass_encoding(),
            create_backup: false,
        }
    }
}
