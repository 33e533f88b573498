use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The `log` crate filter this level corresponds to
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for the closet pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where freshly uploaded, unprocessed originals live
    pub input_dir: PathBuf,

    /// Where extracted results and composites are written
    pub output_dir: PathBuf,

    /// Where originals are moved when archiving is requested
    pub archive_dir: PathBuf,

    /// Path to the catalog database file
    pub database_path: PathBuf,

    /// Generative model used for article extraction
    pub extraction_model: String,

    /// Pixel size of each cell in a composed outfit grid
    pub composite_cell_size: u32,

    /// Uniform padding around cells in a composed outfit grid, in pixels
    pub composite_padding: u32,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("images/input"),
            output_dir: PathBuf::from("images/output"),
            archive_dir: PathBuf::from("images/archive"),
            database_path: PathBuf::from("data/closet.db"),
            extraction_model: "gemini-2.5-flash-image-preview".to_string(),
            composite_cell_size: 512,
            composite_padding: 16,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.composite_cell_size == 0 {
            return Err(Error::Configuration(
                "composite_cell_size must be non-zero".to_string(),
            ));
        }
        if self.extraction_model.trim().is_empty() {
            return Err(Error::Configuration(
                "extraction_model must not be empty".to_string(),
            ));
        }
        if self.input_dir == self.archive_dir {
            return Err(Error::Configuration(
                "input_dir and archive_dir must be distinct".to_string(),
            ));
        }
        Ok(())
    }
}

// -- Tests --
