use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default thumbnail width in pixels
pub const DEFAULT_THUMB_WIDTH: u32 = 320;

/// Configuration for the photo ingest process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the per-month record shards
    pub record_dir: PathBuf,

    /// Width of generated thumbnails; height follows the aspect ratio
    pub thumb_width: u32,

    /// Uploader executable (PicGo compatible)
    pub uploader_path: PathBuf,

    /// Arguments passed to the uploader before the file paths
    pub uploader_args: Vec<String>,

    /// Whether to verify the uploader runs before ingesting
    pub check_uploader: bool,

    /// Undo rename and thumbnail when a later stage fails
    pub rollback_on_failure: bool,

    /// Verbose output
    pub debug: bool,

    /// Directory for rolling log files; console logging when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_dir: PathBuf::from("records"),
            thumb_width: DEFAULT_THUMB_WIDTH,
            uploader_path: PathBuf::from("picgo"),
            uploader_args: vec!["upload".to_string()],
            check_uploader: true,
            rollback_on_failure: false,
            debug: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config.expand_paths())
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Overlay settings from a `.env` file and the process environment.
    ///
    /// An explicit `env_file` must exist; otherwise a `.env` in the current
    /// directory is loaded if present. Variables already set in the process
    /// environment take precedence over the file.
    pub fn with_env(self, env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| {
                    Error::Configuration(format!(
                        "Failed to load env file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
            None => {
                dotenv::dotenv().ok();
            }
        }

        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Overlay settings from an arbitrary variable lookup
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("RECORD_DIR") {
            self.record_dir = PathBuf::from(dir);
        }
        if let Some(width) = get("THUMB_WIDTH") {
            self.thumb_width = width.trim().parse().map_err(|_| {
                Error::Configuration(format!("THUMB_WIDTH is not a number: {}", width))
            })?;
        }
        if let Some(path) = get("PICGO_PATH") {
            self.uploader_path = PathBuf::from(path);
        }
        if let Some(args) = get("PICGO_ARGS") {
            self.uploader_args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(value) = get("CHECK_PICGO") {
            self.check_uploader = parse_bool("CHECK_PICGO", &value)?;
        }
        if let Some(value) = get("ROLLBACK_ON_FAILURE") {
            self.rollback_on_failure = parse_bool("ROLLBACK_ON_FAILURE", &value)?;
        }
        if let Some(value) = get("DEBUG") {
            self.debug = parse_bool("DEBUG", &value)?;
        }
        if let Some(dir) = get("LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }

        Ok(self.expand_paths())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.thumb_width == 0 {
            return Err(Error::Configuration(
                "Thumbnail width must be greater than zero".to_string(),
            ));
        }

        if self.uploader_path.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Uploader path must not be empty".to_string(),
            ));
        }

        if self.record_dir.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Record directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn expand_paths(mut self) -> Self {
        self.record_dir = expand_home(&self.record_dir);
        self.uploader_path = expand_home(&self.uploader_path);
        self.log_dir = self.log_dir.as_deref().map(expand_home);
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(Error::Configuration(format!(
            "{} must be true/false/1/0, got {}",
            key, other
        ))),
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
