use log::{info, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Environment variable overriding the file log level
pub const LOG_LEVEL_ENV: &str = "PHOTO_MANAGER_LOG";

/// Initialize the logger with timestamp, log level, and module path.
/// Logs go to a rotating file in `log_dir` so terminal output stays clean.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<()> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(level);

    std::fs::create_dir_all(log_dir).map_err(|e| Error::file(log_dir, e))?;

    let log_file_path = log_dir.join("photo-manager.log");
    let archived_logs_pattern = format!("{}/photo-manager.{{}}.log", log_dir.display());

    // Rotate at 10MB, keep 5 archived files
    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern, 5)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;
    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| Error::file(&log_file_path, e))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Log a file operation that failed, at the caller's location
#[macro_export]
macro_rules! log_file_error {
    ($path:expr, $operation:expr, $error:expr) => {
        log::error!(
            "File operation failed - Operation: {}, Path: {}, Error: {}",
            $operation,
            $path.display(),
            $error
        )
    };
}

/// Log a fingerprint failure
#[macro_export]
macro_rules! log_hash_error {
    ($path:expr, $error:expr) => {
        log::error!(
            "Hash computation failed - Path: {}, Error: {}",
            $path.display(),
            $error
        )
    };
}

/// Log a filesystem modification
#[macro_export]
macro_rules! log_fs_modification {
    ($operation:expr, $path:expr) => {
        log::info!("FS CHANGE - Operation: {}, Path: {}", $operation, $path.display())
    };
    ($operation:expr, $path:expr, $details:expr) => {
        log::info!(
            "FS CHANGE - Operation: {}, Path: {}, Details: {}",
            $operation,
            $path.display(),
            $details
        )
    };
}
