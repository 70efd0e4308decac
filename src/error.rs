use crate::domain::action::LineId;
use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failures. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure to drive an output line.
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("IO error on {line}: {source}")]
    Io {
        line: LineId,
        #[source]
        source: std::io::Error,
    },
    #[error("GPIO pin {pin} for {line} did not appear after export")]
    NotExported { line: LineId, pin: u32 },
    #[error("line {0} is not available")]
    Unavailable(LineId),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Hardware(#[from] HardwareError),
    #[error("report error: {0}")]
    Report(String),
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        TrackerError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
