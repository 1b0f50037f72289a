use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use sensorboard_core::ConfigError;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ServerError {
    #[error("Cannot read config file {0}: {1}")]
    #[diagnostic(code(sensorboard::config_read))]
    ConfigRead(PathBuf, #[source] io::Error),

    #[error("Invalid config file {0}: {1}")]
    #[diagnostic(code(sensorboard::config_parse))]
    ConfigParse(PathBuf, #[source] serde_json::Error),

    #[error("Invalid scan configuration: {0}")]
    #[diagnostic(code(sensorboard::scan_config))]
    Scan(#[from] ConfigError),

    #[error("Invalid listen address '{0}'")]
    #[diagnostic(code(sensorboard::listen))]
    ListenAddress(String),

    #[error("Tick interval must be at least 1 ms")]
    #[diagnostic(code(sensorboard::tick))]
    TickInterval,

    #[error("Cannot bind {0}: {1}")]
    Bind(String, #[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Shutdown")]
    Shutdown,
}
