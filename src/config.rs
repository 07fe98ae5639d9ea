use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::api::DEFAULT_API_URL;

pub const API_URL_VAR: &str = "SELECTFLOW_API_URL";
pub const LOG_VAR: &str = "SELECTFLOW_LOG";
const DEFAULT_LOG_FILTER: &str = "info";
const LOG_FILE: &str = "selectflow.log";

pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// `api_url` is what clap resolved from the flag or `SELECTFLOW_API_URL`.
    pub fn load(api_url: Option<String>, data_dir: PathBuf) -> Self {
        Self {
            api_url: resolve_api_url(api_url),
            data_dir,
        }
    }
}

fn resolve_api_url(api_url: Option<String>) -> String {
    let url = api_url.unwrap_or_else(|| {
        info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
        DEFAULT_API_URL.to_string()
    });
    url.trim().trim_end_matches('/').to_string()
}

/// Where the log file and the saved session live.
pub fn data_dir() -> PathBuf {
    match directories::ProjectDirs::from("", "", "selectflow") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("."),
    }
}

fn log_filter() -> String {
    env::var(LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Sends tracing output to `<data_dir>/selectflow.log`. The terminal is
/// reserved for the TUI and for command output.
pub fn init_logging(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = log_filter();
    let (env_filter, rejected) = match EnvFilter::try_new(&filter) {
        Ok(env_filter) => (env_filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(env_filter)
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(e) = rejected {
        warn!("Invalid {LOG_VAR} value '{filter}': {e}");
    }
    Ok(path)
}
