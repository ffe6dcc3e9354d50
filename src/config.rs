use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::models::SearchInput;

pub const DEFAULT_BASE_URL: &str = "https://www.tiktok.com/api/search/user/full/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0 Safari/537.36";
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tiktok: TikTokConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TikTokConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout: f64,
}

impl Default for TikTokConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub max_items: usize,
    /// Delay between page requests, in seconds.
    pub sleep_between_requests: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_items: 50,
            sleep_between_requests: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load settings from `path`, or from the default location when no path is given.
    ///
    /// An explicit path that does not exist is an error; a missing default file
    /// falls back to built-in defaults. Environment overrides apply either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `KEY=value` overrides from `lookup`. Values that fail to parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup("TIKTOK_BASE_URL") {
            self.tiktok.base_url = base_url;
        }
        if let Some(user_agent) = lookup("TIKTOK_USER_AGENT") {
            self.tiktok.user_agent = user_agent;
        }
        if let Some(timeout) = lookup("TIKTOK_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.tiktok.timeout = timeout;
        }
        if let Some(delay) = lookup("SCRAPER_DELAY_SECS").and_then(|v| v.trim().parse().ok()) {
            self.scraper.sleep_between_requests = delay;
        }
        if let Some(max_items) = lookup("SCRAPER_MAX_ITEMS").and_then(|v| v.trim().parse().ok()) {
            self.scraper.max_items = max_items;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Reject durations that cannot be represented, e.g. `inf` or `1e20` seconds.
    pub fn validate(&self) -> Result<()> {
        self.request_timeout()?;
        self.request_delay()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        secs_to_duration("tiktok.timeout", self.tiktok.timeout)
    }

    pub fn request_delay(&self) -> Result<Duration> {
        secs_to_duration(
            "scraper.sleep_between_requests",
            self.scraper.sleep_between_requests,
        )
    }

    /// Tracing filter directive for this crate, e.g. `tiktok_user_scraper=debug`.
    pub fn log_directive(&self) -> String {
        let level = match self.logging.level.to_lowercase().as_str() {
            "critical" | "error" => "error",
            "warning" | "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        };
        format!("tiktok_user_scraper={}", level)
    }
}

/// Seconds to [`Duration`]. Negative values clamp to zero; NaN, infinite and
/// overflowing values are a config error.
pub(crate) fn secs_to_duration(setting: &str, secs: f64) -> Result<Duration> {
    let secs = if secs < 0.0 { 0.0 } else { secs };
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::Config(format!("Invalid {} of {} seconds: {}", setting, secs, e)))
}

/// Effective settings for one run after layering CLI flags over the input file over config.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub max_items: usize,
    pub format: ExportFormat,
    pub output_dir: PathBuf,
}

impl RunOptions {
    /// Resolve each setting with precedence CLI > input file > config.
    ///
    /// The output directory has no input-file field, so it is CLI > config.
    pub fn resolve(
        max_items: Option<usize>,
        output_format: Option<&str>,
        output_dir: Option<&Path>,
        input: &SearchInput,
        config: &Config,
    ) -> Result<Self> {
        let max_items = max_items
            .or(input.max_items)
            .unwrap_or(config.scraper.max_items);
        let format = output_format
            .or(input.output_format.as_deref())
            .unwrap_or(config.output.format.as_str())
            .parse()?;
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.output.directory.clone());

        Ok(Self {
            max_items,
            format,
            output_dir,
        })
    }
}
