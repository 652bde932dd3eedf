use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options for launching a new Chrome/Chromium instance
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    pub window_width: u32,

    pub window_height: u32,

    /// Chrome binary to use instead of the auto-detected one
    pub chrome_path: Option<PathBuf>,

    /// Persistent profile directory
    pub user_data_dir: Option<PathBuf>,

    pub sandbox: bool,
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Builder method: set window size
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Builder method: set Chrome binary path
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Builder method: set user data directory
    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    /// Builder method: set sandbox mode
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

/// Options for connecting to an already running browser
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionOptions {
    /// DevTools WebSocket URL (`ws://host:port/devtools/browser/<id>`)
    pub ws_url: String,

    /// Connection timeout in milliseconds
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            timeout: 30_000,
        }
    }

    /// Builder method: set timeout in milliseconds
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

pub const BASE_URL_ENV: &str = "BROWSER_ASSERT_BASE_URL";
pub const ACCEPTED_STATUSES_ENV: &str = "BROWSER_ASSERT_ACCEPTED_STATUSES";
pub const STATUS_TIMEOUT_ENV: &str = "BROWSER_ASSERT_STATUS_TIMEOUT_MS";

/// Settings of a [`TestSession`](crate::TestSession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Root URL that relative URIs passed to `visit`/`see_page_is` are joined to
    pub base_url: String,

    /// Status codes that count as a successful page load
    #[serde(default = "default_accepted_statuses")]
    pub accepted_statuses: Vec<String>,

    /// Timeout of the status probe request
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
}

fn default_accepted_statuses() -> Vec<String> {
    vec!["200".to_string(), "302".to_string()]
}

fn default_status_timeout_ms() -> u64 {
    10_000
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            accepted_statuses: default_accepted_statuses(),
            status_timeout_ms: default_status_timeout_ms(),
        }
    }

    /// Builder method: replace the accepted status codes
    pub fn accepted_statuses<I, T>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.accepted_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: set the status probe timeout in milliseconds
    pub fn status_timeout_ms(mut self, timeout: u64) -> Self {
        self.status_timeout_ms = timeout;
        self
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BrowserError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| BrowserError::Config(format!("Malformed session config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration from `BROWSER_ASSERT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url =
            lookup(BASE_URL_ENV).ok_or_else(|| BrowserError::Config(format!("{} is not set", BASE_URL_ENV)))?;
        let mut config = Self::new(base_url);

        if let Some(statuses) = lookup(ACCEPTED_STATUSES_ENV) {
            config.accepted_statuses = statuses
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(timeout) = lookup(STATUS_TIMEOUT_ENV) {
            config.status_timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|e| BrowserError::Config(format!("{} must be a number of milliseconds: {}", STATUS_TIMEOUT_ENV, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(BrowserError::Config("base_url must not be empty".to_string()));
        }

        if self.accepted_statuses.is_empty() {
            return Err(BrowserError::Config("at least one accepted status is required".to_string()));
        }

        if let Some(bad) = self
            .accepted_statuses
            .iter()
            .find(|s| s.len() != 3 || !s.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(BrowserError::Config(format!("[{}] is not a three-digit HTTP status", bad)));
        }

        Ok(())
    }

    /// Whether the given status text counts as a loaded page
    pub fn accepts(&self, status: &str) -> bool {
        self.accepted_statuses.iter().any(|s| s == status)
    }
}
