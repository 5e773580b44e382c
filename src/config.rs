//! Configuration for Quizpilot
//!
//! Values resolve in three layers: built-in defaults, then
//! `<home>/config.toml`, then whatever the CLI overrides through the
//! `with_*` builders.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::{QuizpilotError, Result};

/// Default server the web application is served from.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

/// Quiet period before a creator lookup is issued.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest trimmed query that reaches the network.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for Quizpilot
#[derive(Debug, Clone)]
pub struct QuizpilotConfig {
    /// Base URL of the quiz web application
    pub server_url: Url,

    /// Raw `Cookie` header sent with every request (session + csrf)
    pub session_cookie: Option<String>,

    /// Directory holding config.toml, the log file and auto-saved forms
    pub home: PathBuf,

    /// Debounce window for search-as-you-type
    pub search_debounce: Duration,

    /// Minimum query length for creator lookups
    pub min_query_chars: usize,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,

    /// Whether to log at debug level
    pub verbose: bool,
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server_url: Option<String>,
    session_cookie: Option<String>,
    search_debounce_ms: Option<u64>,
    min_query_chars: Option<usize>,
    request_timeout_secs: Option<u64>,
    verbose: Option<bool>,
}

impl QuizpilotConfig {
    pub fn new(home: PathBuf) -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid"),
            session_cookie: None,
            home,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            verbose: false,
        }
    }

    /// Build a config from `<home>/config.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load(home: PathBuf) -> Result<Self> {
        let path = home.join("config.toml");
        let mut config = Self::new(home);
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(config);
        }

        let text = std::fs::read_to_string(&path)?;
        let file: FileConfig = toml::from_str(&text)?;
        debug!("Loaded config from {:?}", path);

        if let Some(url) = file.server_url {
            config.server_url = parse_server_url(&url)?;
        }
        config.session_cookie = file.session_cookie.or(config.session_cookie);
        if let Some(ms) = file.search_debounce_ms {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(chars) = file.min_query_chars {
            config.min_query_chars = chars;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        config.verbose = file.verbose.unwrap_or(config.verbose);
        Ok(config)
    }

    pub fn with_server_url(mut self, url: &str) -> Result<Self> {
        self.server_url = parse_server_url(url)?;
        Ok(self)
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Directory where auto-saved form records live
    pub fn autosave_dir(&self) -> PathBuf {
        self.home.join("autosave")
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_file(&self) -> PathBuf {
        self.home.join("quizpilot.log")
    }
}

/// Resolve the Quizpilot home directory.
///
/// `$QUIZPILOT_HOME` wins; otherwise `~/.quizpilot`.
pub fn resolve_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("QUIZPILOT_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| QuizpilotError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".quizpilot"))
}

/// Ensure the home directory exists before anything writes into it.
pub fn ensure_home(home: &Path) -> Result<()> {
    std::fs::create_dir_all(home)?;
    Ok(())
}

fn parse_server_url(raw: &str) -> Result<Url> {
    // Relative joins drop the last path segment unless the base ends in '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| QuizpilotError::Config(format!("invalid server url {raw:?}: {e}")))
}
