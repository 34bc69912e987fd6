use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::errors::{WatchError, WatchResult};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

const DEFAULT_FEED_URL: &str = "https://lowendtalk.com/categories/offers.rss";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Credentials and endpoint for the ntfy topic notifications are posted to.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NtfyConfig {
    #[serde(default)]
    pub topic_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub ntfy: NtfyConfig,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_db_path() -> String {
    "seen.db".to_string()
}

fn default_poll_interval() -> u64 {
    45
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            db_path: default_db_path(),
            poll_interval_secs: default_poll_interval(),
            user_agent: default_user_agent(),
            log_level: default_log_level(),
            ntfy: NtfyConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, `.env` and the process environment.
    ///
    /// With `path == None` the default `config.toml` is optional; an explicitly
    /// named file must exist.
    pub fn load(path: Option<&Path>) -> WatchResult<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> WatchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WatchError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> WatchResult<Self> {
        toml::from_str(s).map_err(|e| WatchError::Config(format!("config parse error: {e}")))
    }

    /// Apply overrides from the environment. Empty values are ignored.
    ///
    /// Supported variables: `NTFY_TOPIC_URL`, `NTFY_USERNAME`, `NTFY_PASSWORD`,
    /// `FEED_WATCH_FEED_URL`, `FEED_WATCH_DB_PATH`, `FEED_WATCH_INTERVAL_SECS`,
    /// `FEED_WATCH_USER_AGENT`, `FEED_WATCH_LOG_LEVEL`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> WatchResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = var("NTFY_TOPIC_URL") {
            self.ntfy.topic_url = v;
        }
        if let Some(v) = var("NTFY_USERNAME") {
            self.ntfy.username = v;
        }
        if let Some(v) = var("NTFY_PASSWORD") {
            self.ntfy.password = v;
        }
        if let Some(v) = var("FEED_WATCH_FEED_URL") {
            self.feed_url = v;
        }
        if let Some(v) = var("FEED_WATCH_DB_PATH") {
            self.db_path = v;
        }
        if let Some(v) = var("FEED_WATCH_INTERVAL_SECS") {
            self.poll_interval_secs = v.parse().map_err(|_| {
                WatchError::Config(format!(
                    "FEED_WATCH_INTERVAL_SECS must be a whole number of seconds, got {v:?}"
                ))
            })?;
        }
        if let Some(v) = var("FEED_WATCH_USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = var("FEED_WATCH_LOG_LEVEL") {
            self.log_level = v;
        }

        Ok(())
    }

    /// Check the settings every command needs.
    pub fn validate(&self) -> WatchResult<()> {
        Url::parse(&self.feed_url)
            .map_err(|e| WatchError::InvalidUrl(format!("feed_url {}: {}", self.feed_url, e)))?;

        if self.poll_interval_secs == 0 {
            return Err(WatchError::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Check the ntfy settings; only needed when notifications will be sent.
    pub fn validate_notifier(&self) -> WatchResult<()> {
        if self.ntfy.topic_url.is_empty() {
            return Err(WatchError::Config(
                "ntfy.topic_url is not set. Set it in config.toml or via NTFY_TOPIC_URL"
                    .to_string(),
            ));
        }

        Url::parse(&self.ntfy.topic_url).map_err(|e| {
            WatchError::InvalidUrl(format!("ntfy.topic_url {}: {}", self.ntfy.topic_url, e))
        })?;

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.feed_url, "https://lowendtalk.com/categories/offers.rss");
        assert_eq!(config.db_path, "seen.db");
        assert_eq!(config.poll_interval_secs, 45);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.ntfy, NtfyConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::parse(
            r#"
feed_url = "https://example.com/feed.xml"
db_path = "/var/lib/feed-watch/seen.db"
poll_interval_secs = 120

[ntfy]
topic_url = "https://ntfy.sh/deals"
username = "alice"
password = "secret"
"#,
        )
        .unwrap();

        assert_eq!(config.feed_url, "https://example.com/feed.xml");
        assert_eq!(config.db_path, "/var/lib/feed-watch/seen.db");
        assert_eq!(config.poll_interval(), Duration::from_secs(120));
        assert_eq!(config.ntfy.topic_url, "https://ntfy.sh/deals");
        assert_eq!(config.ntfy.username, "alice");
        assert_eq!(config.ntfy.password, "secret");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.poll_interval_secs, 45);
        assert!(config.ntfy.topic_url.is_empty());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("poll_interval_secs = \"soon\"");
        assert!(matches!(result, Err(WatchError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(WatchError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("NTFY_TOPIC_URL", "https://ntfy.example.com/offers"),
                ("NTFY_USERNAME", "bob"),
                ("NTFY_PASSWORD", "hunter2"),
                ("FEED_WATCH_DB_PATH", "/tmp/seen.db"),
                ("FEED_WATCH_INTERVAL_SECS", "10"),
            ]))
            .unwrap();

        assert_eq!(config.ntfy.topic_url, "https://ntfy.example.com/offers");
        assert_eq!(config.ntfy.username, "bob");
        assert_eq!(config.ntfy.password, "hunter2");
        assert_eq!(config.db_path, "/tmp/seen.db");
        assert_eq!(config.poll_interval_secs, 10);
    }

    #[test]
    fn test_env_empty_values_ignored() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("NTFY_USERNAME", ""),
                ("FEED_WATCH_INTERVAL_SECS", ""),
            ]))
            .unwrap();

        assert!(config.ntfy.username.is_empty());
        assert_eq!(config.poll_interval_secs, 45);
    }

    #[test]
    fn test_env_invalid_interval_is_error() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(env(&[("FEED_WATCH_INTERVAL_SECS", "often")]));

        match result {
            Err(WatchError::Config(msg)) => assert!(msg.contains("FEED_WATCH_INTERVAL_SECS")),
            other => panic!("expected config error, got {:?}", other),
        }
        assert_eq!(config.poll_interval_secs, 45);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            poll_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(WatchError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_feed_url() {
        let config = Config {
            feed_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(WatchError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_notifier() {
        let mut config = Config::default();
        assert!(config.validate_notifier().is_err());

        config.ntfy.topic_url = "https://ntfy.sh/deals".to_string();
        assert!(config.validate_notifier().is_ok());
    }
}
