use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::error::{BoardError, Result};
use crate::time::DEFAULT_UTC_OFFSET_HOURS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_cache_bust_param")]
    pub cache_bust_param: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            cache_bust_param: default_cache_bust_param(),
            timeout_secs: None,
        }
    }
}

impl SourceConfig {
    /// 组合基础地址与资源路径
    pub fn resource_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.path.trim().trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| BoardError::Config(format!("invalid source url {raw}: {e}")))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_path() -> String {
    "spotify_prices.json".to_string()
}

fn default_cache_bust_param() -> String {
    crate::presenter::DEFAULT_CACHE_BUST_PARAM.to_string()
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_log_file() -> String {
    "price-board.log".to_string()
}

impl Settings {
    /// 从当前目录加载配置；找不到配置文件时使用默认值
    pub fn load() -> Result<Self> {
        match Self::find_config_file(Path::new(".")) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&config_content)?;
        if settings.source.cache_bust_param.trim().is_empty() {
            return Err(BoardError::Config(
                "source.cache_bust_param must not be empty".into(),
            ));
        }
        Ok(settings)
    }

    fn find_config_file(dir: &Path) -> Option<std::path::PathBuf> {
        let possible_names = ["custom-config.toml", "config.toml"];

        possible_names
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_point_at_local_snapshot() {
        let s = Settings::default();
        assert_eq!(
            s.source.resource_url().unwrap().as_str(),
            "http://127.0.0.1:8080/spotify_prices.json"
        );
        assert_eq!(s.source.cache_bust_param, "v");
        assert!(s.source.timeout().is_none());
        assert_eq!(s.display.utc_offset_hours, 8);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[source]\nbase_url = \"https://prices.example.com/board/\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let s = Settings::load_from(&path).unwrap();
        assert_eq!(
            s.source.resource_url().unwrap().as_str(),
            "https://prices.example.com/board/spotify_prices.json"
        );
        assert_eq!(s.source.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(s.logging.file, "price-board.log");
    }

    #[test]
    fn custom_config_takes_precedence() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        std::fs::write(dir.path().join("custom-config.toml"), "").unwrap();
        let found = Settings::find_config_file(dir.path()).unwrap();
        assert!(found.ends_with("custom-config.toml"));
    }

    #[test]
    fn missing_config_is_none() {
        let dir = tempdir().unwrap();
        assert!(Settings::find_config_file(dir.path()).is_none());
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[source\nbase_url = ").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(BoardError::Toml(_))));
    }

    #[test]
    fn empty_cache_bust_param_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[source]\ncache_bust_param = \" \"\n").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(BoardError::Config(_))));
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let mut s = SourceConfig::default();
        s.base_url = "not a url".into();
        assert!(matches!(s.resource_url(), Err(BoardError::Config(_))));
    }
}
