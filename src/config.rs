use crate::form::IsotopeCatalog;
use crate::session::DEFAULT_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid catalog entry: {0}")]
    Catalog(String),
}

/// 运行配置，全部来自环境变量（.env 已在启动时加载）
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub download_dir: PathBuf,
    pub log_dir: PathBuf,
    pub catalog: IsotopeCatalog,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = get("DECAYSIM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "DECAYSIM_BASE_URL",
                value: base_url,
            });
        }

        let timeout = match get("DECAYSIM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DECAYSIM_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(30),
        };

        let catalog = match get("DECAYSIM_CATALOG") {
            Some(raw) => IsotopeCatalog::parse(&raw)?,
            None => IsotopeCatalog::builtin(),
        };

        Ok(Self {
            base_url,
            timeout,
            download_dir: get("DECAYSIM_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            log_dir: get("DECAYSIM_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            catalog,
        })
    }
}
