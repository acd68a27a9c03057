//! 配置文件 `~/.config/wanikani-notifier/config.json`
//!
//! 所有字段均可省略；文件不存在时使用默认值，格式错误时报错。
//! 命令行参数（及其环境变量）优先于配置文件。

use crate::notification::{NotifierKind, NotifierParams, DEFAULT_DASHBOARD_URL, DEFAULT_TITLE};
use crate::wanikani::WaniKaniConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pushsafer 凭证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushsaferSettings {
    pub private_key: String,
}

/// Pushover 凭证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushoverSettings {
    pub app_token: String,
    pub user_token: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WaniKani API token
    pub wanikani_token: Option<String>,
    /// 通知标题
    pub title: Option<String>,
    /// 通知附带的链接，空字符串表示不附带
    pub dashboard_url: Option<String>,
    /// WaniKani API 地址
    pub api_base_url: Option<String>,
    /// HTTP 超时（秒）
    pub timeout_secs: Option<u64>,
    pub pushsafer: Option<PushsaferSettings>,
    pub pushover: Option<PushoverSettings>,
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/wanikani-notifier/config.json"))
    }

    /// 加载配置：显式路径必须存在，默认路径不存在时返回默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 命令行 token 优先，其次配置文件
    pub fn resolve_token(&self, cli_token: Option<&str>) -> Option<String> {
        cli_token
            .filter(|t| !t.is_empty())
            .or(self.wanikani_token.as_deref().filter(|t| !t.is_empty()))
            .map(str::to_string)
    }

    pub fn wanikani_config(&self, token: String) -> WaniKaniConfig {
        let mut config = WaniKaniConfig::new(token);
        if let Some(base_url) = &self.api_base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        config
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn dashboard_url(&self) -> Option<String> {
        match self.dashboard_url.as_deref() {
            None => Some(DEFAULT_DASHBOARD_URL.to_string()),
            Some("") => None,
            Some(url) => Some(url.to_string()),
        }
    }

    /// 配置文件中某个通知器的构建参数
    pub fn notifier_params(&self, kind: NotifierKind) -> Option<NotifierParams> {
        let params = match kind {
            NotifierKind::Console => return None,
            NotifierKind::Pushsafer => {
                let settings = self.pushsafer.as_ref()?;
                NotifierParams::new().with("private_key", settings.private_key.clone())
            }
            NotifierKind::Pushover => {
                let settings = self.pushover.as_ref()?;
                NotifierParams::new()
                    .with("app_token", settings.app_token.clone())
                    .with("user_token", settings.user_token.clone())
            }
        };
        Some(self.with_timeout(params))
    }

    /// 附加统一的超时参数
    pub fn with_timeout(&self, params: NotifierParams) -> NotifierParams {
        match self.timeout_secs {
            Some(timeout) => params.with("timeout_secs", timeout.to_string()),
            None => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.title(), "WaniKani");
        assert_eq!(config.dashboard_url().as_deref(), Some(DEFAULT_DASHBOARD_URL));
        assert!(config.notifier_params(NotifierKind::Pushsafer).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "wanikani_token": "wk-token",
                "title": "Study time",
                "dashboard_url": "",
                "timeout_secs": 10,
                "pushover": {"app_token": "app", "user_token": "user"}
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.wanikani_token.as_deref(), Some("wk-token"));
        assert_eq!(config.title(), "Study time");
        assert_eq!(config.dashboard_url(), None);
        assert_eq!(config.wanikani_config("t".to_string()).timeout_secs, 10);

        let params = config.notifier_params(NotifierKind::Pushover).unwrap();
        assert_eq!(params.get("app_token"), Some("app"));
        assert_eq!(params.get("user_token"), Some("user"));
        assert_eq!(params.get("timeout_secs"), Some("10"));
        assert!(config.notifier_params(NotifierKind::Pushsafer).is_none());
        assert!(config.notifier_params(NotifierKind::Console).is_none());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = tempdir().unwrap();
        let result = AppConfig::load(Some(temp.path().join("missing.json").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_resolve_token_precedence() {
        let config = AppConfig {
            wanikani_token: Some("from-config".to_string()),
            ..Default::default()
        };

        assert_eq!(config.resolve_token(Some("from-cli")).as_deref(), Some("from-cli"));
        assert_eq!(config.resolve_token(None).as_deref(), Some("from-config"));
        assert_eq!(config.resolve_token(Some("")).as_deref(), Some("from-config"));
        assert_eq!(AppConfig::default().resolve_token(None), None);
    }
}
