//! Pushover 推送通知器
//!
//! 构建时立即校验用户（`users/validate.json`），凭证无效时构建失败。

use super::timeout_from;
use crate::error::NotifierError;
use crate::notification::notifier::{Notification, Notifier, NotifierKind, NotifierParams};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Pushover API 基础地址
const PUSHOVER_API_URL: &str = "https://api.pushover.net/1";

/// Pushover 配置
#[derive(Debug, Clone)]
pub struct PushoverConfig {
    /// 应用 token
    pub app_token: String,
    /// 用户 key
    pub user_token: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl PushoverConfig {
    pub fn new(app_token: impl Into<String>, user_token: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            user_token: user_token.into(),
            api_url: PUSHOVER_API_URL.to_string(),
            timeout: Duration::from_secs(super::DEFAULT_TIMEOUT_SECS),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }
}

/// API 响应：`status == 1` 表示成功
#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    devices: Vec<String>,
}

impl PushoverResponse {
    fn into_result(self) -> Result<Self, String> {
        if self.status == 1 {
            Ok(self)
        } else if self.errors.is_empty() {
            Err(format!("unexpected status {}", self.status))
        } else {
            Err(self.errors.join("; "))
        }
    }
}

/// Pushover 通知器
#[derive(Debug)]
pub struct PushoverNotifier {
    client: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    /// 创建客户端并校验用户
    pub fn new(config: PushoverConfig) -> Result<Self, NotifierError> {
        let kind = NotifierKind::Pushover.key();
        for (name, value) in [("app_token", &config.app_token), ("user_token", &config.user_token)] {
            if value.is_empty() {
                return Err(NotifierError::MissingParameter {
                    kind: kind.to_string(),
                    name: name.to_string(),
                });
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifierError::build(kind, e))?;

        let devices = Self::validate_user(&client, &config)?;
        info!(notifier = kind, devices = devices.len(), "Pushover user validated");

        Ok(Self { client, config })
    }

    /// 参数：`app_token`、`user_token`（必需）、`api_url`、`timeout_secs`
    pub fn build(params: &NotifierParams) -> Result<Self, NotifierError> {
        let kind = NotifierKind::Pushover.key();
        let mut config = PushoverConfig::new(
            params.require(kind, "app_token")?,
            params.require(kind, "user_token")?,
        );
        if let Some(api_url) = params.get("api_url") {
            config.api_url = api_url.to_string();
        }
        config.timeout = timeout_from(params);
        Self::new(config)
    }

    fn validate_user(client: &Client, config: &PushoverConfig) -> Result<Vec<String>, NotifierError> {
        let kind = NotifierKind::Pushover.key();
        let url = config.endpoint("users/validate.json");
        debug!(url = %url, "Validating Pushover user");

        let response: PushoverResponse = client
            .post(&url)
            .form(&[
                ("token", config.app_token.as_str()),
                ("user", config.user_token.as_str()),
            ])
            .send()
            .and_then(|r| r.json())
            .map_err(|e| NotifierError::build(kind, e))?;

        response
            .into_result()
            .map(|r| r.devices)
            .map_err(|reason| NotifierError::build(kind, reason))
    }
}

impl Notifier for PushoverNotifier {
    fn key(&self) -> &str {
        NotifierKind::Pushover.key()
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let body = notification.body()?;

        let mut form = vec![
            ("token", self.config.app_token.as_str()),
            ("user", self.config.user_token.as_str()),
            ("title", notification.title.as_str()),
            ("message", body),
        ];
        if let Some(url) = notification.url.as_deref() {
            form.push(("url", url));
        }

        let response: PushoverResponse = self
            .client
            .post(self.config.endpoint("messages.json"))
            .form(&form)
            .send()
            .and_then(|r| r.json())
            .map_err(|e| NotifierError::send(self.key(), e))?;
        response
            .into_result()
            .map_err(|reason| NotifierError::send(self.key(), reason))?;

        info!(notifier = self.key(), "Notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_both_tokens() {
        let only_app = NotifierParams::new().with("app_token", "__APP__");
        assert!(matches!(
            PushoverNotifier::build(&only_app).err(),
            Some(NotifierError::MissingParameter { ref name, .. }) if name == "user_token"
        ));

        let only_user = NotifierParams::new().with("user_token", "__USER__");
        assert!(matches!(
            PushoverNotifier::build(&only_user).err(),
            Some(NotifierError::MissingParameter { ref name, .. }) if name == "app_token"
        ));
    }

    #[test]
    fn test_construction_failure_is_eager() {
        // 校验请求失败时 build 立即返回错误
        let params = NotifierParams::new()
            .with("app_token", "__APP__")
            .with("user_token", "__USER__")
            .with("api_url", "http://127.0.0.1:9/1")
            .with("timeout_secs", "2");

        assert!(matches!(
            PushoverNotifier::build(&params).err(),
            Some(NotifierError::Build { ref kind, .. }) if kind == "pushover"
        ));
    }

    #[test]
    fn test_endpoint() {
        let mut config = PushoverConfig::new("a", "u");
        assert_eq!(
            config.endpoint("messages.json"),
            "https://api.pushover.net/1/messages.json"
        );
        config.api_url = "http://localhost:8080/1/".to_string();
        assert_eq!(config.endpoint("users/validate.json"), "http://localhost:8080/1/users/validate.json");
    }

    #[test]
    fn test_response_into_result() {
        let ok: PushoverResponse = serde_json::from_str(r#"{"status":1,"devices":["phone"]}"#).unwrap();
        assert_eq!(ok.into_result().unwrap().devices, vec!["phone"]);

        let bad: PushoverResponse =
            serde_json::from_str(r#"{"status":0,"errors":["user key is invalid"]}"#).unwrap();
        assert_eq!(bad.into_result().unwrap_err(), "user key is invalid");
    }
}
