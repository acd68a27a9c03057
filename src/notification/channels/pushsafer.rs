//! Pushsafer 推送通知器
//!
//! 每次通知向 `https://www.pushsafer.com/api` 发送一次表单请求。

use super::timeout_from;
use crate::error::NotifierError;
use crate::notification::notifier::{Notification, Notifier, NotifierKind, NotifierParams};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Pushsafer API 地址
const PUSHSAFER_API_URL: &str = "https://www.pushsafer.com/api";

/// Pushsafer 配置
#[derive(Debug, Clone)]
pub struct PushsaferConfig {
    /// 私钥
    pub private_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl PushsaferConfig {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            api_url: PUSHSAFER_API_URL.to_string(),
            timeout: Duration::from_secs(super::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// API 响应：`status == 1` 表示成功
#[derive(Debug, Deserialize)]
struct PushsaferResponse {
    status: i64,
    #[serde(default)]
    success: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pushsafer 通知器
pub struct PushsaferNotifier {
    client: Client,
    config: PushsaferConfig,
}

impl PushsaferNotifier {
    pub fn new(config: PushsaferConfig) -> Result<Self, NotifierError> {
        let kind = NotifierKind::Pushsafer.key();
        if config.private_key.is_empty() {
            return Err(NotifierError::MissingParameter {
                kind: kind.to_string(),
                name: "private_key".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifierError::build(kind, e))?;

        Ok(Self { client, config })
    }

    /// 参数：`private_key`（必需）、`api_url`、`timeout_secs`
    pub fn build(params: &NotifierParams) -> Result<Self, NotifierError> {
        let kind = NotifierKind::Pushsafer.key();
        let mut config = PushsaferConfig::new(params.require(kind, "private_key")?);
        if let Some(api_url) = params.get("api_url") {
            config.api_url = api_url.to_string();
        }
        config.timeout = timeout_from(params);
        Self::new(config)
    }

    /// 请求表单字段
    fn form<'a>(&'a self, notification: &'a Notification, body: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("k", self.config.private_key.as_str()),
            ("t", notification.title.as_str()),
            ("m", body),
        ];
        if let Some(url) = notification.url.as_deref() {
            form.push(("u", url));
        }
        if let Some(icon) = notification.icon.as_deref() {
            form.push(("i", icon));
        }
        form
    }
}

impl Notifier for PushsaferNotifier {
    fn key(&self) -> &str {
        NotifierKind::Pushsafer.key()
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let body = notification.body()?;
        let form = self.form(notification, body);

        debug!(api_url = %self.config.api_url, "Sending Pushsafer notification");
        let response: PushsaferResponse = self
            .client
            .post(&self.config.api_url)
            .form(&form)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| NotifierError::send(self.key(), e))?;

        if response.status != 1 {
            let reason = response
                .error
                .unwrap_or_else(|| format!("unexpected status {}", response.status));
            return Err(NotifierError::send(self.key(), reason));
        }

        info!(
            notifier = self.key(),
            result = response.success.as_deref().unwrap_or("sent"),
            "Notification sent"
        );
        Ok(())
    }
}
