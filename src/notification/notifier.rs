//! 通知器抽象
//!
//! 每种通知器实现 [`Notifier`]，并以 [`NotifierKind::key`] 为键把构建函数
//! 注册到 [`super::NotifierRegistry`]。

use crate::error::NotifierError;
use std::collections::BTreeMap;
use std::fmt;

/// 一条待发送的通知
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    /// 正文，缺失或为空时发送会失败
    pub message: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: Some(message.into()),
            url: None,
            icon: None,
        }
    }

    /// 没有正文的通知
    pub fn without_message(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// 取非空正文，否则返回 `NoMessageProvided`
    ///
    /// 各通知器在任何副作用之前调用。
    pub fn body(&self) -> Result<&str, NotifierError> {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => Ok(message),
            _ => Err(NotifierError::NoMessageProvided),
        }
    }
}

/// 通知器
pub trait Notifier: Send + Sync {
    /// 注册表中的键
    fn key(&self) -> &str;

    /// 发送一条通知，成功时恰好产生一次外部副作用
    fn notify(&self, notification: &Notification) -> Result<(), NotifierError>;
}

/// 内置通知器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifierKind {
    Console,
    Pushsafer,
    Pushover,
}

impl NotifierKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Pushsafer => "pushsafer",
            Self::Pushover => "pushover",
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 构建参数：扁平的具名字符串映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierParams(BTreeMap<String, String>);

impl NotifierParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// 取必需参数，缺失或为空时返回 `MissingParameter`
    pub fn require(&self, kind: &str, name: &str) -> Result<&str, NotifierError> {
        match self.get(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(NotifierError::MissingParameter {
                kind: kind.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_builder() {
        let n = Notification::new("WaniKani", "3 reviews")
            .with_url("https://www.wanikani.com/dashboard")
            .with_icon("42");

        assert_eq!(n.title, "WaniKani");
        assert_eq!(n.body().unwrap(), "3 reviews");
        assert_eq!(n.url.as_deref(), Some("https://www.wanikani.com/dashboard"));
        assert_eq!(n.icon.as_deref(), Some("42"));
    }

    #[test]
    fn test_body_rejects_missing_and_empty() {
        assert!(matches!(
            Notification::without_message("t").body(),
            Err(NotifierError::NoMessageProvided)
        ));
        assert!(matches!(
            Notification::new("t", "").body(),
            Err(NotifierError::NoMessageProvided)
        ));
    }

    #[test]
    fn test_params_require() {
        let params = NotifierParams::new().with("private_key", "abc").with("empty", "");

        assert_eq!(params.require("pushsafer", "private_key").unwrap(), "abc");
        assert!(matches!(
            params.require("pushsafer", "empty"),
            Err(NotifierError::MissingParameter { .. })
        ));
        assert!(matches!(
            params.require("pushsafer", "missing"),
            Err(NotifierError::MissingParameter { kind, name }) if kind == "pushsafer" && name == "missing"
        ));
    }
}
