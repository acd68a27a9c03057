//! 通知层错误类型

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 通知器错误
#[derive(Debug, Error)]
pub enum NotifierError {
    /// 消息为空或缺失（调用方违反约定，不重试）
    #[error("no message provided")]
    NoMessageProvided,

    /// 注册表中不存在该类型
    #[error("unknown notifier kind: {0}")]
    UnknownNotifierKind(String),

    /// 构建参数缺失
    #[error("notifier '{kind}' requires parameter '{name}'")]
    MissingParameter { kind: String, name: String },

    /// 构建失败（如凭证无效）
    #[error("failed to build notifier '{kind}': {source}")]
    Build {
        kind: String,
        #[source]
        source: BoxError,
    },

    /// 发送失败
    #[error("notifier '{kind}' failed to send: {source}")]
    Send {
        kind: String,
        #[source]
        source: BoxError,
    },
}

impl NotifierError {
    pub fn build(kind: &str, source: impl Into<BoxError>) -> Self {
        Self::Build {
            kind: kind.to_string(),
            source: source.into(),
        }
    }

    pub fn send(kind: &str, source: impl Into<BoxError>) -> Self {
        Self::Send {
            kind: kind.to_string(),
            source: source.into(),
        }
    }
}
