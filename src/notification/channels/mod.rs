//! 具体通知器实现

pub mod console;
pub mod pushover;
pub mod pushsafer;

pub use console::ConsoleNotifier;
pub use pushover::{PushoverConfig, PushoverNotifier};
pub use pushsafer::{PushsaferConfig, PushsaferNotifier};

use std::time::Duration;

/// 推送服务请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 从参数中读取超时，缺失或非法时使用默认值
pub(crate) fn timeout_from(params: &crate::notification::NotifierParams) -> Duration {
    let secs = params
        .get("timeout_secs")
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
