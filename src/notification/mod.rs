//! 通知层
//!
//! - [`Notifier`]：发送能力，内置 console / pushsafer / pushover 三种实现
//! - [`NotifierRegistry`]：类型键 → 构建函数
//! - [`Dispatcher`] / [`NotifyStage`]：流水线末端的 notify 命令

pub mod channels;
pub mod dispatcher;
pub mod notifier;
pub mod registry;

pub use dispatcher::{join_messages, DispatchReport, Dispatcher, NotifyStage, DEFAULT_DASHBOARD_URL, DEFAULT_TITLE};
pub use notifier::{Notification, Notifier, NotifierKind, NotifierParams};
pub use registry::{NotifierBuilder, NotifierRegistry};
