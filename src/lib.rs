//! WaniKani Notifier - 轮询待办的 lessons / reviews 并通过多个渠道发送通知

pub mod assignments;
pub mod cli;
pub mod config;
pub mod error;
pub mod notification;
pub mod pipeline;
pub mod wanikani;

pub use assignments::{format_message, AssignmentQuery, AssignmentSummary, AvailableNow};
pub use config::AppConfig;
pub use error::NotifierError;
pub use notification::{
    DispatchReport, Dispatcher, Notification, Notifier, NotifierKind, NotifierParams, NotifierRegistry, NotifyStage,
};
pub use pipeline::{ExecutionContext, Generator, Message, MessageStream, Pipeline, PipelineOutcome, Stage, StageKind};
pub use wanikani::{WaniKaniClient, WaniKaniConfig};
