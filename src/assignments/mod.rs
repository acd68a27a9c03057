//! 学习任务（lessons / reviews）统计与消息生成

pub mod commands;
pub mod formatter;
pub mod query;
pub mod summary;

pub use commands::{all_available_assignments, all_available_stage, available_assignments_now, AvailableNow, MAX_SINCE_HOURS};
pub use formatter::{format_message, ALL_AVAILABLE_TEMPLATE, NOW_AVAILABLE_TEMPLATE};
pub use query::AssignmentQuery;
pub use summary::{AssignmentState, AssignmentSummary};
