//! 任务查询接口

use super::summary::AssignmentSummary;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// 查询 `[start, end]`（含两端）内可用的 lessons / reviews
///
/// `start` 为 `None` 表示不设下限。错误原样向上传播，不重试。
pub trait AssignmentQuery {
    fn fetch(&self, start: Option<DateTime<Utc>>, end: DateTime<Utc>) -> Result<AssignmentSummary>;
}

