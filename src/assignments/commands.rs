//! 生成通知消息的两个命令

use super::formatter::{format_message, ALL_AVAILABLE_TEMPLATE, NOW_AVAILABLE_TEMPLATE};
use super::query::AssignmentQuery;
use crate::pipeline::{ExecutionContext, Generator, Message};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// `--since` 的上限（约一万年）
pub const MAX_SINCE_HOURS: u32 = 24 * 366 * 10_000;

/// available_assignments_now 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableNow {
    /// 统计最近多少小时内变为可用的任务，`None` 表示不限
    pub since_hours: Option<u32>,
    /// 少于该数量时不生成消息
    pub min_assignments: u32,
}

impl Default for AvailableNow {
    fn default() -> Self {
        Self {
            since_hours: None,
            min_assignments: 1,
        }
    }
}

impl AvailableNow {
    /// 窗口起点：`now - (since 小时 - 1 秒)`，超出时间范围时报错
    pub fn window_start(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let Some(hours) = self.since_hours else {
            return Ok(None);
        };
        Duration::try_hours(i64::from(hours))
            .and_then(|window| window.checked_sub(&Duration::seconds(1)))
            .and_then(|window| now.checked_sub_signed(window))
            .map(Some)
            .ok_or_else(|| anyhow!("--since {} hours is out of the supported time range", hours))
    }

    /// 包装成流水线阶段
    pub fn stage(self) -> Generator<impl Fn(&ExecutionContext<'_>) -> Result<Vec<Message>>> {
        Generator::new("available_assignments_now", move |ctx| {
            Ok(vec![available_assignments_now(ctx.client(), &self, Utc::now())?])
        })
    }
}

/// 最近可用的任务数达到阈值时生成 "... are now available!"
pub fn available_assignments_now(
    query: &dyn AssignmentQuery,
    options: &AvailableNow,
    now: DateTime<Utc>,
) -> Result<Message> {
    let start = options.window_start(now)?;
    let summary = query.fetch(start, now)?;
    debug!(
        lessons = summary.lessons,
        reviews = summary.reviews,
        min = options.min_assignments,
        "Fetched recently available assignments"
    );

    if summary.total() >= options.min_assignments {
        Ok(format_message(&summary, Some(NOW_AVAILABLE_TEMPLATE)))
    } else {
        Ok(None)
    }
}

/// 所有可用任务："In total, there are ... to do."
pub fn all_available_assignments(query: &dyn AssignmentQuery, now: DateTime<Utc>) -> Result<Message> {
    let summary = query.fetch(None, now)?;
    debug!(
        lessons = summary.lessons,
        reviews = summary.reviews,
        "Fetched all available assignments"
    );
    Ok(format_message(&summary, Some(ALL_AVAILABLE_TEMPLATE)))
}

/// all_available_assignments 阶段
pub fn all_available_stage() -> Generator<impl Fn(&ExecutionContext<'_>) -> Result<Vec<Message>>> {
    Generator::new("all_available_assignments", |ctx| {
        Ok(vec![all_available_assignments(ctx.client(), Utc::now())?])
    })
}
