//! 待办任务统计

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 某个时间窗口内可用的 lessons / reviews 数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub lessons: u32,
    pub reviews: u32,
}

impl AssignmentSummary {
    pub fn new(lessons: u32, reviews: u32) -> Self {
        Self { lessons, reviews }
    }

    /// lessons + reviews
    pub fn total(&self) -> u32 {
        self.lessons.saturating_add(self.reviews)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// 按状态统计一组任务，既未解锁也未开始的任务不计入
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = AssignmentState>,
    {
        states
            .into_iter()
            .fold(Self::default(), |mut acc, state| {
                match state.classify() {
                    Some(AssignmentKind::Review) => acc.reviews += 1,
                    Some(AssignmentKind::Lesson) => acc.lessons += 1,
                    None => {}
                }
                acc
            })
    }
}

/// 单个任务的时间戳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentState {
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignmentKind {
    Lesson,
    Review,
}

impl AssignmentState {
    /// 已开始 → review；已解锁但未开始 → lesson
    fn classify(&self) -> Option<AssignmentKind> {
        if self.started_at.is_some() {
            Some(AssignmentKind::Review)
        } else if self.unlocked_at.is_some() {
            Some(AssignmentKind::Lesson)
        } else {
            None
        }
    }
}
