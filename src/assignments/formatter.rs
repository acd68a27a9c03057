//! 统计结果 → 通知文本

use super::summary::AssignmentSummary;

/// available_assignments_now 使用的模板
pub const NOW_AVAILABLE_TEMPLATE: &str = "{} are now available!";

/// all_available_assignments 使用的模板
pub const ALL_AVAILABLE_TEMPLATE: &str = "In total, there are {} to do.";

/// 生成通知文本
///
/// 没有任何任务时返回 `None`。正文形如 `"5 lessons and 4 reviews"`，
/// lessons 总在 reviews 之前；给定模板时替换其中第一个 `{}`。
pub fn format_message(summary: &AssignmentSummary, template: Option<&str>) -> Option<String> {
    if summary.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(2);
    if summary.lessons > 0 {
        parts.push(format!("{} lessons", summary.lessons));
    }
    if summary.reviews > 0 {
        parts.push(format!("{} reviews", summary.reviews));
    }
    let body = parts.join(" and ");

    match template {
        Some(template) => Some(template.replacen("{}", &body, 1)),
        None => Some(body),
    }
}
