//! 链式命令解析
//!
//! 全局参数之后的所有参数按命令名切分成若干段，每段单独交给 clap 解析：
//!
//! ```text
//! wanikani-notifier --wanikani TOKEN available_assignments_now --since 1 all_available_assignments notify --console
//! ```

use crate::assignments::{AvailableNow, MAX_SINCE_HOURS};
use clap::{error::ErrorKind, Args, Parser, Subcommand};

/// 可链接的命令名
pub const COMMAND_NAMES: [&str; 3] = ["available_assignments_now", "all_available_assignments", "notify"];

/// 单段命令
#[derive(Parser, Debug)]
#[command(name = "wanikani-notifier", no_binary_name = true)]
struct ChainArgs {
    #[command(subcommand)]
    command: ChainCommand,
}

/// 链中的一个命令
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ChainCommand {
    /// 统计最近可用的 lessons / reviews
    #[command(name = "available_assignments_now")]
    AvailableAssignmentsNow(AvailableNowArgs),
    /// 统计所有可用的 lessons / reviews
    #[command(name = "all_available_assignments")]
    AllAvailableAssignments,
    /// 把前面命令生成的消息发送到通知渠道
    #[command(name = "notify")]
    Notify(NotifyArgs),
}

/// available_assignments_now 参数
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AvailableNowArgs {
    /// 统计最近多少小时内变为可用的任务（-1 表示不限）
    #[arg(
        long,
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..=i64::from(MAX_SINCE_HOURS))
    )]
    pub since: i64,
    /// 生成消息所需的最少任务数
    #[arg(long = "min", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_assignments: u32,
}

impl AvailableNowArgs {
    /// `-1` 表示不限时间窗口，其余取值被 clap 限制在 `0..=MAX_SINCE_HOURS`
    pub fn options(&self) -> AvailableNow {
        let since_hours = match self.since {
            hours if hours < 0 => None,
            hours => Some(u32::try_from(hours).map_or(MAX_SINCE_HOURS, |h| h.min(MAX_SINCE_HOURS))),
        };
        AvailableNow {
            since_hours,
            min_assignments: self.min_assignments,
        }
    }
}

impl Default for AvailableNowArgs {
    fn default() -> Self {
        Self {
            since: -1,
            min_assignments: 1,
        }
    }
}

/// notify 参数
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyArgs {
    /// 输出到控制台
    #[arg(long, overrides_with = "no_console")]
    pub console: bool,
    /// 不输出到控制台
    #[arg(long, overrides_with = "console")]
    pub no_console: bool,
    /// 通过 Pushsafer 发送（私钥）
    #[arg(long, value_name = "PRIVATE_KEY")]
    pub pushsafer: Option<String>,
    /// 通过 Pushover 发送（应用 token 和用户 key）
    #[arg(long, num_args = 2, value_names = ["APP_TOKEN", "USER_TOKEN"])]
    pub pushover: Option<Vec<String>>,
    /// 同时启用配置文件中的推送凭证
    #[arg(long)]
    pub use_config_notifiers: bool,
}

impl NotifyArgs {
    pub fn console_enabled(&self) -> bool {
        self.console && !self.no_console
    }
}

/// 带值的选项及其取值个数；取值即使与命令名相同也不切分
const VALUE_OPTIONS: [(&str, usize); 4] = [("--since", 1), ("--min", 1), ("--pushsafer", 1), ("--pushover", 2)];

/// 在每个命令名处切分参数
pub fn split_segments(args: &[String]) -> Vec<&[String]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut pending_values = 0;
    for (i, arg) in args.iter().enumerate() {
        if pending_values > 0 {
            pending_values -= 1;
            continue;
        }
        if i > start && COMMAND_NAMES.contains(&arg.as_str()) {
            segments.push(&args[start..i]);
            start = i;
        }
        pending_values = VALUE_OPTIONS
            .iter()
            .find(|(name, _)| *name == arg.as_str())
            .map_or(0, |(_, count)| *count);
    }
    if start < args.len() {
        segments.push(&args[start..]);
    }
    segments
}

/// 解析整条命令链，没有任何命令时返回用法错误
pub fn parse_chain(args: &[String]) -> Result<Vec<ChainCommand>, clap::Error> {
    if args.is_empty() {
        return Err(clap::Error::raw(
            ErrorKind::MissingSubcommand,
            format!("a command is required: {}\n", COMMAND_NAMES.join(", ")),
        ));
    }

    split_segments(args)
        .into_iter()
        .map(|segment| ChainArgs::try_parse_from(segment).map(|parsed| parsed.command))
        .collect()
}
