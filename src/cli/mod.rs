//! 命令行入口
//!
//! 全局参数 + 可链接的命令（见 [`chain`]）。每个命令对应流水线中的一个阶段。

pub mod chain;
pub mod notify;

pub use chain::{parse_chain, AvailableNowArgs, ChainCommand, NotifyArgs, COMMAND_NAMES};
pub use notify::{build_dispatcher, requested_notifiers};

use crate::assignments::all_available_stage;
use crate::config::AppConfig;
use crate::notification::{NotifierRegistry, NotifyStage};
use crate::pipeline::{ExecutionContext, Pipeline, PipelineOutcome};
use crate::wanikani::WaniKaniClient;
use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "wanikani-notifier")]
#[command(about = "WaniKani Notifier - 有新的 lessons / reviews 时发送通知")]
#[command(version)]
pub struct Cli {
    /// WaniKani API token
    #[arg(long, env = "WANIKANI_API_TOKEN", hide_env_values = true)]
    pub wanikani: Option<String>,
    /// 配置文件路径（默认 ~/.config/wanikani-notifier/config.json）
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// 任一命令没有生成消息时终止整条链（默认）
    #[arg(long, overrides_with = "continue_even_empty")]
    pub stop_if_empty: bool,
    /// 即使某个命令没有生成消息也继续执行
    #[arg(long, overrides_with = "stop_if_empty")]
    pub continue_even_empty: bool,
    /// 命令链，如 `available_assignments_now --since 1 notify --console`
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub commands: Vec<String>,
}

impl Cli {
    pub fn stop_if_empty(&self) -> bool {
        !self.continue_even_empty
    }

    pub fn chain(&self) -> Result<Vec<ChainCommand>, clap::Error> {
        parse_chain(&self.commands)
    }

    /// 取 API token：`--wanikani` / `WANIKANI_API_TOKEN` 优先，其次配置文件；都没有时是用法错误
    pub fn token(&self, config: &AppConfig) -> Result<String, clap::Error> {
        config.resolve_token(self.wanikani.as_deref()).ok_or_else(|| {
            Self::command().error(
                ErrorKind::MissingRequiredArgument,
                "a WaniKani API token is required (--wanikani, WANIKANI_API_TOKEN or wanikani_token in the config file)",
            )
        })
    }
}

/// 按命令顺序组装流水线；notify 的通知器在此处立即构建
pub fn build_pipeline(
    commands: &[ChainCommand],
    config: &AppConfig,
    registry: &NotifierRegistry,
) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();
    for command in commands {
        match command {
            ChainCommand::AvailableAssignmentsNow(args) => {
                pipeline.push(Box::new(args.options().stage()));
            }
            ChainCommand::AllAvailableAssignments => {
                pipeline.push(Box::new(all_available_stage()));
            }
            ChainCommand::Notify(args) => {
                let dispatcher = build_dispatcher(args, config, registry)?;
                pipeline.push(Box::new(NotifyStage::new(dispatcher)));
            }
        }
    }
    Ok(pipeline)
}

/// 执行整条命令链
pub fn run(cli: &Cli, config: &AppConfig, token: String, commands: &[ChainCommand]) -> Result<PipelineOutcome> {
    let client = WaniKaniClient::new(config.wanikani_config(token))?;

    let registry = NotifierRegistry::with_builtin();
    let pipeline = build_pipeline(commands, config, &registry)?;

    let ctx = ExecutionContext::new(&client, cli.stop_if_empty());
    info!(
        stages = ?pipeline.stage_names(),
        stop_if_empty = ctx.stop_if_empty(),
        "Running command chain"
    );
    pipeline.run(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Cli {
        Cli::try_parse_from(line.split_whitespace()).unwrap()
    }

    #[test]
    fn test_global_flags() {
        let cli = parse("wanikani-notifier --wanikani __TOKEN__ available_assignments_now --since 1 notify --console");

        assert_eq!(cli.wanikani.as_deref(), Some("__TOKEN__"));
        assert!(cli.stop_if_empty());
        assert_eq!(cli.commands.len(), 5);
        assert_eq!(cli.chain().unwrap().len(), 2);
    }

    #[test]
    fn test_continue_even_empty() {
        let cli = parse("wanikani-notifier --continue-even-empty notify");
        assert!(!cli.stop_if_empty());

        let cli = parse("wanikani-notifier --continue-even-empty --stop-if-empty notify");
        assert!(cli.stop_if_empty());
    }

    fn without_token() -> Cli {
        Cli {
            wanikani: None,
            config: None,
            stop_if_empty: false,
            continue_even_empty: false,
            commands: vec!["all_available_assignments".to_string()],
        }
    }

    #[test]
    fn test_missing_token_is_usage_error() {
        let err = without_token().token(&AppConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_token_from_flag_or_config() {
        let config = AppConfig {
            wanikani_token: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(without_token().token(&config).unwrap(), "from-config");

        let cli = Cli {
            wanikani: Some("from-flag".to_string()),
            ..without_token()
        };
        assert_eq!(cli.token(&config).unwrap(), "from-flag");
    }

    #[test]
    fn test_since_maps_to_window() {
        let forever = AvailableNowArgs::default().options();
        assert_eq!(forever.since_hours, None);

        let recent = AvailableNowArgs {
            since: 3,
            min_assignments: 2,
        }
        .options();
        assert_eq!(recent.since_hours, Some(3));
        assert_eq!(recent.min_assignments, 2);
    }

    #[test]
    fn test_build_pipeline_stage_order() {
        let commands = parse_chain(
            &"available_assignments_now all_available_assignments notify --console"
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>(),
        )
        .unwrap();

        let pipeline =
            build_pipeline(&commands, &AppConfig::default(), &NotifierRegistry::with_builtin()).unwrap();
        assert_eq!(
            pipeline.stage_names(),
            vec!["available_assignments_now", "all_available_assignments", "notify"]
        );
    }

    #[test]
    fn test_build_pipeline_propagates_notifier_errors() {
        let commands = vec![ChainCommand::Notify(NotifyArgs {
            pushover: Some(vec!["".to_string(), "user".to_string()]),
            ..Default::default()
        })];

        let err = build_pipeline(&commands, &AppConfig::default(), &NotifierRegistry::with_builtin())
            .err()
            .unwrap();
        assert!(err.downcast_ref::<crate::error::NotifierError>().is_some());
    }
}
