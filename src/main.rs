//! WaniKani Notifier CLI
//!
//! 链式执行命令并把结果发送到通知渠道，适合由 cron 等定时调度。

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wanikani_notifier::cli::{self, Cli};
use wanikani_notifier::{AppConfig, PipelineOutcome};

fn main() -> Result<()> {
    // 日志写到 stderr，stdout 留给 console 通知器
    // 通过 RUST_LOG 控制日志级别，例如: RUST_LOG=debug wanikani-notifier ...
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wanikani_notifier=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let args = Cli::parse();
    let commands = match args.chain() {
        Ok(commands) => commands,
        Err(e) => e.exit(),
    };

    let config = AppConfig::load(args.config.as_deref())?;
    let token = match args.token(&config) {
        Ok(token) => token,
        Err(e) => e.exit(),
    };

    match cli::run(&args, &config, token, &commands)? {
        PipelineOutcome::Completed { messages } => {
            info!(messages = messages.len(), "Command chain completed");
        }
        PipelineOutcome::ShortCircuited { stage, .. } => {
            info!(stage = %stage, "Command chain stopped early, nothing to notify");
        }
    }

    Ok(())
}
