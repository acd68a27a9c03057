//! 通知分发 - notify 终端阶段
//!
//! 汇总上游消息，非空时按配置顺序调用每个通知器。任何一个通知器失败都会
//! 立即返回错误，之前已发出的通知不会回滚。

use super::notifier::{Notification, Notifier};
use crate::error::NotifierError;
use crate::pipeline::{expand_batch, is_actionable, ExecutionContext, Message, MessageStream, Stage, StageKind};
use anyhow::Result;
use tracing::{debug, info};

/// 默认通知标题
pub const DEFAULT_TITLE: &str = "WaniKani";

/// 默认附带的链接
pub const DEFAULT_DASHBOARD_URL: &str = "https://www.wanikani.com/dashboard";

/// 去掉空消息后用换行拼接
pub fn join_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| is_actionable(m))
        .filter_map(|m| m.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 一次分发的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// 拼接后的消息
    pub final_message: String,
    /// 实际调用过的通知器（按调用顺序）
    pub notified: Vec<String>,
}

/// 通知分发器
pub struct Dispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
    title: String,
    url: Option<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
            title: DEFAULT_TITLE.to_string(),
            url: Some(DEFAULT_DASHBOARD_URL.to_string()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// 设置链接，`None` 表示不附带
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.register(notifier);
        self
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        info!(notifier = notifier.key(), "Registering notifier");
        self.notifiers.push(notifier);
    }

    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }

    pub fn notifier_keys(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.key()).collect()
    }

    /// 拼接消息并发送给所有通知器
    pub fn run(&self, messages: &[Message]) -> Result<DispatchReport, NotifierError> {
        let mut report = DispatchReport {
            final_message: join_messages(messages),
            notified: Vec::new(),
        };

        if report.final_message.is_empty() {
            debug!("Nothing to notify");
            return Ok(report);
        }
        if self.notifiers.is_empty() {
            debug!("No notifier configured");
            return Ok(report);
        }

        let mut notification = Notification::new(self.title.clone(), report.final_message.clone());
        notification.url = self.url.clone();

        for notifier in &self.notifiers {
            notifier.notify(&notification)?;
            report.notified.push(notifier.key().to_string());
        }

        info!(notifiers = ?report.notified, "Notifications dispatched");
        Ok(report)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// notify 命令：读完上游后分发，再原样输出上游消息
pub struct NotifyStage {
    dispatcher: Dispatcher,
}

impl NotifyStage {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl Stage for NotifyStage {
    fn name(&self) -> &str {
        "notify"
    }

    fn kind(&self) -> StageKind {
        StageKind::Consumer
    }

    fn apply<'a>(&'a self, _ctx: &'a ExecutionContext<'a>, upstream: MessageStream<'a>) -> MessageStream<'a> {
        let batch = std::iter::once_with(move || -> Result<Vec<Message>> {
            let messages = upstream.collect::<Result<Vec<_>>>()?;
            self.dispatcher.run(&messages)?;
            Ok(messages)
        });
        Box::new(batch.flat_map(expand_batch))
    }
}
