//! 命令链流水线
//!
//! 每个命令是一个 [`Stage`]：接收上游消息流和执行上下文，返回新的消息流。
//! 生成型阶段先原样透传上游，再追加自己产生的消息；消费型阶段（notify）
//! 读完上游、执行副作用后原样重新输出。
//!
//! `stop_if_empty` 开启时，每个阶段执行后立即求值；只要某个生成型阶段
//! 没有产生任何非空消息，后续阶段全部跳过。关闭时整条链惰性组合，
//! 最后一次性驱动。

use crate::assignments::AssignmentQuery;
use anyhow::Result;
use tracing::{debug, info};

/// 一条通知消息，`None` 表示“没有要说的”
pub type Message = Option<String>;

/// 惰性消息流
pub type MessageStream<'a> = Box<dyn Iterator<Item = Result<Message>> + 'a>;

/// 消息是否有实际内容
pub fn is_actionable(message: &Message) -> bool {
    message.as_deref().map_or(false, |m| !m.is_empty())
}

/// 一次流水线执行的上下文，构造后只读，所有阶段共享引用
pub struct ExecutionContext<'a> {
    client: &'a dyn AssignmentQuery,
    stop_if_empty: bool,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(client: &'a dyn AssignmentQuery, stop_if_empty: bool) -> Self {
        Self {
            client,
            stop_if_empty,
        }
    }

    pub fn client(&self) -> &'a dyn AssignmentQuery {
        self.client
    }

    pub fn stop_if_empty(&self) -> bool {
        self.stop_if_empty
    }
}

/// 阶段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// 透传上游并追加新消息
    Generator,
    /// 消费上游、执行副作用、原样输出
    Consumer,
}

/// 流水线阶段
pub trait Stage {
    /// 阶段名称（用于日志）
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    /// 组合上游消息流，返回新的消息流（不应在此处立即执行副作用）
    fn apply<'a>(&'a self, ctx: &'a ExecutionContext<'a>, upstream: MessageStream<'a>) -> MessageStream<'a>;
}

/// 生成型阶段：上游消息原样在前，`produce` 的结果在后
pub struct Generator<F> {
    name: String,
    produce: F,
}

impl<F> Generator<F>
where
    F: Fn(&ExecutionContext<'_>) -> Result<Vec<Message>>,
{
    pub fn new(name: impl Into<String>, produce: F) -> Self {
        Self {
            name: name.into(),
            produce,
        }
    }
}

impl<F> Stage for Generator<F>
where
    F: Fn(&ExecutionContext<'_>) -> Result<Vec<Message>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Generator
    }

    fn apply<'a>(&'a self, ctx: &'a ExecutionContext<'a>, upstream: MessageStream<'a>) -> MessageStream<'a> {
        let produced = std::iter::once_with(move || {
            debug!(stage = %self.name, "Running generator stage");
            (self.produce)(ctx)
        })
        .flat_map(expand_batch);

        Box::new(upstream.chain(produced))
    }
}

/// 把一批消息（或一次失败）展开成流元素
pub(crate) fn expand_batch(batch: Result<Vec<Message>>) -> Vec<Result<Message>> {
    match batch {
        Ok(messages) => messages.into_iter().map(Ok).collect(),
        Err(e) => vec![Err(e)],
    }
}

/// 流水线执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// 所有阶段都已执行
    Completed { messages: Vec<Message> },
    /// 在某个生成型阶段后提前终止
    ShortCircuited { stage: String, messages: Vec<Message> },
}

impl PipelineOutcome {
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Completed { messages } | Self::ShortCircuited { messages, .. } => messages,
        }
    }

    pub fn is_short_circuited(&self) -> bool {
        matches!(self, Self::ShortCircuited { .. })
    }
}

/// 按配置顺序组合的阶段列表
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// 执行流水线，驱动所有阶段的副作用按顺序发生
    pub fn run(&self, ctx: &ExecutionContext<'_>) -> Result<PipelineOutcome> {
        if !ctx.stop_if_empty() {
            let mut stream: MessageStream<'_> = Box::new(std::iter::empty());
            for stage in &self.stages {
                stream = stage.apply(ctx, stream);
            }
            let messages = stream.collect::<Result<Vec<_>>>()?;
            return Ok(PipelineOutcome::Completed { messages });
        }

        let mut messages: Vec<Message> = Vec::new();
        for stage in &self.stages {
            let upstream_len = messages.len();
            let upstream: MessageStream<'_> = Box::new(std::mem::take(&mut messages).into_iter().map(Ok));
            let output = stage.apply(ctx, upstream).collect::<Result<Vec<_>>>()?;

            if stage.kind() == StageKind::Generator {
                let produced = output.get(upstream_len..).unwrap_or(&[]);
                if !produced.iter().any(is_actionable) {
                    info!(stage = stage.name(), "Stage produced nothing to notify, stopping chain");
                    return Ok(PipelineOutcome::ShortCircuited {
                        stage: stage.name().to_string(),
                        messages: output,
                    });
                }
            }

            messages = output;
        }

        Ok(PipelineOutcome::Completed { messages })
    }
}
