//! 控制台通知器

use crate::error::NotifierError;
use crate::notification::notifier::{Notification, Notifier, NotifierKind, NotifierParams};
use std::io::Write;
use std::sync::Mutex;

/// 把通知打印到标准输出（或任意 writer）
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    /// 不需要任何参数
    pub fn build(_params: &NotifierParams) -> Result<Self, NotifierError> {
        Ok(Self::new())
    }

    /// `"{title}:\n{message}"`，有 url 时追加一行
    pub fn render(title: &str, message: &str, url: Option<&str>) -> String {
        let mut text = format!("{}:\n{}", title, message);
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            text.push('\n');
            text.push_str(url);
        }
        text
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn key(&self) -> &str {
        NotifierKind::Console.key()
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let body = notification.body()?;
        let text = Self::render(&notification.title, body, notification.url.as_deref());

        let mut out = self
            .out
            .lock()
            .map_err(|_| NotifierError::send(self.key(), "console output lock poisoned"))?;
        writeln!(out, "{}", text)
            .and_then(|_| out.flush())
            .map_err(|e| NotifierError::send(self.key(), e))
    }
}
