//! 通知器注册表 - 类型键 → 构建函数
//!
//! 进程启动时构造一次（[`NotifierRegistry::with_builtin`]），之后以引用
//! 传给需要组装通知器的地方。键不区分大小写，重复注册时后者覆盖前者。

use super::channels::{ConsoleNotifier, PushoverNotifier, PushsaferNotifier};
use super::notifier::{Notifier, NotifierKind, NotifierParams};
use crate::error::NotifierError;
use std::collections::HashMap;
use tracing::debug;

/// 构建函数
pub type NotifierBuilder =
    Box<dyn Fn(&NotifierParams) -> Result<Box<dyn Notifier>, NotifierError> + Send + Sync>;

/// 通知器注册表
#[derive(Default)]
pub struct NotifierRegistry {
    builders: HashMap<String, NotifierBuilder>,
}

impl NotifierRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// 注册所有内置通知器
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NotifierKind::Console.key(), |params| {
            Ok(Box::new(ConsoleNotifier::build(params)?) as Box<dyn Notifier>)
        });
        registry.register(NotifierKind::Pushsafer.key(), |params| {
            Ok(Box::new(PushsaferNotifier::build(params)?) as Box<dyn Notifier>)
        });
        registry.register(NotifierKind::Pushover.key(), |params| {
            Ok(Box::new(PushoverNotifier::build(params)?) as Box<dyn Notifier>)
        });
        registry
    }

    /// 注册构建函数，已存在的键被覆盖
    pub fn register<F>(&mut self, key: &str, builder: F)
    where
        F: Fn(&NotifierParams) -> Result<Box<dyn Notifier>, NotifierError> + Send + Sync + 'static,
    {
        let key = key.to_lowercase();
        if self.builders.insert(key.clone(), Box::new(builder)).is_some() {
            debug!(notifier = %key, "Replaced notifier builder");
        } else {
            debug!(notifier = %key, "Registered notifier builder");
        }
    }

    /// 按键构建通知器，构建函数的错误原样返回
    pub fn create(&self, key: &str, params: &NotifierParams) -> Result<Box<dyn Notifier>, NotifierError> {
        let builder = self
            .builders
            .get(&key.to_lowercase())
            .ok_or_else(|| NotifierError::UnknownNotifierKind(key.to_string()))?;
        builder(params)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.builders.contains_key(&key.to_lowercase())
    }

    /// 已注册的键（排序后）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::notifier::Notification;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct NamedNotifier(&'static str);

    impl Notifier for NamedNotifier {
        fn key(&self) -> &str {
            self.0
        }

        fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
            notification.body().map(|_| ())
        }
    }

    #[test]
    fn test_create_unregistered_key() {
        let registry = NotifierRegistry::new();
        let result = registry.create("unregistered-key", &NotifierParams::new());
        assert!(matches!(
            result,
            Err(NotifierError::UnknownNotifierKind(k)) if k == "unregistered-key"
        ));
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let mut registry = NotifierRegistry::new();
        registry.register("consolekey", |_| Ok(Box::new(NamedNotifier("consolekey")) as Box<dyn Notifier>));

        let notifier = registry.create("ConsoleKey", &NotifierParams::new()).unwrap();
        assert_eq!(notifier.key(), "consolekey");
        assert!(registry.contains("CONSOLEKEY"));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = NotifierRegistry::new();
        registry.register("dup", |_| Ok(Box::new(NamedNotifier("first")) as Box<dyn Notifier>));
        registry.register("DUP", |_| Ok(Box::new(NamedNotifier("second")) as Box<dyn Notifier>));

        assert_eq!(registry.keys(), vec!["dup"]);
        let notifier = registry.create("dup", &NotifierParams::new()).unwrap();
        assert_eq!(notifier.key(), "second");
    }

    #[test]
    fn test_builder_receives_params_and_errors_propagate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut registry = NotifierRegistry::new();
        registry.register("strict", move |params| {
            counter.fetch_add(1, Ordering::SeqCst);
            params.require("strict", "token")?;
            Ok(Box::new(NamedNotifier("strict")) as Box<dyn Notifier>)
        });

        let err = registry.create("strict", &NotifierParams::new()).err().unwrap();
        assert!(matches!(err, NotifierError::MissingParameter { ref name, .. } if name == "token"));

        let ok = registry.create("strict", &NotifierParams::new().with("token", "t"));
        assert!(ok.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_builtin_keys() {
        let registry = NotifierRegistry::with_builtin();
        assert_eq!(registry.keys(), vec!["console", "pushover", "pushsafer"]);

        let console = registry.create("Console", &NotifierParams::new()).unwrap();
        assert_eq!(console.key(), "console");
    }

    #[test]
    fn test_builtin_push_notifiers_require_credentials() {
        let registry = NotifierRegistry::with_builtin();

        assert!(matches!(
            registry.create("pushsafer", &NotifierParams::new()).err(),
            Some(NotifierError::MissingParameter { .. })
        ));
        assert!(matches!(
            registry
                .create("pushover", &NotifierParams::new().with("app_token", "app"))
                .err(),
            Some(NotifierError::MissingParameter { ref name, .. }) if name == "user_token"
        ));
    }
}
