//! notify 命令：根据参数组装通知器

use super::chain::NotifyArgs;
use crate::config::AppConfig;
use crate::error::NotifierError;
use crate::notification::{Dispatcher, NotifierKind, NotifierParams, NotifierRegistry};
use tracing::debug;

/// 需要构建的通知器（按 pushsafer → pushover → console 顺序）
pub fn requested_notifiers(args: &NotifyArgs, config: &AppConfig) -> Vec<(NotifierKind, NotifierParams)> {
    let mut requested = Vec::new();

    let pushsafer = args
        .pushsafer
        .as_ref()
        .map(|key| config.with_timeout(NotifierParams::new().with("private_key", key.clone())))
        .or_else(|| {
            args.use_config_notifiers
                .then(|| config.notifier_params(NotifierKind::Pushsafer))
                .flatten()
        });
    if let Some(params) = pushsafer {
        requested.push((NotifierKind::Pushsafer, params));
    }

    let pushover = match args.pushover.as_deref() {
        Some([app_token, user_token]) => Some(config.with_timeout(
            NotifierParams::new()
                .with("app_token", app_token.clone())
                .with("user_token", user_token.clone()),
        )),
        _ if args.use_config_notifiers => config.notifier_params(NotifierKind::Pushover),
        _ => None,
    };
    if let Some(params) = pushover {
        requested.push((NotifierKind::Pushover, params));
    }

    if args.console_enabled() {
        requested.push((NotifierKind::Console, NotifierParams::new()));
    }

    requested
}

/// 通过注册表构建所有通知器，任一构建失败立即返回
pub fn build_dispatcher(
    args: &NotifyArgs,
    config: &AppConfig,
    registry: &NotifierRegistry,
) -> Result<Dispatcher, NotifierError> {
    let mut dispatcher = Dispatcher::new()
        .with_title(config.title())
        .with_url(config.dashboard_url());

    for (kind, params) in requested_notifiers(args, config) {
        debug!(notifier = %kind, "Building notifier");
        dispatcher.register(registry.create(kind.key(), &params)?);
    }

    Ok(dispatcher)
}
