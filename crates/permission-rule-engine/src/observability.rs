//! 日志初始化
//!
//! 规则引擎本身只通过 `tracing` 宏输出事件，订阅者由宿主进程决定。
//! 独立运行（如基准测试、调试工具）时可调用 `init_tracing`。

use crate::config::ObservabilityConfig;
use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 初始化 tracing 订阅者
///
/// `RUST_LOG` 优先于配置中的日志级别。重复初始化会返回错误。
///
/// # Example
///
/// ```ignore
/// use permission_rule::{EngineConfig, observability};
///
/// let config = EngineConfig::load()?;
/// observability::init_tracing(&config.observability)?;
/// ```
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).with_ansi(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
