//! 配置管理模块
//!
//! 支持 TOML 配置文件加载与环境变量覆盖。

use crate::aliases::ActionAliases;
use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 是否启用 JSON 格式日志
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// 规则引擎配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub service_name: String,
    pub environment: String,
    /// 动作别名：目标动作 => 别名列表，为空时使用默认别名
    pub aliases: BTreeMap<String, Vec<String>>,
    pub observability: ObservabilityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_name: "permission-rule-engine".to_string(),
            environment: "development".to_string(),
            aliases: BTreeMap::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl EngineConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的覆盖先加载的同名配置项）：
    /// 1. config/default.toml
    /// 2. config/{environment}.toml
    /// 3. 环境变量（PERMISSION_RULE__ 前缀，如 PERMISSION_RULE__OBSERVABILITY__LOG_LEVEL）
    pub fn load() -> Result<Self> {
        let env =
            std::env::var("PERMISSION_RULE_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env)
    }

    /// 从指定目录加载
    pub fn load_from(config_dir: &Path, environment: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("environment", environment)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", environment))).required(false),
            )
            .add_source(
                Environment::with_prefix("PERMISSION_RULE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 构建动作别名表
    pub fn action_aliases(&self) -> Result<ActionAliases> {
        if self.aliases.is_empty() {
            return Ok(ActionAliases::with_defaults());
        }
        ActionAliases::try_from(self.aliases.clone())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
