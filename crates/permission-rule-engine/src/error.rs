//! 权限规则错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    /// 结构化条件与谓词块同时出现
    #[error("条件哈希与谓词块互斥，请检查 {action} {subject} 规则")]
    BlockAndConditions { action: String, subject: String },

    #[error("无效的动作别名 '{target}': {reason}")]
    InvalidAlias { target: String, reason: String },

    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, RuleError>;
