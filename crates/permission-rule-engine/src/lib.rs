//! 权限规则匹配核心
//!
//! 提供声明式授权规则的分类与索引能力：
//! - 规则构建与形态校验（谓词块与结构化条件互斥）
//! - 动作 / 主体 / 属性相关性匹配，支持通配与类型层级
//! - 条件负载分类（仅谓词、原始片段、不可合并）
//! - 条件视图提取（关联路径骨架、标量默认值）
//!
//! 规则引擎从不执行谓词块，也不访问持久化存储。

pub mod aliases;
pub mod classifier;
pub mod conditions;
pub mod config;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod observability;
pub mod rule;
pub mod rule_set;
pub mod subject;

pub use aliases::ActionAliases;
pub use conditions::{
    ConditionKey, ConditionMap, ConditionValue, Conditions, Predicate, RawFragment, ValueRange,
};
pub use config::{EngineConfig, ObservabilityConfig};
pub use error::{Result, RuleError};
pub use extractor::{Associations, associations_hash};
pub use matcher::MANAGE_ACTION;
pub use rule::{DraftRule, Rule, RuleBuilder};
pub use rule_set::{RuleSet, RuleSetBuilder};
pub use subject::{ALL_SUBJECTS, Subject, SubjectRef, SubjectType};
