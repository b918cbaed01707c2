//! 主体模型
//!
//! 区分规则声明侧的主体引用（`SubjectRef`）与查询侧的具体主体（`Subject`）。
//! 类型层级通过显式的祖先链表达，而不是依赖运行时反射。

use serde_json::Value;
use std::fmt;

/// 通配主体的名称
pub const ALL_SUBJECTS: &str = "all";

/// 主体类型（分类器）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectType {
    name: String,
    /// 祖先类型名称，由近及远
    ancestors: Vec<String>,
}

impl SubjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
        }
    }

    /// 创建带祖先链的类型
    pub fn with_ancestors<I, S>(name: impl Into<String>, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ancestors: ancestors.into_iter().map(Into::into).collect(),
        }
    }

    /// 派生子类型，继承父类型的完整祖先链
    pub fn subtype(&self, name: impl Into<String>) -> Self {
        let mut ancestors = Vec::with_capacity(self.ancestors.len() + 1);
        ancestors.push(self.name.clone());
        ancestors.extend(self.ancestors.iter().cloned());
        Self {
            name: name.into(),
            ancestors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// 类型本身或其祖先链包含 `other`，按名称判断同一性
    pub fn inherits_from(&self, other: &SubjectType) -> bool {
        self.name == other.name || self.ancestors.iter().any(|a| a == other.name())
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 查询侧主体
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// 某类型的具体实例，以 id 标识
    Instance { kind: SubjectType, id: Value },
    /// 类型本身（如“能否读取所有 Project”）
    Type(SubjectType),
    /// 非模型主体，如 `dashboard`
    Symbol(String),
    /// 过滤条件形态的输入，仅第一个值参与匹配
    Map(Vec<(Subject, Subject)>),
}

impl Subject {
    pub fn instance(kind: &SubjectType, id: impl Into<Value>) -> Self {
        Self::Instance {
            kind: kind.clone(),
            id: id.into(),
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// 运行时类型名称，只有实例才有
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Instance { kind, .. } => Some(kind.name()),
            _ => None,
        }
    }
}

impl From<SubjectType> for Subject {
    fn from(kind: SubjectType) -> Self {
        Self::Type(kind)
    }
}

impl From<&SubjectType> for Subject {
    fn from(kind: &SubjectType) -> Self {
        Self::Type(kind.clone())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { kind, id } => write!(f, "{}#{}", kind, id),
            Self::Type(kind) => write!(f, "{}", kind),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// 规则声明侧的主体引用
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectRef {
    /// 通配，匹配任意主体
    All,
    /// 类型引用，匹配该类型及其子类型的实例和类型
    Type(SubjectType),
    /// 按相等性匹配的具体主体
    Exact(Subject),
}

impl From<SubjectType> for SubjectRef {
    fn from(kind: SubjectType) -> Self {
        Self::Type(kind)
    }
}

impl From<&SubjectType> for SubjectRef {
    fn from(kind: &SubjectType) -> Self {
        Self::Type(kind.clone())
    }
}

impl From<Subject> for SubjectRef {
    fn from(subject: Subject) -> Self {
        Self::Exact(subject)
    }
}

impl From<&str> for SubjectRef {
    fn from(name: &str) -> Self {
        if name == ALL_SUBJECTS {
            Self::All
        } else {
            Self::Exact(Subject::symbol(name))
        }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_SUBJECTS),
            Self::Type(kind) => write!(f, "{}", kind),
            Self::Exact(subject) => write!(f, "{}", subject),
        }
    }
}
