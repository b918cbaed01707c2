//! 规则条件模型
//!
//! 条件负载三选一：空、结构化条件映射、原始查询片段。
//! 谓词块作为独立字段存放，与非空结构化条件互斥。

use crate::subject::Subject;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 条件映射的键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionKey {
    /// 具名属性约束
    Attribute(String),
    /// 原始位置参数，不是属性标识
    Raw(String),
}

impl ConditionKey {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Attribute(name) | Self::Raw(name) => name,
        }
    }
}

impl From<&str> for ConditionKey {
    fn from(name: &str) -> Self {
        Self::Attribute(name.to_string())
    }
}

impl From<String> for ConditionKey {
    fn from(name: String) -> Self {
        Self::Attribute(name)
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// JSON 对象键只能是字符串
impl Serialize for ConditionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 有序条件映射
pub type ConditionMap = IndexMap<ConditionKey, ConditionValue>;

/// 条件值
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Scalar(Value),
    Range(ValueRange),
    List(Vec<Value>),
    Map(ConditionMap),
}

impl ConditionValue {
    pub fn range(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::Range(ValueRange {
            start: start.into(),
            end: end.into(),
            inclusive: false,
        })
    }

    pub fn range_inclusive(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::Range(ValueRange {
            start: start.into(),
            end: end.into(),
            inclusive: true,
        })
    }

    /// 标量值可以作为新建主体的默认属性
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn as_map(&self) -> Option<&ConditionMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// JSON 对象转为嵌套映射，数组转为列表，其余均为标量
impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| (ConditionKey::Attribute(k), Self::from(v)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items),
            other => Self::Scalar(other),
        }
    }
}

/// 区间约束
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    pub start: Value,
    pub end: Value,
    pub inclusive: bool,
}

/// 原始查询片段，原样交给查询层
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    pub fragment: String,
    pub binds: Vec<Value>,
}

impl RawFragment {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            binds: Vec::new(),
        }
    }

    pub fn with_binds(fragment: impl Into<String>, binds: Vec<Value>) -> Self {
        Self {
            fragment: fragment.into(),
            binds,
        }
    }
}

/// 规则条件负载
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Conditions {
    #[default]
    Empty,
    Map(ConditionMap),
    Raw(RawFragment),
}

impl Conditions {
    /// 从键值对构建结构化条件
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ConditionKey>,
        V: Into<ConditionValue>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// 从 JSON 构建条件
    ///
    /// - `null` => 空
    /// - 对象 => 结构化条件
    /// - 字符串 => 原始片段
    /// - `["片段", 绑定值...]` => 带绑定参数的原始片段
    ///
    /// 其他形态无法识别，返回 `None`。
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Empty),
            Value::Object(_) => match ConditionValue::from(value) {
                ConditionValue::Map(map) => Some(Self::Map(map)),
                _ => None,
            },
            Value::String(fragment) => Some(Self::Raw(RawFragment::new(fragment))),
            Value::Array(mut items) => {
                if !matches!(items.first(), Some(Value::String(_))) {
                    return None;
                }
                let binds = items.split_off(1);
                match items.pop() {
                    Some(Value::String(fragment)) => {
                        Some(Self::Raw(RawFragment::with_binds(fragment, binds)))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// 空负载或空映射
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Map(map) => map.is_empty(),
            Self::Raw(_) => false,
        }
    }

    pub fn as_map(&self) -> Option<&ConditionMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RawFragment> {
        match self {
            Self::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

impl From<ConditionMap> for Conditions {
    fn from(map: ConditionMap) -> Self {
        Self::Map(map)
    }
}

impl From<RawFragment> for Conditions {
    fn from(raw: RawFragment) -> Self {
        Self::Raw(raw)
    }
}

/// 谓词块
///
/// 由调用方针对具体主体实例求值，规则引擎自身从不调用。
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Subject) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Subject) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, subject: &Subject) -> bool {
        (self.0)(subject)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}
