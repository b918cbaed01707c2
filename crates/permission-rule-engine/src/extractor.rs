//! 条件视图提取
//!
//! 从结构化条件中导出两种视图：
//! - 关联路径骨架，供查询层规划预加载和连接
//! - 标量默认值，供在规则作用域内新建主体时使用

use crate::conditions::{ConditionKey, ConditionMap, ConditionValue, Conditions};
use crate::rule::Rule;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// 嵌套关联路径树
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Associations(IndexMap<ConditionKey, Associations>);

impl Associations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &ConditionKey) -> Option<&Associations> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConditionKey, &Associations)> {
        self.0.iter()
    }

    /// 从条件映射递归提取，标量、区间、列表值均被忽略
    pub fn from_map(map: &ConditionMap) -> Self {
        map.iter()
            .filter_map(|(key, value)| match value {
                ConditionValue::Map(nested) => Some((key.clone(), Self::from_map(nested))),
                _ => None,
            })
            .collect()
    }
}

impl FromIterator<(ConditionKey, Associations)> for Associations {
    fn from_iter<I: IntoIterator<Item = (ConditionKey, Associations)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 提取条件涉及的关联路径，非结构化条件返回空树
pub fn associations_hash(conditions: &Conditions) -> Associations {
    match conditions {
        Conditions::Map(map) => Associations::from_map(map),
        _ => Associations::new(),
    }
}

impl Rule {
    pub fn associations_hash(&self) -> Associations {
        associations_hash(self.conditions())
    }

    /// 顶层标量条件作为默认属性值
    pub fn attributes_from_conditions(&self) -> IndexMap<ConditionKey, Value> {
        let Some(map) = self.conditions().as_map() else {
            return IndexMap::new();
        };

        map.iter()
            .filter_map(|(key, value)| match value {
                ConditionValue::Scalar(scalar) => Some((key.clone(), scalar.clone())),
                _ => None,
            })
            .collect()
    }
}
