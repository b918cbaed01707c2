//! 条件分类
//!
//! 帮助查询层决定如何应用一条已命中规则的条件。

use crate::conditions::Conditions;
use crate::rule::Rule;

impl Rule {
    /// 只有谓词块，没有可并入查询的结构化条件
    pub fn only_predicate(&self) -> bool {
        self.conditions().is_empty() && self.predicate().is_some()
    }

    /// 条件是原始查询片段，需原样透传
    pub fn only_raw_fragment(&self) -> bool {
        self.predicate().is_none()
            && !self.conditions().is_empty()
            && self.conditions().as_map().is_none()
    }

    /// 条件首个键不是属性标识，不能与其他规则的条件合并
    pub fn unmergeable(&self) -> bool {
        match self.conditions() {
            Conditions::Map(map) => map
                .keys()
                .next()
                .is_some_and(|key| !key.is_attribute()),
            _ => false,
        }
    }
}
