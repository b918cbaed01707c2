//! 动作别名
//!
//! 将规则声明的动作展开为其自身加上所有可达别名，供发布规则时使用。

use crate::error::{Result, RuleError};
use crate::matcher::MANAGE_ACTION;
use std::collections::{BTreeMap, HashSet};

/// 动作别名表：目标动作 => 别名列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionAliases {
    aliases: BTreeMap<String, Vec<String>>,
}

impl ActionAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常用默认别名
    ///
    /// - read => index, show
    /// - create => new
    /// - update => edit
    pub fn with_defaults() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            "read".to_string(),
            vec!["index".to_string(), "show".to_string()],
        );
        aliases.insert("create".to_string(), vec!["new".to_string()]);
        aliases.insert("update".to_string(), vec!["edit".to_string()]);
        Self { aliases }
    }

    /// 为目标动作追加别名
    pub fn alias<I, S>(&mut self, target: impl Into<String>, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = target.into();
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();

        if target == MANAGE_ACTION {
            return Err(RuleError::InvalidAlias {
                target,
                reason: format!("{} 已是通配动作，不能作为别名目标", MANAGE_ACTION),
            });
        }

        if aliases.iter().any(|a| a == &target) {
            return Err(RuleError::InvalidAlias {
                target,
                reason: "动作不能作为自身的别名".to_string(),
            });
        }

        if self.aliases.values().flatten().any(|a| a == &target) {
            return Err(RuleError::InvalidAlias {
                target,
                reason: "该动作已是其他动作的别名，不能再作为别名目标".to_string(),
            });
        }

        let entry = self.aliases.entry(target).or_default();
        for alias in aliases {
            if !entry.contains(&alias) {
                entry.push(alias);
            }
        }
        Ok(())
    }

    pub fn aliases_for(&self, target: &str) -> &[String] {
        self.aliases.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 展开动作：动作本身加上传递可达的全部别名
    pub fn expand(&self, actions: &[String]) -> HashSet<String> {
        let mut expanded = HashSet::new();
        let mut pending: Vec<&str> = actions.iter().map(String::as_str).collect();

        while let Some(action) = pending.pop() {
            if expanded.insert(action.to_string()) {
                pending.extend(self.aliases_for(action).iter().map(String::as_str));
            }
        }

        expanded
    }
}

/// 按依赖顺序登记：别名列表不再引用待登记目标的条目先登记，
/// 因此配置中的链式别名与键顺序无关
impl TryFrom<BTreeMap<String, Vec<String>>> for ActionAliases {
    type Error = RuleError;

    fn try_from(mut pending: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut aliases = Self::new();
        while !pending.is_empty() {
            let ready = pending
                .iter()
                .find(|(_, list)| !list.iter().any(|a| pending.contains_key(a)))
                .map(|(target, _)| target.clone());

            // 剩余条目互相引用时，按原顺序登记以返回具体错误
            let target = match ready {
                Some(target) => target,
                None => pending.keys().next().cloned().unwrap_or_default(),
            };
            let list = pending.remove(&target).unwrap_or_default();
            aliases.alias(target, list)?;
        }
        Ok(aliases)
    }
}
