//! 规则集
//!
//! 按声明顺序收集草稿规则，统一展开动作别名后发布。
//! 规则集整体重建，不支持就地修改；发布后可在多线程间只读共享。

use crate::aliases::ActionAliases;
use crate::conditions::ConditionKey;
use crate::error::Result;
use crate::rule::{DraftRule, Rule, RuleBuilder};
use crate::subject::Subject;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// 规则集构建器
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    aliases: ActionAliases,
    drafts: Vec<DraftRule>,
}

impl RuleSetBuilder {
    pub fn new(aliases: ActionAliases) -> Self {
        Self {
            aliases,
            drafts: Vec::new(),
        }
    }

    pub fn push(&mut self, draft: DraftRule) -> &mut Self {
        self.drafts.push(draft);
        self
    }

    /// 构建并追加规则，构建失败时规则集保持不变
    pub fn rule(&mut self, builder: RuleBuilder) -> Result<&mut Self> {
        let draft = builder.build()?;
        Ok(self.push(draft))
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// 展开动作别名并发布全部规则
    #[instrument(skip(self), fields(rule_count = self.drafts.len()))]
    pub fn build(self) -> RuleSet {
        let aliases = self.aliases;
        let rules: Vec<Rule> = self
            .drafts
            .into_iter()
            .map(|draft| {
                let expanded = aliases.expand(draft.actions());
                draft.publish(expanded)
            })
            .collect();

        info!("规则集已发布: {} 条规则", rules.len());
        RuleSet { rules }
    }
}

/// 已发布的规则集
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// 相关规则，后声明的在前
    pub fn relevant_rules(
        &self,
        action: &str,
        subject: &Subject,
        attribute: Option<&str>,
    ) -> Vec<&Rule> {
        let relevant: Vec<&Rule> = self
            .rules
            .iter()
            .rev()
            .filter(|rule| rule.relevant(action, subject, attribute))
            .collect();

        debug!(
            action,
            subject = %subject,
            attribute = attribute.unwrap_or("-"),
            matched = relevant.len(),
            "相关规则查找完成"
        );
        relevant
    }

    /// 合并相关授权规则的默认属性，先声明的规则优先
    pub fn attributes_for(&self, action: &str, subject: &Subject) -> IndexMap<ConditionKey, Value> {
        let mut attributes = IndexMap::new();
        for rule in self.relevant_rules(action, subject, None) {
            if rule.base_behavior() {
                attributes.extend(rule.attributes_from_conditions());
            }
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
