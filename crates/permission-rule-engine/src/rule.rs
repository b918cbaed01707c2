//! 权限规则
//!
//! 规则分两阶段构建：
//! 1. `RuleBuilder` 校验声明形态，产出 `DraftRule`
//! 2. 规则集持有者补充展开后的动作集合，`DraftRule::publish` 产出不可变的 `Rule`
//!
//! 只有 `Rule` 提供匹配能力，因此“未设置展开动作就匹配”在编译期即被排除。

use crate::conditions::{Conditions, Predicate};
use crate::error::{Result, RuleError};
use crate::subject::{Subject, SubjectRef};
use std::collections::HashSet;
use tracing::debug;

/// 规则构建器
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    base_behavior: bool,
    actions: Option<Vec<String>>,
    subjects: Option<Vec<SubjectRef>>,
    attributes: Vec<String>,
    conditions: Conditions,
    predicate: Option<Predicate>,
}

impl RuleBuilder {
    pub fn new(base_behavior: bool) -> Self {
        Self {
            base_behavior,
            actions: None,
            subjects: None,
            attributes: Vec::new(),
            conditions: Conditions::Empty,
            predicate: None,
        }
    }

    /// 授权规则
    pub fn can() -> Self {
        Self::new(true)
    }

    /// 撤销规则
    pub fn cannot() -> Self {
        Self::new(false)
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action.into());
        self
    }

    /// 声明动作列表，空列表与“未声明”不同
    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions
            .get_or_insert_with(Vec::new)
            .extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn subject(mut self, subject: impl Into<SubjectRef>) -> Self {
        self.subjects
            .get_or_insert_with(Vec::new)
            .push(subject.into());
        self
    }

    pub fn subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SubjectRef>,
    {
        self.subjects
            .get_or_insert_with(Vec::new)
            .extend(subjects.into_iter().map(Into::into));
        self
    }

    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn conditions(mut self, conditions: impl Into<Conditions>) -> Self {
        self.conditions = conditions.into();
        self
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Subject) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Predicate::new(f));
        self
    }

    /// 校验并生成草稿规则
    ///
    /// 非空结构化条件与谓词块同时出现时返回 `BlockAndConditions`。
    pub fn build(self) -> Result<DraftRule> {
        let match_all = self.actions.is_none() && self.subjects.is_none();
        let actions = dedup(self.actions.unwrap_or_default());
        let subjects = self.subjects.unwrap_or_default();
        let attributes = dedup(self.attributes);

        let structured = matches!(&self.conditions, Conditions::Map(map) if !map.is_empty());
        if structured && self.predicate.is_some() {
            let err = RuleError::BlockAndConditions {
                action: join(&actions),
                subject: join(&subjects),
            };
            debug!(error = %err, "规则构建失败");
            return Err(err);
        }

        Ok(DraftRule {
            base_behavior: self.base_behavior,
            actions,
            subjects,
            attributes,
            conditions: self.conditions,
            predicate: self.predicate,
            match_all,
        })
    }
}

/// 动作与属性按集合语义保存，保留首次声明顺序
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 草稿规则：已通过形态校验，尚缺展开后的动作集合
#[derive(Debug, Clone)]
pub struct DraftRule {
    base_behavior: bool,
    actions: Vec<String>,
    subjects: Vec<SubjectRef>,
    attributes: Vec<String>,
    conditions: Conditions,
    predicate: Option<Predicate>,
    match_all: bool,
}

impl DraftRule {
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// 补充展开动作并发布为不可变规则
    ///
    /// 展开集合总会并入声明的动作。
    pub fn publish<I, S>(self, expanded_actions: I) -> Rule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expanded: HashSet<String> =
            expanded_actions.into_iter().map(Into::into).collect();
        expanded.extend(self.actions.iter().cloned());

        Rule {
            draft: self,
            expanded_actions: expanded,
        }
    }
}

/// 已发布的权限规则
#[derive(Debug, Clone)]
pub struct Rule {
    draft: DraftRule,
    expanded_actions: HashSet<String>,
}

impl Rule {
    /// true 表示授权（can），false 表示撤销（cannot）
    pub fn base_behavior(&self) -> bool {
        self.draft.base_behavior
    }

    pub fn actions(&self) -> &[String] {
        &self.draft.actions
    }

    pub fn expanded_actions(&self) -> &HashSet<String> {
        &self.expanded_actions
    }

    pub fn subjects(&self) -> &[SubjectRef] {
        &self.draft.subjects
    }

    pub fn attributes(&self) -> &[String] {
        &self.draft.attributes
    }

    pub fn conditions(&self) -> &Conditions {
        &self.draft.conditions
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.draft.predicate.as_ref()
    }

    /// 动作与主体均未声明的通配规则
    pub fn match_all(&self) -> bool {
        self.draft.match_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::RawFragment;
    use crate::subject::SubjectType;
    use serde_json::json;

    #[test]
    fn test_build_normalizes_single_values() {
        let project = SubjectType::new("Project");
        let rule = RuleBuilder::can()
            .action("read")
            .subject(&project)
            .build()
            .unwrap()
            .publish(Vec::<String>::new());

        assert!(rule.base_behavior());
        assert_eq!(rule.actions(), &["read".to_string()]);
        assert_eq!(rule.subjects(), &[SubjectRef::Type(project)]);
        assert!(rule.attributes().is_empty());
        assert_eq!(rule.conditions(), &Conditions::Empty);
        assert!(!rule.match_all());
    }

    #[test]
    fn test_match_all_only_when_action_and_subject_omitted() {
        let omitted = RuleBuilder::can().build().unwrap();
        assert!(omitted.match_all);

        let empty_lists = RuleBuilder::can()
            .actions(Vec::<String>::new())
            .subjects(Vec::<SubjectRef>::new())
            .build()
            .unwrap();
        assert!(!empty_lists.match_all);

        let subject_only = RuleBuilder::can().subject("all").build().unwrap();
        assert!(!subject_only.match_all);
    }

    #[test]
    fn test_predicate_with_structured_conditions_is_rejected() {
        let err = RuleBuilder::can()
            .action("update")
            .subject(&SubjectType::new("Project"))
            .conditions(Conditions::map([("status", json!("open"))]))
            .predicate(|_| true)
            .build()
            .unwrap_err();

        match err {
            RuleError::BlockAndConditions { action, subject } => {
                assert_eq!(action, "update");
                assert_eq!(subject, "Project");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_predicate_alone_or_conditions_alone_succeed() {
        assert!(
            RuleBuilder::can()
                .action("update")
                .subject("all")
                .predicate(|_| true)
                .build()
                .is_ok()
        );
        assert!(
            RuleBuilder::can()
                .action("update")
                .subject("all")
                .conditions(Conditions::map([("status", json!("open"))]))
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_predicate_with_raw_fragment_is_allowed() {
        let rule = RuleBuilder::can()
            .action("read")
            .subject("all")
            .conditions(RawFragment::new("published = 1"))
            .predicate(|_| true)
            .build();
        assert!(rule.is_ok());
    }

    #[test]
    fn test_publish_keeps_declared_actions() {
        let rule = RuleBuilder::can()
            .action("read")
            .subject("all")
            .build()
            .unwrap()
            .publish(["index", "show"]);

        let mut expanded: Vec<&str> = rule.expanded_actions().iter().map(String::as_str).collect();
        expanded.sort();
        assert_eq!(expanded, vec!["index", "read", "show"]);
    }

    #[test]
    fn test_attributes_scope() {
        let rule = RuleBuilder::cannot()
            .action("update")
            .subject("all")
            .attributes(["name", "email"])
            .build()
            .unwrap()
            .publish(Vec::<String>::new());

        assert!(!rule.base_behavior());
        assert_eq!(rule.attributes(), &["name".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_repeated_actions_and_attributes_are_collapsed() {
        let rule = RuleBuilder::cannot()
            .action("read")
            .action("read")
            .actions(["update", "read"])
            .subject("all")
            .attributes(["name", "email", "name"])
            .attribute("email")
            .build()
            .unwrap()
            .publish(Vec::<String>::new());

        assert_eq!(rule.actions(), &["read".to_string(), "update".to_string()]);
        assert_eq!(rule.attributes(), &["name".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_rule_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rule>();
    }
}
