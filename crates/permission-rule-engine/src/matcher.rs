//! 相关性匹配
//!
//! 判断 `(动作, 主体, 属性)` 查询是否落在某条规则的作用范围内，不涉及条件求值。

use crate::rule::Rule;
use crate::subject::{Subject, SubjectRef, SubjectType};

/// 通配动作
pub const MANAGE_ACTION: &str = "manage";

impl Rule {
    /// 动作、主体、属性是否与规则相关
    ///
    /// 映射形态的主体只取第一个值参与匹配。
    pub fn relevant(&self, action: &str, subject: &Subject, attribute: Option<&str>) -> bool {
        if self.match_all() {
            return true;
        }

        let subject = match subject {
            Subject::Map(pairs) => pairs.first().map(|(_, value)| value),
            other => Some(other),
        };

        self.matches_action(action)
            && self.matches_subject(subject)
            && self.matches_attribute(attribute)
    }

    pub fn matches_action(&self, action: &str) -> bool {
        let expanded = self.expanded_actions();
        expanded.contains(MANAGE_ACTION) || expanded.contains(action)
    }

    /// `None` 表示空映射主体，此时只有通配引用能匹配
    pub fn matches_subject(&self, subject: Option<&Subject>) -> bool {
        self.subjects().iter().any(|declared| match declared {
            SubjectRef::All => true,
            SubjectRef::Exact(expected) => subject.is_some_and(|s| s == expected),
            SubjectRef::Type(kind) => subject.is_some_and(|s| matches_subject_type(kind, s)),
        })
    }

    /// 规则未限定属性时总是匹配；查询未指定属性时返回规则自身的授权极性
    pub fn matches_attribute(&self, attribute: Option<&str>) -> bool {
        if self.attributes().is_empty() {
            return true;
        }

        match attribute {
            None => self.base_behavior(),
            Some(attribute) => self.attributes().iter().any(|a| a == attribute),
        }
    }
}

fn matches_subject_type(declared: &SubjectType, subject: &Subject) -> bool {
    match subject {
        Subject::Instance { kind, .. } => {
            kind.inherits_from(declared) || subject.type_name() == Some(declared.name())
        }
        Subject::Type(kind) => kind.inherits_from(declared),
        Subject::Symbol(_) | Subject::Map(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleBuilder;
    use serde_json::json;

    fn project() -> SubjectType {
        SubjectType::new("Project")
    }

    fn publish(builder: RuleBuilder) -> Rule {
        let draft = builder.build().unwrap();
        let expanded = draft.actions().to_vec();
        draft.publish(expanded)
    }

    #[test]
    fn test_match_all_ignores_query() {
        let rule = publish(RuleBuilder::can());
        assert!(rule.relevant("destroy", &Subject::symbol("anything"), None));
        assert!(rule.relevant("read", &Subject::from(project()), Some("name")));
    }

    #[test]
    fn test_manage_matches_every_action() {
        let rule = publish(RuleBuilder::can().action("manage").subject(&project()));
        for action in ["read", "update", "destroy", "publish"] {
            assert!(rule.matches_action(action), "manage should cover {action}");
        }
    }

    #[test]
    fn test_action_matches_expanded_aliases() {
        let rule = RuleBuilder::can()
            .action("read")
            .subject(&project())
            .build()
            .unwrap()
            .publish(["index", "show"]);

        assert!(rule.matches_action("read"));
        assert!(rule.matches_action("show"));
        assert!(!rule.matches_action("update"));
    }

    #[test]
    fn test_all_subject_matches_any_subject() {
        let rule = publish(RuleBuilder::can().action("read").subject("all"));
        assert!(rule.relevant("read", &Subject::symbol("dashboard"), None));
        assert!(rule.relevant("read", &Subject::from(project()), None));
        assert!(rule.relevant("read", &Subject::instance(&project(), json!(1)), None));
    }

    #[test]
    fn test_exact_subject_matches_by_equality() {
        let rule = publish(RuleBuilder::can().action("read").subject("dashboard"));
        assert!(rule.relevant("read", &Subject::symbol("dashboard"), None));
        assert!(!rule.relevant("read", &Subject::symbol("reports"), None));

        let instance = Subject::instance(&project(), json!(7));
        let rule = publish(RuleBuilder::can().action("read").subject(instance.clone()));
        assert!(rule.relevant("read", &instance, None));
        assert!(!rule.relevant("read", &Subject::instance(&project(), json!(8)), None));
    }

    #[test]
    fn test_type_reference_matches_instances_and_subtypes() {
        let record = SubjectType::new("Record");
        let article = record.subtype("Article");
        let rule = publish(RuleBuilder::can().action("read").subject(&record));

        assert!(rule.relevant("read", &Subject::instance(&article, json!(1)), None));
        assert!(rule.relevant("read", &Subject::from(&article), None));
        assert!(rule.relevant("read", &Subject::from(&record), None));
        assert!(!rule.relevant("read", &Subject::from(project()), None));
        assert!(!rule.relevant("read", &Subject::symbol("Record"), None));
    }

    #[test]
    fn test_type_name_fallback_across_representations() {
        let declared = SubjectType::with_ancestors("Article", ["Record"]);
        let detached = SubjectType::new("Article");
        let rule = publish(RuleBuilder::can().action("read").subject(&declared));

        assert!(rule.relevant("read", &Subject::instance(&detached, json!(1)), None));
    }

    #[test]
    fn test_type_matches_itself_like_its_subtypes() {
        let declared = SubjectType::with_ancestors("Article", ["Record"]);
        let news = SubjectType::with_ancestors("News", ["Article"]);
        let detached = SubjectType::new("Article");
        let rule = publish(RuleBuilder::can().action("read").subject(&declared));

        assert!(rule.relevant("read", &Subject::from(&news), None));
        assert!(rule.relevant("read", &Subject::from(&detached), None));
        assert!(!rule.relevant("read", &Subject::from(SubjectType::new("Record")), None));
    }

    #[test]
    fn test_map_subject_uses_first_value() {
        let task = SubjectType::new("Task");
        let rule = publish(RuleBuilder::can().action("read").subject(&task));
        let subject = Subject::Map(vec![
            (Subject::instance(&project(), json!(1)), Subject::from(&task)),
            (Subject::symbol("other"), Subject::symbol("ignored")),
        ]);
        assert!(rule.relevant("read", &subject, None));

        let rule = publish(RuleBuilder::can().action("read").subject(&project()));
        assert!(!rule.relevant("read", &subject, None));
    }

    #[test]
    fn test_empty_map_subject_only_matches_all() {
        let empty = Subject::Map(Vec::new());
        let scoped = publish(RuleBuilder::can().action("read").subject(&project()));
        let wildcard = publish(RuleBuilder::can().action("read").subject("all"));

        assert!(!scoped.relevant("read", &empty, None));
        assert!(wildcard.relevant("read", &empty, None));
    }

    #[test]
    fn test_attribute_scoped_cannot_rule() {
        let rule = publish(
            RuleBuilder::cannot()
                .action("update")
                .subject(&project())
                .attribute("name"),
        );
        let subject = Subject::from(project());

        assert!(!rule.relevant("update", &subject, None));
        assert!(rule.relevant("update", &subject, Some("name")));
        assert!(!rule.relevant("update", &subject, Some("other")));
    }

    #[test]
    fn test_attribute_scoped_can_rule_matches_without_attribute() {
        let rule = publish(
            RuleBuilder::can()
                .action("update")
                .subject(&project())
                .attribute("name"),
        );
        assert!(rule.relevant("update", &Subject::from(project()), None));
    }

    #[test]
    fn test_unscoped_rule_matches_any_attribute() {
        let rule = publish(RuleBuilder::can().action("update").subject(&project()));
        assert!(rule.relevant("update", &Subject::from(project()), Some("anything")));
    }

    #[test]
    fn test_relevant_is_idempotent() {
        let rule = publish(
            RuleBuilder::cannot()
                .action("update")
                .subject(&project())
                .attribute("name"),
        );
        let subject = Subject::instance(&project(), json!(3));
        let first = rule.relevant("update", &subject, Some("name"));
        for _ in 0..10 {
            assert_eq!(rule.relevant("update", &subject, Some("name")), first);
        }
    }
}
