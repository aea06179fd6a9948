//! 탐지 규칙 모듈 -- 규칙 타입, YAML 로더, 평가 엔진
//!
//! [`RuleEngine`]은 불변 [`RuleSet`]을 생성 시점에 주입받아
//! 정규화된 이벤트를 평가합니다. 규칙 세트가 로드/검증되기 전에는
//! 엔진 인스턴스가 존재할 수 없으므로, 미초기화 상태의 평가는
//! 타입 수준에서 불가능합니다.
//!
//! # 사용 예시
//! ```
//! use socshield_detection::rule::{RuleEngine, RuleLoader, RuleSet};
//! use socshield_core::types::ParsedEvent;
//!
//! let yaml = "id: failed_login\ntitle: Failed Login\nseverity: 3\nconditions:\n  - field: event_type\n    value: FAILED_LOGIN\n";
//! let rule = RuleLoader::parse_yaml(yaml, "inline").unwrap();
//! let engine = RuleEngine::new(RuleSet::new(vec![rule]).unwrap()).unwrap();
//!
//! let event = ParsedEvent {
//!     raw_log_id: "raw-1".to_owned(),
//!     timestamp: None,
//!     source_ip: None,
//!     destination_ip: None,
//!     event_type: Some("FAILED_LOGIN".to_owned()),
//!     fields: vec![],
//! };
//! let alerts = engine.evaluate(&event);
//! assert_eq!(alerts.len(), 1);
//! ```

pub mod loader;
pub mod matcher;
pub mod types;

pub use loader::RuleLoader;
pub use matcher::RuleMatcher;
pub use types::{ConditionModifier, DetectionRule, FieldCondition, RuleSet};

use chrono::Utc;
use socshield_core::pipeline::Detector;
use socshield_core::types::{AlertRecord, ParsedEvent};
use uuid::Uuid;

use crate::error::DetectionError;

/// 규칙 평가 엔진
///
/// 규칙 세트에 대해 이벤트를 평가하여 알림을 생성합니다.
/// 평가는 결정적입니다: 규칙은 항상 로드된 순서대로 평가되며,
/// 같은 이벤트와 규칙 세트는 같은 알림을 같은 순서로 생성합니다
/// (알림 ID와 생성 시각만 호출마다 다릅니다).
pub struct RuleEngine {
    rule_set: RuleSet,
    matcher: RuleMatcher,
}

impl RuleEngine {
    /// 규칙 세트를 주입받아 엔진을 생성합니다.
    ///
    /// 비활성화된 규칙을 포함한 모든 규칙의 정규식을 컴파일합니다.
    /// 정규식이 유효하지 않으면 엔진 생성이 실패합니다.
    pub fn new(rule_set: RuleSet) -> Result<Self, DetectionError> {
        let mut matcher = RuleMatcher::new();
        for rule in rule_set.rules() {
            matcher.compile_rule(rule)?;
        }
        Ok(Self { rule_set, matcher })
    }

    /// 이벤트를 모든 활성 규칙에 대해 평가하여 알림 목록을 반환합니다.
    ///
    /// 실패하지 않습니다. 개별 규칙의 평가 에러는 경고 로그를 남기고
    /// 해당 규칙의 "매칭 안 됨"으로 처리되며, 나머지 규칙 평가는 계속됩니다.
    pub fn evaluate(&self, event: &ParsedEvent) -> Vec<AlertRecord> {
        let mut alerts = Vec::new();

        for rule in self.rule_set.rules() {
            if !rule.enabled {
                continue;
            }

            match self.matcher.matches(rule, event) {
                Ok(true) => alerts.push(self.build_alert(rule, event)),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        rule_id = %rule.id,
                        error = %e,
                        "rule evaluation failed, treating as no match"
                    );
                }
            }
        }

        alerts
    }

    /// 로드된 규칙 세트를 반환합니다.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// 매칭된 규칙과 이벤트로부터 알림을 생성합니다.
    fn build_alert(&self, rule: &DetectionRule, event: &ParsedEvent) -> AlertRecord {
        AlertRecord {
            id: Uuid::new_v4().to_string(),
            rule_id: rule.id.clone(),
            title: rule.title.clone(),
            description: rule.description.clone(),
            severity: rule.severity,
            raw_log_id: event.raw_log_id.clone(),
            source_ip: event.source_ip.clone(),
            event_type: event.event_type.clone(),
            created_at: Utc::now(),
        }
    }
}

impl Detector for RuleEngine {
    fn name(&self) -> &str {
        "rule-engine"
    }

    fn evaluate(&self, event: &ParsedEvent) -> Vec<AlertRecord> {
        RuleEngine::evaluate(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, severity: u32, conditions: Vec<FieldCondition>) -> DetectionRule {
        DetectionRule {
            id: id.to_owned(),
            title: format!("Rule {id}"),
            description: String::new(),
            severity,
            enabled: true,
            conditions,
            tags: vec![],
        }
    }

    fn event_type_condition(value: &str) -> FieldCondition {
        FieldCondition {
            field: "event_type".to_owned(),
            modifier: ConditionModifier::Exact,
            value: value.to_owned(),
        }
    }

    fn sample_event() -> ParsedEvent {
        ParsedEvent {
            raw_log_id: "raw-9".to_owned(),
            timestamp: None,
            source_ip: Some("10.0.0.5".to_owned()),
            destination_ip: None,
            event_type: Some("FAILED_LOGIN".to_owned()),
            fields: vec![],
        }
    }

    #[test]
    fn matching_rule_produces_alert() {
        let set = RuleSet::new(vec![rule(
            "failed_login",
            3,
            vec![event_type_condition("FAILED_LOGIN")],
        )])
        .unwrap();
        let engine = RuleEngine::new(set).unwrap();

        let alerts = engine.evaluate(&sample_event());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].rule_id, "failed_login");
        assert_eq!(alerts[0].severity, 3);
        assert_eq!(alerts[0].raw_log_id, "raw-9");
        assert_eq!(alerts[0].source_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(alerts[0].event_type.as_deref(), Some("FAILED_LOGIN"));
    }

    #[test]
    fn non_matching_rule_produces_no_alert() {
        let set = RuleSet::new(vec![rule(
            "port_scan",
            5,
            vec![event_type_condition("PORT_SCAN")],
        )])
        .unwrap();
        let engine = RuleEngine::new(set).unwrap();
        assert!(engine.evaluate(&sample_event()).is_empty());
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let mut disabled = rule("off", 3, vec![]);
        disabled.enabled = false;
        let set = RuleSet::new(vec![disabled]).unwrap();
        let engine = RuleEngine::new(set).unwrap();
        assert!(engine.evaluate(&sample_event()).is_empty());
    }

    #[test]
    fn alerts_follow_rule_order() {
        let set = RuleSet::new(vec![
            rule("first", 1, vec![]),
            rule("second", 9, vec![]),
            rule("third", 5, vec![]),
        ])
        .unwrap();
        let engine = RuleEngine::new(set).unwrap();

        let alerts = engine.evaluate(&sample_event());
        let ids: Vec<&str> = alerts.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let set = RuleSet::new(vec![
            rule("a", 1, vec![event_type_condition("FAILED_LOGIN")]),
            rule("b", 2, vec![event_type_condition("PORT_SCAN")]),
            rule("c", 3, vec![]),
        ])
        .unwrap();
        let engine = RuleEngine::new(set).unwrap();
        let event = sample_event();

        let first: Vec<String> = engine
            .evaluate(&event)
            .into_iter()
            .map(|a| a.rule_id)
            .collect();
        let second: Vec<String> = engine
            .evaluate(&event)
            .into_iter()
            .map(|a| a.rule_id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_regex_fails_engine_construction() {
        let set = RuleSet::new(vec![rule(
            "bad_regex",
            1,
            vec![FieldCondition {
                field: "event_type".to_owned(),
                modifier: ConditionModifier::Regex,
                value: "[broken".to_owned(),
            }],
        )])
        .unwrap();
        assert!(RuleEngine::new(set).is_err());
    }

    #[test]
    fn disabled_rule_regex_still_validated() {
        let mut disabled = rule(
            "off_bad_regex",
            1,
            vec![FieldCondition {
                field: "event_type".to_owned(),
                modifier: ConditionModifier::Regex,
                value: "[broken".to_owned(),
            }],
        );
        disabled.enabled = false;
        let set = RuleSet::new(vec![disabled]).unwrap();
        assert!(RuleEngine::new(set).is_err());
    }

    #[test]
    fn empty_rule_set_produces_no_alerts() {
        let engine = RuleEngine::new(RuleSet::empty()).unwrap();
        assert!(engine.evaluate(&sample_event()).is_empty());
    }

    #[test]
    fn alert_ids_are_unique() {
        let set = RuleSet::new(vec![rule("a", 1, vec![]), rule("b", 2, vec![])]).unwrap();
        let engine = RuleEngine::new(set).unwrap();
        let alerts = engine.evaluate(&sample_event());
        assert_ne!(alerts[0].id, alerts[1].id);
    }
}
