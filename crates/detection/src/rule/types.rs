//! 탐지 규칙 데이터 타입
//!
//! YAML 규칙 파일에서 역직렬화되는 구조체들을 정의합니다.

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// 탐지 규칙 -- 하나의 YAML 규칙 문서에 대응합니다.
///
/// # YAML 스키마
/// ```yaml
/// id: failed_login
/// title: Failed Login Attempt
/// description: Detects failed login events
/// severity: 3
/// enabled: true
/// conditions:
///   - field: event_type
///     modifier: exact
///     value: FAILED_LOGIN
///   - field: source_ip
///     modifier: startswith
///     value: "10."
/// tags:
///   - authentication
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    /// 규칙 고유 ID (규칙 세트 내에서 유일해야 함)
    pub id: String,
    /// 규칙 제목 (알림에 표시)
    pub title: String,
    /// 규칙 설명
    #[serde(default)]
    pub description: String,
    /// 심각도 점수 (0보다 커야 함, 클수록 심각)
    pub severity: u32,
    /// 활성화 여부 (기본: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 필드 매칭 조건 목록 (AND 결합)
    #[serde(default)]
    pub conditions: Vec<FieldCondition>,
    /// 분류 태그
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl DetectionRule {
    /// 규칙의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.id.is_empty() {
            return Err(DetectionError::RuleValidation {
                rule_id: "(empty)".to_owned(),
                reason: "rule id must not be empty".to_owned(),
            });
        }

        if self.id.len() > 256 {
            return Err(DetectionError::RuleValidation {
                rule_id: self.id.clone(),
                reason: "rule id must not exceed 256 characters".to_owned(),
            });
        }

        if self.title.is_empty() {
            return Err(DetectionError::RuleValidation {
                rule_id: self.id.clone(),
                reason: "rule title must not be empty".to_owned(),
            });
        }

        if self.severity == 0 {
            return Err(DetectionError::RuleValidation {
                rule_id: self.id.clone(),
                reason: "severity must be greater than 0".to_owned(),
            });
        }

        for (idx, condition) in self.conditions.iter().enumerate() {
            if condition.field.is_empty() {
                return Err(DetectionError::RuleValidation {
                    rule_id: self.id.clone(),
                    reason: format!("condition[{idx}] field must not be empty"),
                });
            }
        }

        Ok(())
    }
}

/// 필드 매칭 조건
///
/// 하나의 ParsedEvent 필드에 대한 매칭 조건을 나타냅니다.
/// 이벤트에 해당 필드가 없으면 조건은 매칭되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCondition {
    /// 대상 필드명 (source_ip, event_type, 또는 fields 내의 키)
    pub field: String,
    /// 매칭 수정자
    #[serde(default)]
    pub modifier: ConditionModifier,
    /// 매칭할 값
    pub value: String,
}

/// 조건 수정자 -- 매칭 방식을 결정합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionModifier {
    /// 정확히 일치
    #[default]
    Exact,
    /// 부분 문자열 포함
    Contains,
    /// 접두사 일치
    StartsWith,
    /// 접미사 일치
    EndsWith,
    /// 정규식 매칭
    Regex,
}

/// 불변 규칙 세트
///
/// 로딩/검증이 끝난 규칙의 순서 있는 컬렉션입니다. 생성 이후 변경할 수 없으며,
/// 규칙 순서가 알림 생성 순서를 결정합니다.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<DetectionRule>,
}

impl RuleSet {
    /// 규칙 목록을 검증하여 규칙 세트를 생성합니다.
    ///
    /// 각 규칙의 유효성과 ID 중복 여부를 검사합니다.
    pub fn new(rules: Vec<DetectionRule>) -> Result<Self, DetectionError> {
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(DetectionError::RuleValidation {
                    rule_id: rule.id.clone(),
                    reason: "duplicate rule id".to_owned(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// 빈 규칙 세트를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 규칙 목록을 로드된 순서대로 반환합니다.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// 규칙 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 규칙이 없으면 true를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> DetectionRule {
        DetectionRule {
            id: "failed_login".to_owned(),
            title: "Failed Login Attempt".to_owned(),
            description: "Detects failed login events".to_owned(),
            severity: 3,
            enabled: true,
            conditions: vec![FieldCondition {
                field: "event_type".to_owned(),
                modifier: ConditionModifier::Exact,
                value: "FAILED_LOGIN".to_owned(),
            }],
            tags: vec!["authentication".to_owned()],
        }
    }

    #[test]
    fn valid_rule_passes_validation() {
        sample_rule().validate().unwrap();
    }

    #[test]
    fn empty_id_fails_validation() {
        let mut rule = sample_rule();
        rule.id = String::new();
        assert!(rule.validate().is_err());
    }

    #[test]
    fn too_long_id_fails_validation() {
        let mut rule = sample_rule();
        rule.id = "x".repeat(300);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let mut rule = sample_rule();
        rule.title = String::new();
        assert!(rule.validate().is_err());
    }

    #[test]
    fn zero_severity_fails_validation() {
        let mut rule = sample_rule();
        rule.severity = 0;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn empty_condition_field_fails_validation() {
        let mut rule = sample_rule();
        rule.conditions[0].field = String::new();
        assert!(rule.validate().is_err());
    }

    #[test]
    fn condition_modifier_default_is_exact() {
        assert_eq!(ConditionModifier::default(), ConditionModifier::Exact);
    }

    #[test]
    fn rule_from_yaml() {
        let yaml = r#"
id: port_scan
title: Port Scan Detected
severity: 5
conditions:
  - field: event_type
    modifier: exact
    value: PORT_SCAN
  - field: destination_ip
    modifier: startswith
    value: "10."
tags:
  - network
"#;
        let rule: DetectionRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.id, "port_scan");
        assert_eq!(rule.severity, 5);
        assert!(rule.enabled);
        assert_eq!(rule.conditions.len(), 2);
        assert_eq!(rule.conditions[1].modifier, ConditionModifier::StartsWith);
    }

    #[test]
    fn rule_yaml_enabled_false() {
        let yaml = r#"
id: noisy_rule
title: Disabled Rule
severity: 1
enabled: false
"#;
        let rule: DetectionRule = serde_yaml::from_str(yaml).unwrap();
        assert!(!rule.enabled);
    }

    #[test]
    fn rule_serialization_roundtrip() {
        let rule = sample_rule();
        let yaml = serde_yaml::to_string(&rule).unwrap();
        let deserialized: DetectionRule = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(deserialized.id, rule.id);
        assert_eq!(deserialized.severity, rule.severity);
    }

    #[test]
    fn rule_set_preserves_order() {
        let mut second = sample_rule();
        second.id = "second".to_owned();
        let set = RuleSet::new(vec![sample_rule(), second]).unwrap();
        assert_eq!(set.rules()[0].id, "failed_login");
        assert_eq!(set.rules()[1].id, "second");
    }

    #[test]
    fn rule_set_rejects_duplicate_ids() {
        let result = RuleSet::new(vec![sample_rule(), sample_rule()]);
        assert!(matches!(
            result,
            Err(DetectionError::RuleValidation { .. })
        ));
    }

    #[test]
    fn rule_set_rejects_invalid_rule() {
        let mut bad = sample_rule();
        bad.severity = 0;
        assert!(RuleSet::new(vec![bad]).is_err());
    }

    #[test]
    fn empty_rule_set() {
        let set = RuleSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
