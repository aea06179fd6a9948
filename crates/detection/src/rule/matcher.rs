//! 규칙 매칭 로직 -- 조건 평가 및 정규식 캐싱
//!
//! [`RuleMatcher`]는 규칙의 조건을 [`ParsedEvent`]에 대해 평가합니다.
//! 정규식 패턴은 규칙 로딩 시 한 번만 컴파일하여 캐싱합니다.

use std::collections::HashMap;

use regex::Regex;

use socshield_core::types::ParsedEvent;

use super::types::{ConditionModifier, DetectionRule, FieldCondition};
use crate::error::DetectionError;

/// 규칙 매처 -- 조건 평가 및 정규식 캐싱
///
/// 규칙 로딩 시 정규식을 미리 컴파일하여 매칭 시 재컴파일 오버헤드를 제거합니다.
pub struct RuleMatcher {
    /// 컴파일된 정규식 캐시: (rule_id, condition_index) -> Regex
    regex_cache: HashMap<(String, usize), Regex>,
}

impl RuleMatcher {
    /// 새 매처를 생성합니다.
    pub fn new() -> Self {
        Self {
            regex_cache: HashMap::new(),
        }
    }

    /// 규칙의 정규식 조건을 미리 컴파일합니다.
    ///
    /// 규칙 세트 구성 시 호출하여 정규식 패턴의 유효성을 검증하고 캐싱합니다.
    pub fn compile_rule(&mut self, rule: &DetectionRule) -> Result<(), DetectionError> {
        for (idx, condition) in rule.conditions.iter().enumerate() {
            if condition.modifier == ConditionModifier::Regex {
                let regex =
                    Regex::new(&condition.value).map_err(|e| DetectionError::RuleValidation {
                        rule_id: rule.id.clone(),
                        reason: format!(
                            "invalid regex in condition[{idx}] for field '{}': {e}",
                            condition.field
                        ),
                    })?;
                self.regex_cache.insert((rule.id.clone(), idx), regex);
            }
        }
        Ok(())
    }

    /// 규칙의 모든 조건이 이벤트에 매칭되는지 평가합니다.
    ///
    /// 모든 조건이 AND 결합이므로, 하나라도 실패하면 false를 반환합니다.
    /// 조건이 비어 있으면 true를 반환합니다 (모든 이벤트에 매칭).
    /// 이벤트에 없는 필드를 참조하는 조건은 매칭 실패로 처리됩니다.
    pub fn matches(
        &self,
        rule: &DetectionRule,
        event: &ParsedEvent,
    ) -> Result<bool, DetectionError> {
        for (idx, condition) in rule.conditions.iter().enumerate() {
            let matched = match event.field(&condition.field) {
                Some(value) => self.evaluate_condition(condition, value, &rule.id, idx)?,
                None => false,
            };

            if !matched {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// 단일 조건을 평가합니다.
    fn evaluate_condition(
        &self,
        condition: &FieldCondition,
        field_value: &str,
        rule_id: &str,
        condition_idx: usize,
    ) -> Result<bool, DetectionError> {
        match condition.modifier {
            ConditionModifier::Exact => Ok(field_value == condition.value),

            ConditionModifier::Contains => Ok(field_value.contains(&condition.value)),

            ConditionModifier::StartsWith => Ok(field_value.starts_with(&condition.value)),

            ConditionModifier::EndsWith => Ok(field_value.ends_with(&condition.value)),

            ConditionModifier::Regex => {
                let regex = self
                    .regex_cache
                    .get(&(rule_id.to_owned(), condition_idx))
                    .ok_or_else(|| DetectionError::RuleEvaluation {
                        rule_id: rule_id.to_owned(),
                        reason: format!("regex not compiled for condition[{condition_idx}]"),
                    })?;
                Ok(regex.is_match(field_value))
            }
        }
    }
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new()
    }
}
