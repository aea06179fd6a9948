//! 탐지 파이프라인 에러 타입

use socshield_core::error::{
    NormalizeError, RuleError, SocShieldError, StorageError,
};

/// 탐지 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// 원시 로그가 비어 있거나 크기 제한 초과
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// 규칙 파일 로딩 실패
    #[error("rule load failed: {path}: {reason}")]
    RuleLoad { path: String, reason: String },

    /// 규칙 정의가 유효하지 않음
    #[error("invalid rule '{rule_id}': {reason}")]
    RuleValidation { rule_id: String, reason: String },

    /// 규칙 평가 중 내부 에러
    #[error("rule evaluation failed for '{rule_id}': {reason}")]
    RuleEvaluation { rule_id: String, reason: String },

    /// 설정 에러
    #[error("invalid detection config '{field}': {reason}")]
    Config { field: String, reason: String },

    /// 저장소 연산 실패
    #[error("storage operation '{operation}' failed: {reason}")]
    Storage { operation: String, reason: String },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<DetectionError> for SocShieldError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::MalformedInput { reason } => {
                SocShieldError::Normalize(NormalizeError::MalformedInput { reason })
            }
            DetectionError::RuleLoad { path, reason } => {
                SocShieldError::Rule(RuleError::Load { path, reason })
            }
            DetectionError::RuleValidation { rule_id, reason } => {
                SocShieldError::Rule(RuleError::Validation { rule_id, reason })
            }
            DetectionError::RuleEvaluation { rule_id, reason } => {
                SocShieldError::Rule(RuleError::Evaluation { rule_id, reason })
            }
            DetectionError::Config { field, reason } => {
                SocShieldError::Config(socshield_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
            DetectionError::Storage { operation, reason } => {
                SocShieldError::Storage(StorageError::Insert {
                    what: operation,
                    reason,
                })
            }
            DetectionError::Io(e) => SocShieldError::Io(e),
            DetectionError::Regex(e) => SocShieldError::Rule(RuleError::Validation {
                rule_id: String::new(),
                reason: e.to_string(),
            }),
        }
    }
}
