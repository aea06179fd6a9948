//! 에러 타입 -- 도메인별 에러 정의

/// SOC Shield 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SocShieldError {
    /// 정규화 에러
    #[error("normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// 탐지 규칙 에러
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스토리지 에러 (외부 협력자가 소유)
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 정규화 에러
///
/// 비어 있지 않고 크기 제한 이내인 입력은 절대 정규화 실패로 이어지지
/// 않습니다. 인식 불가능한 내용은 필드 생략으로 처리됩니다.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// 입력이 비어 있거나 크기 제한을 초과함
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },
}

/// 탐지 규칙 에러
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// 규칙 파일 로딩 실패
    #[error("rule load failed: {path}: {reason}")]
    Load { path: String, reason: String },

    /// 규칙 정의가 유효하지 않음 (로드 시점에 검출)
    #[error("invalid rule '{rule_id}': {reason}")]
    Validation { rule_id: String, reason: String },

    /// 규칙 평가 중 에러 -- 해당 규칙만 기록되고 나머지 평가는 계속됩니다
    #[error("rule evaluation failed for '{rule_id}': {reason}")]
    Evaluation { rule_id: String, reason: String },
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 쓰기 실패
    #[error("insert failed for {what}: {reason}")]
    Insert { what: String, reason: String },

    /// 조회 실패
    #[error("query failed for {what}: {reason}")]
    Query { what: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_display() {
        let err = NormalizeError::MalformedInput {
            reason: "raw_log is empty".to_owned(),
        };
        assert!(err.to_string().contains("raw_log is empty"));
    }

    #[test]
    fn rule_validation_display_contains_rule_id() {
        let err = RuleError::Validation {
            rule_id: "failed_login".to_owned(),
            reason: "severity must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed_login"));
        assert!(msg.contains("severity"));
    }

    #[test]
    fn converts_to_top_level_error() {
        let err: SocShieldError = NormalizeError::MalformedInput {
            reason: "empty".to_owned(),
        }
        .into();
        assert!(matches!(err, SocShieldError::Normalize(_)));
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::Insert {
            what: "alerts".to_owned(),
            reason: "connection refused".to_owned(),
        };
        assert!(err.to_string().contains("alerts"));
    }
}
