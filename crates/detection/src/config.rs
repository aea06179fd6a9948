//! 탐지 파이프라인 설정
//!
//! [`DetectionConfig`]는 core의 [`DetectionSection`](socshield_core::config::DetectionSection)을
//! 기반으로 탐지 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use socshield_core::config::SocShieldConfig;
//! use socshield_detection::config::DetectionConfig;
//!
//! let core_config = SocShieldConfig::default();
//! let config = DetectionConfig::from_core(&core_config.detection);
//! assert_eq!(config.rule_dir, "/etc/socshield/rules");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// 탐지 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// 탐지 규칙(YAML) 디렉토리 경로
    pub rule_dir: String,
    /// 원시 로그 본문 최대 크기 (바이트)
    pub max_raw_log_bytes: usize,
    /// 로드 가능한 최대 규칙 수
    pub max_rules: usize,
    /// 규칙 파일 하나의 최대 크기 (바이트)
    pub max_rule_file_bytes: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            rule_dir: "/etc/socshield/rules".to_owned(),
            max_raw_log_bytes: 1024 * 1024,
            max_rules: 10_000,
            max_rule_file_bytes: 1024 * 1024,
        }
    }
}

impl DetectionConfig {
    /// core의 `DetectionSection`에서 탐지 설정을 생성합니다.
    pub fn from_core(core: &socshield_core::config::DetectionSection) -> Self {
        Self {
            rule_dir: core.rule_dir.clone(),
            max_raw_log_bytes: core.max_raw_log_bytes,
            max_rules: core.max_rules,
            max_rule_file_bytes: core.max_rule_file_bytes,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.rule_dir.is_empty() {
            return Err(DetectionError::Config {
                field: "rule_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.max_raw_log_bytes == 0 {
            return Err(DetectionError::Config {
                field: "max_raw_log_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.max_rules == 0 {
            return Err(DetectionError::Config {
                field: "max_rules".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.max_rule_file_bytes == 0 {
            return Err(DetectionError::Config {
                field: "max_rule_file_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 탐지 설정 빌더
#[derive(Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 규칙 디렉토리를 설정합니다.
    pub fn rule_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.rule_dir = dir.into();
        self
    }

    /// 원시 로그 최대 크기를 설정합니다.
    pub fn max_raw_log_bytes(mut self, bytes: usize) -> Self {
        self.config.max_raw_log_bytes = bytes;
        self
    }

    /// 최대 규칙 수를 설정합니다.
    pub fn max_rules(mut self, count: usize) -> Self {
        self.config.max_rules = count;
        self
    }

    /// 규칙 파일 최대 크기를 설정합니다.
    pub fn max_rule_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_rule_file_bytes = bytes;
        self
    }

    /// 설정을 검증하고 `DetectionConfig`를 생성합니다.
    pub fn build(self) -> Result<DetectionConfig, DetectionError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
