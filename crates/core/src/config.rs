//! 설정 관리 -- socshield.toml 파싱 및 런타임 설정
//!
//! [`SocShieldConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`SOCSHIELD_DETECTION_RULE_DIR=/etc/socshield/rules` 형식)
//! 2. 설정 파일 (`socshield.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), socshield_core::error::SocShieldError> {
//! use socshield_core::config::SocShieldConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SocShieldConfig::load("socshield.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SocShieldConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SocShieldError};

/// SOC Shield 통합 설정
///
/// `socshield.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocShieldConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 탐지 파이프라인 설정
    #[serde(default)]
    pub detection: DetectionSection,
}

impl SocShieldConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SocShieldError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SocShieldError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SocShieldError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SocShieldError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SocShieldError> {
        toml::from_str(toml_str).map_err(|e| {
            SocShieldError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SOCSHIELD_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SOCSHIELD_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SOCSHIELD_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "SOCSHIELD_GENERAL_DATA_DIR");

        // Detection
        override_bool(&mut self.detection.enabled, "SOCSHIELD_DETECTION_ENABLED");
        override_string(&mut self.detection.rule_dir, "SOCSHIELD_DETECTION_RULE_DIR");
        override_usize(
            &mut self.detection.max_raw_log_bytes,
            "SOCSHIELD_DETECTION_MAX_RAW_LOG_BYTES",
        );
        override_usize(
            &mut self.detection.max_rules,
            "SOCSHIELD_DETECTION_MAX_RULES",
        );
        override_u64(
            &mut self.detection.max_rule_file_bytes,
            "SOCSHIELD_DETECTION_MAX_RULE_FILE_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SocShieldError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.detection.enabled {
            if self.detection.rule_dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "detection.rule_dir".to_owned(),
                    reason: "rule_dir must not be empty when detection is enabled".to_owned(),
                }
                .into());
            }

            if self.detection.max_raw_log_bytes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "detection.max_raw_log_bytes".to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }

            if self.detection.max_rules == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "detection.max_rules".to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }

            if self.detection.max_rule_file_bytes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "detection.max_rule_file_bytes".to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 데이터 디렉토리
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            data_dir: "/var/lib/socshield".to_owned(),
        }
    }
}

/// 탐지 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// 활성화 여부
    pub enabled: bool,
    /// 탐지 규칙 디렉토리 경로
    pub rule_dir: String,
    /// 원시 로그 최대 크기 (바이트)
    pub max_raw_log_bytes: usize,
    /// 로드 가능한 최대 규칙 수
    pub max_rules: usize,
    /// 규칙 파일 최대 크기 (바이트)
    pub max_rule_file_bytes: u64,
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            enabled: true,
            rule_dir: "/etc/socshield/rules".to_owned(),
            max_raw_log_bytes: 1024 * 1024, // 1MB
            max_rules: 10_000,
            max_rule_file_bytes: 1024 * 1024, // 1MB
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---
// 파싱 불가능한 값은 경고 로그 후 무시합니다 (기존 값 유지).

fn override_string(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_bool(target: &mut bool, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(var, value, "ignoring unparsable bool env override"),
        }
    }
}

fn override_usize(target: &mut usize, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(var, value, "ignoring unparsable usize env override"),
        }
    }
}

fn override_u64(target: &mut u64, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(var, value, "ignoring unparsable u64 env override"),
        }
    }
}
