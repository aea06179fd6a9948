//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 수집된 원시 로그([`RawLog`]), 정규화된 이벤트([`ParsedEvent`]),
//! 탐지 알림([`AlertRecord`])을 정의합니다.
//! 세 타입 모두 생성 후 불변으로 취급됩니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 원시 로그 제출물
///
/// 수집 시점의 로그를 최소한의 구조로 담습니다. `raw_log` 본문만 필수이며,
/// 나머지 필드는 호출자가 이미 알고 있는 경우에만 채워집니다.
/// 호출자가 채운 필드는 정규화 과정에서 절대 덮어쓰이지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLog {
    /// 저장소가 부여한 식별자 (저장 전에는 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 원시 로그 본문 (비어 있으면 안 됨)
    pub raw_log: String,
    /// 로그 발생 시각 -- 없으면 수집 시각으로 채워집니다
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// 출발지 IP (호출자 제공, 선택)
    #[serde(default)]
    pub source_ip: Option<String>,
    /// 목적지 IP (호출자 제공, 선택)
    #[serde(default)]
    pub destination_ip: Option<String>,
    /// 이벤트 유형 (호출자 제공, 선택)
    #[serde(default)]
    pub event_type: Option<String>,
}

impl RawLog {
    /// 본문만으로 새 원시 로그를 생성합니다.
    pub fn new(raw_log: impl Into<String>) -> Self {
        Self {
            id: None,
            raw_log: raw_log.into(),
            timestamp: None,
            source_ip: None,
            destination_ip: None,
            event_type: None,
        }
    }
}

impl fmt::Display for RawLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.id.as_deref().unwrap_or("-"),
            self.raw_log,
        )
    }
}

/// 정규화된 이벤트
///
/// 하나의 [`RawLog`]에서 정확히 하나 생성됩니다.
/// 인식 가능한 필드는 구조화되고, 나머지는 `fields`에 key-value 쌍으로 보존됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    /// 원본 RawLog 식별자 -- 아직 저장되지 않았으면 빈 문자열
    ///
    /// 없는(absent) 상태는 허용하지 않습니다. 하위 소비자(룰 엔진, 저장소)는
    /// 이 필드가 항상 존재한다고 가정합니다.
    pub raw_log_id: String,
    /// 이벤트 발생 시각
    pub timestamp: Option<DateTime<Utc>>,
    /// 출발지 IP
    pub source_ip: Option<String>,
    /// 목적지 IP
    pub destination_ip: Option<String>,
    /// 이벤트 유형 (예: FAILED_LOGIN)
    pub event_type: Option<String>,
    /// 추가 필드 (추출 순서 유지)
    pub fields: Vec<(String, String)>,
}

impl ParsedEvent {
    /// 이름으로 필드 값을 조회합니다.
    ///
    /// 구조화된 필드명(`source_ip`, `destination_ip`, `event_type`,
    /// `raw_log_id`)을 먼저 확인하고, 없으면 `fields`에서 검색합니다.
    /// 값이 없는 필드는 None을 반환합니다.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "raw_log_id" => Some(&self.raw_log_id),
            "source_ip" => self.source_ip.as_deref(),
            "destination_ip" => self.destination_ip.as_deref(),
            "event_type" => self.event_type.as_deref(),
            _ => self
                .fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

impl fmt::Display for ParsedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.event_type.as_deref().unwrap_or("UNKNOWN"),
            self.source_ip.as_deref().unwrap_or("-"),
            self.destination_ip.as_deref().unwrap_or("-"),
        )
    }
}

/// 탐지 알림
///
/// 탐지 규칙에 매칭되어 생성된 알림을 나타냅니다.
/// `severity`는 0보다 큰 수치 점수입니다 -- 0은 "알림 아님"을 의미하므로
/// 방출된 알림에는 나타나지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    /// 알림 ID (UUID v4)
    pub id: String,
    /// 매칭된 규칙 ID
    pub rule_id: String,
    /// 알림 제목
    pub title: String,
    /// 상세 설명
    pub description: String,
    /// 심각도 점수 (> 0)
    pub severity: u32,
    /// 원본 RawLog 식별자 (이벤트에서 전달)
    pub raw_log_id: String,
    /// 관련 출발지 IP (있을 경우)
    pub source_ip: Option<String>,
    /// 매칭된 이벤트 유형 (있을 경우)
    pub event_type: Option<String>,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[severity={}] {} (rule: {})",
            self.severity, self.title, self.rule_id,
        )
    }
}
