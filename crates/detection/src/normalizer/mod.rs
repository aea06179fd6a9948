//! 로그 정규화 모듈 -- 원시 로그를 구조화된 이벤트로 변환
//!
//! [`LogNormalizer`]는 원시 로그 본문의 형식(JSON / 텍스트)을 판별하여
//! 적절한 추출기를 선택하고, 결과를 [`ParsedEvent`]로 조립합니다.
//!
//! # 계약
//! - 비어 있지 않은 입력은 절대 실패하지 않습니다. 인식 불가능한 내용은
//!   필드가 비어 있는 이벤트로 정규화됩니다.
//! - 호출자가 `RawLog`에 채운 필드는 본문에서 추출한 값보다 우선합니다.
//! - 하나의 `RawLog`에서 정확히 하나의 `ParsedEvent`가 생성됩니다.
//!
//! # 사용 예시
//! ```
//! use socshield_core::types::RawLog;
//! use socshield_detection::normalizer::LogNormalizer;
//!
//! let normalizer = LogNormalizer::default();
//! let raw = RawLog::new("2024-01-15 12:00:00 FAILED_LOGIN src=10.0.0.5 user=root");
//! let event = normalizer.normalize(&raw).unwrap();
//! assert_eq!(event.event_type.as_deref(), Some("FAILED_LOGIN"));
//! assert_eq!(event.source_ip.as_deref(), Some("10.0.0.5"));
//! ```

mod json;
mod text;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use socshield_core::error::SocShieldError;
use socshield_core::pipeline::Normalizer;
use socshield_core::types::{ParsedEvent, RawLog};

use crate::error::DetectionError;

/// 본문에서 추출된 중간 결과
///
/// JSON / 텍스트 추출기가 공통으로 반환하는 형태입니다.
/// `LogNormalizer`가 호출자 제공 필드와 병합하여 최종 이벤트를 만듭니다.
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub timestamp: Option<DateTime<Utc>>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,
    pub event_type: Option<String>,
    pub fields: Vec<(String, String)>,
}

/// 로그 정규화기
///
/// 본문이 JSON 객체이면 JSON 추출기를, 아니면 텍스트 추출기를 사용합니다.
pub struct LogNormalizer {
    /// 최대 허용 본문 크기 (바이트)
    max_raw_log_bytes: usize,
}

impl LogNormalizer {
    /// 본문 크기 제한을 지정하여 정규화기를 생성합니다.
    pub fn new(max_raw_log_bytes: usize) -> Self {
        Self { max_raw_log_bytes }
    }

    /// 원시 로그를 정규화된 이벤트로 변환합니다.
    ///
    /// `raw.raw_log`가 비어 있거나(공백 포함) 크기 제한을 초과하는 경우에만
    /// 실패합니다.
    pub fn normalize(&self, raw: &RawLog) -> Result<ParsedEvent, DetectionError> {
        let body = raw.raw_log.trim();
        if body.is_empty() {
            return Err(DetectionError::MalformedInput {
                reason: "raw_log is empty".to_owned(),
            });
        }

        if raw.raw_log.len() > self.max_raw_log_bytes {
            return Err(DetectionError::MalformedInput {
                reason: format!(
                    "raw_log too large: {} bytes (max: {})",
                    raw.raw_log.len(),
                    self.max_raw_log_bytes
                ),
            });
        }

        let extracted = if looks_like_json(body) {
            match json::extract(body) {
                Some(extracted) => extracted,
                // JSON처럼 보이지만 파싱 불가하면 텍스트로 취급
                None => text::extract(body),
            }
        } else {
            text::extract(body)
        };

        // 호출자 제공 필드가 본문 추출값보다 우선합니다
        Ok(ParsedEvent {
            raw_log_id: raw.id.clone().unwrap_or_default(),
            timestamp: raw.timestamp.or(extracted.timestamp),
            source_ip: raw.source_ip.clone().or(extracted.source_ip),
            destination_ip: raw.destination_ip.clone().or(extracted.destination_ip),
            event_type: raw.event_type.clone().or(extracted.event_type),
            fields: extracted.fields,
        })
    }
}

impl Default for LogNormalizer {
    fn default() -> Self {
        Self::new(1024 * 1024)
    }
}

impl Normalizer for LogNormalizer {
    fn name(&self) -> &str {
        "log-normalizer"
    }

    fn normalize(&self, raw: &RawLog) -> Result<ParsedEvent, SocShieldError> {
        LogNormalizer::normalize(self, raw).map_err(SocShieldError::from)
    }
}

/// 본문이 JSON 객체로 보이는지 판별합니다.
fn looks_like_json(body: &str) -> bool {
    body.starts_with('{')
}

/// 타임스탬프 문자열을 파싱합니다.
///
/// 지원 형식:
/// - RFC 3339 (ISO 8601): `2024-01-15T12:00:00Z`
/// - Unix timestamp (초): `1705320000`
/// - Unix timestamp (밀리초): `1705320000000`
/// - 날짜+시각: `2024-01-15 12:00:00`
/// - 날짜만: `2024-01-15` (자정으로 해석)
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(ts_num) = value.parse::<i64>() {
        // 10자리 = 초, 13자리 = 밀리초.
        // 2001-09-09 이전을 가리키는 짧은 정수(상태 코드, 포트 번호 등)는
        // 타임스탬프로 취급하지 않습니다.
        if ts_num >= 1_000_000_000 {
            let ts_secs = if ts_num > 9_999_999_999 {
                ts_num / 1000
            } else {
                ts_num
            };
            return DateTime::from_timestamp(ts_secs, 0);
        }
        return None;
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// 필드 이름을 표준 필드로 정규화합니다.
///
/// 로그 소스마다 같은 의미의 필드에 다른 이름을 쓰므로,
/// 잘 알려진 별칭을 표준 이름으로 매핑합니다.
pub(crate) fn canonical_field(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "source_ip" | "src_ip" | "src" => Some("source_ip"),
        "destination_ip" | "dst_ip" | "dst" | "dest_ip" => Some("destination_ip"),
        "event_type" | "event" | "type" => Some("event_type"),
        "timestamp" | "time" | "ts" => Some("timestamp"),
        _ => None,
    }
}
