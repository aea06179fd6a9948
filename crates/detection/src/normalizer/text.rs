//! 텍스트 본문 추출기
//!
//! 비정형 텍스트 로그에서 최선 노력(best-effort)으로 필드를 추출합니다.
//! 실패하는 경우는 없으며, 인식 못한 토큰은 그대로 무시됩니다.
//!
//! # 인식 패턴
//! - 선행 타임스탬프: `2024-01-15T12:00:00Z`, `2024-01-15 12:00:00`, `2024-01-15`
//! - `key=value` 쌍 (별칭은 표준 필드로 매핑)
//! - 대문자 스네이크 토큰 (`FAILED_LOGIN`) → event_type
//! - IPv4 리터럴 → 첫 번째는 source_ip, 두 번째는 destination_ip

use std::net::Ipv4Addr;

use super::{canonical_field, parse_timestamp, Extracted};

/// 텍스트 본문에서 필드를 추출합니다. 항상 성공합니다.
pub(crate) fn extract(body: &str) -> Extracted {
    let mut extracted = Extracted::default();

    let rest = consume_leading_timestamp(body, &mut extracted);

    for token in rest.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            apply_pair(&mut extracted, key, value);
            continue;
        }

        if is_event_token(token) {
            if extracted.event_type.is_none() {
                extracted.event_type = Some(token.to_owned());
            }
            continue;
        }

        if token.parse::<Ipv4Addr>().is_ok() {
            if extracted.source_ip.is_none() {
                extracted.source_ip = Some(token.to_owned());
            } else if extracted.destination_ip.is_none() {
                extracted.destination_ip = Some(token.to_owned());
            }
        }
    }

    extracted
}

/// 본문 앞부분의 타임스탬프를 소비하고 나머지를 반환합니다.
///
/// `2024-01-15 12:00:00`처럼 공백을 포함하는 형식이 있으므로
/// 처음 두 토큰 결합을 먼저 시도합니다.
fn consume_leading_timestamp<'a>(body: &'a str, extracted: &mut Extracted) -> &'a str {
    let mut tokens = body.split_whitespace();
    let Some(first) = tokens.next() else {
        return body;
    };

    if let Some(second) = tokens.next() {
        let combined_len = first.len() + 1 + second.len();
        if let Some(combined) = body.trim_start().get(..combined_len) {
            if let Some(ts) = parse_timestamp(combined) {
                extracted.timestamp = Some(ts);
                return &body.trim_start()[combined_len..];
            }
        }
    }

    if let Some(ts) = parse_timestamp(first) {
        extracted.timestamp = Some(ts);
        return &body.trim_start()[first.len()..];
    }

    body
}

/// key=value 쌍을 표준 필드 또는 추가 필드에 반영합니다.
fn apply_pair(extracted: &mut Extracted, key: &str, value: &str) {
    match canonical_field(key) {
        Some("source_ip") if extracted.source_ip.is_none() => {
            extracted.source_ip = Some(value.to_owned());
        }
        Some("destination_ip") if extracted.destination_ip.is_none() => {
            extracted.destination_ip = Some(value.to_owned());
        }
        Some("event_type") if extracted.event_type.is_none() => {
            extracted.event_type = Some(value.to_owned());
        }
        Some("timestamp") if extracted.timestamp.is_none() => {
            extracted.timestamp = parse_timestamp(value);
        }
        _ => extracted.fields.push((key.to_owned(), value.to_owned())),
    }
}

/// 이벤트 유형 토큰인지 판별합니다 (대문자 + 밑줄, 2자 이상).
fn is_event_token(token: &str) -> bool {
    token.len() >= 2
        && token.contains('_')
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
