//! JSON 본문 추출기
//!
//! 본문이 JSON 객체인 로그에서 구조화 필드를 추출합니다.
//! 잘 알려진 필드 별칭(`src`, `dst_ip` 등)은 표준 필드로 매핑되고,
//! 나머지 필드는 dot notation으로 평탄화되어 보존됩니다.

use super::{canonical_field, parse_timestamp, Extracted};

/// JSON 객체 본문에서 필드를 추출합니다.
///
/// 본문이 유효한 JSON 객체가 아니면 `None`을 반환합니다 (호출자가
/// 텍스트 추출기로 폴백합니다).
pub(crate) fn extract(body: &str) -> Option<Extracted> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    let mut extracted = Extracted::default();

    for (key, val) in obj {
        let Some(text) = scalar_to_string(val) else {
            // 중첩 객체는 평탄화, null은 스킵
            if val.is_object() {
                flatten_into(&mut extracted.fields, val, key);
            }
            continue;
        };

        match canonical_field(key) {
            Some("source_ip") if extracted.source_ip.is_none() => {
                extracted.source_ip = Some(text);
            }
            Some("destination_ip") if extracted.destination_ip.is_none() => {
                extracted.destination_ip = Some(text);
            }
            Some("event_type") if extracted.event_type.is_none() => {
                extracted.event_type = Some(text);
            }
            Some("timestamp") if extracted.timestamp.is_none() => {
                extracted.timestamp = parse_timestamp(&text);
            }
            _ => extracted.fields.push((key.clone(), text)),
        }
    }

    Some(extracted)
}

/// 스칼라 JSON 값을 문자열로 변환합니다.
fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Array(arr) => serde_json::to_string(arr).ok(),
        _ => None,
    }
}

/// 중첩 객체를 dot notation으로 평탄화하여 필드 목록에 추가합니다.
fn flatten_into(fields: &mut Vec<(String, String)>, value: &serde_json::Value, prefix: &str) {
    if let Some(obj) = value.as_object() {
        for (key, val) in obj {
            let field_name = format!("{}.{}", prefix, key);
            if val.is_object() {
                flatten_into(fields, val, &field_name);
            } else if let Some(text) = scalar_to_string(val) {
                fields.push((field_name, text));
            }
        }
    }
}
