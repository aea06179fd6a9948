//! 알림 우선순위 처리
//!
//! 저장소에서 조회한 알림을 분석가에게 보여줄 순서로 정리합니다.

use socshield_core::types::AlertRecord;

/// 알림을 우선순위 순으로 정리합니다.
///
/// severity가 0 이하인 레코드는 조치 대상이 아니므로 제외하고,
/// 나머지를 severity 내림차순으로 정렬합니다. 같은 severity끼리는
/// 입력 순서를 유지합니다 (stable sort).
pub fn prioritize(alerts: Vec<AlertRecord>) -> Vec<AlertRecord> {
    let mut actionable: Vec<AlertRecord> =
        alerts.into_iter().filter(|a| a.severity > 0).collect();
    actionable.sort_by(|a, b| b.severity.cmp(&a.severity));
    actionable
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alert(id: &str, severity: u32) -> AlertRecord {
        AlertRecord {
            id: id.to_owned(),
            rule_id: "rule".to_owned(),
            title: "Title".to_owned(),
            description: String::new(),
            severity,
            raw_log_id: "raw-1".to_owned(),
            source_ip: None,
            event_type: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sorts_by_severity_descending() {
        let sorted = prioritize(vec![alert("a", 2), alert("b", 9), alert("c", 5)]);
        let severities: Vec<u32> = sorted.iter().map(|a| a.severity).collect();
        assert_eq!(severities, vec![9, 5, 2]);
    }

    #[test]
    fn filters_out_zero_severity() {
        let sorted = prioritize(vec![alert("a", 0), alert("b", 3)]);
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].id, "b");
    }

    #[test]
    fn equal_severity_preserves_input_order() {
        let sorted = prioritize(vec![
            alert("first", 5),
            alert("second", 5),
            alert("third", 5),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(prioritize(vec![]).is_empty());
    }
}
