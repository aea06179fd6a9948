//! 파이프라인 trait -- 모듈 확장 포인트 정의

use crate::error::SocShieldError;
use crate::types::{AlertRecord, ParsedEvent, RawLog};

/// 로그 정규화 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
/// 구현은 순수 함수여야 합니다: I/O 없음, 입력 불변, 프로세스 전역 상태 없음.
pub trait Normalizer: Send + Sync {
    /// 정규화기 이름
    fn name(&self) -> &str;

    /// 원시 로그를 정규화된 이벤트로 변환
    ///
    /// `raw.raw_log`가 비어 있거나 허용 크기를 초과하는 경우에만 실패합니다.
    fn normalize(&self, raw: &RawLog) -> Result<ParsedEvent, SocShieldError>;
}

/// 탐지 로직을 구현하는 trait
///
/// 규칙 세트가 로드된 뒤에만 인스턴스가 존재하므로,
/// 로드 전 평가는 타입 수준에서 불가능합니다.
pub trait Detector: Send + Sync {
    /// 탐지기 이름
    fn name(&self) -> &str;

    /// 이벤트를 모든 규칙에 대해 평가하여 알림 목록을 반환
    ///
    /// 결정적입니다: 같은 이벤트와 규칙 세트는 항상 같은 순서의
    /// 같은 결과를 반환합니다. 개별 규칙의 내부 오류는 해당 규칙의
    /// "매칭 안 됨"으로 강등되며 호출자에게 전파되지 않습니다.
    fn evaluate(&self, event: &ParsedEvent) -> Vec<AlertRecord>;
}

/// 이벤트 저장소 trait -- 영속성 협력자와의 경계
///
/// 코어는 저장소를 직접 읽거나 쓰지 않습니다. 수집 서비스가 이 trait을 통해
/// RawLog → ParsedEvent → AlertRecord 순서로 저장을 지시합니다.
/// `store_alerts`는 벌크 연산이며, 호출자 관점에서 전부-아니면-전무여야 합니다.
pub trait EventStore: Send + Sync {
    /// 원시 로그를 저장하고 부여된 식별자를 반환
    fn store_raw_log(
        &self,
        raw: &RawLog,
    ) -> impl Future<Output = Result<String, SocShieldError>> + Send;

    /// 정규화된 이벤트를 저장하고 부여된 식별자를 반환
    fn store_parsed_event(
        &self,
        event: &ParsedEvent,
    ) -> impl Future<Output = Result<String, SocShieldError>> + Send;

    /// 알림 묶음을 저장 (전부-아니면-전무)
    fn store_alerts(
        &self,
        alerts: &[AlertRecord],
    ) -> impl Future<Output = Result<(), SocShieldError>> + Send;

    /// severity > 0인 알림을 심각도 내림차순으로 조회
    fn alerts_by_severity(
        &self,
    ) -> impl Future<Output = Result<Vec<AlertRecord>, SocShieldError>> + Send;
}
