//! 수집 서비스 -- 원시 로그 수집부터 알림 저장까지의 엔드투엔드 파이프라인
//!
//! [`IngestService`]는 하나의 원시 로그를 다음 순서로 처리합니다:
//!
//! ```text
//! 1. RawLog 저장 (식별자 부여)
//! 2. 정규화 → ParsedEvent (raw_log_id 연결)
//! 3. ParsedEvent 저장
//! 4. 규칙 평가 → 알림 생성
//! 5. 알림 일괄 저장 (있을 경우에만)
//! ```
//!
//! 저장 순서는 고정입니다: 원시 로그가 먼저 저장된 뒤에 정규화되므로,
//! 이후 단계가 실패하더라도 원본은 항상 보존됩니다.

use std::sync::Arc;

use chrono::Utc;
use socshield_core::error::{SocShieldError, StorageError};
use socshield_core::pipeline::EventStore;
use socshield_core::types::{AlertRecord, ParsedEvent, RawLog};

use crate::alert;
use crate::error::DetectionError;
use crate::normalizer::LogNormalizer;
use crate::rule::RuleEngine;

/// 수집 결과 영수증
///
/// 파이프라인 각 단계에서 부여된 식별자와 생성된 알림 수를 담습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    /// 저장소가 원시 로그에 부여한 식별자
    pub raw_log_id: String,
    /// 저장소가 정규화 이벤트에 부여한 식별자
    pub parsed_event_id: String,
    /// 생성된 알림 수
    pub alert_count: usize,
}

/// 수집 서비스
///
/// 정규화기, 규칙 엔진, 저장소를 생성 시점에 주입받습니다.
/// 규칙 엔진은 불변이므로 여러 수집 경로에서 공유할 수 있습니다.
pub struct IngestService<S: EventStore> {
    normalizer: LogNormalizer,
    engine: Arc<RuleEngine>,
    store: S,
}

impl<S: EventStore> IngestService<S> {
    /// 새 수집 서비스를 생성합니다.
    pub fn new(normalizer: LogNormalizer, engine: Arc<RuleEngine>, store: S) -> Self {
        Self {
            normalizer,
            engine,
            store,
        }
    }

    /// 원시 로그 하나를 수집하여 파이프라인 전체를 수행합니다.
    ///
    /// `raw.timestamp`가 없으면 수집 시각으로 채워집니다.
    ///
    /// # Errors
    /// - 본문이 비어 있거나 크기 제한을 초과하면 정규화 에러
    /// - 저장소 연산이 실패하면 스토리지 에러
    pub async fn ingest(&self, mut raw: RawLog) -> Result<IngestReceipt, SocShieldError> {
        // 빈 본문은 저장 전에 거부합니다
        if raw.raw_log.trim().is_empty() {
            return Err(DetectionError::MalformedInput {
                reason: "raw_log is empty".to_owned(),
            }
            .into());
        }

        if raw.timestamp.is_none() {
            raw.timestamp = Some(Utc::now());
        }

        let raw_log_id = self.store.store_raw_log(&raw).await?;
        raw.id = Some(raw_log_id.clone());

        let event = self.normalizer.normalize(&raw)?;
        let parsed_event_id = self.store.store_parsed_event(&event).await?;

        let alerts = self.engine.evaluate(&event);
        if !alerts.is_empty() {
            self.store.store_alerts(&alerts).await?;
        }

        tracing::info!(
            raw_log_id = %raw_log_id,
            parsed_event_id = %parsed_event_id,
            alert_count = alerts.len(),
            "ingested raw log"
        );

        Ok(IngestReceipt {
            raw_log_id,
            parsed_event_id,
            alert_count: alerts.len(),
        })
    }

    /// 조치 대상 알림(severity > 0)을 심각도 내림차순으로 조회합니다.
    pub async fn prioritized_alerts(&self) -> Result<Vec<AlertRecord>, SocShieldError> {
        self.store.alerts_by_severity().await
    }

    /// 저장소 참조를 반환합니다.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// 인메모리 이벤트 저장소
///
/// 테스트와 단일 프로세스 배포를 위한 기본 저장소 구현입니다.
/// 식별자는 저장 순서대로 부여됩니다 (`raw-1`, `evt-1`, ...).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: std::sync::Mutex<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    raw_logs: Vec<RawLog>,
    events: Vec<ParsedEvent>,
    alerts: Vec<AlertRecord>,
}

impl MemoryStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryStoreInner>, SocShieldError> {
        self.inner.lock().map_err(|_| {
            SocShieldError::Storage(StorageError::Insert {
                what: "memory store".to_owned(),
                reason: "lock poisoned".to_owned(),
            })
        })
    }

    /// 저장된 원시 로그 수를 반환합니다.
    pub fn raw_log_count(&self) -> usize {
        self.inner.lock().map(|g| g.raw_logs.len()).unwrap_or(0)
    }

    /// 저장된 정규화 이벤트 수를 반환합니다.
    pub fn event_count(&self) -> usize {
        self.inner.lock().map(|g| g.events.len()).unwrap_or(0)
    }

    /// 저장된 알림 수를 반환합니다.
    pub fn alert_count(&self) -> usize {
        self.inner.lock().map(|g| g.alerts.len()).unwrap_or(0)
    }
}

impl EventStore for MemoryStore {
    async fn store_raw_log(&self, raw: &RawLog) -> Result<String, SocShieldError> {
        let mut inner = self.lock()?;
        let id = format!("raw-{}", inner.raw_logs.len() + 1);
        let mut stored = raw.clone();
        stored.id = Some(id.clone());
        inner.raw_logs.push(stored);
        Ok(id)
    }

    async fn store_parsed_event(&self, event: &ParsedEvent) -> Result<String, SocShieldError> {
        let mut inner = self.lock()?;
        let id = format!("evt-{}", inner.events.len() + 1);
        inner.events.push(event.clone());
        Ok(id)
    }

    async fn store_alerts(&self, alerts: &[AlertRecord]) -> Result<(), SocShieldError> {
        let mut inner = self.lock()?;
        inner.alerts.extend_from_slice(alerts);
        Ok(())
    }

    async fn alerts_by_severity(&self) -> Result<Vec<AlertRecord>, SocShieldError> {
        let inner = self.lock()?;
        Ok(alert::prioritize(inner.alerts.clone()))
    }
}
