//! 규칙 파일 로더 -- YAML 규칙 파일을 디스크에서 로드합니다.
//!
//! 규칙 디렉토리 내의 `.yml`/`.yaml` 파일을 파일명 순으로 정렬하여 파싱합니다.
//! 로딩은 엄격합니다: 규칙 파일 하나라도 유효하지 않으면 전체 로딩이 실패합니다.
//! 잘못된 규칙을 조용히 건너뛰면 운영자가 탐지 공백을 알아차릴 수 없습니다.

use std::path::{Path, PathBuf};

use crate::config::DetectionConfig;
use crate::error::DetectionError;

use super::types::{DetectionRule, RuleSet};

/// 규칙 파일 로더
pub struct RuleLoader {
    config: DetectionConfig,
}

impl RuleLoader {
    /// 설정을 지정하여 로더를 생성합니다.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// 설정된 규칙 디렉토리에서 규칙 세트를 로드합니다.
    pub async fn load(&self) -> Result<RuleSet, DetectionError> {
        self.load_directory(&self.config.rule_dir).await
    }

    /// 디렉토리에서 모든 YAML 규칙 파일을 로드하여 규칙 세트를 생성합니다.
    ///
    /// `.yml` 또는 `.yaml` 확장자를 가진 파일만 처리하며,
    /// 파일명 오름차순으로 로드하여 규칙 순서를 결정적으로 만듭니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 규칙 파일이 파싱/검증에 실패하는 경우
    /// - 규칙 수 또는 파일 크기가 설정 제한을 초과하는 경우
    pub async fn load_directory(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<RuleSet, DetectionError> {
        let dir = dir.as_ref();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| DetectionError::RuleLoad {
                path: dir.display().to_string(),
                reason: format!("failed to read directory: {e}"),
            })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) =
            entries
                .next_entry()
                .await
                .map_err(|e| DetectionError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("failed to read directory entry: {e}"),
                })?
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if is_yaml {
                paths.push(path);
            }
        }

        // 파일명 순 로딩으로 규칙 순서를 결정적으로 유지
        paths.sort();

        let mut rules = Vec::new();
        for path in &paths {
            let rule = self.load_file(path).await?;
            rules.push(rule);

            if rules.len() > self.config.max_rules {
                return Err(DetectionError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("too many rules: max {}", self.config.max_rules),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            count = rules.len(),
            "loaded detection rules"
        );

        RuleSet::new(rules)
    }

    /// 단일 YAML 파일에서 규칙을 로드합니다.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<DetectionRule, DetectionError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| DetectionError::RuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > self.config.max_rule_file_bytes {
            return Err(DetectionError::RuleLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {})",
                    metadata.len(),
                    self.config.max_rule_file_bytes
                ),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DetectionError::RuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file: {e}"),
            })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱하여 규칙을 생성합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<DetectionRule, DetectionError> {
        let rule: DetectionRule =
            serde_yaml::from_str(yaml_str).map_err(|e| DetectionError::RuleLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        rule.validate()?;

        Ok(rule)
    }
}
