//! 파서 설정
//!
//! [`ParserConfig`]는 core의 [`ParsingConfig`](logweave_core::config::ParsingConfig)를
//! 기반으로 파서 인스턴스들이 공유하는 실행 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logweave_core::LogweaveConfig;
//! use logweave_parsers::config::ParserConfig;
//!
//! let core_config = LogweaveConfig::default();
//! let config = ParserConfig::from_core(&core_config.parsing);
//! ```

use std::sync::Arc;

use logweave_core::ScannerPool;
use logweave_core::config::ParsingConfig;

use crate::error::ParsersError;

/// 한 줄 최대 크기 상한 (64MB)
const MAX_LINE_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// 파서 설정
///
/// 같은 설정으로 만든 파서들은 하나의 스캐너 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// 한 줄 최대 크기 (바이트)
    pub max_line_size: usize,
    /// 값 스캐너를 쓰는 파서가 공유하는 풀
    pub scanner_pool: Arc<ScannerPool>,
    /// 등록할 로그 타입 (비어 있으면 전부)
    pub enabled_log_types: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::from_core(&ParsingConfig::default())
    }
}

impl ParserConfig {
    /// core의 `ParsingConfig`에서 파서 설정을 생성합니다.
    pub fn from_core(core: &ParsingConfig) -> Self {
        Self {
            max_line_size: core.max_line_size,
            scanner_pool: Arc::new(ScannerPool::new(core.scanner_pool_size)),
            enabled_log_types: core.enabled_log_types.clone(),
        }
    }

    /// 로그 타입이 활성화되어 있는지 확인합니다.
    pub fn is_enabled(&self, log_type: &str) -> bool {
        self.enabled_log_types.is_empty() || self.enabled_log_types.iter().any(|n| n == log_type)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ParsersError> {
        if self.max_line_size == 0 || self.max_line_size > MAX_LINE_SIZE_LIMIT {
            return Err(ParsersError::Config {
                field: "max_line_size".to_owned(),
                reason: format!("must be 1-{MAX_LINE_SIZE_LIMIT}"),
            });
        }

        if self.scanner_pool.capacity() == 0 {
            return Err(ParsersError::Config {
                field: "scanner_pool_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if let Some(name) = self
            .enabled_log_types
            .iter()
            .find(|name| name.trim().is_empty())
        {
            return Err(ParsersError::Config {
                field: "enabled_log_types".to_owned(),
                reason: format!("invalid entry {name:?}"),
            });
        }

        Ok(())
    }
}

/// 파서 설정 빌더
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 한 줄 최대 크기를 설정합니다.
    pub fn max_line_size(mut self, size: usize) -> Self {
        self.config.max_line_size = size;
        self
    }

    /// 새 스캐너 풀의 보관 용량을 설정합니다.
    pub fn scanner_pool_size(mut self, capacity: usize) -> Self {
        self.config.scanner_pool = Arc::new(ScannerPool::new(capacity));
        self
    }

    /// 이미 만들어진 스캐너 풀을 공유합니다.
    pub fn scanner_pool(mut self, pool: Arc<ScannerPool>) -> Self {
        self.config.scanner_pool = pool;
        self
    }

    /// 등록할 로그 타입을 제한합니다.
    pub fn enabled_log_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.enabled_log_types = names.into_iter().map(Into::into).collect();
        self
    }

    /// 설정을 검증하고 `ParserConfig`를 생성합니다.
    pub fn build(self) -> Result<ParserConfig, ParsersError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ParserConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_line_size, 1024 * 1024);
        assert_eq!(config.scanner_pool.capacity(), 64);
    }

    #[test]
    fn from_core_preserves_values() {
        let core = ParsingConfig {
            max_line_size: 4096,
            scanner_pool_size: 8,
            enabled_log_types: vec!["Zeek.DNS".to_owned()],
        };
        let config = ParserConfig::from_core(&core);
        assert_eq!(config.max_line_size, 4096);
        assert_eq!(config.scanner_pool.capacity(), 8);
        assert!(config.is_enabled("Zeek.DNS"));
        assert!(!config.is_enabled("Apache.AccessCommon"));
    }

    #[test]
    fn empty_filter_enables_everything() {
        let config = ParserConfig::default();
        assert!(config.is_enabled("AWS.CloudTrail"));
    }

    #[test]
    fn validate_rejects_zero_line_size() {
        let result = ParserConfigBuilder::new().max_line_size(0).build();
        assert!(matches!(
            result,
            Err(ParsersError::Config { ref field, .. }) if field == "max_line_size"
        ));
    }

    #[test]
    fn validate_rejects_huge_line_size() {
        let result = ParserConfigBuilder::new()
            .max_line_size(MAX_LINE_SIZE_LIMIT + 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_pool() {
        let result = ParserConfigBuilder::new().scanner_pool_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_blank_filter_entry() {
        let result = ParserConfigBuilder::new()
            .enabled_log_types(["Zeek.DNS", " "])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_shares_given_pool() {
        let pool = Arc::new(ScannerPool::new(3));
        let config = ParserConfigBuilder::new()
            .scanner_pool(Arc::clone(&pool))
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(&config.scanner_pool, &pool));
    }
}
