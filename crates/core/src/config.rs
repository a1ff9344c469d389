//! 설정 관리: logweave.toml 파싱 및 런타임 설정
//!
//! [`LogweaveConfig`]는 모든 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGWEAVE_PARSING_MAX_LINE_SIZE=65536` 형식)
//! 3. 설정 파일 (`logweave.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), logweave_core::error::LogweaveError> {
//! use logweave_core::config::LogweaveConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogweaveConfig::load("logweave.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogweaveConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogweaveError};

/// logweave 통합 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogweaveConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 파싱 설정
    #[serde(default)]
    pub parsing: ParsingConfig,
}

impl LogweaveConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogweaveError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LogweaveError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogweaveError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogweaveError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogweaveError> {
        toml::from_str(toml_str).map_err(|e| {
            LogweaveError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGWEAVE_{SECTION}_{FIELD}`
    /// 예: `LOGWEAVE_PARSING_SCANNER_POOL_SIZE=128`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGWEAVE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGWEAVE_GENERAL_LOG_FORMAT");

        // Parsing
        override_usize(
            &mut self.parsing.max_line_size,
            "LOGWEAVE_PARSING_MAX_LINE_SIZE",
        );
        override_usize(
            &mut self.parsing.scanner_pool_size,
            "LOGWEAVE_PARSING_SCANNER_POOL_SIZE",
        );
        override_csv(
            &mut self.parsing.enabled_log_types,
            "LOGWEAVE_PARSING_ENABLED_LOG_TYPES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogweaveError> {
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

        if self.parsing.max_line_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parsing.max_line_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.parsing.scanner_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "parsing.scanner_pool_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if let Some(pos) = self
            .parsing
            .enabled_log_types
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "parsing.enabled_log_types".to_owned(),
                reason: format!("entry {pos} is empty"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 파싱 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// 한 줄 최대 크기 (바이트). 초과하면 파싱 실패
    pub max_line_size: usize,
    /// 풀에 보관하는 대기 스캐너 최대 수
    pub scanner_pool_size: usize,
    /// 등록할 로그 타입 (비어 있으면 전부)
    pub enabled_log_types: Vec<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_line_size: 1024 * 1024, // 1MB
            scanner_pool_size: 64,
            enabled_log_types: Vec::new(),
        }
    }
}

impl ParsingConfig {
    /// 로그 타입이 활성화되어 있는지 확인합니다.
    pub fn is_enabled(&self, log_type: &str) -> bool {
        self.enabled_log_types.is_empty() || self.enabled_log_types.iter().any(|n| n == log_type)
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
