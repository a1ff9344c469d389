//! 파서 크레이트 에러 타입
//!
//! 줄 단위 파싱 실패는 core의 [`ParseError`](logweave_core::ParseError)로 표현하고,
//! 여기서는 파서 설정, 문법 컴파일, 등록 단계의 에러만 다룹니다.
//! `From<ParsersError> for LogweaveError` 변환으로 상위 레이어에서 `?`로 전파합니다.

use logweave_core::error::{ConfigError, LogweaveError, RegistryError};

/// 파서 크레이트 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ParsersError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 로그 타입 문법 정규식 컴파일 실패
    #[error("grammar error: {log_type}: {source}")]
    Grammar {
        /// 로그 타입 이름
        log_type: String,
        /// 정규식 에러
        #[source]
        source: regex::Error,
    },

    /// 로그 타입 등록 실패
    #[error("registration failed: {0}")]
    Registry(#[from] RegistryError),
}

impl From<ParsersError> for LogweaveError {
    fn from(err: ParsersError) -> Self {
        match err {
            ParsersError::Config { field, reason } => {
                LogweaveError::Config(ConfigError::InvalidValue { field, reason })
            }
            ParsersError::Grammar { log_type, source } => {
                LogweaveError::Registry(RegistryError::InvalidSchema {
                    name: log_type,
                    reason: source.to_string(),
                })
            }
            ParsersError::Registry(e) => LogweaveError::Registry(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ParsersError::Config {
            field: "max_line_size".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("max_line_size"));
        assert!(msg.contains("greater than 0"));
    }

    #[test]
    fn registry_error_keeps_source() {
        let err: ParsersError = RegistryError::Duplicate {
            name: "Apache.AccessCommon".to_owned(),
        }
        .into();
        assert!(err.to_string().contains("duplicate log type entry 'Apache.AccessCommon'"));
    }

    #[test]
    fn grammar_error_becomes_invalid_schema() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ParsersError::Grammar {
            log_type: "Apache.AccessCommon".to_owned(),
            source,
        };
        assert!(err.to_string().starts_with("grammar error: Apache.AccessCommon"));
        let top: LogweaveError = err.into();
        assert!(matches!(
            top,
            LogweaveError::Registry(RegistryError::InvalidSchema { ref name, .. }) if name == "Apache.AccessCommon"
        ));
    }

    #[test]
    fn converts_to_logweave_error() {
        let err = ParsersError::Config {
            field: "scanner_pool_size".to_owned(),
            reason: "must be 1-4096".to_owned(),
        };
        let top: LogweaveError = err.into();
        assert!(matches!(
            top,
            LogweaveError::Config(ConfigError::InvalidValue { .. })
        ));

        let err = ParsersError::Registry(RegistryError::MissingName);
        let top: LogweaveError = err.into();
        assert!(matches!(top, LogweaveError::Registry(RegistryError::MissingName)));
    }
}
