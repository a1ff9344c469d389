//! 에러 타입: 도메인별 에러 정의
//!
//! - [`RegistryError`]: 등록 시점의 구조적 결함 (프로세스 시작 시 치명적)
//! - [`ParseError`]: 한 줄(레코드) 단위의 복구 가능한 실패
//! - [`ScanError`]: 값 스캐너의 JSON 디코딩 실패
//! - [`ConfigError`]: 설정 로딩/검증 실패

/// logweave 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogweaveError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 타입 레지스트리 에러
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 값 스캐너 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 타입 등록/조회 에러
///
/// `Unregistered`를 제외한 모든 변형은 패키징 또는 스키마 작성 결함을 뜻하며,
/// 프로세스 시작 시 발생하면 즉시 중단해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// 이름이 비어 있음
    #[error("log type name must not be empty")]
    MissingName,

    /// 설명이 비어 있음
    #[error("log type '{name}' has no description")]
    MissingDescription { name: String },

    /// 스키마 디스크립터가 유효하지 않음
    #[error("log type '{name}' has an invalid schema: {reason}")]
    InvalidSchema { name: String, reason: String },

    /// 파서 팩토리가 다른 로그 타입의 파서를 생성함
    #[error("log type '{name}' factory produced a parser for '{produced}'")]
    ParserMismatch { name: String, produced: String },

    /// 같은 이름이 이미 등록됨
    #[error("duplicate log type entry '{name}'")]
    Duplicate { name: String },

    /// 등록되지 않은 로그 타입
    #[error("unregistered log type '{name}'")]
    Unregistered { name: String },
}

/// 한 줄 파싱 실패
///
/// 모든 변형은 실패한 로그 타입을 담고 있어 운영자가 어느 파서에서
/// 어떤 이유로 실패했는지 구분할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 원문이 형식의 문법(정규식/위치 구조)에 맞지 않음
    #[error("{log_type}: line does not match the expected grammar: {reason}")]
    Grammar { log_type: String, reason: String },

    /// 구분자 형식에서 추출된 필드 수가 고정 개수와 다름
    #[error("{log_type}: expected {expected} fields, found {found}")]
    FieldCount {
        log_type: String,
        expected: usize,
        found: usize,
    },

    /// 필수 필드 누락 또는 값 검증 실패
    #[error("{log_type}: invalid field '{field}': {reason}")]
    Validation {
        log_type: String,
        field: String,
        reason: String,
    },

    /// 타임스탬프 디코딩 실패
    #[error("{log_type}: invalid timestamp: {reason}")]
    Timestamp { log_type: String, reason: String },

    /// JSON 디코딩 실패 (스캐너 디코딩 실패 포함)
    #[error("{log_type}: malformed json: {reason}")]
    Json { log_type: String, reason: String },

    /// 입력 크기 초과
    #[error("{log_type}: input too large: {size} bytes (max: {max})")]
    TooLarge {
        log_type: String,
        size: usize,
        max: usize,
    },

    /// 정규화된 레코드를 직렬화할 수 없음
    #[error("{log_type}: cannot encode record: {reason}")]
    Record { log_type: String, reason: String },
}

impl ParseError {
    /// 문법 불일치 에러를 생성합니다.
    pub fn grammar(log_type: &str, reason: impl Into<String>) -> Self {
        Self::Grammar {
            log_type: log_type.to_owned(),
            reason: reason.into(),
        }
    }

    /// 필드 검증 에러를 생성합니다.
    pub fn validation(log_type: &str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            log_type: log_type.to_owned(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 타임스탬프 에러를 생성합니다.
    pub fn timestamp(log_type: &str, reason: impl Into<String>) -> Self {
        Self::Timestamp {
            log_type: log_type.to_owned(),
            reason: reason.into(),
        }
    }

    /// JSON 디코딩 에러를 생성합니다.
    pub fn json(log_type: &str, reason: impl std::fmt::Display) -> Self {
        Self::Json {
            log_type: log_type.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// 입력 크기를 검사합니다. 최대 크기를 넘으면 `TooLarge`를 반환합니다.
    pub fn check_size(log_type: &str, line: &str, max: usize) -> Result<(), Self> {
        if line.len() > max {
            return Err(Self::TooLarge {
                log_type: log_type.to_owned(),
                size: line.len(),
                max,
            });
        }
        Ok(())
    }

    /// 실패한 로그 타입 이름
    pub fn log_type(&self) -> &str {
        match self {
            Self::Grammar { log_type, .. }
            | Self::FieldCount { log_type, .. }
            | Self::Validation { log_type, .. }
            | Self::Timestamp { log_type, .. }
            | Self::Json { log_type, .. }
            | Self::TooLarge { log_type, .. }
            | Self::Record { log_type, .. } => log_type,
        }
    }

    /// 메트릭 레이블용 실패 분류
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Grammar { .. } => "grammar",
            Self::FieldCount { .. } => "field_count",
            Self::Validation { .. } => "validation",
            Self::Timestamp { .. } => "timestamp",
            Self::Json { .. } => "json",
            Self::TooLarge { .. } => "too_large",
            Self::Record { .. } => "record",
        }
    }
}

/// 값 스캐너 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 입력 JSON이 잘못되었거나 최상위가 객체가 아님
    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_converts_to_top_level() {
        let err: LogweaveError = RegistryError::Duplicate {
            name: "Apache.AccessCombined".to_owned(),
        }
        .into();
        assert!(matches!(err, LogweaveError::Registry(_)));
        assert!(err.to_string().contains("duplicate log type entry"));
        assert!(err.to_string().contains("Apache.AccessCombined"));
    }

    #[test]
    fn parse_error_display_names_log_type() {
        let err = ParseError::FieldCount {
            log_type: "Apache.AccessCommon".to_owned(),
            expected: 7,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Apache.AccessCommon:"));
        assert!(msg.contains("expected 7 fields, found 5"));
        assert_eq!(err.log_type(), "Apache.AccessCommon");
        assert_eq!(err.kind(), "field_count");
    }

    #[test]
    fn validation_helper_fills_all_fields() {
        let err = ParseError::validation("Suricata.DNS", "event_type", "must be \"dns\"");
        match err {
            ParseError::Validation {
                log_type,
                field,
                reason,
            } => {
                assert_eq!(log_type, "Suricata.DNS");
                assert_eq!(field, "event_type");
                assert!(reason.contains("dns"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn check_size_rejects_oversized_lines() {
        assert!(ParseError::check_size("X", "abc", 3).is_ok());
        let err = ParseError::check_size("X", "abcd", 3).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooLarge {
                log_type: "X".to_owned(),
                size: 4,
                max: 3
            }
        );
        assert_eq!(err.kind(), "too_large");
    }

    #[test]
    fn scan_error_wraps_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ScanError = json_err.into();
        assert!(err.to_string().starts_with("malformed input"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "parsing.max_line_size".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        assert!(err.to_string().contains("parsing.max_line_size"));
    }
}
