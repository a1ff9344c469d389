//! 스키마 기반 JSON 파서
//!
//! 한 줄을 형식별 레코드 타입 `R`로 바로 디코딩하고, 필드 규칙을 검증한 뒤
//! 레코드가 아는 필드에서 지표를 명시적으로 추출합니다. 페이로드 형태를 일부만
//! 아는 형식(`R::SCAN_VALUES`)은 풀에서 스캐너를 빌려 줄 전체를 추가로 스캔합니다.
//!
//! # 처리 순서
//! 1. 크기 검사 (`TooLarge`)
//! 2. `serde_json::from_str::<R>` (`Json`, 타임스탬프 실패는 `Timestamp`)
//! 3. `R::validate` (`Validation`)
//! 4. 이벤트 시각 + 명시적 지표 + 선택적 스캔
//! 5. 정규화된 레코드 첨부 (`Record`)
//!
//! # 사용 예시
//! ```ignore
//! use logweave_parsers::parser::json::JsonParser;
//! use logweave_parsers::parser::gitlab::GitLabAudit;
//!
//! let registry = logweave_core::Registry::new();
//! registry.register(JsonParser::<GitLabAudit>::log_type(&config))?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use logweave_core::{Event, LogParser, LogType, ParseError, ScannerPool, Schema, Value};

use crate::config::ParserConfig;
use crate::timestamp::is_timestamp_error;
use crate::validate::{FieldError, Validate};

/// JSON 한 줄에 대응하는 형식별 레코드
pub trait JsonRecord: Schema + Validate {
    /// 등록 이름
    const LOG_TYPE: &'static str;
    /// 로그 타입 설명
    const DESCRIPTION: &'static str;
    /// 형식 문서 URL
    const REFERENCE_URL: &'static str;
    /// 줄 전체를 값 스캐너로 추가 스캔할지 여부
    const SCAN_VALUES: bool = false;

    /// 이벤트 시각. 검증을 통과한 레코드에서만 호출됩니다.
    fn event_time(&self) -> Result<DateTime<Utc>, FieldError>;

    /// 레코드가 아는 필드에서 지표를 추출합니다.
    fn indicators(&self, values: &mut Vec<Value>);
}

/// 레코드 타입 `R`에 대한 JSON 파서
pub struct JsonParser<R> {
    max_line_size: usize,
    pool: Arc<ScannerPool>,
    values: Vec<Value>,
    record: PhantomData<fn() -> R>,
}

impl<R: JsonRecord> JsonParser<R> {
    /// 설정으로 새 파서를 생성합니다.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            max_line_size: config.max_line_size,
            pool: Arc::clone(&config.scanner_pool),
            values: Vec::new(),
            record: PhantomData,
        }
    }

    /// 레지스트리 항목을 만듭니다.
    pub fn log_type(config: &ParserConfig) -> LogType {
        let config = config.clone();
        LogType::new::<R, _>(R::LOG_TYPE, R::DESCRIPTION, move || {
            Box::new(JsonParser::<R>::new(&config))
        })
        .with_reference_url(R::REFERENCE_URL)
    }

    fn decode(&self, line: &str) -> Result<R, ParseError> {
        serde_json::from_str(line).map_err(|e| {
            if is_timestamp_error(&e) {
                ParseError::timestamp(R::LOG_TYPE, e.to_string())
            } else {
                ParseError::json(R::LOG_TYPE, e)
            }
        })
    }
}

impl<R: JsonRecord> LogParser for JsonParser<R> {
    fn log_type(&self) -> &str {
        R::LOG_TYPE
    }

    fn parse(&mut self, line: &str) -> Result<Vec<Event>, ParseError> {
        ParseError::check_size(R::LOG_TYPE, line, self.max_line_size)?;

        let record = self.decode(line)?;
        record
            .validate()
            .map_err(|e| e.into_parse_error(R::LOG_TYPE))?;
        let time = record
            .event_time()
            .map_err(|e| e.into_parse_error(R::LOG_TYPE))?;

        self.values.clear();
        record.indicators(&mut self.values);
        if R::SCAN_VALUES {
            let mut scanner = self.pool.acquire();
            scanner
                .scan_values(&mut self.values, line)
                .map_err(|e| ParseError::json(R::LOG_TYPE, e))?;
        }

        let event = Event::new(R::LOG_TYPE, time)
            .with_values(self.values.drain(..))
            .with_record(&record)
            .map_err(|e| ParseError::Record {
                log_type: R::LOG_TYPE.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(vec![event])
    }

    fn new_parser(&self) -> Box<dyn LogParser> {
        Box::new(Self {
            max_line_size: self.max_line_size,
            pool: Arc::clone(&self.pool),
            values: Vec::new(),
            record: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logweave_core::schema::{FieldDescriptor, FieldType};
    use logweave_core::{Registry, ValueKind};
    use serde::{Deserialize, Serialize};

    use crate::config::ParserConfigBuilder;
    use crate::timestamp::{Rfc3339, Timestamp};
    use crate::validate::{required, required_str};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Login {
        time: Option<Timestamp<Rfc3339>>,
        user: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<serde_json::Value>,
    }

    impl Schema for Login {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::required("time", FieldType::Timestamp, "login time"),
                FieldDescriptor::required("user", FieldType::String, "user name"),
                FieldDescriptor::optional("detail", FieldType::Json, "free-form detail"),
            ]
        }
    }

    impl Validate for Login {
        fn validate(&self) -> Result<(), FieldError> {
            required("time", &self.time)?;
            required_str("user", &self.user)?;
            Ok(())
        }
    }

    impl JsonRecord for Login {
        const LOG_TYPE: &'static str = "Test.Login";
        const DESCRIPTION: &'static str = "Login audit records";
        const REFERENCE_URL: &'static str = "https://example.com/login";
        const SCAN_VALUES: bool = true;

        fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
            required("time", &self.time).map(|t| t.time())
        }

        fn indicators(&self, values: &mut Vec<Value>) {
            values.extend(self.user.as_deref().map(Value::domain_name));
        }
    }

    fn parser() -> JsonParser<Login> {
        JsonParser::new(&ParserConfig::default())
    }

    #[test]
    fn parses_explicit_and_scanned_values() {
        let mut parser = parser();
        let events = parser
            .parse(r#"{"time":"2024-01-15T12:00:00Z","user":"corp.example","detail":{"publicIp":"1.2.3.4"}}"#)
            .unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.log_type(), "Test.Login");
        assert!(event.contains(&ValueKind::DomainName, "corp.example"));
        assert!(event.contains(&ValueKind::IpAddress, "1.2.3.4"));
        assert_eq!(event.record()["user"], "corp.example");
    }

    #[test]
    fn missing_required_field_is_validation_error() {
        let err = parser()
            .parse(r#"{"time":"2024-01-15T12:00:00Z"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::validation("Test.Login", "user", "required field is missing")
        );
    }

    #[test]
    fn bad_timestamp_is_timestamp_error() {
        let err = parser()
            .parse(r#"{"time":"15/01/2024","user":"x"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "timestamp");
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = parser().parse(r#"{"time":"#).unwrap_err();
        assert_eq!(err.kind(), "json");
    }

    #[test]
    fn oversized_line_is_rejected_before_decoding() {
        let config = ParserConfigBuilder::new().max_line_size(16).build().unwrap();
        let mut parser = JsonParser::<Login>::new(&config);
        let err = parser
            .parse(r#"{"time":"2024-01-15T12:00:00Z","user":"x"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "too_large");
    }

    #[test]
    fn failed_line_leaves_no_residue() {
        let mut parser = parser();
        let _ = parser.parse(r#"{"time":"2024-01-15T12:00:00Z","user":"a.example","detail":{"publicIp":"#);
        let events = parser
            .parse(r#"{"time":"2024-01-15T12:00:00Z","user":"b.example"}"#)
            .unwrap();
        assert_eq!(events[0].value_count(), 1);
        assert!(events[0].contains(&ValueKind::DomainName, "b.example"));
    }

    #[test]
    fn registers_with_metadata() {
        let registry = Registry::new();
        registry
            .register(JsonParser::<Login>::log_type(&ParserConfig::default()))
            .unwrap();
        let log_type = registry.must_get("Test.Login");
        assert_eq!(log_type.reference_url(), Some("https://example.com/login"));
        assert_eq!(log_type.new_parser().log_type(), "Test.Login");
    }
}
