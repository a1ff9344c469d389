//! Apache HTTP 서버 액세스 로그 파서
//!
//! `common`/`combined` LogFormat 한 줄을 하나의 고정된 정규식으로 매칭합니다.
//! 정규식은 필드별 하위 패턴을 각각 캡처 그룹으로 감싸고 공백으로 이어
//! 양끝을 고정해 만듭니다. 매칭된 그룹은 위치 순서대로 필드에 할당됩니다.
//!
//! - 따옴표 필드는 양끝 따옴표를 제거합니다.
//! - 빈 값과 `-`는 빈 문자열이 아니라 "없음"으로 정규화합니다.
//! - 원격 호스트는 IP 주소로 먼저 해석하고, 실패하면 도메인 이름으로 봅니다
//!   (역방향 DNS가 켜진 서버의 로그).
//! - 매칭에 실패한 줄은 같은 하위 패턴으로 토큰을 세어, 필드 수가 다르면
//!   `FieldCount`, 같으면 `Grammar` 에러로 구분합니다.
//!
//! # 사용 예시
//! ```ignore
//! let mut parser = AccessLogParser::<AccessCommon>::new(&config)?;
//! let events = parser.parse(
//!     r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#,
//! )?;
//! ```

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Event, LogParser, LogType, ParseError, Schema, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::error::ParsersError;
use crate::timestamp::{Clf, Timestamp};

/// `Apache.AccessCommon` 등록 이름
pub const ACCESS_COMMON: &str = "Apache.AccessCommon";
/// `Apache.AccessCombined` 등록 이름
pub const ACCESS_COMBINED: &str = "Apache.AccessCombined";

// LogFormat 필드별 하위 패턴
const RX_UNQUOTED: &str = r"[^\s]+";
const RX_BRACKETS: &str = r"\[[^\]]+\]";
const RX_QUOTED: &str = r#""[^"]+""#;
const RX_STATUS_CODE: &str = r"\d{3}";
const RX_SIZE: &str = r"-|\d+";

/// `%h %l %u %t "%r" %>s %b`
const COMMON_FIELDS: [&str; 7] = [
    RX_UNQUOTED,    // remote host
    RX_UNQUOTED,    // identity
    RX_UNQUOTED,    // user
    RX_BRACKETS,    // request time
    RX_QUOTED,      // request line
    RX_STATUS_CODE, // status
    RX_SIZE,        // response size
];

/// common + `"%{Referer}i" "%{User-agent}i"`
const COMBINED_FIELDS: [&str; 9] = [
    RX_UNQUOTED,
    RX_UNQUOTED,
    RX_UNQUOTED,
    RX_BRACKETS,
    RX_QUOTED,
    RX_STATUS_CODE,
    RX_SIZE,
    RX_QUOTED, // referer
    RX_QUOTED, // user agent
];

/// 하위 패턴을 캡처 그룹으로 감싸 공백으로 잇고 양끝을 고정합니다.
pub fn build_grammar(fields: &[&str]) -> String {
    let groups: Vec<String> = fields.iter().map(|f| format!("({f})")).collect();
    format!(r"^\s*{}\s*$", groups.join(r"\s+"))
}

/// 고정 없이 필드 하나를 찾는 토큰 패턴. 따옴표와 대괄호를 먼저 시도합니다.
pub fn build_tokenizer() -> String {
    [RX_QUOTED, RX_BRACKETS, RX_UNQUOTED].join("|")
}

/// 빈 값 또는 `-`는 없음으로 봅니다. 따옴표는 제거합니다.
fn field(raw: &str) -> Option<String> {
    let value = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);
    match value {
        "" | "-" => None,
        v => Some(v.to_owned()),
    }
}

/// 액세스 로그 레코드 타입
pub trait AccessRecord: Schema {
    /// 등록 이름
    const LOG_TYPE: &'static str;
    /// 로그 타입 설명
    const DESCRIPTION: &'static str;
    /// 위치 순서의 필드 하위 패턴
    const FIELDS: &'static [&'static str];

    /// 캡처 그룹 값으로 레코드를 만듭니다. `row.len()`은 `FIELDS.len()`과 같습니다.
    fn from_row(row: &[&str]) -> Result<Self, ParseError>;

    /// 공통 필드
    fn common(&self) -> &AccessCommon;
}

/// Apache `common` 형식 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessCommon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub request_time: Timestamp<Clf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_protocol: Option<String>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,
}

impl AccessCommon {
    fn parse_row(log_type: &str, row: &[&str]) -> Result<Self, ParseError> {
        let [host, identity, user, time, request, status, size] = row else {
            return Err(ParseError::FieldCount {
                log_type: log_type.to_owned(),
                expected: COMMON_FIELDS.len(),
                found: row.len(),
            });
        };

        let request_time = Timestamp::<Clf>::parse(time)
            .map_err(|e| ParseError::timestamp(log_type, e.to_string()))?;
        let status = status
            .parse::<u16>()
            .map_err(|e| ParseError::validation(log_type, "status", format!("{e}")))?;
        let response_size = field(size)
            .map(|s| s.parse::<u64>())
            .transpose()
            .map_err(|e| ParseError::validation(log_type, "response_size", format!("{e}")))?;

        let (request_method, request_uri, request_protocol) = match field(request) {
            Some(line) => {
                let mut parts = line.splitn(3, ' ');
                (
                    parts.next().and_then(field),
                    parts.next().and_then(field),
                    parts.next().and_then(field),
                )
            }
            None => (None, None, None),
        };

        Ok(Self {
            remote_host: field(host),
            identity: field(identity),
            user: field(user),
            request_time,
            request_method,
            request_uri,
            request_protocol,
            status,
            response_size,
        })
    }
}

impl Schema for AccessCommon {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::optional(
                "remote_host",
                FieldType::String,
                "Remote hostname or IP address (%h)",
            ),
            FieldDescriptor::optional("identity", FieldType::String, "Remote logname from identd (%l)"),
            FieldDescriptor::optional("user", FieldType::String, "Authenticated remote user (%u)"),
            FieldDescriptor::required(
                "request_time",
                FieldType::Timestamp,
                "Time the request was received (%t)",
            ),
            FieldDescriptor::optional("request_method", FieldType::String, "HTTP request method"),
            FieldDescriptor::optional("request_uri", FieldType::String, "HTTP request URI"),
            FieldDescriptor::optional("request_protocol", FieldType::String, "HTTP request protocol"),
            FieldDescriptor::required("status", FieldType::Integer, "Final response status (%>s)"),
            FieldDescriptor::optional(
                "response_size",
                FieldType::Integer,
                "Response size in bytes excluding headers (%b)",
            ),
        ]
    }
}

impl AccessRecord for AccessCommon {
    const LOG_TYPE: &'static str = ACCESS_COMMON;
    const DESCRIPTION: &'static str = "Apache HTTP server access logs using the 'common' format";
    const FIELDS: &'static [&'static str] = &COMMON_FIELDS;

    fn from_row(row: &[&str]) -> Result<Self, ParseError> {
        Self::parse_row(ACCESS_COMMON, row)
    }

    fn common(&self) -> &AccessCommon {
        self
    }
}

/// Apache `combined` 형식 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessCombined {
    #[serde(flatten)]
    pub common: AccessCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Schema for AccessCombined {
    fn fields() -> Vec<FieldDescriptor> {
        let mut fields = AccessCommon::fields();
        fields.push(FieldDescriptor::optional(
            "referer",
            FieldType::String,
            "The Referer HTTP header",
        ));
        fields.push(FieldDescriptor::optional(
            "user_agent",
            FieldType::String,
            "The User-Agent HTTP header",
        ));
        fields
    }
}

impl AccessRecord for AccessCombined {
    const LOG_TYPE: &'static str = ACCESS_COMBINED;
    const DESCRIPTION: &'static str = "Apache HTTP server access logs using the 'combined' format";
    const FIELDS: &'static [&'static str] = &COMBINED_FIELDS;

    fn from_row(row: &[&str]) -> Result<Self, ParseError> {
        if row.len() != COMBINED_FIELDS.len() {
            return Err(ParseError::FieldCount {
                log_type: ACCESS_COMBINED.to_owned(),
                expected: COMBINED_FIELDS.len(),
                found: row.len(),
            });
        }
        let (common, headers) = row.split_at(COMMON_FIELDS.len());
        Ok(Self {
            common: AccessCommon::parse_row(ACCESS_COMBINED, common)?,
            referer: headers.first().and_then(|r| field(r)),
            user_agent: headers.get(1).and_then(|u| field(u)),
        })
    }

    fn common(&self) -> &AccessCommon {
        &self.common
    }
}

/// 액세스 로그 파서
pub struct AccessLogParser<R> {
    grammar: Regex,
    tokenizer: Regex,
    max_line_size: usize,
    record: PhantomData<fn() -> R>,
}

impl<R: AccessRecord> AccessLogParser<R> {
    /// 문법 정규식을 컴파일해 새 파서를 생성합니다.
    pub fn new(config: &ParserConfig) -> Result<Self, ParsersError> {
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|source| ParsersError::Grammar {
                log_type: R::LOG_TYPE.to_owned(),
                source,
            })
        };
        Ok(Self {
            grammar: compile(build_grammar(R::FIELDS))?,
            tokenizer: compile(build_tokenizer())?,
            max_line_size: config.max_line_size,
            record: PhantomData,
        })
    }

    /// 레지스트리 항목을 만듭니다. 정규식은 여기서 한 번만 컴파일됩니다.
    pub fn log_type(config: &ParserConfig) -> Result<LogType, ParsersError> {
        let prototype = Self::new(config)?;
        Ok(
            LogType::new::<R, _>(R::LOG_TYPE, R::DESCRIPTION, move || prototype.new_parser())
                .with_reference_url(reference_url::<R>()),
        )
    }

    fn record(&self, line: &str) -> Result<R, ParseError> {
        let Some(captures) = self.grammar.captures(line) else {
            return Err(self.mismatch(line));
        };

        let row: Vec<&str> = captures
            .iter()
            .skip(1)
            .map(|m| m.map_or("", |m| m.as_str()))
            .collect();
        if row.len() != R::FIELDS.len() {
            return Err(ParseError::FieldCount {
                log_type: R::LOG_TYPE.to_owned(),
                expected: R::FIELDS.len(),
                found: row.len(),
            });
        }
        R::from_row(&row)
    }

    /// 문법 불일치를 필드 수 에러와 형태 에러로 나눕니다.
    fn mismatch(&self, line: &str) -> ParseError {
        let found = self.tokenizer.find_iter(line).count();
        if found != R::FIELDS.len() {
            return ParseError::FieldCount {
                log_type: R::LOG_TYPE.to_owned(),
                expected: R::FIELDS.len(),
                found,
            };
        }
        ParseError::grammar(R::LOG_TYPE, "line does not match the access log format")
    }
}

fn reference_url<R: AccessRecord>() -> &'static str {
    if R::FIELDS.len() == COMBINED_FIELDS.len() {
        "https://httpd.apache.org/docs/current/logs.html#combined"
    } else {
        "https://httpd.apache.org/docs/current/logs.html#common"
    }
}

impl<R: AccessRecord> LogParser for AccessLogParser<R> {
    fn log_type(&self) -> &str {
        R::LOG_TYPE
    }

    fn parse(&mut self, line: &str) -> Result<Vec<Event>, ParseError> {
        ParseError::check_size(R::LOG_TYPE, line, self.max_line_size)?;

        let record = self.record(line)?;
        let common = record.common();
        let time: DateTime<Utc> = common.request_time.into();
        let host = common.remote_host.as_deref().map(Value::hostname);

        let event = Event::new(R::LOG_TYPE, time)
            .with_values(host)
            .with_record(&record)
            .map_err(|e| ParseError::Record {
                log_type: R::LOG_TYPE.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(vec![event])
    }

    fn new_parser(&self) -> Box<dyn LogParser> {
        Box::new(Self {
            grammar: self.grammar.clone(),
            tokenizer: self.tokenizer.clone(),
            max_line_size: self.max_line_size,
            record: PhantomData,
        })
    }
}
