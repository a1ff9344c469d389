//! `Osquery.Status`: osqueryd 상태(진단) 로그
//!
//! osquery는 숫자 필드를 문자열로 기록하므로 [`Integer`]로 디코딩합니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use crate::numeric::Integer;
use crate::parser::json::JsonRecord;
use crate::timestamp::{AnsicWithTz, Timestamp};
use crate::validate::{FieldError, Validate, in_range, required, required_str};

/// glog 심각도 (INFO=0 ... FATAL=3)
const SEVERITY_RANGE: std::ops::RangeInclusive<i64> = 0..=3;

/// 상태 로그 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsqueryStatus {
    pub calendar_time: Option<Timestamp<AnsicWithTz>>,
    pub decorations: Option<BTreeMap<String, String>>,
    pub filename: Option<String>,
    pub host_identifier: Option<String>,
    pub line: Option<Integer>,
    #[serde(rename = "log_type", default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<String>,
    pub message: Option<String>,
    pub severity: Option<Integer>,
    pub unix_time: Option<Integer>,
    pub version: Option<String>,
}

impl Validate for OsqueryStatus {
    fn validate(&self) -> Result<(), FieldError> {
        required("calendarTime", &self.calendar_time)?;
        required("decorations", &self.decorations)?;
        required_str("filename", &self.filename)?;
        required_str("hostIdentifier", &self.host_identifier)?;
        required("line", &self.line)?;
        required("message", &self.message)?;
        let severity = required("severity", &self.severity)?;
        in_range("severity", severity.get(), SEVERITY_RANGE)?;
        required("unixTime", &self.unix_time)?;
        required_str("version", &self.version)?;
        Ok(())
    }
}

impl JsonRecord for OsqueryStatus {
    const LOG_TYPE: &'static str = "Osquery.Status";
    const DESCRIPTION: &'static str = "Status is a diagnostic osquery log about the daemon.";
    const REFERENCE_URL: &'static str = "https://osquery.readthedocs.io/en/stable/deployment/logging/";

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("calendarTime", &self.calendar_time).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        values.extend(self.host_identifier.as_deref().map(Value::domain_name));
    }
}

impl Schema for OsqueryStatus {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::required(
                "calendarTime",
                FieldType::Timestamp,
                "The time of the event (UTC).",
            ),
            FieldDescriptor::required(
                "decorations",
                FieldType::map_of(FieldType::String),
                "Decorations added by the osquery configuration",
            ),
            FieldDescriptor::required("filename", FieldType::String, "The name of the file"),
            FieldDescriptor::required(
                "hostIdentifier",
                FieldType::String,
                "The name of the host",
            ),
            FieldDescriptor::required("line", FieldType::Integer, "Line number in the source file"),
            FieldDescriptor::optional("log_type", FieldType::String, "The type of the log"),
            FieldDescriptor::required("message", FieldType::String, "Message"),
            FieldDescriptor::required("severity", FieldType::Integer, "Message severity"),
            FieldDescriptor::required("unixTime", FieldType::Integer, "Unix epoch seconds"),
            FieldDescriptor::required("version", FieldType::String, "osquery version"),
        ]
    }
}
