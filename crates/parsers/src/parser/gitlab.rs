//! `GitLab.Audit`: GitLab `audit_json.log`
//!
//! 그룹/프로젝트 설정 변경 기록입니다. 모든 필드가 필수이며 지표는 없습니다.

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use crate::parser::json::JsonRecord;
use crate::timestamp::{Rfc3339, Timestamp};
use crate::validate::{FieldError, Validate, required, required_str};

/// 감사 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitLabAudit {
    pub severity: Option<String>,
    pub time: Option<Timestamp<Rfc3339>>,
    pub author_id: Option<i64>,
    pub entity_id: Option<i64>,
    pub entity_type: Option<String>,
    pub change: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub author_name: Option<String>,
    pub target_id: Option<i64>,
    pub target_type: Option<String>,
    pub target_details: Option<String>,
}

impl Validate for GitLabAudit {
    fn validate(&self) -> Result<(), FieldError> {
        required_str("severity", &self.severity)?;
        required("time", &self.time)?;
        required("author_id", &self.author_id)?;
        required("entity_id", &self.entity_id)?;
        required_str("entity_type", &self.entity_type)?;
        required_str("change", &self.change)?;
        // 설정의 이전/이후 값은 빈 문자열일 수 있다
        required("from", &self.from)?;
        required("to", &self.to)?;
        required_str("author_name", &self.author_name)?;
        required("target_id", &self.target_id)?;
        required_str("target_type", &self.target_type)?;
        required("target_details", &self.target_details)?;
        Ok(())
    }
}

impl JsonRecord for GitLabAudit {
    const LOG_TYPE: &'static str = "GitLab.Audit";
    const DESCRIPTION: &'static str =
        "GitLab log file containing changes to group or project settings";
    const REFERENCE_URL: &'static str =
        "https://docs.gitlab.com/ee/administration/logs.html#audit_jsonlog";

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("time", &self.time).map(|t| t.time())
    }

    fn indicators(&self, _values: &mut Vec<Value>) {}
}

impl Schema for GitLabAudit {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::required("severity", FieldType::String, "The log level"),
            FieldDescriptor::required("time", FieldType::Timestamp, "The event timestamp"),
            FieldDescriptor::required("author_id", FieldType::Integer, "User id that made the change"),
            FieldDescriptor::required(
                "entity_id",
                FieldType::Integer,
                "Id of the entity that was modified",
            ),
            FieldDescriptor::required("entity_type", FieldType::String, "Type of the modified entity"),
            FieldDescriptor::required("change", FieldType::String, "Type of change to the settings"),
            FieldDescriptor::required("from", FieldType::String, "Old setting value"),
            FieldDescriptor::required("to", FieldType::String, "New setting value"),
            FieldDescriptor::required(
                "author_name",
                FieldType::String,
                "Name of the user that made the change",
            ),
            FieldDescriptor::required(
                "target_id",
                FieldType::Integer,
                "Target id of the modified setting",
            ),
            FieldDescriptor::required(
                "target_type",
                FieldType::String,
                "Target type of the modified setting",
            ),
            FieldDescriptor::required(
                "target_details",
                FieldType::String,
                "Details of the target of the modified setting",
            ),
        ]
    }
}
