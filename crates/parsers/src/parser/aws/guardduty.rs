//! `AWS.GuardDuty`: GuardDuty finding

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use crate::parser::json::JsonRecord;
use crate::timestamp::{Rfc3339, Timestamp};
use crate::validate::{FieldError, Validate, required, required_str};

type Json = serde_json::Value;

/// GuardDuty finding. 이벤트 시각은 마지막 갱신 시각입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardDuty {
    pub schema_version: Option<String>,
    pub account_id: Option<String>,
    pub region: Option<String>,
    pub partition: Option<String>,
    pub id: Option<String>,
    pub arn: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub resource: Option<Json>,
    pub severity: Option<f64>,
    pub created_at: Option<Timestamp<Rfc3339>>,
    pub updated_at: Option<Timestamp<Rfc3339>>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Json>,
}

impl Validate for GuardDuty {
    fn validate(&self) -> Result<(), FieldError> {
        required_str("schemaVersion", &self.schema_version)?;
        required_str("accountId", &self.account_id)?;
        required_str("region", &self.region)?;
        required_str("partition", &self.partition)?;
        required_str("id", &self.id)?;
        required_str("arn", &self.arn)?;
        required_str("type", &self.kind)?;
        required("resource", &self.resource)?;
        required("severity", &self.severity)?;
        required("createdAt", &self.created_at)?;
        required("updatedAt", &self.updated_at)?;
        required("title", &self.title)?;
        required("description", &self.description)?;
        Ok(())
    }
}

impl JsonRecord for GuardDuty {
    const LOG_TYPE: &'static str = "AWS.GuardDuty";
    const DESCRIPTION: &'static str = "Amazon GuardDuty is a threat detection service that continuously monitors for malicious activity and unauthorized behavior inside AWS Accounts.";
    const REFERENCE_URL: &'static str =
        "https://docs.aws.amazon.com/guardduty/latest/ug/guardduty_finding-format.html";
    const SCAN_VALUES: bool = true;

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("updatedAt", &self.updated_at).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        values.extend(self.account_id.as_deref().map(Value::aws_account_id));
        values.extend(self.arn.as_deref().map(Value::aws_arn));
    }
}

impl Schema for GuardDuty {
    fn fields() -> Vec<FieldDescriptor> {
        use FieldDescriptor as F;
        use FieldType as T;

        vec![
            F::required("schemaVersion", T::String, "The schema format version of this record."),
            F::required("accountId", T::String, "The ID of the AWS account in which the activity took place."),
            F::required("region", T::String, "The region in which the finding was generated."),
            F::required("partition", T::String, "The AWS partition in which the finding was generated."),
            F::required("id", T::String, "A unique identifier for the finding."),
            F::required("arn", T::String, "A unique identifier formatted as an ARN for the finding."),
            F::required("type", T::String, "A concise yet readable description of the potential security issue."),
            F::required("resource", T::Json, "The AWS resource against which the activity took place."),
            F::required("severity", T::Float, "The value of the severity can fall anywhere within the 0.1 to 8.9 range."),
            F::required("createdAt", T::Timestamp, "The initial creation time of the finding (UTC)."),
            F::required("updatedAt", T::Timestamp, "The last update time of the finding (UTC)."),
            F::required("title", T::String, "A short description of the finding."),
            F::required("description", T::String, "A long description of the finding."),
            F::optional("service", T::Json, "Additional information about the affected service."),
        ]
    }
}
