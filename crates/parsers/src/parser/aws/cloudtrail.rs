//! `AWS.CloudTrail`: CloudTrail 레코드 (한 줄에 레코드 하나)

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use crate::parser::json::JsonRecord;
use crate::timestamp::{Rfc3339, Timestamp};
use crate::validate::{FieldError, Validate, nested, required, required_str};

type Json = serde_json::Value;

/// CloudTrail 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudTrail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_event_data: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub event_source: Option<String>,
    pub event_time: Option<Timestamp<Rfc3339>>,
    pub event_type: Option<String>,
    pub event_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_event: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    pub recipient_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_parameters: Option<Json>,
    #[serde(rename = "requestID", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_elements: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_event_details: Option<Json>,
    #[serde(rename = "sharedEventID", default, skip_serializing_if = "Option::is_none")]
    pub shared_event_id: Option<String>,
    #[serde(rename = "sourceIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub source_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub user_identity: Option<UserIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_endpoint_id: Option<String>,
}

/// 요청을 보낸 주체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdentity {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_context: Option<Json>,
}

impl Validate for UserIdentity {
    fn validate(&self) -> Result<(), FieldError> {
        required_str("type", &self.kind)?;
        Ok(())
    }
}

impl Validate for CloudTrail {
    fn validate(&self) -> Result<(), FieldError> {
        required_str("awsRegion", &self.aws_region)?;
        required_str("eventID", &self.event_id)?;
        required_str("eventName", &self.event_name)?;
        required_str("eventSource", &self.event_source)?;
        required("eventTime", &self.event_time)?;
        required_str("eventType", &self.event_type)?;
        required_str("eventVersion", &self.event_version)?;
        required_str("recipientAccountId", &self.recipient_account_id)?;
        required("userIdentity", &self.user_identity)?;
        nested("userIdentity", &self.user_identity)
    }
}

impl JsonRecord for CloudTrail {
    const LOG_TYPE: &'static str = "AWS.CloudTrail";
    const DESCRIPTION: &'static str =
        "AWSCloudTrail represents the content of a CloudTrail S3 object.";
    const REFERENCE_URL: &'static str =
        "https://docs.aws.amazon.com/awscloudtrail/latest/userguide/cloudtrail-event-reference.html";
    const SCAN_VALUES: bool = true;

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("eventTime", &self.event_time).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        // 서비스가 호출한 경우 `ec2.amazonaws.com` 같은 이름이 들어온다
        values.extend(self.source_ip_address.as_deref().map(Value::hostname));
        values.extend(
            self.recipient_account_id
                .as_deref()
                .map(Value::aws_account_id),
        );
    }
}

impl Schema for CloudTrail {
    fn fields() -> Vec<FieldDescriptor> {
        use FieldDescriptor as F;
        use FieldType as T;

        let identity = vec![
            F::required("type", T::String, "The type of the identity"),
            F::optional("principalId", T::String, "A unique identifier for the entity that made the call"),
            F::optional("arn", T::String, "The ARN of the principal that made the call"),
            F::optional("accountId", T::String, "The account that owns the entity"),
            F::optional("accessKeyId", T::String, "The access key ID used to sign the request"),
            F::optional("userName", T::String, "The friendly name of the identity"),
            F::optional("invokedBy", T::String, "The AWS service that made the request"),
            F::optional("identityProvider", T::String, "The principal name of the identity provider"),
            F::optional("sessionContext", T::Json, "Temporary security credential details"),
        ];

        vec![
            F::optional("additionalEventData", T::Json, "Additional data about the event"),
            F::optional("apiVersion", T::String, "The API version associated with the event"),
            F::required("awsRegion", T::String, "The AWS region that the request was made to"),
            F::optional("errorCode", T::String, "The AWS service error if the request returns an error"),
            F::optional("errorMessage", T::String, "The error description"),
            F::required("eventID", T::String, "GUID generated by CloudTrail to uniquely identify each event"),
            F::required("eventName", T::String, "The requested action"),
            F::required("eventSource", T::String, "The service that the request was made to"),
            F::required("eventTime", T::Timestamp, "The date and time the request was made"),
            F::required("eventType", T::String, "Identifies the type of event that generated the record"),
            F::required("eventVersion", T::String, "The version of the log event format"),
            F::optional("managementEvent", T::Boolean, "Whether the event is a management event"),
            F::optional("readOnly", T::Boolean, "Whether the operation is read-only"),
            F::required(
                "recipientAccountId",
                T::String,
                "The account ID that received this event",
            ),
            F::optional("requestParameters", T::Json, "The parameters sent with the request"),
            F::optional("requestID", T::String, "The value that identifies the request"),
            F::optional("resources", T::Json, "A list of resources accessed in the event"),
            F::optional("responseElements", T::Json, "The response element for actions that make changes"),
            F::optional("serviceEventDetails", T::Json, "Service event details"),
            F::optional("sharedEventID", T::String, "GUID shared between accounts for one action"),
            F::optional("sourceIPAddress", T::String, "The IP address or service name of the caller"),
            F::optional("userAgent", T::String, "The agent through which the request was made"),
            F::required("userIdentity", T::Object(identity), "Information about the caller"),
            F::optional("vpcEndpointId", T::String, "The VPC endpoint the request was made through"),
        ]
    }
}
