//! `Zeek.DNS`: Zeek `dns.log` (JSON 출력)
//!
//! 호스트 필드는 IP 주소 또는 이름일 수 있으므로 호스트명 분류를 사용합니다.
//! 질의 이름은 A/AAAA 질의일 때만 지표로 봅니다.

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use crate::parser::json::JsonRecord;
use crate::timestamp::{Timestamp, UnixFloat};
use crate::validate::{FieldError, Validate, required, required_str};

const QTYPE_A: u64 = 1;
const QTYPE_AAAA: u64 = 28;

/// Zeek DNS 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeekDns {
    pub ts: Option<Timestamp<UnixFloat>>,
    pub uid: Option<String>,
    #[serde(rename = "id.orig_h")]
    pub id_orig_h: Option<String>,
    #[serde(rename = "id.orig_p")]
    pub id_orig_p: Option<u16>,
    #[serde(rename = "id.resp_h")]
    pub id_resp_h: Option<String>,
    #[serde(rename = "id.resp_p")]
    pub id_resp_p: Option<u16>,
    pub proto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qclass: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qclass_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtype: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtype_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rcode: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rcode_name: Option<String>,
    #[serde(rename = "AA", default, skip_serializing_if = "Option::is_none")]
    pub aa: Option<bool>,
    #[serde(rename = "TC", default, skip_serializing_if = "Option::is_none")]
    pub tc: Option<bool>,
    #[serde(rename = "RD", default, skip_serializing_if = "Option::is_none")]
    pub rd: Option<bool>,
    #[serde(rename = "RA", default, skip_serializing_if = "Option::is_none")]
    pub ra: Option<bool>,
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<String>,
    #[serde(rename = "TTLs", default, skip_serializing_if = "Vec::is_empty")]
    pub ttls: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<bool>,
}

impl Validate for ZeekDns {
    fn validate(&self) -> Result<(), FieldError> {
        required("ts", &self.ts)?;
        required_str("uid", &self.uid)?;
        required_str("id.orig_h", &self.id_orig_h)?;
        required("id.orig_p", &self.id_orig_p)?;
        required_str("id.resp_h", &self.id_resp_h)?;
        required("id.resp_p", &self.id_resp_p)?;
        required_str("proto", &self.proto)?;
        Ok(())
    }
}

impl JsonRecord for ZeekDns {
    const LOG_TYPE: &'static str = "Zeek.DNS";
    const DESCRIPTION: &'static str = "Zeek DNS activity";
    const REFERENCE_URL: &'static str =
        "https://docs.zeek.org/en/current/scripts/base/protocols/dns/main.zeek.html#type-DNS::Info";

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("ts", &self.ts).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        values.extend(self.id_orig_h.as_deref().map(Value::hostname));
        values.extend(self.id_resp_h.as_deref().map(Value::hostname));
        if matches!(self.qtype, Some(QTYPE_A | QTYPE_AAAA)) {
            values.extend(self.query.as_deref().map(Value::hostname));
        }
        values.extend(self.answers.iter().map(|answer| Value::hostname(answer)));
    }
}

impl Schema for ZeekDns {
    fn fields() -> Vec<FieldDescriptor> {
        use FieldDescriptor as F;
        use FieldType as T;

        vec![
            F::required(
                "ts",
                T::Timestamp,
                "The earliest time at which a DNS protocol message over the associated connection is observed.",
            ),
            F::required(
                "uid",
                T::String,
                "A unique identifier of the connection over which DNS messages are being transferred.",
            ),
            F::required("id.orig_h", T::String, "The originator's IP address."),
            F::required("id.orig_p", T::Integer, "The originator's port number."),
            F::required("id.resp_h", T::String, "The responder's IP address."),
            F::required("id.resp_p", T::Integer, "The responder's port number."),
            F::required("proto", T::String, "The transport layer protocol of the connection."),
            F::optional(
                "trans_id",
                T::Integer,
                "A 16-bit identifier assigned by the program that generated the DNS query.",
            ),
            F::optional("query", T::String, "The domain name that is the subject of the DNS query."),
            F::optional("qclass", T::Integer, "The QCLASS value specifying the class of the query."),
            F::optional("qclass_name", T::String, "A descriptive name for the class of the query."),
            F::optional("qtype", T::Integer, "A QTYPE value specifying the type of the query."),
            F::optional("qtype_name", T::String, "A descriptive name for the type of the query."),
            F::optional("rcode", T::Integer, "The response code value in DNS response messages."),
            F::optional("rcode_name", T::String, "A descriptive name for the response code value."),
            F::optional("AA", T::Boolean, "The Authoritative Answer bit for response messages."),
            F::optional("TC", T::Boolean, "The Truncation bit."),
            F::optional("RD", T::Boolean, "The Recursion Desired bit in a request message."),
            F::optional("RA", T::Boolean, "The Recursion Available bit in a response message."),
            F::optional("Z", T::Integer, "A reserved field that is usually zero."),
            F::optional(
                "answers",
                T::array_of(T::String),
                "The set of resource descriptions in the query answer.",
            ),
            F::optional(
                "TTLs",
                T::array_of(T::Float),
                "The caching intervals in seconds of the RRs described by the answers field.",
            ),
            F::optional("rejected", T::Boolean, "The DNS query was rejected by the server."),
        ]
    }
}
