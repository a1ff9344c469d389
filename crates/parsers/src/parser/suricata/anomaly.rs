//! `Suricata.Anomaly`: EVE JSON `anomaly` 이벤트

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use super::flow_ips;
use crate::numeric::Integer;
use crate::parser::json::JsonRecord;
use crate::timestamp::{Suricata, Timestamp};
use crate::validate::{FieldError, Validate, equals, nested, one_of, required, required_str};

/// Suricata가 기록하는 이상 탐지 계층
const ANOMALY_TYPES: [&str; 3] = ["decode", "stream", "applayer"];

/// 이상 이벤트 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub anomaly: Option<AnomalyDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_proto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<u16>,
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnomalyMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_info: Option<PacketInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_cnt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<Integer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    pub timestamp: Option<Timestamp<Suricata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlan: Vec<i64>,
}

/// `anomaly` 객체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Validate for AnomalyDetails {
    fn validate(&self) -> Result<(), FieldError> {
        match self.kind.as_deref() {
            Some(kind) => one_of("type", kind, &ANOMALY_TYPES),
            None => Ok(()),
        }
    }
}

/// `metadata` 객체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyMetadata {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flowbits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flowints: Option<Flowints>,
}

/// `metadata.flowints` 카운터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flowints {
    #[serde(rename = "applayer.anomaly.count", skip_serializing_if = "Option::is_none")]
    pub applayer_anomaly_count: Option<i64>,
    #[serde(rename = "http.anomaly.count", skip_serializing_if = "Option::is_none")]
    pub http_anomaly_count: Option<i64>,
    #[serde(rename = "tcp.retransmission.count", skip_serializing_if = "Option::is_none")]
    pub tcp_retransmission_count: Option<i64>,
    #[serde(rename = "tls.anomaly.count", skip_serializing_if = "Option::is_none")]
    pub tls_anomaly_count: Option<i64>,
}

/// `packet_info` 객체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linktype: Option<i64>,
}

impl Validate for Anomaly {
    fn validate(&self) -> Result<(), FieldError> {
        required("anomaly", &self.anomaly)?;
        nested("anomaly", &self.anomaly)?;
        equals(
            "event_type",
            required_str("event_type", &self.event_type)?,
            "anomaly",
        )?;
        required("timestamp", &self.timestamp)?;
        Ok(())
    }
}

impl JsonRecord for Anomaly {
    const LOG_TYPE: &'static str = "Suricata.Anomaly";
    const DESCRIPTION: &'static str =
        "Suricata parser for the Anomaly event type in the EVE JSON output.";
    const REFERENCE_URL: &'static str =
        "https://suricata.readthedocs.io/en/suricata-5.0.2/output/eve/eve-json-output.html#anomaly";

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("timestamp", &self.timestamp).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        let ips = flow_ips(self.src_ip.as_deref(), self.dest_ip.as_deref());
        values.extend(ips.into_iter().flatten());
    }
}

impl Schema for Anomaly {
    fn fields() -> Vec<FieldDescriptor> {
        let count = |name: &str| FieldDescriptor::optional(name, FieldType::Integer, "Flow counter");

        vec![
            FieldDescriptor::required(
                "anomaly",
                FieldType::Object(vec![
                    FieldDescriptor::optional("code", FieldType::Integer, "Anomaly code"),
                    FieldDescriptor::optional("event", FieldType::String, "Anomaly event name"),
                    FieldDescriptor::optional("layer", FieldType::String, "Protocol layer"),
                    FieldDescriptor::optional("type", FieldType::String, "decode, stream or applayer"),
                ]),
                "Anomaly details",
            ),
            FieldDescriptor::optional("app_proto", FieldType::String, "Application protocol"),
            FieldDescriptor::optional("community_id", FieldType::String, "Community flow id"),
            FieldDescriptor::optional("dest_ip", FieldType::String, "Destination IP address"),
            FieldDescriptor::optional("dest_port", FieldType::Integer, "Destination port"),
            FieldDescriptor::required("event_type", FieldType::String, "Always 'anomaly'"),
            FieldDescriptor::optional("flow_id", FieldType::Integer, "Flow id"),
            FieldDescriptor::optional("icmp_code", FieldType::Integer, "ICMP code"),
            FieldDescriptor::optional("icmp_type", FieldType::Integer, "ICMP type"),
            FieldDescriptor::optional(
                "metadata",
                FieldType::Object(vec![
                    FieldDescriptor::optional(
                        "flowbits",
                        FieldType::array_of(FieldType::String),
                        "Flowbits set on the flow",
                    ),
                    FieldDescriptor::optional(
                        "flowints",
                        FieldType::Object(vec![
                            count("applayer.anomaly.count"),
                            count("http.anomaly.count"),
                            count("tcp.retransmission.count"),
                            count("tls.anomaly.count"),
                        ]),
                        "Flow integer counters",
                    ),
                ]),
                "Flow metadata",
            ),
            FieldDescriptor::optional("packet", FieldType::String, "Base64 packet payload"),
            FieldDescriptor::optional(
                "packet_info",
                FieldType::Object(vec![FieldDescriptor::optional(
                    "linktype",
                    FieldType::Integer,
                    "Packet link type",
                )]),
                "Packet details",
            ),
            FieldDescriptor::optional("pcap_cnt", FieldType::Integer, "Packet number in the pcap"),
            FieldDescriptor::optional("pcap_filename", FieldType::String, "Source pcap file"),
            FieldDescriptor::optional("proto", FieldType::Integer, "IP protocol number"),
            FieldDescriptor::optional("src_ip", FieldType::String, "Source IP address"),
            FieldDescriptor::optional("src_port", FieldType::Integer, "Source port"),
            FieldDescriptor::required("timestamp", FieldType::Timestamp, "Event time"),
            FieldDescriptor::optional("tx_id", FieldType::Integer, "Transaction id within the flow"),
            FieldDescriptor::optional("vlan", FieldType::array_of(FieldType::Integer), "VLAN ids"),
        ]
    }
}
