//! `Suricata.DNS`: EVE JSON `dns` 이벤트

use chrono::{DateTime, Utc};
use logweave_core::schema::{FieldDescriptor, FieldType};
use logweave_core::{Schema, Value};
use serde::{Deserialize, Serialize};

use super::flow_ips;
use crate::numeric::Integer;
use crate::parser::json::JsonRecord;
use crate::timestamp::{Suricata, Timestamp};
use crate::validate::{FieldError, Validate, equals, required, required_str};

/// DNS 이벤트 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    pub dns: Option<DnsDetails>,
    pub dest_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<u16>,
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_cnt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap_filename: Option<String>,
    pub proto: Option<Integer>,
    pub src_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    pub timestamp: Option<Timestamp<Suricata>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlan: Vec<i64>,
}

/// `dns` 객체
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aa: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<DnsAnswer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<DnsAuthority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped: Option<DnsGrouped>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ra: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// 응답 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsAnswer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

/// 권한 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsAuthority {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

/// 레코드 타입별로 묶인 응답 (`dns.grouped`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsGrouped {
    #[serde(rename = "A", skip_serializing_if = "Vec::is_empty")]
    pub a: Vec<String>,
    #[serde(rename = "AAAA", skip_serializing_if = "Vec::is_empty")]
    pub aaaa: Vec<String>,
    #[serde(rename = "CNAME", skip_serializing_if = "Vec::is_empty")]
    pub cname: Vec<String>,
    #[serde(rename = "MX", skip_serializing_if = "Vec::is_empty")]
    pub mx: Vec<String>,
    #[serde(rename = "PTR", skip_serializing_if = "Vec::is_empty")]
    pub ptr: Vec<String>,
    #[serde(rename = "TXT", skip_serializing_if = "Vec::is_empty")]
    pub txt: Vec<String>,
}

impl DnsDetails {
    fn indicators(&self, values: &mut Vec<Value>) {
        values.extend(self.rrname.as_deref().map(Value::domain_name));
        values.extend(self.rdata.as_deref().map(Value::ip_address));

        for answer in &self.answers {
            let rrname = answer.rrname.as_deref();
            let rdata = answer.rdata.as_deref();
            match answer.rrtype.as_deref() {
                Some("A" | "AAAA") => {
                    values.extend(rdata.map(Value::ip_address));
                    values.extend(rrname.map(Value::domain_name));
                }
                Some("CNAME" | "MX") => {
                    values.extend(rrname.map(Value::domain_name));
                    values.extend(rdata.map(Value::domain_name));
                }
                Some("PTR") => values.extend(rdata.map(Value::domain_name)),
                Some("TXT") => values.extend(rrname.map(Value::domain_name)),
                _ => {}
            }
        }

        if let Some(grouped) = &self.grouped {
            let ips = grouped.a.iter().chain(&grouped.aaaa);
            values.extend(ips.map(|ip| Value::ip_address(ip.as_str())));
            let names = grouped.cname.iter().chain(&grouped.mx);
            values.extend(names.map(|name| Value::domain_name(name.as_str())));
        }
    }
}

impl Validate for Dns {
    fn validate(&self) -> Result<(), FieldError> {
        required("dns", &self.dns)?;
        required_str("dest_ip", &self.dest_ip)?;
        equals("event_type", required_str("event_type", &self.event_type)?, "dns")?;
        required("proto", &self.proto)?;
        required_str("src_ip", &self.src_ip)?;
        required("timestamp", &self.timestamp)?;
        Ok(())
    }
}

impl JsonRecord for Dns {
    const LOG_TYPE: &'static str = "Suricata.DNS";
    const DESCRIPTION: &'static str =
        "Suricata parser for the DNS event type in the EVE JSON output.";
    const REFERENCE_URL: &'static str =
        "https://suricata.readthedocs.io/en/suricata-5.0.2/output/eve/eve-json-output.html#dns";

    fn event_time(&self) -> Result<DateTime<Utc>, FieldError> {
        required("timestamp", &self.timestamp).map(|t| t.time())
    }

    fn indicators(&self, values: &mut Vec<Value>) {
        let ips = flow_ips(self.src_ip.as_deref(), self.dest_ip.as_deref());
        values.extend(ips.into_iter().flatten());
        if let Some(dns) = &self.dns {
            dns.indicators(values);
        }
    }
}

impl Schema for Dns {
    fn fields() -> Vec<FieldDescriptor> {
        let rr = |extra: Vec<FieldDescriptor>| {
            let mut fields = vec![
                FieldDescriptor::optional("rrname", FieldType::String, "Resource record name"),
                FieldDescriptor::optional("rrtype", FieldType::String, "Resource record type"),
                FieldDescriptor::optional("ttl", FieldType::Integer, "Time to live"),
            ];
            fields.extend(extra);
            FieldType::array_of(FieldType::Object(fields))
        };
        let strings = || FieldType::array_of(FieldType::String);

        let details = vec![
            FieldDescriptor::optional("aa", FieldType::Boolean, "Authoritative answer flag"),
            FieldDescriptor::optional(
                "answers",
                rr(vec![FieldDescriptor::optional(
                    "rdata",
                    FieldType::String,
                    "Resource record data",
                )]),
                "Answer records",
            ),
            FieldDescriptor::optional("authorities", rr(Vec::new()), "Authority records"),
            FieldDescriptor::optional("flags", FieldType::String, "DNS header flags in hex"),
            FieldDescriptor::optional(
                "grouped",
                FieldType::Object(vec![
                    FieldDescriptor::optional("A", strings(), "A record data"),
                    FieldDescriptor::optional("AAAA", strings(), "AAAA record data"),
                    FieldDescriptor::optional("CNAME", strings(), "CNAME record data"),
                    FieldDescriptor::optional("MX", strings(), "MX record data"),
                    FieldDescriptor::optional("PTR", strings(), "PTR record data"),
                    FieldDescriptor::optional("TXT", strings(), "TXT record data"),
                ]),
                "Answers grouped by record type",
            ),
            FieldDescriptor::optional("id", FieldType::Integer, "DNS transaction id"),
            FieldDescriptor::optional("qr", FieldType::Boolean, "Query/response flag"),
            FieldDescriptor::optional("ra", FieldType::Boolean, "Recursion available flag"),
            FieldDescriptor::optional("rcode", FieldType::String, "Response code"),
            FieldDescriptor::optional("rd", FieldType::Boolean, "Recursion desired flag"),
            FieldDescriptor::optional("rrname", FieldType::String, "Queried name"),
            FieldDescriptor::optional("rdata", FieldType::String, "Answer data (version 1 output)"),
            FieldDescriptor::optional("rrtype", FieldType::String, "Queried record type"),
            FieldDescriptor::optional("ttl", FieldType::Integer, "Answer time to live"),
            FieldDescriptor::optional("tx_id", FieldType::Integer, "Transaction id within the flow"),
            FieldDescriptor::optional("type", FieldType::String, "query or answer"),
            FieldDescriptor::optional("version", FieldType::Integer, "EVE DNS output version"),
        ];

        vec![
            FieldDescriptor::optional("community_id", FieldType::String, "Community flow id"),
            FieldDescriptor::required("dns", FieldType::Object(details), "DNS transaction details"),
            FieldDescriptor::required("dest_ip", FieldType::String, "Destination IP address"),
            FieldDescriptor::optional("dest_port", FieldType::Integer, "Destination port"),
            FieldDescriptor::required("event_type", FieldType::String, "Always 'dns'"),
            FieldDescriptor::optional("flow_id", FieldType::Integer, "Flow id"),
            FieldDescriptor::optional("pcap_cnt", FieldType::Integer, "Packet number in the pcap"),
            FieldDescriptor::optional("pcap_filename", FieldType::String, "Source pcap file"),
            FieldDescriptor::required("proto", FieldType::Integer, "IP protocol number"),
            FieldDescriptor::required("src_ip", FieldType::String, "Source IP address"),
            FieldDescriptor::optional("src_port", FieldType::Integer, "Source port"),
            FieldDescriptor::required("timestamp", FieldType::Timestamp, "Event time"),
            FieldDescriptor::optional("vlan", FieldType::array_of(FieldType::Integer), "VLAN ids"),
        ]
    }
}
