//! 정규화 이벤트: 모든 로그 형식이 매핑되는 공통 레코드
//!
//! [`Event`]는 원문 한 줄에서 만들어지는 정규화 레코드입니다.
//! 로그 타입 이름, UTC 타임스탬프(항상 존재), 그리고 종류별로 중복 제거된
//! 지표 값 집합을 가집니다. 파서가 반환한 뒤에는 변경되지 않으며 수집 측이
//! 소유하여 직렬화/저장합니다.
//!
//! # 직렬화 형태
//!
//! 하나의 평탄한 JSON 객체로 직렬화됩니다: 원본 레코드 필드 +
//! `lw_log_type`, `lw_event_time`, 그리고 비어 있지 않은 지표 종류마다
//! `lw_any_*` 배열.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Map;

use crate::value::{Value, ValueKind};

/// 로그 타입 이름이 기록되는 필드
pub const FIELD_LOG_TYPE: &str = "lw_log_type";

/// 정규화된 이벤트 시각(RFC 3339, UTC)이 기록되는 필드
pub const FIELD_EVENT_TIME: &str = "lw_event_time";

/// 정규화 이벤트
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    log_type: String,
    timestamp: DateTime<Utc>,
    values: BTreeMap<ValueKind, BTreeSet<String>>,
    record: Map<String, serde_json::Value>,
}

impl Event {
    /// 지표 값과 레코드가 비어 있는 이벤트를 생성합니다.
    pub fn new(log_type: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            log_type: log_type.into(),
            timestamp,
            values: BTreeMap::new(),
            record: Map::new(),
        }
    }

    /// 지표 값들을 종류별 집합에 병합합니다.
    ///
    /// `None`이나 빈 문자열 값은 무시되므로 선택적 필드를 분기 없이
    /// 넘길 수 있습니다. 같은 종류의 같은 문자열은 한 번만 저장됩니다.
    pub fn add<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        for value in values {
            if let Some(value) = value.into() {
                self.insert(value);
            }
        }
    }

    /// 하위 구조(예: DNS 응답 레코드 하나)에서 얻은 값들을 병합합니다.
    ///
    /// [`add`](Self::add)와 동일하게 동작합니다.
    pub fn extend<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        self.add(values);
    }

    /// 값을 병합한 이벤트를 반환합니다.
    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<Value>>,
    {
        self.add(values);
        self
    }

    /// 정규화된 원본 레코드를 첨부합니다.
    ///
    /// 레코드는 JSON 객체로 직렬화되어야 합니다.
    pub fn with_record<T: Serialize + ?Sized>(
        mut self,
        record: &T,
    ) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(record)? {
            serde_json::Value::Object(map) => {
                self.record = map;
                Ok(self)
            }
            other => Err(serde_json::Error::custom(format!(
                "record must serialize to a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    fn insert(&mut self, value: Value) {
        if value.is_empty() {
            return;
        }
        let (kind, data) = value.into_parts();
        self.values.entry(kind).or_default().insert(data);
    }

    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 특정 종류의 값들 (정렬됨)
    pub fn values(&self, kind: &ValueKind) -> impl Iterator<Item = &str> {
        self.values
            .get(kind)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// 특정 값이 있는지 확인합니다.
    pub fn contains(&self, kind: &ValueKind, data: &str) -> bool {
        self.values.get(kind).is_some_and(|set| set.contains(data))
    }

    /// 값이 하나 이상 있는 종류들
    pub fn kinds(&self) -> impl Iterator<Item = &ValueKind> {
        self.values.keys()
    }

    /// 모든 종류에 걸친 값 개수
    pub fn value_count(&self) -> usize {
        self.values.values().map(BTreeSet::len).sum()
    }

    /// 첨부된 원본 레코드
    pub fn record(&self) -> &Map<String, serde_json::Value> {
        &self.record
    }

    /// 한 줄 JSON으로 렌더링합니다.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = self
            .record
            .iter()
            .filter(|(key, _)| key.as_str() != FIELD_LOG_TYPE && key.as_str() != FIELD_EVENT_TIME);

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in record {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(FIELD_LOG_TYPE, &self.log_type)?;
        map.serialize_entry(
            FIELD_EVENT_TIME,
            &self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )?;
        for (kind, set) in &self.values {
            map.serialize_entry(&*kind.field_name(), set)?;
        }
        map.end()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 10, 10, 13, 55, 36).unwrap()
    }

    #[test]
    fn add_deduplicates_per_kind() {
        let mut event = Event::new("Test.Log", sample_time());
        event.add([
            Value::ip_address("10.0.0.1"),
            Value::ip_address("10.0.0.1"),
            Value::domain_name("10.0.0.1"),
        ]);
        event.extend([Value::ip_address("10.0.0.1")]);

        assert_eq!(event.values(&ValueKind::IpAddress).count(), 1);
        assert_eq!(event.values(&ValueKind::DomainName).count(), 1);
        assert_eq!(event.value_count(), 2);
    }

    #[test]
    fn add_ignores_absent_and_empty_values() {
        let mut event = Event::new("Test.Log", sample_time());
        let missing: Option<Value> = None;
        event.add([missing, Some(Value::domain_name("")), None]);
        assert_eq!(event.value_count(), 0);
        assert_eq!(event.kinds().count(), 0);
    }

    #[test]
    fn add_accepts_optional_and_plain_values() {
        let mut event = Event::new("Test.Log", sample_time());
        event.add(Value::aws_tag("env", "prod"));
        event.add(vec![Value::aws_account_id("123456789012")]);
        assert!(event.contains(&ValueKind::AwsTag, "env:prod"));
        assert!(event.contains(&ValueKind::AwsAccountId, "123456789012"));
        assert!(!event.contains(&ValueKind::AwsAccountId, "999"));
    }

    #[test]
    fn values_are_sorted() {
        let event = Event::new("Test.Log", sample_time()).with_values([
            Value::domain_name("b.example.com"),
            Value::domain_name("a.example.com"),
        ]);
        let domains: Vec<&str> = event.values(&ValueKind::DomainName).collect();
        assert_eq!(domains, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn serializes_as_one_flat_object() {
        #[derive(Serialize)]
        struct Record {
            remote_host: String,
            status: u16,
        }

        let event = Event::new("Apache.AccessCommon", sample_time())
            .with_values([Value::ip_address("192.168.0.1")])
            .with_record(&Record {
                remote_host: "192.168.0.1".to_owned(),
                status: 200,
            })
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(json["remote_host"], "192.168.0.1");
        assert_eq!(json["status"], 200);
        assert_eq!(json[FIELD_LOG_TYPE], "Apache.AccessCommon");
        assert_eq!(json[FIELD_EVENT_TIME], "2020-10-10T13:55:36Z");
        assert_eq!(json["lw_any_ip_addresses"], serde_json::json!(["192.168.0.1"]));
        assert!(json.get("lw_any_domain_names").is_none());
    }

    #[test]
    fn envelope_fields_win_over_record_fields() {
        let record = serde_json::json!({ "lw_log_type": "spoofed", "message": "hi" });
        let event = Event::new("Real.Type", sample_time())
            .with_record(&record)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(json[FIELD_LOG_TYPE], "Real.Type");
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn with_record_rejects_non_objects() {
        let err = Event::new("Test.Log", sample_time())
            .with_record(&vec![1, 2, 3])
            .unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn equal_inputs_produce_equal_events() {
        let build = || {
            Event::new("Test.Log", sample_time()).with_values([
                Value::ip_address("10.0.0.2"),
                Value::ip_address("10.0.0.1"),
            ])
        };
        assert_eq!(build(), build());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stored_values_never_repeat(raw in prop::collection::vec("[a-c]{0,2}", 0..40)) {
                let mut event = Event::new("Test.Log", sample_time());
                event.add(raw.iter().map(|s| Value::domain_name(s.as_str())));

                let stored: Vec<&str> = event.values(&ValueKind::DomainName).collect();
                let unique: BTreeSet<&str> = stored.iter().copied().collect();
                prop_assert_eq!(stored.len(), unique.len());
                prop_assert!(stored.iter().all(|s| !s.is_empty()));

                let expected: BTreeSet<&str> =
                    raw.iter().map(String::as_str).filter(|s| !s.is_empty()).collect();
                prop_assert_eq!(unique, expected);
            }
        }
    }
}
