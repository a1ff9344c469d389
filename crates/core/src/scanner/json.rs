//! 스트리밍 JSON 값 스캐너
//!
//! `serde_json::Deserializer` 위에서 `DeserializeSeed`/`Visitor`로 토큰을
//! 순회합니다. 키는 할당 없이 규칙으로 분류되고, 값은 필요한 경우에만
//! 문자열로 복사됩니다.

use std::fmt;

use serde::de::{
    DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor,
};
use tracing::trace;

use crate::error::ScanError;
use crate::scanner::arn::{ARN_PREFIX, Arn};
use crate::value::Value;

/// 재사용 시 유지하는 작업 버퍼 최대 용량 (초과분은 `reset`에서 해제)
const MAX_RETAINED_VALUES: usize = 1024;

/// 태그 키/값 버퍼 최대 유지 용량 (바이트)
const MAX_RETAINED_TAG_BYTES: usize = 4096;

/// 재사용 가능한 JSON 값 스캐너
///
/// 인스턴스는 동시 사용에 안전하지 않습니다. 작업자마다 하나씩 사용하거나
/// [`ScannerPool`](super::ScannerPool)에서 빌립니다.
#[derive(Debug, Default)]
pub struct JsonScanner {
    sink: Sink,
    scans: u64,
}

/// 순회 중 값이 쌓이는 작업 상태
#[derive(Debug, Default)]
struct Sink {
    values: Vec<Value>,
    tag_key: String,
    tag_value: String,
}

impl Sink {
    fn push(&mut self, value: Value) {
        if !value.is_empty() {
            self.values.push(value);
        }
    }

    /// ARN 형태 값 규칙. 값이 `arn:`으로 시작하면 `true`를 반환하며,
    /// 이 경우 키 이름 규칙은 적용하지 않습니다.
    fn match_arn(&mut self, raw: &str) -> bool {
        if !raw.starts_with(ARN_PREFIX) {
            return false;
        }
        if let Ok(arn) = Arn::parse(raw) {
            self.push(Value::aws_arn(raw));
            self.push(Value::aws_account_id(arn.account_id));
            if let Some(id) = arn.instance_id() {
                self.push(Value::aws_instance_id(id));
            }
        }
        true
    }

    /// 키 이름이 붙은 문자열 값에 규칙을 적용합니다.
    fn field(&mut self, rule: KeyRule, raw: &str) {
        if self.match_arn(raw) {
            return;
        }
        match rule {
            KeyRule::InstanceId if raw.starts_with("i-") => {
                self.push(Value::aws_instance_id(raw));
            }
            KeyRule::AccountId => self.push(Value::aws_account_id(raw)),
            KeyRule::IpAddress => self.push(Value::ip_address(raw)),
            KeyRule::DomainName => self.push(Value::domain_name(raw)),
            _ => {}
        }
    }

    fn clear(&mut self) {
        self.values.clear();
        self.tag_key.clear();
        self.tag_value.clear();
        if self.values.capacity() > MAX_RETAINED_VALUES {
            self.values.shrink_to(MAX_RETAINED_VALUES);
        }
        if self.tag_key.capacity() > MAX_RETAINED_TAG_BYTES {
            self.tag_key.shrink_to(MAX_RETAINED_TAG_BYTES);
        }
        if self.tag_value.capacity() > MAX_RETAINED_TAG_BYTES {
            self.tag_value.shrink_to(MAX_RETAINED_TAG_BYTES);
        }
    }
}

impl JsonScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 객체 하나를 스캔하여 찾은 값을 `values` 뒤에 추가합니다.
    ///
    /// 입력이 잘못되었으면 에러를 반환하며 `values`는 변경되지 않습니다.
    /// 스캐너는 `values`에 대한 참조를 유지하지 않습니다.
    pub fn scan_values(&mut self, values: &mut Vec<Value>, input: &str) -> Result<(), ScanError> {
        self.sink.clear();
        self.scans += 1;

        let mut de = serde_json::Deserializer::from_str(input);
        let walked = ObjectSeed {
            sink: &mut self.sink,
        }
        .deserialize(&mut de)
        .and_then(|()| de.end());

        match walked {
            Ok(()) => {
                trace!(found = self.sink.values.len(), "json scanned");
                values.append(&mut self.sink.values);
                Ok(())
            }
            Err(e) => {
                self.sink.clear();
                Err(ScanError::Json(e))
            }
        }
    }

    /// 평탄한 `(키, 값)` 목록에 같은 규칙을 적용합니다.
    ///
    /// 구분자 형식처럼 필드 목록이 이미 분리된 입력에 사용합니다.
    pub fn scan_fields<'f, I>(&mut self, values: &mut Vec<Value>, fields: I)
    where
        I: IntoIterator<Item = (&'f str, &'f str)>,
    {
        self.sink.clear();
        self.scans += 1;
        for (key, raw) in fields {
            self.sink.field(KeyRule::classify(key), raw);
        }
        values.append(&mut self.sink.values);
    }

    /// 다음 입력을 위해 작업 버퍼를 비웁니다.
    ///
    /// 이전 입력의 값은 남지 않습니다. 큰 입력으로 늘어난 버퍼는 줄입니다.
    pub fn reset(&mut self) {
        self.sink.clear();
    }

    /// 스캐너를 닫고 버퍼를 해제합니다.
    pub fn close(self) {
        trace!(scans = self.scans, "json scanner closed");
    }

    /// 이 스캐너가 수행한 스캔 횟수
    pub fn scans(&self) -> u64 {
        self.scans
    }

    #[cfg(test)]
    fn retained_values(&self) -> usize {
        self.sink.values.len()
    }
}

// ─── 키 분류 ──────────────────────────────────────────────────────

/// 키 이름으로 결정되는 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyRule {
    InstanceId,
    AccountId,
    IpAddress,
    DomainName,
    Tags,
    Ipv6Addresses,
    Other,
}

impl KeyRule {
    fn classify(key: &str) -> Self {
        match key {
            "tags" => Self::Tags,
            "ipv6Addresses" => Self::Ipv6Addresses,
            "instanceId" => Self::InstanceId,
            "accountId" => Self::AccountId,
            "publicIp" | "privateIpAddress" | "ipAddressV4" => Self::IpAddress,
            "publicDnsName" | "privateDnsName" | "domain" => Self::DomainName,
            k if k.ends_with("InstanceId") => Self::InstanceId,
            k if k.ends_with("AccountId") => Self::AccountId,
            _ => Self::Other,
        }
    }
}

/// 키를 할당 없이 규칙으로 변환하는 시드
struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = KeyRule;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<KeyRule, D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = KeyRule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object key")
    }

    fn visit_str<E: serde::de::Error>(self, key: &str) -> Result<KeyRule, E> {
        Ok(KeyRule::classify(key))
    }
}

// ─── 객체/필드 순회 ───────────────────────────────────────────────

fn walk_object<'de, A: MapAccess<'de>>(sink: &mut Sink, mut map: A) -> Result<(), A::Error> {
    while let Some(rule) = map.next_key_seed(KeySeed)? {
        map.next_value_seed(FieldSeed {
            rule,
            sink: &mut *sink,
        })?;
    }
    Ok(())
}

/// 최상위 입력: 반드시 객체
struct ObjectSeed<'s> {
    sink: &'s mut Sink,
}

impl<'de> DeserializeSeed<'de> for ObjectSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ObjectSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        walk_object(self.sink, map)
    }
}

/// 키가 붙은 값 하나
struct FieldSeed<'s> {
    rule: KeyRule,
    sink: &'s mut Sink,
}

impl<'de> DeserializeSeed<'de> for FieldSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for FieldSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_str<E: serde::de::Error>(self, raw: &str) -> Result<(), E> {
        self.sink.field(self.rule, raw);
        Ok(())
    }

    fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: serde::de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: serde::de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: serde::de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        walk_object(self.sink, map)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        let mode = match self.rule {
            KeyRule::Tags => ElementMode::Tag,
            KeyRule::Ipv6Addresses => ElementMode::IpAddress,
            _ => ElementMode::Generic,
        };
        walk_seq(self.sink, mode, seq)
    }
}

// ─── 배열 원소 순회 ───────────────────────────────────────────────

/// 배열 원소 해석 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementMode {
    /// 문자열은 ARN 규칙만, 객체/배열은 재귀
    Generic,
    /// `tags` 배열: `{key, value}` 객체만 해석
    Tag,
    /// `ipv6Addresses` 배열: 문자열마다 IP
    IpAddress,
}

fn walk_seq<'de, A: SeqAccess<'de>>(
    sink: &mut Sink,
    mode: ElementMode,
    mut seq: A,
) -> Result<(), A::Error> {
    while seq
        .next_element_seed(ElementSeed {
            mode,
            sink: &mut *sink,
        })?
        .is_some()
    {}
    Ok(())
}

struct ElementSeed<'s> {
    mode: ElementMode,
    sink: &'s mut Sink,
}

impl<'de> DeserializeSeed<'de> for ElementSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ElementSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_str<E: serde::de::Error>(self, raw: &str) -> Result<(), E> {
        match self.mode {
            ElementMode::Generic => {
                self.sink.match_arn(raw);
            }
            ElementMode::IpAddress => {
                if !self.sink.match_arn(raw) {
                    self.sink.push(Value::ip_address(raw));
                }
            }
            ElementMode::Tag => {}
        }
        Ok(())
    }

    fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: serde::de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: serde::de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: serde::de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        match self.mode {
            ElementMode::Generic => walk_object(self.sink, map),
            ElementMode::Tag => read_tag(self.sink, map),
            ElementMode::IpAddress => IgnoredAny.visit_map(map).map(|_| ()),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        match self.mode {
            ElementMode::Generic => walk_seq(self.sink, ElementMode::Generic, seq),
            ElementMode::Tag | ElementMode::IpAddress => IgnoredAny.visit_seq(seq).map(|_| ()),
        }
    }
}

// ─── 태그 ─────────────────────────────────────────────────────────

/// 태그 객체에서 읽을 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagField {
    Key,
    Value,
    Other,
}

struct TagKeySeed;

impl<'de> DeserializeSeed<'de> for TagKeySeed {
    type Value = TagField;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<TagField, D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for TagKeySeed {
    type Value = TagField;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tag field name")
    }

    fn visit_str<E: serde::de::Error>(self, key: &str) -> Result<TagField, E> {
        Ok(match key {
            "key" => TagField::Key,
            "value" => TagField::Value,
            _ => TagField::Other,
        })
    }
}

/// 문자열 값을 버퍼에 복사하고, 그 외 값은 건너뜁니다.
struct CaptureStr<'b> {
    buf: &'b mut String,
}

impl<'de> DeserializeSeed<'de> for CaptureStr<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for CaptureStr<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tag string")
    }

    fn visit_str<E: serde::de::Error>(self, raw: &str) -> Result<(), E> {
        self.buf.clear();
        self.buf.push_str(raw);
        Ok(())
    }

    fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: serde::de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: serde::de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: serde::de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        IgnoredAny.visit_map(map).map(|_| ())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        IgnoredAny.visit_seq(seq).map(|_| ())
    }
}

fn read_tag<'de, A: MapAccess<'de>>(sink: &mut Sink, mut map: A) -> Result<(), A::Error> {
    sink.tag_key.clear();
    sink.tag_value.clear();
    while let Some(field) = map.next_key_seed(TagKeySeed)? {
        match field {
            TagField::Key => map.next_value_seed(CaptureStr {
                buf: &mut sink.tag_key,
            })?,
            TagField::Value => map.next_value_seed(CaptureStr {
                buf: &mut sink.tag_value,
            })?,
            TagField::Other => {
                map.next_value::<IgnoredAny>()?;
            }
        }
    }
    if let Some(tag) = Value::aws_tag(&sink.tag_key, &sink.tag_value) {
        sink.push(tag);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn scan(input: &str) -> Vec<Value> {
        let mut scanner = JsonScanner::new();
        let mut values = Vec::new();
        scanner.scan_values(&mut values, input).unwrap();
        values
    }

    fn data_of(values: &[Value], kind: ValueKind) -> Vec<&str> {
        values
            .iter()
            .filter(|v| *v.kind() == kind)
            .map(Value::data)
            .collect()
    }

    #[test]
    fn instance_id_and_tags() {
        let values = scan(
            r#"{"instanceId":"i-0123456789abcdef0","tags":[{"key":"env","value":"prod"}]}"#,
        );
        assert_eq!(
            values,
            vec![
                Value::aws_instance_id("i-0123456789abcdef0"),
                Value::new(ValueKind::AwsTag, "env:prod"),
            ]
        );
    }

    #[test]
    fn arn_wins_over_key_rules() {
        let values = scan(r#"{"role":"arn:aws:iam::123456789012:instance/i-0abc"}"#);
        assert_eq!(
            values,
            vec![
                Value::aws_arn("arn:aws:iam::123456789012:instance/i-0abc"),
                Value::aws_account_id("123456789012"),
                Value::aws_instance_id("i-0abc"),
            ]
        );
    }

    #[test]
    fn arn_under_account_key_is_not_emitted_raw() {
        let values = scan(r#"{"accountId":"arn:aws:iam::123456789012:root"}"#);
        assert_eq!(
            data_of(&values, ValueKind::AwsAccountId),
            vec!["123456789012"]
        );
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn malformed_arn_still_skips_key_rules() {
        let values = scan(r#"{"accountId":"arn:aws:broken"}"#);
        assert!(values.is_empty());
    }

    #[test]
    fn key_suffix_rules() {
        let values = scan(
            r#"{
                "recipientAccountId": "111122223333",
                "targetInstanceId": "i-1",
                "otherInstanceId": "not-an-instance",
                "accountId": "444455556666",
                "publicIp": "54.1.2.3",
                "privateIpAddress": "10.0.0.5",
                "ipAddressV4": "172.16.0.1",
                "publicDnsName": "ec2-54-1-2-3.compute.amazonaws.com",
                "privateDnsName": "ip-10-0-0-5.ec2.internal",
                "domain": "example.com"
            }"#,
        );
        assert_eq!(
            data_of(&values, ValueKind::AwsAccountId),
            vec!["111122223333", "444455556666"]
        );
        assert_eq!(data_of(&values, ValueKind::AwsInstanceId), vec!["i-1"]);
        assert_eq!(
            data_of(&values, ValueKind::IpAddress),
            vec!["54.1.2.3", "10.0.0.5", "172.16.0.1"]
        );
        assert_eq!(data_of(&values, ValueKind::DomainName).len(), 3);
    }

    #[test]
    fn nested_objects_and_arrays_are_walked() {
        let values = scan(
            r#"{
                "detail": {
                    "resource": {
                        "instanceDetails": {
                            "networkInterfaces": [
                                {"publicIp": "3.3.3.3", "ipv6Addresses": ["2001:db8::1", 7]},
                                {"privateIpAddress": "10.1.1.1"}
                            ],
                            "tags": [{"key": "team", "value": "sec"}, {"key": "", "value": "x"}, "loose"]
                        }
                    },
                    "resources": ["arn:aws:s3:::bucket", 12, null, [["arn:aws:iam::999:user/bob"]]]
                }
            }"#,
        );
        assert_eq!(
            data_of(&values, ValueKind::IpAddress),
            vec!["3.3.3.3", "2001:db8::1", "10.1.1.1"]
        );
        assert_eq!(data_of(&values, ValueKind::AwsTag), vec!["team:sec"]);
        assert_eq!(
            data_of(&values, ValueKind::AwsArn),
            vec!["arn:aws:s3:::bucket", "arn:aws:iam::999:user/bob"]
        );
        // s3 ARN의 빈 계정 구간은 버린다
        assert_eq!(data_of(&values, ValueKind::AwsAccountId), vec!["999"]);
    }

    #[test]
    fn non_string_values_are_ignored() {
        let values = scan(r#"{"accountId": 123456789012, "publicIp": null, "domain": true}"#);
        assert!(values.is_empty());
    }

    #[test]
    fn tag_objects_ignore_extra_and_non_string_fields() {
        let values = scan(
            r#"{"tags":[{"key":"a","value":"1","extra":{"deep":["x"]}},{"key":"b","value":2},{"value":"c"}]}"#,
        );
        assert_eq!(data_of(&values, ValueKind::AwsTag), vec!["a:1"]);
    }

    #[test]
    fn malformed_json_leaves_accumulator_untouched() {
        let mut scanner = JsonScanner::new();
        let mut values = vec![Value::ip_address("1.1.1.1")];
        let err = scanner
            .scan_values(&mut values, r#"{"publicIp":"2.2.2.2","broken": }"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("malformed input"));
        assert_eq!(values, vec![Value::ip_address("1.1.1.1")]);
        assert_eq!(scanner.retained_values(), 0);
    }

    #[test]
    fn top_level_must_be_an_object() {
        let mut scanner = JsonScanner::new();
        let mut values = Vec::new();
        assert!(scanner.scan_values(&mut values, r#"["arn:aws:s3:::b"]"#).is_err());
        assert!(scanner.scan_values(&mut values, r#""publicIp""#).is_err());
        assert!(values.is_empty());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let mut scanner = JsonScanner::new();
        let mut values = Vec::new();
        assert!(scanner.scan_values(&mut values, r#"{"publicIp":"1.2.3.4"} x"#).is_err());
        assert!(values.is_empty());
    }

    #[test]
    fn accumulator_is_appended_across_calls() {
        let mut scanner = JsonScanner::new();
        let mut values = Vec::new();
        scanner
            .scan_values(&mut values, r#"{"publicIp":"1.1.1.1"}"#)
            .unwrap();
        scanner
            .scan_values(&mut values, r#"{"publicIp":"2.2.2.2"}"#)
            .unwrap();
        assert_eq!(
            data_of(&values, ValueKind::IpAddress),
            vec!["1.1.1.1", "2.2.2.2"]
        );
        assert_eq!(scanner.scans(), 2);
    }

    #[test]
    fn escaped_strings_are_decoded() {
        let values = scan(r#"{"domain":"exa\u006dple.com"}"#);
        assert_eq!(values, vec![Value::domain_name("example.com")]);
    }

    #[test]
    fn scan_fields_applies_key_and_arn_rules() {
        let mut scanner = JsonScanner::new();
        let mut values = Vec::new();
        scanner.scan_fields(
            &mut values,
            [
                ("publicIp", "8.8.8.8"),
                ("userArn", "arn:aws:iam::123456789012:user/alice"),
                ("instanceId", "i-9"),
                ("message", "hello"),
                ("domain", ""),
            ],
        );
        assert_eq!(data_of(&values, ValueKind::IpAddress), vec!["8.8.8.8"]);
        assert_eq!(data_of(&values, ValueKind::AwsArn).len(), 1);
        assert_eq!(
            data_of(&values, ValueKind::AwsAccountId),
            vec!["123456789012"]
        );
        assert_eq!(data_of(&values, ValueKind::AwsInstanceId), vec!["i-9"]);
        assert!(data_of(&values, ValueKind::DomainName).is_empty());
    }

    #[test]
    fn reset_clears_state() {
        let mut scanner = JsonScanner::new();
        scanner.sink.values.push(Value::ip_address("9.9.9.9"));
        scanner.sink.tag_key.push_str("stale");
        scanner.reset();
        assert_eq!(scanner.retained_values(), 0);
        assert!(scanner.sink.tag_key.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_input_does_not_panic(input in ".{0,200}") {
                let mut scanner = JsonScanner::new();
                let mut values = Vec::new();
                let _ = scanner.scan_values(&mut values, &input);
            }

            #[test]
            fn scanning_is_repeatable(ip in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}", key in "[a-z]{1,8}") {
                let input = format!(r#"{{"{key}":{{"publicIp":"{ip}"}},"tags":[{{"key":"{key}","value":"{ip}"}}]}}"#);
                let first = scan(&input);
                let second = scan(&input);
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(first.len(), 2);
            }
        }
    }
}
