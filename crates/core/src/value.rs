//! 지표 값(indicator value) 모델
//!
//! [`Value`]는 원본 레코드에서 추출한 보안 관련 값 하나를 `(kind, data)` 쌍으로
//! 표현합니다. 데이터는 정규화된 문자열이며 이 계층에서 IP/도메인을
//! 추가로 검증하거나 해석하지 않습니다.

use std::borrow::Cow;
use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// 정규화된 레코드에서 지표 배열 필드에 붙는 접두어
pub const ANY_FIELD_PREFIX: &str = "lw_any_";

/// 지표 종류
///
/// 닫힌 열거형이지만 `Custom`으로 형식 고유의 종류를 추가할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// IPv4/IPv6 주소
    IpAddress,
    /// 도메인 이름
    DomainName,
    /// AWS 리소스 이름 (ARN)
    AwsArn,
    /// AWS 계정 ID
    AwsAccountId,
    /// EC2 인스턴스 ID
    AwsInstanceId,
    /// `key:value` 형태의 태그
    AwsTag,
    /// 형식 고유 종류 (snake_case 이름)
    Custom(String),
}

impl ValueKind {
    /// 기본 제공 종류 목록 (스키마 디스크립터 구성에 사용)
    pub const BUILTIN: [ValueKind; 6] = [
        ValueKind::IpAddress,
        ValueKind::DomainName,
        ValueKind::AwsArn,
        ValueKind::AwsAccountId,
        ValueKind::AwsInstanceId,
        ValueKind::AwsTag,
    ];

    /// 종류 이름 (snake_case)
    pub fn as_str(&self) -> &str {
        match self {
            Self::IpAddress => "ip_address",
            Self::DomainName => "domain_name",
            Self::AwsArn => "aws_arn",
            Self::AwsAccountId => "aws_account_id",
            Self::AwsInstanceId => "aws_instance_id",
            Self::AwsTag => "aws_tag",
            Self::Custom(name) => name,
        }
    }

    /// 정규화된 레코드에서 이 종류의 값 배열이 놓이는 필드 이름
    pub fn field_name(&self) -> Cow<'static, str> {
        match self {
            Self::IpAddress => Cow::Borrowed("lw_any_ip_addresses"),
            Self::DomainName => Cow::Borrowed("lw_any_domain_names"),
            Self::AwsArn => Cow::Borrowed("lw_any_aws_arns"),
            Self::AwsAccountId => Cow::Borrowed("lw_any_aws_account_ids"),
            Self::AwsInstanceId => Cow::Borrowed("lw_any_aws_instance_ids"),
            Self::AwsTag => Cow::Borrowed("lw_any_aws_tags"),
            Self::Custom(name) => Cow::Owned(format!("{ANY_FIELD_PREFIX}{name}")),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 타입이 지정된 지표 값
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Value {
    kind: ValueKind,
    data: String,
}

impl Value {
    /// 새 지표 값을 생성합니다.
    ///
    /// 빈 문자열도 생성할 수 있지만 [`Event::add`](crate::event::Event::add)는
    /// 빈 값을 저장하지 않습니다.
    pub fn new(kind: ValueKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    pub fn ip_address(data: impl Into<String>) -> Self {
        Self::new(ValueKind::IpAddress, data)
    }

    pub fn domain_name(data: impl Into<String>) -> Self {
        Self::new(ValueKind::DomainName, data)
    }

    pub fn aws_arn(data: impl Into<String>) -> Self {
        Self::new(ValueKind::AwsArn, data)
    }

    pub fn aws_account_id(data: impl Into<String>) -> Self {
        Self::new(ValueKind::AwsAccountId, data)
    }

    pub fn aws_instance_id(data: impl Into<String>) -> Self {
        Self::new(ValueKind::AwsInstanceId, data)
    }

    /// `key:value` 태그 값을 생성합니다. 둘 중 하나라도 비어 있으면 `None`.
    pub fn aws_tag(key: &str, value: &str) -> Option<Self> {
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(ValueKind::AwsTag, format!("{key}:{value}")))
    }

    /// 호스트 문자열을 분류합니다.
    ///
    /// IP 주소로 해석되면 `IpAddress`, 아니면 `DomainName`입니다.
    pub fn hostname(data: &str) -> Self {
        if data.parse::<IpAddr>().is_ok() {
            Self::ip_address(data)
        } else {
            Self::domain_name(data)
        }
    }

    /// 선택적 필드에서 값을 만듭니다. `None`이거나 빈 문자열이면 `None`.
    pub fn optional(kind: ValueKind, data: Option<&str>) -> Option<Self> {
        data.filter(|d| !d.is_empty())
            .map(|d| Self::new(kind, d))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(kind, data)`로 분해합니다.
    pub fn into_parts(self) -> (ValueKind, String) {
        (self.kind, self.data)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_prefers_ip() {
        assert_eq!(
            Value::hostname("192.168.0.1").kind(),
            &ValueKind::IpAddress
        );
        assert_eq!(Value::hostname("::1").kind(), &ValueKind::IpAddress);
        assert_eq!(
            Value::hostname("fe80::1ff:fe23:4567:890a").kind(),
            &ValueKind::IpAddress
        );
    }

    #[test]
    fn hostname_falls_back_to_domain() {
        let value = Value::hostname("www.example.com");
        assert_eq!(value.kind(), &ValueKind::DomainName);
        assert_eq!(value.data(), "www.example.com");
        // 포트가 붙은 주소는 IP로 해석되지 않는다
        assert_eq!(
            Value::hostname("10.0.0.1:8080").kind(),
            &ValueKind::DomainName
        );
    }

    #[test]
    fn tag_requires_key_and_value() {
        assert_eq!(
            Value::aws_tag("env", "prod").map(|v| v.data().to_owned()),
            Some("env:prod".to_owned())
        );
        assert!(Value::aws_tag("", "prod").is_none());
        assert!(Value::aws_tag("env", "").is_none());
    }

    #[test]
    fn optional_drops_absent_and_empty() {
        assert!(Value::optional(ValueKind::IpAddress, None).is_none());
        assert!(Value::optional(ValueKind::IpAddress, Some("")).is_none());
        assert_eq!(
            Value::optional(ValueKind::IpAddress, Some("10.0.0.1")),
            Some(Value::ip_address("10.0.0.1"))
        );
    }

    #[test]
    fn field_names_use_envelope_prefix() {
        for kind in ValueKind::BUILTIN {
            assert!(kind.field_name().starts_with(ANY_FIELD_PREFIX));
        }
        let custom = ValueKind::Custom("sha256_hashes".to_owned());
        assert_eq!(custom.field_name(), "lw_any_sha256_hashes");
        assert_eq!(custom.to_string(), "sha256_hashes");
    }
}
