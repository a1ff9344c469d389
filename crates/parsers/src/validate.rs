//! 레코드 필드 검증
//!
//! serde 디코딩은 형태만 확인합니다. 필수 필드 누락, 빈 문자열, 허용 값 목록,
//! 숫자 범위 같은 규칙은 [`Validate`] 구현이 디코딩 직후 확인합니다.
//! 중첩 레코드의 에러는 `dns.answers[1].rrtype` 같은 경로로 보고됩니다.

use std::fmt;
use std::ops::RangeInclusive;

use logweave_core::ParseError;

/// 필드 검증 실패
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// 점으로 구분된 필드 경로
    pub field: String,
    /// 실패 사유
    pub reason: String,
}

impl FieldError {
    /// 새 필드 에러를 생성합니다.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 상위 필드 경로를 앞에 붙입니다.
    pub fn within(mut self, parent: &str) -> Self {
        self.field = if self.field.is_empty() {
            parent.to_owned()
        } else {
            format!("{parent}.{}", self.field)
        };
        self
    }

    /// 로그 타입의 파싱 에러로 변환합니다.
    pub fn into_parse_error(self, log_type: &str) -> ParseError {
        ParseError::validation(log_type, self.field, self.reason)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for FieldError {}

/// 디코딩된 레코드의 필드 규칙
pub trait Validate {
    fn validate(&self) -> Result<(), FieldError>;
}

/// 필수 필드가 있는지 확인합니다.
pub fn required<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T, FieldError> {
    value
        .as_ref()
        .ok_or_else(|| FieldError::new(field, "required field is missing"))
}

/// 필수 문자열 필드가 있고 비어 있지 않은지 확인합니다.
pub fn required_str<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, FieldError> {
    let value = required(field, value)?;
    if value.is_empty() {
        return Err(FieldError::new(field, "required field is empty"));
    }
    Ok(value)
}

/// 필드 값이 기대값과 같은지 확인합니다.
pub fn equals(field: &str, value: &str, expected: &str) -> Result<(), FieldError> {
    if value != expected {
        return Err(FieldError::new(
            field,
            format!("expected {expected:?}, found {value:?}"),
        ));
    }
    Ok(())
}

/// 필드 값이 허용 목록에 있는지 확인합니다.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), FieldError> {
    if !allowed.contains(&value) {
        return Err(FieldError::new(
            field,
            format!("{value:?} is not one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// 숫자 필드가 범위 안에 있는지 확인합니다.
pub fn in_range(field: &str, value: i64, range: RangeInclusive<i64>) -> Result<(), FieldError> {
    if !range.contains(&value) {
        return Err(FieldError::new(
            field,
            format!("{value} is out of range {}..={}", range.start(), range.end()),
        ));
    }
    Ok(())
}

/// 중첩 레코드를 검증합니다. 값이 없으면 통과합니다.
pub fn nested<T: Validate>(field: &str, value: &Option<T>) -> Result<(), FieldError> {
    match value {
        Some(inner) => inner.validate().map_err(|e| e.within(field)),
        None => Ok(()),
    }
}

/// 배열의 각 원소를 검증합니다.
pub fn each<T: Validate>(field: &str, items: &[T]) -> Result<(), FieldError> {
    for (i, item) in items.iter().enumerate() {
        item.validate()
            .map_err(|e| e.within(&format!("{field}[{i}]")))?;
    }
    Ok(())
}
