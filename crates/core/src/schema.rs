//! 스키마 디스크립터: 로그 타입의 논리 필드 구조
//!
//! 카탈로그 측은 [`SchemaDescriptor`]로 물리 테이블 정의를 도출합니다.
//! 코어는 특정 파일/와이어 스키마로 변환하지 않고 논리 필드 형태만 노출합니다.
//!
//! 모든 레코드 스키마는 공통 봉투(envelope) 필드 묶음을 합성(composition)으로
//! 포함합니다. 레코드 필드 이름은 봉투 필드와 겹칠 수 없습니다.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::event::{FIELD_EVENT_TIME, FIELD_LOG_TYPE};
use crate::value::{ANY_FIELD_PREFIX, ValueKind};

/// 봉투 필드 이름 예약 접두어
pub const RESERVED_PREFIX: &str = "lw_";

/// 필드의 논리 타입
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// UTC 타임스탬프
    Timestamp,
    /// 구조를 알 수 없는 임의 JSON
    Json,
    Array(Box<FieldType>),
    /// 문자열 키 맵
    Map(Box<FieldType>),
    /// 중첩 객체
    Object(Vec<FieldDescriptor>),
}

impl FieldType {
    pub fn array_of(inner: FieldType) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn map_of(inner: FieldType) -> Self {
        Self::Map(Box::new(inner))
    }
}

/// 필드 하나의 디스크립터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// JSON 필드 이름
    pub name: String,
    /// 논리 타입
    #[serde(flatten)]
    pub field_type: FieldType,
    /// 필수 여부
    pub required: bool,
    /// 사람이 읽는 설명
    pub description: String,
}

impl FieldDescriptor {
    /// 필수 필드
    pub fn required(
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            description: description.into(),
        }
    }

    /// 선택 필드
    pub fn optional(
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: description.into(),
        }
    }
}

/// 로그 형식의 레코드 형태
///
/// 영값(`Default`) 인스턴스는 등록 시 구조 검증에만 사용되며 실제 데이터를
/// 담지 않습니다.
pub trait Schema: Serialize + DeserializeOwned + Default + 'static {
    /// 레코드 필드 목록 (봉투 필드 제외)
    fn fields() -> Vec<FieldDescriptor>;
}

/// 봉투 필드 목록
pub fn envelope_fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::required(
            FIELD_LOG_TYPE,
            FieldType::String,
            "Registered log type name",
        ),
        FieldDescriptor::required(
            FIELD_EVENT_TIME,
            FieldType::Timestamp,
            "Event time normalized to UTC",
        ),
    ];
    fields.extend(ValueKind::BUILTIN.iter().map(|kind| {
        FieldDescriptor::optional(
            kind.field_name(),
            FieldType::array_of(FieldType::String),
            format!("Deduplicated {kind} indicators found anywhere in the record"),
        )
    }));
    fields
}

/// 봉투 필드 이름인지 확인합니다.
pub fn is_envelope_field(name: &str) -> bool {
    name == FIELD_LOG_TYPE || name == FIELD_EVENT_TIME || name.starts_with(ANY_FIELD_PREFIX)
}

/// 로그 타입의 합성된 스키마 (레코드 필드 + 봉투 필드)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub log_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_url: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    /// 이름으로 필드를 찾습니다.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 필수 필드 이름 목록
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }
}
