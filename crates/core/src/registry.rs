//! 로그 타입 레지스트리
//!
//! [`Registry`]는 로그 타입 이름을 메타데이터, 스키마 디스크립터, 파서 팩토리에
//! 매핑합니다. 프로세스 시작 시 비어 있는 상태로 만들어지고, 각 형식 모듈의
//! 명시적 등록 호출로 채워진 뒤에는 읽기 전용으로 사용됩니다. 등록 해제는 없습니다.
//!
//! # 사용 예시
//! ```ignore
//! let registry = Registry::new();
//! registry.register(LogType::new::<AccessCombined, _>(
//!     "Apache.AccessCombined",
//!     "Apache HTTP server access logs using the 'combined' format",
//!     || Box::new(AccessCombinedParser::default()),
//! ))?;
//!
//! let mut parser = registry.new_parser("Apache.AccessCombined")?;
//! let events = parser.parse(line)?;
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Map;
use tracing::info;

use crate::error::RegistryError;
use crate::metrics as m;
use crate::parser::{LogParser, ParserFactory};
use crate::schema::{FieldDescriptor, RESERVED_PREFIX, Schema, SchemaDescriptor, envelope_fields};

type SampleFn = fn() -> Result<Map<String, serde_json::Value>, String>;

// ─── LogType ──────────────────────────────────────────────────────

/// 레지스트리 항목: 지원하는 로그 형식 하나
pub struct LogType {
    name: String,
    description: String,
    reference_url: Option<String>,
    fields: fn() -> Vec<FieldDescriptor>,
    sample: SampleFn,
    factory: ParserFactory,
}

impl LogType {
    /// 레코드 스키마 `S`와 파서 팩토리로 로그 타입을 정의합니다.
    pub fn new<S, F>(name: impl Into<String>, description: impl Into<String>, factory: F) -> Self
    where
        S: Schema,
        F: Fn() -> Box<dyn LogParser> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            reference_url: None,
            fields: S::fields,
            sample: sample_record::<S>,
            factory: Arc::new(factory),
        }
    }

    /// 형식 문서 URL을 지정합니다.
    pub fn with_reference_url(mut self, url: impl Into<String>) -> Self {
        self.reference_url = Some(url.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reference_url(&self) -> Option<&str> {
        self.reference_url.as_deref()
    }

    /// 등록 전 구조 검증
    ///
    /// - 이름과 설명이 비어 있지 않음
    /// - 스키마 영값이 JSON 객체로 직렬화되고 다시 디코딩됨
    /// - 필드 목록이 비어 있지 않고, 이름이 비어 있거나 중복되지 않으며
    ///   봉투 예약 접두어(`lw_`)를 쓰지 않음
    /// - 영값이 직렬화한 모든 필드가 목록에 선언됨
    /// - 팩토리가 같은 이름의 파서를 생성함
    pub fn check(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(RegistryError::MissingDescription {
                name: self.name.clone(),
            });
        }

        let invalid = |reason: String| RegistryError::InvalidSchema {
            name: self.name.clone(),
            reason,
        };

        let sample = (self.sample)().map_err(invalid)?;
        let fields = (self.fields)();
        if fields.is_empty() {
            return Err(invalid("no fields declared".to_owned()));
        }

        let mut declared = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.name.is_empty() {
                return Err(invalid("field with empty name".to_owned()));
            }
            if field.name.starts_with(RESERVED_PREFIX) {
                return Err(invalid(format!(
                    "field '{}' uses the reserved '{RESERVED_PREFIX}' prefix",
                    field.name
                )));
            }
            if !declared.insert(field.name.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
        }
        if let Some(key) = sample.keys().find(|k| !declared.contains(k.as_str())) {
            return Err(invalid(format!("serialized field '{key}' is not declared")));
        }

        let parser = (self.factory)();
        if parser.log_type() != self.name {
            return Err(RegistryError::ParserMismatch {
                name: self.name.clone(),
                produced: parser.log_type().to_owned(),
            });
        }
        Ok(())
    }

    /// 합성된 스키마 디스크립터 (레코드 필드 + 봉투 필드)
    pub fn schema(&self) -> SchemaDescriptor {
        let mut fields = (self.fields)();
        fields.extend(envelope_fields());
        SchemaDescriptor {
            log_type: self.name.clone(),
            description: self.description.clone(),
            reference_url: self.reference_url.clone(),
            fields,
        }
    }

    /// 새 파서 인스턴스를 생성합니다.
    pub fn new_parser(&self) -> Box<dyn LogParser> {
        (self.factory)()
    }

    /// 파서 팩토리
    pub fn factory(&self) -> ParserFactory {
        Arc::clone(&self.factory)
    }
}

impl fmt::Debug for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogType")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("reference_url", &self.reference_url)
            .finish_non_exhaustive()
    }
}

/// 스키마 영값을 JSON으로 직렬화한 뒤 객체로 다시 디코딩합니다.
fn sample_record<S: Schema>() -> Result<Map<String, serde_json::Value>, String> {
    let encoded = serde_json::to_string(&S::default())
        .map_err(|e| format!("zero value does not serialize: {e}"))?;
    serde_json::from_str(&encoded)
        .map_err(|e| format!("zero value does not decode into an object: {e}"))
}

// ─── Registry ─────────────────────────────────────────────────────

/// 로그 타입 레지스트리
///
/// 조회(`get`, `available_types`)는 읽기 잠금으로 동시에 수행할 수 있고,
/// 등록은 모든 접근과 상호 배타적입니다.
#[derive(Debug, Default)]
pub struct Registry {
    types: RwLock<HashMap<String, Arc<LogType>>>,
}

impl Registry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 로그 타입을 등록합니다.
    ///
    /// `check()` 실패 또는 이름 중복 시 에러를 반환하며 레지스트리는 변경되지 않습니다.
    pub fn register(&self, log_type: LogType) -> Result<(), RegistryError> {
        log_type.check()?;

        let name = log_type.name.clone();
        let mut types = self.write();
        match types.entry(name.clone()) {
            Entry::Occupied(_) => return Err(RegistryError::Duplicate { name }),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(log_type));
            }
        }
        let count = types.len();
        drop(types);

        metrics::gauge!(m::REGISTRY_LOG_TYPES).set(count as f64);
        info!(log_type = %name, count, "log type registered");
        Ok(())
    }

    /// 여러 로그 타입을 순서대로 등록합니다. 첫 실패에서 멈춥니다.
    pub fn register_all(
        &self,
        log_types: impl IntoIterator<Item = LogType>,
    ) -> Result<(), RegistryError> {
        for log_type in log_types {
            self.register(log_type)?;
        }
        Ok(())
    }

    /// 이름으로 조회합니다. 없으면 `None`.
    pub fn get(&self, name: &str) -> Option<Arc<LogType>> {
        self.read().get(name).cloned()
    }

    /// 이름으로 조회합니다.
    ///
    /// # Panics
    ///
    /// 등록되지 않은 이름이면 패닉합니다. 이름이 이미 레지스트리에서
    /// 확인된 경로에서만 사용합니다.
    pub fn must_get(&self, name: &str) -> Arc<LogType> {
        match self.get(name) {
            Some(log_type) => log_type,
            None => panic!("unregistered log type {name:?}"),
        }
    }

    /// 등록된 로그 타입의 스냅샷 (이름순)
    ///
    /// 잠금을 잡지 않은 채 순회할 수 있습니다.
    pub fn available_types(&self) -> Vec<Arc<LogType>> {
        let mut types: Vec<_> = self.read().values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// 등록된 이름 목록 (이름순)
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// 이름으로 새 파서를 생성합니다.
    pub fn new_parser(&self, name: &str) -> Result<Box<dyn LogParser>, RegistryError> {
        self.get(name)
            .map(|log_type| log_type.new_parser())
            .ok_or_else(|| RegistryError::Unregistered {
                name: name.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<LogType>>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<LogType>>> {
        self.types.write().unwrap_or_else(PoisonError::into_inner)
    }
}
