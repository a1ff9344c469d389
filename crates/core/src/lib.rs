#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod schema;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, LogweaveError, ParseError, RegistryError, ScanError};

// 설정
pub use config::LogweaveConfig;

// 이벤트 / 지표 값
pub use event::Event;
pub use value::{Value, ValueKind};

// 파서 계약
pub use parser::{LogParser, ParserFactory, parse_line};

// 레지스트리 / 스키마
pub use registry::{LogType, Registry};
pub use schema::{FieldDescriptor, FieldType, Schema, SchemaDescriptor};

// 값 스캐너
pub use scanner::{JsonScanner, PooledScanner, ScannerPool};
