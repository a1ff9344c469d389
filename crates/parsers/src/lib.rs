#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 형식별 파서와 일괄 등록 ([`register_all`])
//! - [`config`]: 파서 설정 (core 설정 확장)
//! - [`timestamp`]: 형식별 타임스탬프 디코딩
//! - [`numeric`]: 문자열로 기록된 숫자 필드
//! - [`validate`]: 디코딩된 레코드의 필드 규칙
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! line -> grammar regex (Apache)      -> record -> Event
//!      -> serde_json::from_str::<R>  -> validate -> indicators (+ ScannerPool) -> Event
//! ```

pub mod config;
pub mod error;
pub mod numeric;
pub mod parser;
pub mod timestamp;
pub mod validate;

// --- 주요 타입 re-export ---

// 설정
pub use config::{ParserConfig, ParserConfigBuilder};

// 에러
pub use error::ParsersError;

// 파서
pub use parser::apache::AccessLogParser;
pub use parser::json::{JsonParser, JsonRecord};
pub use parser::{LOG_TYPES, log_types, register_all};

// 필드 타입
pub use numeric::Integer;
pub use timestamp::Timestamp;
