//! 형식별 파서와 일괄 등록
//!
//! 구분자 형식은 [`apache`]의 정규식 문법으로, JSON 형식은 [`json::JsonParser`]와
//! 형식별 레코드 타입으로 구현됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use logweave_core::Registry;
//! use logweave_parsers::{ParserConfig, register_all};
//!
//! let registry = Registry::new();
//! register_all(&registry, &ParserConfig::default())?;
//! assert!(registry.get("Zeek.DNS").is_some());
//! ```

pub mod apache;
pub mod aws;
pub mod gitlab;
pub mod json;
pub mod osquery;
pub mod suricata;
pub mod zeek;

use logweave_core::{LogType, Registry};
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::error::ParsersError;
use apache::{AccessCombined, AccessCommon, AccessLogParser};
use json::JsonParser;

/// 이 크레이트가 제공하는 로그 타입 이름 (등록 순서)
pub const LOG_TYPES: [&str; 9] = [
    apache::ACCESS_COMMON,
    apache::ACCESS_COMBINED,
    "Suricata.DNS",
    "Suricata.Anomaly",
    "Zeek.DNS",
    "GitLab.Audit",
    "Osquery.Status",
    "AWS.CloudTrail",
    "AWS.GuardDuty",
];

/// 모든 로그 타입 항목을 만듭니다.
///
/// 정규식 문법을 컴파일할 수 없으면 에러를 반환합니다.
pub fn log_types(config: &ParserConfig) -> Result<Vec<LogType>, ParsersError> {
    Ok(vec![
        AccessLogParser::<AccessCommon>::log_type(config)?,
        AccessLogParser::<AccessCombined>::log_type(config)?,
        JsonParser::<suricata::Dns>::log_type(config),
        JsonParser::<suricata::Anomaly>::log_type(config),
        JsonParser::<zeek::ZeekDns>::log_type(config),
        JsonParser::<gitlab::GitLabAudit>::log_type(config),
        JsonParser::<osquery::OsqueryStatus>::log_type(config),
        JsonParser::<aws::CloudTrail>::log_type(config),
        JsonParser::<aws::GuardDuty>::log_type(config),
    ])
}

/// 활성화된 로그 타입을 레지스트리에 등록합니다.
///
/// 설정이 유효하지 않거나, 필터에 없는 이름이 있거나, 어느 하나라도
/// 등록 검사에 실패하면 에러를 반환합니다. 실패 전까지 등록된 항목은
/// 레지스트리에 남습니다.
pub fn register_all(registry: &Registry, config: &ParserConfig) -> Result<(), ParsersError> {
    config.validate()?;

    if let Some(unknown) = config
        .enabled_log_types
        .iter()
        .find(|name| !LOG_TYPES.contains(&name.as_str()))
    {
        return Err(ParsersError::Config {
            field: "enabled_log_types".to_owned(),
            reason: format!("unknown log type '{unknown}'"),
        });
    }

    let mut registered = 0usize;
    for log_type in log_types(config)? {
        if !config.is_enabled(log_type.name()) {
            debug!(log_type = log_type.name(), "log type disabled by configuration");
            continue;
        }
        registry.register(log_type)?;
        registered += 1;
    }

    info!(
        registered,
        total = registry.len(),
        max_line_size = config.max_line_size,
        "parsers registered"
    );
    Ok(())
}
