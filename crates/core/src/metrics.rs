//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다. 라이브러리는 익스포터를
//! 설치하지 않으므로 레코더가 없으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logweave_`
//! - 모듈명: `parser_`, `registry_`, `scanner_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use logweave_core::metrics as m;
//!
//! metrics::counter!(m::PARSER_LINES_TOTAL, m::LABEL_LOG_TYPE => "Apache.AccessCommon").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로그 타입 레이블 키 (예: `Apache.AccessCombined`)
pub const LABEL_LOG_TYPE: &str = "log_type";

/// 파싱 실패 분류 레이블 키 (grammar, field_count, validation, timestamp, json, too_large, record)
pub const LABEL_REASON: &str = "reason";

// ─── Parser 메트릭 ────────────────────────────────────────────────

/// Parser: 처리한 원문 줄 수 (counter, label: log_type)
pub const PARSER_LINES_TOTAL: &str = "logweave_parser_lines_total";

/// Parser: 생성한 이벤트 수 (counter, label: log_type)
pub const PARSER_EVENTS_TOTAL: &str = "logweave_parser_events_total";

/// Parser: 파싱 실패 수 (counter, label: log_type, reason)
pub const PARSER_ERRORS_TOTAL: &str = "logweave_parser_errors_total";

/// Parser: 한 줄 파싱 지연 시간 (histogram, 초, label: log_type)
pub const PARSER_DURATION_SECONDS: &str = "logweave_parser_duration_seconds";

// ─── Registry 메트릭 ──────────────────────────────────────────────

/// Registry: 등록된 로그 타입 수 (gauge)
pub const REGISTRY_LOG_TYPES: &str = "logweave_registry_log_types";

// ─── Scanner 메트릭 ───────────────────────────────────────────────

/// Scanner: 풀에 대기 중인 스캐너 수 (gauge)
pub const SCANNER_POOL_IDLE: &str = "logweave_scanner_pool_idle";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        PARSER_LINES_TOTAL,
        "Total number of raw lines handed to a parser"
    );
    describe_counter!(
        PARSER_EVENTS_TOTAL,
        "Total number of normalized events produced"
    );
    describe_counter!(
        PARSER_ERRORS_TOTAL,
        "Total number of lines that failed to parse, by reason"
    );
    describe_histogram!(
        PARSER_DURATION_SECONDS,
        "Time spent parsing a single line in seconds"
    );
    describe_gauge!(REGISTRY_LOG_TYPES, "Number of registered log types");
    describe_gauge!(
        SCANNER_POOL_IDLE,
        "Number of idle value scanners retained by the pool"
    );
}
