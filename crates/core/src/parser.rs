//! 파서 계약: 로그 형식 확장 포인트
//!
//! 새로운 로그 형식을 지원하려면 [`LogParser`]를 구현하고
//! [`LogType`](crate::registry::LogType)으로 레지스트리에 등록합니다.
//!
//! 파서 인스턴스는 변경 가능한 작업 상태(버퍼, 빌린 스캐너)를 가질 수 있으므로
//! 동시 호출자끼리 공유하지 않습니다. 작업자마다 팩토리로 새 인스턴스를 만듭니다.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::ParseError;
use crate::event::Event;
use crate::metrics as m;

/// 로그 파서 trait
pub trait LogParser: Send {
    /// 이 인스턴스가 처리하는 등록된 로그 타입 이름
    fn log_type(&self) -> &str;

    /// 원문 한 줄을 파싱합니다.
    ///
    /// 성공 시 하나 이상의 이벤트를 반환합니다. 실패 시 이벤트는 만들어지지 않습니다.
    fn parse(&mut self, line: &str) -> Result<Vec<Event>, ParseError>;

    /// 같은 설정을 가진 독립적인 새 인스턴스를 생성합니다.
    fn new_parser(&self) -> Box<dyn LogParser>;
}

/// 파서 팩토리: 인자 없이 새 파서를 생성
pub type ParserFactory = Arc<dyn Fn() -> Box<dyn LogParser> + Send + Sync>;

/// 한 줄을 파싱하고 메트릭과 트레이싱을 기록합니다.
///
/// 수집 측이 사용하는 단일 진입점입니다. 결과는 `parse`의 결과 그대로입니다.
pub fn parse_line(parser: &mut dyn LogParser, line: &str) -> Result<Vec<Event>, ParseError> {
    let start = Instant::now();
    let result = parser.parse(line);
    let elapsed = start.elapsed().as_secs_f64();

    let log_type = parser.log_type().to_owned();
    metrics::histogram!(m::PARSER_DURATION_SECONDS, m::LABEL_LOG_TYPE => log_type.clone())
        .record(elapsed);
    metrics::counter!(m::PARSER_LINES_TOTAL, m::LABEL_LOG_TYPE => log_type.clone()).increment(1);

    match &result {
        Ok(events) => {
            metrics::counter!(m::PARSER_EVENTS_TOTAL, m::LABEL_LOG_TYPE => log_type.clone())
                .increment(events.len() as u64);
            debug!(log_type = %log_type, events = events.len(), "line parsed");
        }
        Err(e) => {
            metrics::counter!(
                m::PARSER_ERRORS_TOTAL,
                m::LABEL_LOG_TYPE => log_type.clone(),
                m::LABEL_REASON => e.kind()
            )
            .increment(1);
            debug!(log_type = %log_type, reason = e.kind(), error = %e, "line rejected");
        }
    }

    result
}
