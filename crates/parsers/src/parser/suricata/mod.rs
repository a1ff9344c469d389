//! Suricata EVE JSON 파서
//!
//! EVE 출력은 이벤트 타입마다 한 줄에 하나의 JSON 객체를 기록합니다.
//! 이벤트 타입별 레코드는 `event_type` 값을 검증해 다른 타입의 줄을 거부합니다.

pub mod anomaly;
pub mod dns;

pub use anomaly::Anomaly;
pub use dns::Dns;

use logweave_core::Value;

/// 출발지/목적지 IP 지표
pub(crate) fn flow_ips(src_ip: Option<&str>, dest_ip: Option<&str>) -> [Option<Value>; 2] {
    [
        src_ip.map(Value::ip_address),
        dest_ip.map(Value::ip_address),
    ]
}
