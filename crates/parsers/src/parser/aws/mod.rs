//! AWS 서비스 로그
//!
//! 두 형식 모두 페이로드 일부(`requestParameters`, `resource` 등)의 모양이
//! 서비스마다 달라 명시적 지표에 더해 줄 전체를 값 스캐너로 훑습니다.

pub mod cloudtrail;
pub mod guardduty;

pub use cloudtrail::CloudTrail;
pub use guardduty::GuardDuty;
