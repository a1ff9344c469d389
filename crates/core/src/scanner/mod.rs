//! 값 스캐너: 형식을 모르는 구조화 데이터에서 지표 값 추출
//!
//! [`JsonScanner`]는 JSON 문서를 토큰 단위로 순회하며(문서 트리를 만들지 않음)
//! 키 이름과 값 형태 휴리스틱으로 지표 값을 만듭니다. 디코딩 작업 상태는
//! [`ScannerPool`]에서 빌리고 반납하여 재사용합니다.
//!
//! # 규칙 (우선순위 순)
//!
//! 1. 문자열 값이 `arn:`으로 시작하면 ARN 규칙만 적용합니다.
//!    ARN, 계정 ID, `instance/i-...` 리소스면 인스턴스 ID를 만듭니다.
//! 2. 키 이름 규칙: `instanceId`/`*InstanceId`(값이 `i-`로 시작),
//!    `accountId`/`*AccountId`, `publicIp`/`privateIpAddress`/`ipAddressV4`,
//!    `publicDnsName`/`privateDnsName`/`domain`.
//! 3. 구조 키: `tags` (`{key, value}` 배열), `ipv6Addresses` (주소 배열).
//!    그 밖의 배열은 원소별로 순회합니다.
//! 4. 모든 객체는 키와 관계없이 재귀적으로 순회합니다.

mod arn;
mod json;
mod pool;

pub use arn::{Arn, ArnError};
pub use json::JsonScanner;
pub use pool::{PooledScanner, ScannerPool};
