//! AWS ARN 파싱
//!
//! `arn:partition:service:region:account-id:resource` 형식을 6개 구간으로
//! 나눕니다. resource 구간은 `:`을 포함할 수 있습니다.

use std::fmt;

/// ARN 접두어
pub const ARN_PREFIX: &str = "arn:";

/// 인스턴스 리소스 접두어
const INSTANCE_RESOURCE_PREFIX: &str = "instance/";

/// ARN 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArnError {
    /// `arn:` 접두어 없음
    #[error("not an ARN: missing 'arn:' prefix")]
    MissingPrefix,

    /// 구간 수 부족
    #[error("malformed ARN: expected 6 sections, found {found}")]
    NotEnoughSections { found: usize },
}

/// 파싱된 ARN (원문을 빌림)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arn<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub account_id: &'a str,
    pub resource: &'a str,
}

impl<'a> Arn<'a> {
    /// 문자열을 ARN으로 파싱합니다.
    pub fn parse(raw: &'a str) -> Result<Self, ArnError> {
        if !raw.starts_with(ARN_PREFIX) {
            return Err(ArnError::MissingPrefix);
        }
        let mut sections = raw.splitn(6, ':');
        // 접두어는 위에서 확인함
        sections.next();
        let mut next = |found: usize| sections.next().ok_or(ArnError::NotEnoughSections { found });
        Ok(Self {
            partition: next(1)?,
            service: next(2)?,
            region: next(3)?,
            account_id: next(4)?,
            resource: next(5)?,
        })
    }

    /// `instance/` 리소스의 마지막 `/` 뒤 구간이 `i-`로 시작하면 인스턴스 ID로 반환합니다.
    pub fn instance_id(&self) -> Option<&'a str> {
        if !self.resource.starts_with(INSTANCE_RESOURCE_PREFIX) {
            return None;
        }
        self.resource
            .rsplit('/')
            .next()
            .filter(|id| id.starts_with("i-"))
    }
}

impl fmt::Display for Arn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
