//! 형식별 타임스탬프 디코딩
//!
//! [`Timestamp<F>`]는 레코드 필드 하나를 형식 `F`로 디코딩하고 항상 UTC로 보관합니다.
//! 직렬화는 형식과 무관하게 RFC 3339(UTC, `Z`)로 통일됩니다.
//!
//! 디코딩 실패 메시지는 항상 `invalid timestamp`로 시작하므로 JSON 파서가
//! 일반 디코딩 실패와 구분해 [`ParseError::Timestamp`](logweave_core::ParseError)로 보고합니다.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// 타임스탬프 디코딩 실패 메시지 접두어
pub(crate) const TIMESTAMP_ERROR_PREFIX: &str = "invalid timestamp";

/// 타임스탬프 디코딩 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?} ({format}): {reason}")]
pub struct TimestampError {
    /// 형식 이름
    pub format: &'static str,
    /// 원문
    pub input: String,
    /// 실패 사유
    pub reason: String,
}

impl TimestampError {
    fn new(format: &'static str, input: &str, reason: impl fmt::Display) -> Self {
        Self {
            format,
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// 타임스탬프 원문 형식
pub trait TimeFormat {
    /// 에러 메시지와 스키마 설명에 쓰이는 형식 이름
    const NAME: &'static str;

    /// JSON 숫자 입력 허용 여부
    const ACCEPTS_NUMBERS: bool = false;

    /// 원문을 UTC 시각으로 디코딩합니다.
    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError>;
}

/// RFC 3339 (`2019-09-23T17:26:49.915Z`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc3339;

impl TimeFormat for Rfc3339 {
    const NAME: &'static str = "rfc3339";

    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| TimestampError::new(Self::NAME, raw, e))
    }
}

/// Suricata EVE (`2015-10-22T06:31:06.520370+0000`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suricata;

impl TimeFormat for Suricata {
    const NAME: &'static str = "suricata";

    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        DateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%.f%z")
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| TimestampError::new(Self::NAME, raw, e))
    }
}

/// 유닉스 epoch 초 (JSON 숫자 또는 숫자 문자열, 소수부 허용)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnixFloat;

impl TimeFormat for UnixFloat {
    const NAME: &'static str = "unix";
    const ACCEPTS_NUMBERS: bool = true;

    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        let text = raw.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(TimestampError::new(Self::NAME, raw, "not a decimal number"));
        }

        let secs: i64 = int_part
            .parse()
            .map_err(|e| TimestampError::new(Self::NAME, raw, e))?;

        // 소수부는 나노초 정밀도까지만 사용
        let mut nanos: i64 = 0;
        for (i, b) in frac_part.bytes().take(9).enumerate() {
            nanos += i64::from(b - b'0') * 10_i64.pow(8 - i as u32);
        }

        let offset = TimeDelta::try_seconds(secs)
            .map(|d| d + TimeDelta::nanoseconds(nanos))
            .map(|d| if negative { -d } else { d });
        offset
            .and_then(|d| DateTime::UNIX_EPOCH.checked_add_signed(d))
            .ok_or_else(|| TimestampError::new(Self::NAME, raw, "out of range"))
    }
}

/// ANSIC + 시간대 (`Tue Nov  5 06:08:26 2018 UTC`)
///
/// 시간대는 `UTC`/`GMT`/`Z` 또는 숫자 오프셋(`+0900`)이며 생략 시 UTC입니다.
/// 요일 이름은 날짜와 맞지 않아도 무시합니다 (osquery가 그런 값을 기록함).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnsicWithTz;

impl TimeFormat for AnsicWithTz {
    const NAME: &'static str = "ansic";

    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        const LAYOUT: &str = "%b %d %H:%M:%S %Y";

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let (body, zone) = match tokens.len() {
            5 => (tokens[1..].join(" "), None),
            6 => (tokens[1..5].join(" "), Some(tokens[5])),
            n => {
                return Err(TimestampError::new(
                    Self::NAME,
                    raw,
                    format!("expected 5 or 6 fields, found {n}"),
                ));
            }
        };

        let naive = NaiveDateTime::parse_from_str(&body, LAYOUT)
            .map_err(|e| TimestampError::new(Self::NAME, raw, e))?;

        match zone {
            None | Some("UTC" | "GMT" | "Z") => Ok(naive.and_utc()),
            Some(zone) => {
                let offset = parse_offset(zone)
                    .ok_or_else(|| TimestampError::new(Self::NAME, raw, "unknown time zone"))?;
                naive
                    .and_local_timezone(offset)
                    .single()
                    .map(|t| t.with_timezone(&Utc))
                    .ok_or_else(|| TimestampError::new(Self::NAME, raw, "ambiguous local time"))
            }
        }
    }
}

/// Apache common log format (`10/Oct/2000:13:55:36 -0700`)
///
/// 대괄호는 있어도 되며, 시간대가 없으면 UTC로 간주합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clf;

impl TimeFormat for Clf {
    const NAME: &'static str = "clf";

    fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
        const LAYOUT: &str = "%d/%b/%Y:%H:%M:%S";

        let text = raw.trim();
        let text = text
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(text)
            .trim();

        match text.split_once(char::is_whitespace) {
            Some(_) => DateTime::parse_from_str(text, &format!("{LAYOUT} %z"))
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| TimestampError::new(Self::NAME, raw, e)),
            None => NaiveDateTime::parse_from_str(text, LAYOUT)
                .map(|t| t.and_utc())
                .map_err(|e| TimestampError::new(Self::NAME, raw, e)),
        }
    }
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// 형식 `F`로 디코딩된 UTC 타임스탬프
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp<F> {
    time: DateTime<Utc>,
    format: PhantomData<F>,
}

impl<F: TimeFormat> Timestamp<F> {
    /// 이미 디코딩된 시각으로 생성합니다.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            format: PhantomData,
        }
    }

    /// 원문을 형식 `F`로 디코딩합니다.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        F::parse(raw).map(Self::new)
    }

    /// UTC 시각
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

// 스키마 기본값 (레코드 샘플 직렬화용)
impl<F: TimeFormat> Default for Timestamp<F> {
    fn default() -> Self {
        Self::new(DateTime::UNIX_EPOCH)
    }
}

impl<F> From<Timestamp<F>> for DateTime<Utc> {
    fn from(ts: Timestamp<F>) -> Self {
        ts.time
    }
}

impl<F> fmt::Display for Timestamp<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl<F> Serialize for Timestamp<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, F: TimeFormat> Deserialize<'de> for Timestamp<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor(PhantomData))
    }
}

struct TimestampVisitor<F>(PhantomData<F>);

impl<F: TimeFormat> TimestampVisitor<F> {
    fn number<E: de::Error>(&self, text: String) -> Result<Timestamp<F>, E> {
        if !F::ACCEPTS_NUMBERS {
            return Err(E::custom(TimestampError::new(
                F::NAME,
                &text,
                "expected a string",
            )));
        }
        Timestamp::parse(&text).map_err(E::custom)
    }
}

impl<F: TimeFormat> Visitor<'_> for TimestampVisitor<F> {
    type Value = Timestamp<F>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} timestamp", F::NAME)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Timestamp::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.number(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.number(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(TimestampError::new(
                F::NAME,
                &v.to_string(),
                "not a finite number",
            )));
        }
        self.number(v.to_string())
    }
}

/// serde_json 에러가 타임스탬프 디코딩 실패인지 판별합니다.
pub(crate) fn is_timestamp_error(err: &serde_json::Error) -> bool {
    err.is_data() && err.to_string().starts_with(TIMESTAMP_ERROR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn rfc3339_normalizes_to_utc() {
        let ts = Timestamp::<Rfc3339>::parse("2024-03-01T08:00:00+09:00").unwrap();
        assert_eq!(ts.time(), utc(2024, 2, 29, 23, 0, 0));
        assert_eq!(ts.to_string(), "2024-02-29T23:00:00Z");
    }

    #[test]
    fn suricata_offset_without_colon() {
        let ts = Timestamp::<Suricata>::parse("2015-10-22T06:31:06.520370+0000").unwrap();
        assert_eq!(ts.time().timestamp(), utc(2015, 10, 22, 6, 31, 6).timestamp());
        assert_eq!(ts.time().timestamp_subsec_micros(), 520_370);
    }

    #[test]
    fn unix_float_keeps_fraction() {
        let ts = Timestamp::<UnixFloat>::parse("1425568107.964797").unwrap();
        assert_eq!(ts.time().timestamp(), 1_425_568_107);
        assert_eq!(ts.time().timestamp_subsec_micros(), 964_797);
    }

    #[test]
    fn unix_float_from_json_number_and_string() {
        let a: Timestamp<UnixFloat> = serde_json::from_str("1541398106").unwrap();
        let b: Timestamp<UnixFloat> = serde_json::from_str("\"1541398106\"").unwrap();
        let c: Timestamp<UnixFloat> = serde_json::from_str("1541398106.5").unwrap();
        assert_eq!(a, b);
        assert_eq!(c.time().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn unix_float_rejects_garbage() {
        assert!(Timestamp::<UnixFloat>::parse("12ab").is_err());
        assert!(Timestamp::<UnixFloat>::parse("").is_err());
        assert!(Timestamp::<UnixFloat>::parse(".5").is_err());
    }

    #[test]
    fn ansic_with_utc_zone() {
        let ts = Timestamp::<AnsicWithTz>::parse("Tue Nov 5 06:08:26 2018 UTC").unwrap();
        assert_eq!(ts.time().timestamp(), 1_541_398_106);
    }

    #[test]
    fn ansic_with_padded_day_and_offset() {
        let ts = Timestamp::<AnsicWithTz>::parse("Tue Nov  5 15:08:26 2018 +0900").unwrap();
        assert_eq!(ts.time().timestamp(), 1_541_398_106);
    }

    #[test]
    fn ansic_rejects_named_zone() {
        let err = Timestamp::<AnsicWithTz>::parse("Tue Nov 5 06:08:26 2018 PST").unwrap_err();
        assert_eq!(err.format, "ansic");
    }

    #[test]
    fn clf_with_and_without_zone() {
        let zoned = Timestamp::<Clf>::parse("[10/Oct/2000:13:55:36 -0700]").unwrap();
        assert_eq!(zoned.time(), utc(2000, 10, 10, 20, 55, 36));

        let bare = Timestamp::<Clf>::parse("10/Oct/2020:13:55:36").unwrap();
        assert_eq!(bare.to_string(), "2020-10-10T13:55:36Z");
    }

    #[test]
    fn string_formats_reject_numbers() {
        let err = serde_json::from_str::<Timestamp<Rfc3339>>("1541398106").unwrap_err();
        assert!(is_timestamp_error(&err));
    }

    #[test]
    fn decode_failure_is_recognized() {
        let err = serde_json::from_str::<Timestamp<Rfc3339>>("\"yesterday\"").unwrap_err();
        assert!(is_timestamp_error(&err));

        let other = serde_json::from_str::<Timestamp<Rfc3339>>("[1]").unwrap_err();
        assert!(!is_timestamp_error(&other));
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::<Suricata>::parse("2015-10-22T06:31:06.520370+0000").unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2015-10-22T06:31:06.520370Z\""
        );
    }

    #[test]
    fn default_is_epoch() {
        assert_eq!(Timestamp::<Rfc3339>::default().to_string(), "1970-01-01T00:00:00Z");
    }
}
