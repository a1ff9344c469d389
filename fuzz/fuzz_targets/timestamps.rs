#![no_main]

use libfuzzer_sys::fuzz_target;
use logweave_parsers::timestamp::{AnsicWithTz, Clf, Rfc3339, Suricata, TimeFormat, UnixFloat};

fn check<F: TimeFormat>(input: &str) {
    if let Ok(time) = F::parse(input) {
        // 파싱된 시각은 RFC 3339로 다시 표현할 수 있어야 한다
        let _ = time.to_rfc3339();
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    check::<Rfc3339>(input);
    check::<Suricata>(input);
    check::<UnixFloat>(input);
    check::<AnsicWithTz>(input);
    check::<Clf>(input);
});
