#![no_main]

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logweave_core::{Registry, parse_line};
use logweave_parsers::{LOG_TYPES, ParserConfig, register_all};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 로그 타입 선택 (LOG_TYPES 인덱스, 나머지 연산)
    log_type: u8,
    line: String,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let registry = Registry::new();
    if let Err(e) = register_all(&registry, &ParserConfig::default()) {
        panic!("registration failed: {e}");
    }
    registry
});

fuzz_target!(|input: FuzzInput| {
    let name = LOG_TYPES[usize::from(input.log_type) % LOG_TYPES.len()];
    let log_type = REGISTRY.must_get(name);
    let mut parser = log_type.new_parser();

    if let Ok(events) = parse_line(parser.as_mut(), &input.line) {
        for event in &events {
            assert_eq!(event.log_type(), name);
            if let Ok(json) = event.to_json_line() {
                assert!(json.starts_with('{'));
            }
        }
    }
});
