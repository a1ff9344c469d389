#![no_main]

use std::sync::{Arc, LazyLock};

use libfuzzer_sys::fuzz_target;
use logweave_core::{ScannerPool, Value};

static POOL: LazyLock<Arc<ScannerPool>> = LazyLock::new(|| Arc::new(ScannerPool::new(4)));

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let sentinel = Value::domain_name("sentinel.invalid");
    let mut values = vec![sentinel.clone()];
    let mut scanner = POOL.acquire();
    match scanner.scan_values(&mut values, input) {
        Ok(()) => assert_eq!(values[0], sentinel),
        // 실패한 스캔은 값을 추가하지 않는다
        Err(_) => assert_eq!(values, vec![sentinel]),
    }
});
