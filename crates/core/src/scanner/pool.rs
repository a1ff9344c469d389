//! 스캐너 풀: 값 스캐너 작업 상태의 명시적 대여/반납
//!
//! [`ScannerPool::acquire`]로 빌린 [`PooledScanner`]는 drop 시 자동으로
//! 반납됩니다. 반납된 스캐너는 항상 `reset` 후 보관되므로 다음 사용자는
//! 이전 입력의 값을 볼 수 없습니다. 보관 용량을 넘는 스캐너는 닫힙니다.

use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::metrics as m;
use crate::scanner::JsonScanner;

/// 스캐너 풀
#[derive(Debug)]
pub struct ScannerPool {
    idle: Mutex<Vec<JsonScanner>>,
    capacity: usize,
}

impl ScannerPool {
    /// 최대 `capacity`개의 대기 스캐너를 보관하는 풀을 생성합니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// 스캐너를 빌립니다. 대기 중인 스캐너가 없으면 새로 만듭니다.
    pub fn acquire(self: &Arc<Self>) -> PooledScanner {
        let scanner = self.lock().pop().unwrap_or_default();
        PooledScanner {
            scanner,
            pool: Arc::clone(self),
        }
    }

    /// 스캐너를 반납합니다.
    ///
    /// 스캐너는 초기화된 뒤 보관되며, 풀이 가득 차면 닫힙니다.
    pub fn release(&self, mut scanner: JsonScanner) {
        scanner.reset();
        let mut idle = self.lock();
        if idle.len() < self.capacity {
            idle.push(scanner);
            metrics::gauge!(m::SCANNER_POOL_IDLE).set(idle.len() as f64);
        } else {
            drop(idle);
            warn!(capacity = self.capacity, "scanner pool full, closing scanner");
            scanner.close();
        }
    }

    /// 대기 중인 스캐너 수
    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }

    /// 최대 보관 수
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JsonScanner>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ScannerPool {
    fn default() -> Self {
        Self::new(64)
    }
}

/// 풀에서 빌린 스캐너
///
/// drop 시 풀로 반납됩니다.
#[derive(Debug)]
pub struct PooledScanner {
    scanner: JsonScanner,
    pool: Arc<ScannerPool>,
}

impl PooledScanner {
    /// 명시적으로 반납합니다.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PooledScanner {
    type Target = JsonScanner;

    fn deref(&self) -> &JsonScanner {
        &self.scanner
    }
}

impl DerefMut for PooledScanner {
    fn deref_mut(&mut self) -> &mut JsonScanner {
        &mut self.scanner
    }
}

impl Drop for PooledScanner {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.scanner));
    }
}
