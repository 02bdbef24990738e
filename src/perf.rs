// ==========================================
// 性能统计
// ==========================================
// 用途: 记录命名操作的耗时与嵌套深度（target = "perf"）
// ==========================================

use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// 当前线程上处于活动状态的 PerfGuard 数量
pub fn active_depth() -> u32 {
    PERF_DEPTH.with(|d| d.get())
}

/// 性能统计 Guard：Drop 时记录 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = stock_allocation::perf::PerfGuard::new("fefo_allocation");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            depth = self.depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_nesting_depth() {
        assert_eq!(active_depth(), 0);
        {
            let _outer = PerfGuard::new("outer");
            assert_eq!(active_depth(), 1);
            {
                let _inner = PerfGuard::new("inner");
                assert_eq!(active_depth(), 2);
            }
            assert_eq!(active_depth(), 1);
        }
        assert_eq!(active_depth(), 0);
    }
}
