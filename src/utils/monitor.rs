#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};
use std::time::Duration;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// 在呼叫期間取樣行程的常駐記憶體 (RSS)，回傳峰值位元組數
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct MemorySampler {
    pid: Option<Pid>,
    interval: Duration,
}

#[cfg(feature = "cli")]
impl MemorySampler {
    pub fn new(interval: Duration) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("⚠️ Memory sampling disabled, cannot resolve current PID: {}", e);
                None
            }
        };
        Self { pid, interval }
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    fn read_rss(system: &mut System, pid: Pid) -> u64 {
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map(|p| p.memory()).unwrap_or(0)
    }

    pub fn sample_during<T>(&self, f: impl FnOnce() -> T) -> (T, u64) {
        let Some(pid) = self.pid else {
            return (f(), 0);
        };

        let done = AtomicBool::new(false);
        let peak = AtomicU64::new(0);
        let interval = self.interval;

        let result = std::thread::scope(|scope| {
            scope.spawn(|| {
                let mut system = System::new();
                loop {
                    let rss = Self::read_rss(&mut system, pid);
                    peak.fetch_max(rss, Ordering::Relaxed);
                    if done.load(Ordering::Acquire) {
                        break;
                    }
                    std::thread::sleep(interval);
                }
            });

            let result = f();
            done.store(true, Ordering::Release);
            result
        });

        (result, peak.load(Ordering::Relaxed))
    }
}

#[cfg(feature = "cli")]
impl Default for MemorySampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

// 非 CLI 環境沒有 sysinfo，記憶體一律回報 0
#[cfg(not(feature = "cli"))]
#[derive(Debug, Clone, Default)]
pub struct MemorySampler;

#[cfg(not(feature = "cli"))]
impl MemorySampler {
    pub fn new(_interval: Duration) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn sample_during<T>(&self, f: impl FnOnce() -> T) -> (T, u64) {
        (f(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_during_returns_closure_result() {
        let sampler = MemorySampler::default();
        let (value, _peak) = sampler.sample_during(|| 41 + 1);
        assert_eq!(value, 42);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_peak_is_observed_for_live_process() {
        let sampler = MemorySampler::new(Duration::from_millis(5));
        let (_, peak) = sampler.sample_during(|| std::thread::sleep(Duration::from_millis(30)));
        if sampler.is_enabled() {
            assert!(peak > 0);
        }
    }
}
