#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

/// Tracks the process's resident memory across a run so streaming transfers
/// can be checked against the amount of data moved.
#[cfg(feature = "cli")]
pub struct MemoryMonitor {
    system: System,
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory_mb: u64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl MemoryMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new();
        let pid = if enabled {
            sysinfo::get_current_pid().ok()
        } else {
            None
        };
        if enabled {
            system.refresh_all();
        }

        Self {
            system,
            pid,
            start_time: Instant::now(),
            peak_memory_mb: 0,
            enabled,
        }
    }

    /// Samples the current resident set and logs it under `phase`.
    pub fn sample(&mut self, phase: &str) {
        if !self.enabled {
            return;
        }
        let Some(pid) = self.pid else {
            return;
        };

        self.system.refresh_all();
        let Some(process) = self.system.process(pid) else {
            return;
        };

        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);

        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
            phase,
            process.cpu_usage(),
            memory_mb,
            self.peak_memory_mb,
            self.start_time.elapsed()
        );
    }

    pub fn report(&mut self, bytes_transferred: u64) {
        if !self.enabled {
            return;
        }
        self.sample("Finished");

        let elapsed = self.start_time.elapsed();
        tracing::info!(
            "📊 Moved {}MB in {:?} ({}), peak memory {}MB",
            bytes_transferred / 1024 / 1024,
            elapsed,
            format_throughput(bytes_transferred, elapsed),
            self.peak_memory_mb
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
fn format_throughput(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return "n/a".to_string();
    }
    format!("{:.2} MB/s", bytes as f64 / 1_048_576.0 / secs)
}

#[cfg(not(feature = "cli"))]
pub struct MemoryMonitor;

#[cfg(not(feature = "cli"))]
impl MemoryMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn sample(&mut self, _phase: &str) {}

    pub fn report(&mut self, _bytes_transferred: u64) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
