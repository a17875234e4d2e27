//! Default process-level metrics.
//!
//! Gauges for memory, CPU, threads and file descriptors, read from procfs
//! on Linux. On other platforms only start time and uptime are meaningful;
//! the procfs-backed gauges stay at zero.

use prometheus::{
    register_gauge_with_registry, register_int_gauge_with_registry, Gauge, IntGauge, Registry,
};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// Kernel USER_HZ, fixed at 100 on Linux.
#[cfg(target_os = "linux")]
const TICKS_PER_SECOND: f64 = 100.0;

/// Process-level gauge set, registered once and refreshed by the
/// collector task.
#[derive(Clone)]
pub struct ProcessMetrics {
    start_time_seconds: Gauge,
    uptime_seconds: Gauge,
    cpu_seconds_total: Gauge,
    resident_memory_bytes: IntGauge,
    virtual_memory_bytes: IntGauge,
    threads: IntGauge,
    open_fds: IntGauge,
    started_at: Instant,
}

impl ProcessMetrics {
    /// Registers the default gauge set in the given registry.
    pub fn new(registry: &Registry) -> Self {
        let start_time_seconds = register_gauge_with_registry!(
            "process_start_time_seconds",
            "Start time of the process since unix epoch in seconds",
            registry.clone()
        )
        .expect("Failed to register process_start_time_seconds");

        let uptime_seconds = register_gauge_with_registry!(
            "process_uptime_seconds",
            "Process uptime in seconds",
            registry.clone()
        )
        .expect("Failed to register process_uptime_seconds");

        let cpu_seconds_total = register_gauge_with_registry!(
            "process_cpu_seconds_total",
            "Total user and system CPU time spent in seconds",
            registry.clone()
        )
        .expect("Failed to register process_cpu_seconds_total");

        let resident_memory_bytes = register_int_gauge_with_registry!(
            "process_resident_memory_bytes",
            "Resident memory size in bytes",
            registry.clone()
        )
        .expect("Failed to register process_resident_memory_bytes");

        let virtual_memory_bytes = register_int_gauge_with_registry!(
            "process_virtual_memory_bytes",
            "Virtual memory size in bytes",
            registry.clone()
        )
        .expect("Failed to register process_virtual_memory_bytes");

        let threads = register_int_gauge_with_registry!(
            "process_threads",
            "Number of OS threads in the process",
            registry.clone()
        )
        .expect("Failed to register process_threads");

        let open_fds = register_int_gauge_with_registry!(
            "process_open_fds",
            "Number of open file descriptors",
            registry.clone()
        )
        .expect("Failed to register process_open_fds");

        if let Ok(since_epoch) = SystemTime::now().duration_since(UNIX_EPOCH) {
            start_time_seconds.set(since_epoch.as_secs_f64());
        }

        ProcessMetrics {
            start_time_seconds,
            uptime_seconds,
            cpu_seconds_total,
            resident_memory_bytes,
            virtual_memory_bytes,
            threads,
            open_fds,
            started_at: Instant::now(),
        }
    }

    /// Takes one sample of all process gauges.
    pub fn collect(&self) {
        self.uptime_seconds.set(self.started_at.elapsed().as_secs_f64());
        self.collect_platform();
    }

    #[cfg(target_os = "linux")]
    fn collect_platform(&self) {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if let Some(rest) = line.strip_prefix("VmRSS:") {
                    if let Some(kb) = parse_kb_field(rest) {
                        self.resident_memory_bytes.set(kb * 1024);
                    }
                } else if let Some(rest) = line.strip_prefix("VmSize:") {
                    if let Some(kb) = parse_kb_field(rest) {
                        self.virtual_memory_bytes.set(kb * 1024);
                    }
                } else if let Some(rest) = line.strip_prefix("Threads:") {
                    if let Ok(n) = rest.trim().parse::<i64>() {
                        self.threads.set(n);
                    }
                }
            }
        }

        if let Ok(stat) = std::fs::read_to_string("/proc/self/stat") {
            if let Some(cpu) = cpu_seconds_from_stat(&stat) {
                self.cpu_seconds_total.set(cpu);
            }
        }

        if let Ok(entries) = std::fs::read_dir("/proc/self/fd") {
            self.open_fds.set(entries.count() as i64);
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn collect_platform(&self) {}
}

#[cfg(target_os = "linux")]
fn parse_kb_field(rest: &str) -> Option<i64> {
    rest.split_whitespace().next()?.parse().ok()
}

/// Sums utime and stime from /proc/self/stat. The comm field (2) may
/// contain spaces, so fields are counted from the closing paren.
#[cfg(target_os = "linux")]
fn cpu_seconds_from_stat(stat: &str) -> Option<f64> {
    let after_comm = stat.rsplit_once(')')?.1;
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    // after_comm starts at field 3 (state); utime and stime are fields 14 and 15
    let utime: f64 = fields.get(11)?.parse().ok()?;
    let stime: f64 = fields.get(12)?.parse().ok()?;
    Some((utime + stime) / TICKS_PER_SECOND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_time_is_set_at_construction() {
        let registry = Registry::new();
        let process = ProcessMetrics::new(&registry);
        assert!(process.start_time_seconds.get() > 0.0);
    }

    #[test]
    fn collect_updates_uptime() {
        let registry = Registry::new();
        let process = ProcessMetrics::new(&registry);
        process.collect();
        assert!(process.uptime_seconds.get() >= 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn collect_reads_procfs_gauges() {
        let registry = Registry::new();
        let process = ProcessMetrics::new(&registry);
        process.collect();
        assert!(process.resident_memory_bytes.get() > 0);
        assert!(process.virtual_memory_bytes.get() >= process.resident_memory_bytes.get());
        assert!(process.threads.get() >= 1);
        assert!(process.open_fds.get() >= 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn cpu_field_parsing_skips_comm_with_spaces() {
        let stat = "42 (a cmd) R 1 42 42 0 -1 4194304 100 0 0 0 250 50 0 0 20 0 4 0 1000 1000000 200";
        let cpu = cpu_seconds_from_stat(stat).expect("stat line should parse");
        assert!((cpu - 3.0).abs() < f64::EPSILON);
    }
}
