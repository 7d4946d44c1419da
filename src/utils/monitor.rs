use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct ResourceStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
}

/// Wall time of one pipeline phase, with process resources when available.
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: String,
    pub elapsed: Duration,
    pub resources: Option<ResourceStats>,
}

/// Times pipeline phases and, in CLI builds, samples this process's CPU and memory.
pub struct PhaseMonitor {
    enabled: bool,
    started: Instant,
    phases: Vec<PhaseReport>,
    #[cfg(feature = "cli")]
    probe: Option<ProcessProbe>,
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: Mutex<System>,
    pid: Pid,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        Some(Self {
            system: Mutex::new(system),
            pid,
            peak_memory_mb: Mutex::new(0),
        })
    }

    fn sample(&self) -> Option<ResourceStats> {
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let process = system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(ResourceStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
        })
    }
}

impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: Instant::now(),
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            probe: if enabled { ProcessProbe::new() } else { None },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "cli")]
    fn resources(&self) -> Option<ResourceStats> {
        self.probe.as_ref().and_then(ProcessProbe::sample)
    }

    #[cfg(not(feature = "cli"))]
    fn resources(&self) -> Option<ResourceStats> {
        None
    }

    /// Records a finished phase that began at `since`. No-op when disabled.
    pub fn record(&mut self, phase: &str, since: Instant) {
        if !self.enabled {
            return;
        }
        let report = PhaseReport {
            phase: phase.to_string(),
            elapsed: since.elapsed(),
            resources: self.resources(),
        };
        match &report.resources {
            Some(r) => tracing::info!(
                "📊 {} - {:?}, CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                report.phase,
                report.elapsed,
                r.cpu_usage,
                r.memory_mb,
                r.peak_memory_mb
            ),
            None => tracing::info!("📊 {} - {:?}", report.phase, report.elapsed),
        }
        self.phases.push(report);
    }

    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    pub fn log_summary(&self) {
        if !self.enabled {
            return;
        }
        let peak = self
            .phases
            .iter()
            .filter_map(|p| p.resources.as_ref().map(|r| r.peak_memory_mb))
            .max();
        match peak {
            Some(peak) => tracing::info!(
                "📊 Total: {:?} over {} phases, peak memory {}MB",
                self.started.elapsed(),
                self.phases.len(),
                peak
            ),
            None => tracing::info!(
                "📊 Total: {:?} over {} phases",
                self.started.elapsed(),
                self.phases.len()
            ),
        }
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let mut monitor = PhaseMonitor::default();
        monitor.record("extract", Instant::now());
        assert!(!monitor.is_enabled());
        assert!(monitor.phases().is_empty());
    }

    #[test]
    fn test_enabled_monitor_keeps_phase_order() {
        let mut monitor = PhaseMonitor::new(true);
        let start = Instant::now();
        monitor.record("extract", start);
        monitor.record("transform", start);
        let names: Vec<&str> = monitor.phases().iter().map(|p| p.phase.as_str()).collect();
        assert_eq!(names, vec!["extract", "transform"]);
        assert!(monitor.phases()[1].elapsed >= monitor.phases()[0].elapsed);
    }
}
