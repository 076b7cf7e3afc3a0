use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Resource sampling for the analysis phases.
///
/// One monitor lives for the whole process. Each sample refreshes only this
/// process's entry, never the full process table.
pub struct PipelineMonitor {
    #[cfg(feature = "cli")]
    system: Option<(Mutex<System>, Pid)>,
    peak_memory: AtomicU64,
    samples: AtomicUsize,
    enabled: bool,
}

impl PipelineMonitor {
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "cli")]
        let system = if enabled {
            sysinfo::get_current_pid()
                .ok()
                .map(|pid| (Mutex::new(System::new()), pid))
        } else {
            None
        };

        Self {
            #[cfg(feature = "cli")]
            system,
            peak_memory: AtomicU64::new(0),
            samples: AtomicUsize::new(0),
            enabled,
        }
    }

    #[cfg(feature = "cli")]
    pub fn sample(&self, since: Instant) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }
        let (system, pid) = self.system.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[*pid]), true);
        self.samples.fetch_add(1, Ordering::Relaxed);

        let process = system.process(*pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let peak = self
            .peak_memory
            .fetch_max(memory_mb, Ordering::Relaxed)
            .max(memory_mb);

        Some(PhaseStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: peak,
            elapsed_time: since.elapsed(),
        })
    }

    #[cfg(not(feature = "cli"))]
    pub fn sample(&self, _since: Instant) -> Option<PhaseStats> {
        None
    }

    pub fn log_phase(&self, phase: &str, since: Instant) {
        match self.sample(since) {
            Some(stats) => tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            ),
            None => tracing::debug!("{} finished after {:?}", phase, since.elapsed()),
        }
    }

    /// Process refreshes performed so far.
    pub fn samples_taken(&self) -> usize {
        self.samples.load(Ordering::Relaxed)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for PipelineMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
