//! services/api/src/adapters/metrics.rs
//!
//! Implements the `MetricsSource` port on top of `sysinfo`.

use std::sync::Mutex;

use async_trait::async_trait;
use blog_core::domain::SystemMetrics;
use blog_core::ports::{MetricsSource, PortError, PortResult};
use sysinfo::System;

/// Reads host CPU, memory and uptime figures.
///
/// CPU usage is a delta between two refreshes, so the first snapshot after
/// startup reports 0%.
pub struct SysinfoMetrics {
    system: Mutex<System>,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSource for SysinfoMetrics {
    async fn snapshot(&self) -> PortResult<SystemMetrics> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| PortError::Unexpected("metrics lock poisoned".to_string()))?;
        system.refresh_cpu_usage();
        system.refresh_memory();

        let total = system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            (system.used_memory() as f64 / total as f64 * 100.0) as f32
        };

        Ok(SystemMetrics {
            cpu_percent: system.global_cpu_usage(),
            memory_percent,
            uptime_seconds: System::uptime(),
            platform: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        })
    }
}
