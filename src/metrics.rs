use std::{thread, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::errors::AppError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CpuUtilization {
    pub total: f64,
    pub per_cpu: Vec<f64>,
    pub timestamp: String,
}

#[async_trait]
pub trait CpuProvider: Send + Sync {
    async fn sample(&self) -> Result<CpuUtilization, AppError>;
}

#[derive(Debug, Clone)]
pub struct SysinfoCpuProvider {
    interval: Duration,
    offset: FixedOffset,
}

impl SysinfoCpuProvider {
    pub fn new(interval: Duration, offset: FixedOffset) -> Self {
        Self {
            interval: interval.max(MINIMUM_CPU_UPDATE_INTERVAL),
            offset,
        }
    }
}

#[async_trait]
impl CpuProvider for SysinfoCpuProvider {
    async fn sample(&self) -> Result<CpuUtilization, AppError> {
        let interval = self.interval;
        let offset = self.offset;

        let reading = tokio::task::spawn_blocking(move || sample_blocking(interval, offset))
            .await
            .map_err(|err| AppError::internal(format!("cpu sampling worker failed: {err}")))?;

        tracing::info!(
            total = reading.total,
            per_cpu = ?reading.per_cpu,
            timestamp = %reading.timestamp,
            "cpu utilization sampled"
        );
        Ok(reading)
    }
}

// Per-core usage over the first window, aggregate usage over the second.
fn sample_blocking(interval: Duration, offset: FixedOffset) -> CpuUtilization {
    let mut system = System::new();
    system.refresh_cpu_usage();

    thread::sleep(interval);
    system.refresh_cpu_usage();
    let per_cpu = system
        .cpus()
        .iter()
        .map(|cpu| normalize_percent(cpu.cpu_usage()))
        .collect();

    thread::sleep(interval);
    system.refresh_cpu_usage();
    let total = normalize_percent(system.global_cpu_usage());

    CpuUtilization {
        total,
        per_cpu,
        timestamp: format_timestamp(Utc::now(), offset),
    }
}

fn normalize_percent(raw: f32) -> f64 {
    let clamped = f64::from(raw).clamp(0.0, 100.0);
    (clamped * 10.0).round() / 10.0
}

pub fn format_timestamp(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}
