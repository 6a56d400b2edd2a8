//! 追踪与请求 ID 生成，以及报表生成指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub reports_generated: u64,
    pub reports_signed: u64,
    pub reports_downloaded: u64,
    pub generation_latency_ms_total: u64,
    pub generation_latency_ms_count: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    reports_generated: AtomicU64,
    reports_signed: AtomicU64,
    reports_downloaded: AtomicU64,
    generation_latency_ms_total: AtomicU64,
    generation_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            reports_generated: AtomicU64::new(0),
            reports_signed: AtomicU64::new(0),
            reports_downloaded: AtomicU64::new(0),
            generation_latency_ms_total: AtomicU64::new(0),
            generation_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reports_generated: self.reports_generated.load(Ordering::Relaxed),
            reports_signed: self.reports_signed.load(Ordering::Relaxed),
            reports_downloaded: self.reports_downloaded.load(Ordering::Relaxed),
            generation_latency_ms_total: self.generation_latency_ms_total.load(Ordering::Relaxed),
            generation_latency_ms_count: self.generation_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录报表生成次数。
pub fn record_report_generated() {
    metrics().reports_generated.fetch_add(1, Ordering::Relaxed);
}

/// 记录报表签名次数。
pub fn record_report_signed() {
    metrics().reports_signed.fetch_add(1, Ordering::Relaxed);
}

/// 记录报表下载次数。
pub fn record_report_downloaded() {
    metrics().reports_downloaded.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次报表生成耗时（毫秒，含取数+统计+落库）。
pub fn record_generation_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .generation_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .generation_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
