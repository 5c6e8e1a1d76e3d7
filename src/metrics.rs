//! Pluggable pipeline observability.
//!
//! A [`PipelineMetrics`] implementation is installed once at service startup
//! via [`set_pipeline_metrics`]; every stage of every ingestion and query
//! then reports its latency and outcome through it. Without a recorder the
//! hooks are no-ops.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

/// A stage of the ingestion or query pipeline, as reported to the metrics
/// recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Extract,
    Metadata,
    Embed,
    Upload,
    Append,
    Search,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Extract => "extract",
            PipelineStage::Metadata => "metadata",
            PipelineStage::Embed => "embed",
            PipelineStage::Upload => "upload",
            PipelineStage::Append => "append",
            PipelineStage::Search => "search",
        }
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_stage(&self, stage: PipelineStage, latency: Duration, ok: bool);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("pipeline metrics lock poisoned");
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

/// Report one stage outcome to the installed recorder, if any.
pub(crate) fn record(stage: PipelineStage, latency: Duration, ok: bool) {
    let recorder = {
        let guard = metrics_lock()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    };
    if let Some(recorder) = recorder {
        recorder.record_stage(stage, latency, ok);
    }
}
