use std::sync::Arc;

use paperfind::{IngestPipeline, PipelineConfig};
use store::PaperStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Document store (shared with the pipeline)
    pub store: Arc<PaperStore>,

    /// Ingestion pipeline (shared across requests)
    pub pipeline: Arc<IngestPipeline>,
}

impl ServerState {
    /// Create new server state: wire the providers, the store, and the
    /// pipeline from configuration.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let providers = config.providers.build()?;
        let store = Arc::new(PaperStore::new());
        let pipeline = Arc::new(IngestPipeline::new(
            providers,
            store.clone(),
            PipelineConfig {
                max_extract_chars: config.max_extract_chars,
            },
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            pipeline,
        })
    }
}
