use std::sync::Arc;

use storyreel_pipeline::PipelineService;

use crate::config::ServerConfig;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The pipeline service owning jobs, uploads, and stage runners.
    pub service: Arc<PipelineService>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
