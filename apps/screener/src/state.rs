use std::sync::Arc;

use crate::config::Config;
use crate::documents::TextExtractor;
use crate::embedding::EmbeddingService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub embeddings: EmbeddingService,
    /// Pluggable text extractor. Default: DocumentExtractor (pdf-extract + docx-rs).
    pub extractor: Arc<dyn TextExtractor>,
}
