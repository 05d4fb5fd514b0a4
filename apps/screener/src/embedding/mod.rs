//! Embedding Service: the single point of entry for turning text into vectors.
//!
//! Built once at startup from `Config` and handed to the screening pipeline
//! through `AppState`. Nothing else talks to an embedding backend directly.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Embedding backend returned no vector")]
    EmptyEmbedding,
}

/// A backend that maps text to a dense vector. Must be deterministic for
/// identical input within a run.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Short label for logs and responses.
    fn name(&self) -> &str;
}

/// Cheap-to-clone handle over the configured embedding backend.
#[derive(Clone)]
pub struct EmbeddingService {
    backend: Arc<dyn Embedder>,
}

impl EmbeddingService {
    pub fn new(backend: Arc<dyn Embedder>) -> Self {
        Self { backend }
    }

    /// Picks the HTTP backend when `EMBEDDING_URL` is set, the hashing backend otherwise.
    pub fn from_config(config: &Config) -> Self {
        match &config.embedding_url {
            Some(url) => {
                info!(
                    "Embedding backend: http ({url}, model: {})",
                    config.embedding_model
                );
                Self::new(Arc::new(HttpEmbedder::new(
                    url.clone(),
                    config.embedding_model.clone(),
                    config.embedding_api_key.clone(),
                )))
            }
            None => {
                warn!("EMBEDDING_URL not set; using the offline hashing embedder");
                Self::new(Arc::new(HashingEmbedder::default()))
            }
        }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.backend.embed(text).await
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

/// Cosine similarity of two raw vectors, in [-1, 1].
///
/// A zero-norm vector is similar to nothing: the result is 0.0 rather than NaN.
/// Vectors of different length are compared over their common prefix.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3_f32, -1.2, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_is_negative_one() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let sim = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_service_without_url_uses_hashing_backend() {
        let config = Config::from_lookup(|_| None).unwrap();
        let service = EmbeddingService::from_config(&config);
        assert_eq!(service.backend_name(), "hashing");
        let v = service.embed("python developer").await.unwrap();
        assert!(!v.is_empty());
    }
}
