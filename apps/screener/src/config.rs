use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
const DEFAULT_MAX_UPLOAD_MB: usize = 50;
const DEFAULT_MAX_UNPACKED_MB: u64 = 200;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: without `EMBEDDING_URL` the service falls
/// back to the offline hashing embedder.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub max_upload_bytes: usize,
    /// Total uncompressed size allowed for the resumes in one archive.
    pub max_unpacked_bytes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_upload_mb = get("MAX_UPLOAD_MB")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let max_unpacked_mb = get("MAX_UNPACKED_MB")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("MAX_UNPACKED_MB must be a whole number of megabytes")?
            .unwrap_or(DEFAULT_MAX_UNPACKED_MB);

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_url: get("EMBEDDING_URL"),
            embedding_api_key: get("EMBEDDING_API_KEY"),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            max_unpacked_bytes: max_unpacked_mb * 1024 * 1024,
        })
    }
}
