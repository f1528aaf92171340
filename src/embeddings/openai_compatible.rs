// ABOUTME: OpenAI-compatible /embeddings client for Ollama, vLLM, and hosted endpoints
// ABOUTME: Configured from EMBEDDING_BASE_URL, EMBEDDING_MODEL, and EMBEDDING_API_KEY
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::EmbeddingProvider;
use crate::errors::{AppError, AppResult, ErrorCode};

const EMBEDDING_BASE_URL_ENV: &str = "EMBEDDING_BASE_URL";
const EMBEDDING_MODEL_ENV: &str = "EMBEDDING_MODEL";
const EMBEDDING_API_KEY_ENV: &str = "EMBEDDING_API_KEY";

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_MODEL: &str = "nomic-embed-text";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

const SERVICE: &str = "Embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Endpoint configuration for the embedding service
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL (the `/embeddings` path is appended)
    pub base_url: String,
    /// Embedding model
    pub model: String,
    /// Bearer token, if the endpoint needs one
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
        }
    }
}

impl EmbeddingConfig {
    /// Read `EMBEDDING_BASE_URL`, `EMBEDDING_MODEL`, and `EMBEDDING_API_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(EMBEDDING_BASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            model: env::var(EMBEDDING_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
            api_key: env::var(EMBEDDING_API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }
}

/// `OpenAI`-compatible embedding client
pub struct OpenAiCompatibleEmbeddings {
    client: Client,
    config: EmbeddingConfig,
}

impl OpenAiCompatibleEmbeddings {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: EmbeddingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> AppResult<Self> {
        let config = EmbeddingConfig::from_env();
        info!(
            "Initializing embedding client: base_url={}, model={}",
            config.base_url, config.model
        );
        Self::new(config)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleEmbeddings {
    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, text), fields(model = %self.config.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await.map_err(|e| {
            AppError::external_unavailable(SERVICE, format!("Cannot reach {url}: {e}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(200).collect();
            return Err(match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!("Embedding authentication failed: {detail}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    format!("Embedding rate limit reached: {detail}"),
                ),
                _ => AppError::external_service(SERVICE, format!("HTTP {status}: {detail}")),
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::external_service(SERVICE, "No embedding returned"))?;

        debug!(dimensions = embedding.len(), "Embedded query text");
        Ok(embedding)
    }
}
