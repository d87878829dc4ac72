//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Gemini multimodal model.
//! It implements the `VisionExtractionService` port from the `core` crate.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use formscan_core::domain::MediaType;
use formscan_core::ports::{PortError, PortResult, VisionExtractionService};
use serde_json::Value;
use tracing::info;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `VisionExtractionService` port using the
/// Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiVisionAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiVisionAdapter {
    /// Creates a new `GeminiVisionAdapter`. The API key is checked at call
    /// time, not here.
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    /// Concatenates the text parts of the first candidate, if any.
    fn reply_text(body: &Value) -> Option<String> {
        let parts = body["candidates"][0]["content"]["parts"].as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

//=========================================================================================
// `VisionExtractionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl VisionExtractionService for GeminiVisionAdapter {
    /// Submits the prompt plus the inline document payload in a single,
    /// non-streaming `generateContent` call and returns the reply text.
    async fn extract(
        &self,
        prompt: &str,
        media_type: MediaType,
        payload: &[u8],
    ) -> PortResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PortError::MissingCredential("Gemini APIキーが設定されていません".to_string())
            })?;

        info!("Submitting {} payload to Gemini {}", media_type.mime(), self.model);

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "text": prompt },
                { "inlineData": { "mimeType": media_type.mime(), "data": STANDARD.encode(payload) } }
            ]}]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Upstream(
                response.text().await.unwrap_or_default(),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        Self::reply_text(&body)
            .ok_or_else(|| PortError::Upstream("Gemini returned no text content".to_string()))
    }
}
