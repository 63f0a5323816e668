//! Gemini `generateContent` client (API key-based).
//!
//! One `reqwest::Client` per instance, built once with a conservative timeout
//! and reused for every call. The client is stateless per call and safe to
//! share across concurrently running tasks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::{GeminiError, Result};
use super::GenerativeBackend;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One outbound generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Natural-language instruction, including the desired JSON shape when
    /// no strict schema is attached.
    pub prompt: String,
    /// Strict output schema; when set, the response MIME type is forced to
    /// `application/json`.
    pub response_schema: Option<Value>,
    /// Inline image payload for vision prompts.
    pub inline_image: Option<InlineImage>,
    /// Enable Google Search grounding. Mutually exclusive with a strict
    /// schema on the Gemini side, so grounded calls get free-text JSON.
    pub search_grounding: bool,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.inline_image = Some(image);
        self
    }

    pub fn with_search_grounding(mut self) -> Self {
        self.search_grounding = true;
        self
    }
}

/// Base64 image data attached to a vision prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// JPEG payload from already-encoded base64 data. A data-URL prefix
    /// (`data:image/jpeg;base64,`) is stripped if present.
    pub fn jpeg_base64(data: &str) -> Self {
        let data = match data.split_once("base64,") {
            Some((_, body)) => body,
            None => data,
        };
        Self {
            mime_type: "image/jpeg".to_string(),
            data: data.to_string(),
        }
    }

    /// JPEG payload from raw bytes.
    pub fn jpeg_bytes(bytes: &[u8]) -> Self {
        use base64::Engine as _;
        Self {
            mime_type: "image/jpeg".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// A grounding citation returned alongside a grounded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

/// Text payload plus any grounding citations.
#[derive(Debug, Clone, Default)]
pub struct GenerateReply {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Gemini client over the Generative Language REST API.
#[derive(Debug)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(GeminiError::NotConfigured("missing API key".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Override the endpoint base URL. Test hook for mock servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body(&self, request: &GenerateRequest) -> Value {
        let mut parts = Vec::new();
        if let Some(image) = &request.inline_image {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }
        parts.push(json!({ "text": request.prompt }));

        let mut body = json!({ "contents": [{ "parts": parts }] });

        if let Some(schema) = &request.response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        if request.search_grounding {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }

        body
    }

    fn parse_reply(json: &Value) -> Result<GenerateReply> {
        let candidate = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| GeminiError::InvalidResponse("missing candidates".to_string()))?;

        // Grounded replies sometimes carry citations with no text parts;
        // the body then defaults to an empty JSON object so downstream
        // normalization yields defaults and the citations survive.
        let text = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "{}".to_string());

        let citations = candidate["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| {
                        let title = chunk["web"]["title"].as_str()?;
                        let url = chunk["web"]["uri"].as_str()?;
                        Some(Citation {
                            title: title.to_string(),
                            url: url.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerateReply { text, citations })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_body(&request);

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: Value = resp.json().await?;
        Self::parse_reply(&json)
    }
}
