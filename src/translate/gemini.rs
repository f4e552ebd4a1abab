//! Gemini-based translation using the Generative Language API.

use crate::error::{Result, TranslateError};
use crate::translate::{ContentGenerator, TranslationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public Generative Language API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini client. One request per call, no retries.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn build_body(request: &TranslationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.user_content.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Option<String> {
        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &TranslationRequest) -> Result<Option<String>> {
        debug!(
            "Requesting {} ({} chars of content)",
            request.model,
            request.user_content.len()
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .json(&Self::build_body(request))
            .send()
            .await
            // the URL carries the API key
            .map_err(|e| TranslateError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::Api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(TranslateError::Api(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        debug!(
            "Gemini API response: {}",
            body.chars().take(500).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(TranslateError::Api(format!(
                "Gemini error: {}",
                error.message
            )));
        }

        Ok(Self::extract_text(parsed))
    }

    fn name(&self) -> &'static str {
        "Google Gemini"
    }
}

// Request/Response types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageEntry;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key".to_string());
        assert_eq!(client.name(), "Google Gemini");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_endpoint() {
        let client =
            GeminiClient::new("test-key".to_string()).with_base_url("http://localhost:8080/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_build_body_shape() {
        let request = TranslationRequest::for_language(
            &LanguageEntry::new("de", "German"),
            "Hello",
            "gemini-2.5-flash",
        );
        let json = serde_json::to_value(GeminiClient::build_body(&request)).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("German"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hallo, "},{"text":"Welt"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            GeminiClient::extract_text(response),
            Some("Hallo, Welt".to_string())
        );
    }

    #[test]
    fn test_extract_text_missing() {
        let no_candidates: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiClient::extract_text(no_candidates), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(GeminiClient::extract_text(no_parts), None);
    }
}
