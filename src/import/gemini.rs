//! Minimal client for the Generative Language `generateContent` endpoint.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{ImportError, ImportResult};
use crate::config::ImportConfig;

/// Instructions sent alongside the photo.
pub const PROMPT: &str = r#"Analyze this floor plan image and extract its structure into a JSON object of this shape:

{
  "corners": { "<id>": { "id": string, "x": number, "y": number, "wallIds": string[] } },
  "walls": { "<id>": { "id": string, "startCornerId": string, "endCornerId": string, "thickness": number, "height": number, "type": "interior" | "exterior" } },
  "openings": { "<id>": { "id": string, "wallId": string, "type": "door" | "window", "distanceFromStart": number, "width": number, "height": number } },
  "rooms": { "<id>": { "id": string, "name": string, "type": string, "labelPosition": { "x": number, "y": number } } }
}

Return ONLY the JSON object. Do not include markdown formatting.
Ensure all IDs are unique strings.
Coordinates (x, y) are pixels relative to the image top-left.
Dimensions:
- thickness: in centimeters (e.g. 20 for 20cm). Default to 20 if unknown.
- width/height (openings): in centimeters.
- distanceFromStart: in pixels, along the wall from its start corner."#;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, config: &ImportConfig) -> ImportResult<Self> {
        let http = build_http(config)?;
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` and the image, returning the model's text reply.
    pub async fn generate(&self, prompt: &str, mime_type: &str, image: &[u8]) -> ImportResult<String> {
        let body = GenerateRequest::new(prompt, mime_type, image);
        log::debug!("Sending {} byte image to {}", image.len(), self.model);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ImportError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            log::warn!("generateContent failed with {status}: {text}");
            return Err(ImportError::Response {
                status,
                body: error_summary(&text),
            });
        }
        reply_text(&text)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(config: &ImportConfig) -> ImportResult<reqwest::Client> {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| ImportError::HttpClientBuild(e.to_string()))
}

// The browser owns timeouts for fetch.
#[cfg(target_arch = "wasm32")]
fn build_http(_config: &ImportConfig) -> ImportResult<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| ImportError::HttpClientBuild(e.to_string()))
}

/// Concatenated text parts of the first candidate.
pub(crate) fn reply_text(body: &str) -> ImportResult<String> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        log::error!("Unexpected generateContent response: {body}");
        ImportError::Request(format!("malformed response: {e}"))
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ImportError::EmptyReply);
    }
    Ok(text)
}

/// Longest error detail shown to the user.
const MAX_ERROR_DETAIL: usize = 200;

/// Short description of a failed call: the service's own `error.message`
/// when present, otherwise the first line of the body, cut to length.
pub(crate) fn error_summary(body: &str) -> String {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error.message)
        .unwrap_or_else(|| body.lines().next().unwrap_or_default().to_owned());
    let detail = detail.trim();

    match detail.char_indices().nth(MAX_ERROR_DETAIL) {
        Some((cut, _)) => format!("{}…", &detail[..cut]),
        None => detail.to_owned(),
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, mime_type: &'a str, image: &[u8]) -> Self {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::Image {
                        inline_data: InlineData { mime_type, data },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest::new("describe", "image/png", &[1, 2, 3]);
        let value = serde_json::to_value(&body).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_reply_text_joins_first_candidate_parts() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"corners\":" }, { "text": "{}}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        assert_eq!(reply_text(&body.to_string()).unwrap(), "{\"corners\":{}}");
    }

    #[test]
    fn test_reply_without_text_is_empty() {
        let body = json!({ "candidates": [] });
        assert!(matches!(reply_text(&body.to_string()), Err(ImportError::EmptyReply)));
        let blocked: Value = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(reply_text(&blocked.to_string()), Err(ImportError::EmptyReply)));
    }

    #[test]
    fn test_error_summary_prefers_service_message() {
        let body = json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        });
        assert_eq!(error_summary(&body.to_string()), "API key not valid.");
    }

    #[test]
    fn test_error_summary_cuts_long_bodies() {
        let page = format!("<html>{}</html>\n<body>details</body>", "x".repeat(5000));
        let summary = error_summary(&page);
        assert_eq!(summary.chars().count(), MAX_ERROR_DETAIL + 1);
        assert!(summary.starts_with("<html>xxx"));
        assert!(summary.ends_with('…'));
        assert!(!summary.contains("details"));

        let err = ImportError::Response { status: 502, body: summary };
        assert!(err.to_string().len() < 300);
        assert!(err.to_string().starts_with("Model service returned 502: <html>"));
    }

    #[test]
    fn test_endpoint_uses_model_and_base() {
        let config = ImportConfig {
            base_url: "http://localhost:9000/".into(),
            ..ImportConfig::default()
        };
        let client = GeminiClient::new("key", &config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/models/gemini-2.5-flash:generateContent");
    }
}
