use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::prompt::{CATEGORIES, GROCERY_DETECTION_PROMPT};
use super::VisionAnalyzer;
use crate::config::VisionConfig;
use crate::error::PantryError;
use crate::model::{normalize_name, NewPantryItem};

/// Header carrying the API key; request URLs stay key-free
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Detects grocery items in photos with the Gemini `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiVision {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiVision {
    /// Create a client from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &VisionConfig) -> Result<Option<Self>, PantryError> {
        let Some(api_key) = config.resolved_api_key() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Some(GeminiVision {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, image: &[u8], mime_type: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": GROCERY_DETECTION_PROMPT },
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": STANDARD.encode(image)
                        }
                    }
                ]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

fn response_schema() -> Value {
    let nullable_string = json!({ "type": "STRING", "nullable": true });
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "quantity": { "type": "NUMBER", "nullable": true },
                "unit": nullable_string,
                "category": { "type": "STRING", "enum": CATEGORIES, "nullable": true },
                "notes": nullable_string
            },
            "required": ["name"]
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    message: Option<String>,
}

/// One item as the model must report it
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetectedItem {
    name: String,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl DetectedItem {
    fn into_pantry_item(self) -> Result<NewPantryItem, PantryError> {
        let name = normalize_name(&self.name);
        if name.is_empty() {
            return Err(PantryError::AnalysisFailed(
                "Gemini returned an item without a name".to_string(),
            ));
        }

        let category = self.category.map(|c| normalize_name(&c)).map(|c| {
            if CATEGORIES.contains(&c.as_str()) {
                c
            } else {
                warn!("Unknown category {:?} for {:?}, using 'other'", c, name);
                "other".to_string()
            }
        });

        Ok(NewPantryItem {
            name,
            quantity: self.quantity,
            unit: self.unit.filter(|u| !u.trim().is_empty()),
            category,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Validate the model's JSON text against the item schema
fn parse_detected_items(text: &str) -> Result<Vec<NewPantryItem>, PantryError> {
    let items: Vec<DetectedItem> = serde_json::from_str(text).map_err(|e| {
        PantryError::AnalysisFailed(format!("Failed to parse Gemini response: {}", e))
    })?;

    items
        .into_iter()
        .map(DetectedItem::into_pantry_item)
        .collect()
}

#[async_trait]
impl VisionAnalyzer for GeminiVision {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<Vec<NewPantryItem>, PantryError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(
            "Sending {} byte {} image to Gemini ({})",
            image.len(),
            mime_type,
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(image, mime_type))
            .send()
            .await
            .map_err(|e| {
                PantryError::AnalysisFailed(format!("Gemini API call failed: {}", e.without_url()))
            })?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PantryError::AnalysisFailed(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            PantryError::AnalysisFailed(format!("Malformed Gemini response: {}", e.without_url()))
        })?;
        debug!("Gemini response: {:?}", body);

        if let Some(error) = body.error {
            return Err(PantryError::AnalysisFailed(format!(
                "Gemini API error ({}): {}",
                error.code.unwrap_or(0),
                error.message.as_deref().unwrap_or("Unknown error")
            )));
        }

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or_else(|| {
                PantryError::AnalysisFailed("Gemini response contained no text".to_string())
            })?;

        let items = parse_detected_items(&text)?;
        debug!("Gemini detected {} items", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> VisionConfig {
        VisionConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-test".to_string(),
            base_url: "http://localhost:1234/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_name() {
        let vision = GeminiVision::from_config(&test_config()).unwrap().unwrap();
        assert_eq!(vision.provider_name(), "gemini");
        assert_eq!(vision.model(), "gemini-test");
        assert_eq!(vision.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_request_body_shape() {
        let vision = GeminiVision::from_config(&test_config()).unwrap().unwrap();
        let body = vision.request_body(b"abc", "image/png");

        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("grocery"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "YWJj");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_parse_detected_items() {
        let items = parse_detected_items(
            r#"[
                {"name": "Avocado", "quantity": 2, "unit": null, "category": "produce", "notes": "large hass"},
                {"name": "sliced turkey breast", "category": "Deli"}
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "avocado");
        assert_eq!(items[0].quantity, Some(2.0));
        assert_eq!(items[0].notes.as_deref(), Some("large hass"));
        assert_eq!(items[1].category.as_deref(), Some("other"));
    }

    #[test]
    fn test_parse_detected_items_rejects_bad_shapes() {
        for text in [
            "not json",
            r#"{"name": "milk"}"#,
            r#"[{"quantity": 1}]"#,
            r#"[{"name": "milk", "quantity": "lots"}]"#,
            r#"[{"name": "milk", "brand": "acme"}]"#,
            r#"[{"name": "  "}]"#,
        ] {
            let result = parse_detected_items(text);
            assert!(
                matches!(result, Err(PantryError::AnalysisFailed(_))),
                "expected failure for {}",
                text
            );
        }
    }

    #[test]
    fn test_parse_empty_detection() {
        assert!(parse_detected_items("[]").unwrap().is_empty());
    }
}
