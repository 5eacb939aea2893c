//! Gemini API client
//!
//! All AI extraction flows go through here: equipment identification from
//! a photo, receipt price/date extraction, free-text catalog search,
//! popular-model lookup and trade-in valuation. Every response is a
//! best-effort suggestion; nothing returned here is persisted without
//! going through the normalizer, except the trade-in numbers, which are
//! validated in [`validate_estimate`] before they touch the database.

use bagtag_common::model::{Category, ScanSuggestion, TradeInEstimate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Gemini client errors
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Rejected estimate: {0}")]
    InvalidEstimate(String),
}

/// Receipt extraction result (price required by the response schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDetails {
    pub price: f64,
    pub purchase_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
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

/// Extract the first text part from a generateContent response
fn response_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    response
        .candidates
        .into_iter()
        .flat_map(|c| c.content.parts)
        .find_map(|p| p.text)
        .ok_or(GeminiError::EmptyResponse)
}

/// Validate a raw valuation pair at the service boundary
///
/// The model is not trusted to return a sane range: non-positive bounds
/// or an inverted range count as a failed lookup, never a partial
/// success.
pub fn validate_estimate(low: f64, high: f64) -> Result<TradeInEstimate, GeminiError> {
    if !low.is_finite() || !high.is_finite() {
        return Err(GeminiError::InvalidEstimate(
            "Non-numeric valuation bounds".to_string(),
        ));
    }
    if low <= 0.0 || high <= 0.0 {
        return Err(GeminiError::InvalidEstimate(format!(
            "Non-positive valuation bounds: {} - {}",
            low, high
        )));
    }
    if low > high {
        return Err(GeminiError::InvalidEstimate(format!(
            "Inverted valuation range: {} > {}",
            low, high
        )));
    }
    Ok(TradeInEstimate { low, high })
}

/// JSON response schema for equipment identification and catalog search
fn club_schema() -> Value {
    let categories: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "brand": { "type": "STRING", "description": "The manufacturer (e.g., TaylorMade, Callaway)." },
            "model": { "type": "STRING", "description": "The specific model name (e.g., R540, Great Big Bertha)." },
            "type": { "type": "STRING", "enum": categories, "description": "The category of the item." },
            "loft": { "type": "STRING", "description": "Loft in degrees (e.g., 9.5, 10.5)." },
            "setComposition": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of clubs in the set if it is an iron set."
            },
            "shaftMakeModel": { "type": "STRING", "description": "The manufacturer and model of the shaft." },
            "shaftStiffness": { "type": "STRING", "description": "The flex of the shaft." }
        },
        "required": ["brand", "model", "type"]
    })
}

fn receipt_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "price": { "type": "NUMBER", "description": "Total price on receipt." },
            "purchaseDate": { "type": "STRING", "description": "Date in YYYY-MM-DD format." }
        },
        "required": ["price"]
    })
}

fn trade_in_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "low": { "type": "NUMBER", "description": "Low estimate trade-in value in USD" },
            "high": { "type": "NUMBER", "description": "High estimate trade-in value in USD" }
        },
        "required": ["low", "high"]
    })
}

fn model_list_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "models": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["models"]
    })
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http_client: reqwest::Client, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Low-level generateContent call; returns the model's text payload
    async fn generate(
        &self,
        parts: Value,
        schema: Value,
        temperature: f64,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
                "temperature": temperature,
            }
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 400 || status == 401 || status == 403 {
            return Err(GeminiError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeminiError::ApiError(status.as_u16(), error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::ParseError(e.to_string()))?;

        response_text(parsed)
    }

    /// Identify golf equipment from a photo
    pub async fn identify_equipment(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ScanSuggestion, GeminiError> {
        tracing::debug!(mime_type, "Querying Gemini for equipment identification");

        let parts = json!([
            { "inlineData": { "mimeType": mime_type, "data": image_base64 } },
            { "text": "Identify this golf equipment. Return Brand, Model, Type, and specifications." }
        ]);
        let text = self.generate(parts, club_schema(), 0.1).await?;

        let suggestion: ScanSuggestion =
            serde_json::from_str(&text).map_err(|e| GeminiError::ParseError(e.to_string()))?;

        tracing::info!(
            brand = suggestion.brand.as_deref().unwrap_or("?"),
            model = suggestion.model.as_deref().unwrap_or("?"),
            "Equipment identification complete"
        );
        Ok(suggestion)
    }

    /// Extract price and purchase date from a receipt photo
    pub async fn extract_receipt(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ReceiptDetails, GeminiError> {
        tracing::debug!(mime_type, "Querying Gemini for receipt extraction");

        let parts = json!([
            { "inlineData": { "mimeType": mime_type, "data": image_base64 } },
            { "text": "Extract price and date from this receipt." }
        ]);
        let text = self.generate(parts, receipt_schema(), 0.1).await?;

        serde_json::from_str(&text).map_err(|e| GeminiError::ParseError(e.to_string()))
    }

    /// Look up equipment details from a free-text query
    pub async fn search_catalog(&self, query: &str) -> Result<ScanSuggestion, GeminiError> {
        tracing::debug!(query, "Querying Gemini catalog search");

        let parts = json!([{
            "text": format!(
                "You are an expert golf equipment database (2000-present). Find item: \"{}\".",
                query
            )
        }]);
        let text = self.generate(parts, club_schema(), 0.2).await?;

        serde_json::from_str(&text).map_err(|e| GeminiError::ParseError(e.to_string()))
    }

    /// List popular models for a brand and category
    ///
    /// Best-effort autocomplete helper; any failure collapses to an
    /// empty list rather than an error.
    pub async fn list_models(&self, brand: &str, category: Category) -> Vec<String> {
        #[derive(Deserialize)]
        struct ModelList {
            #[serde(default)]
            models: Vec<String>,
        }

        let parts = json!([{
            "text": format!(
                "List 30 popular {} {} models released since 2000.",
                brand,
                category.as_str()
            )
        }]);

        match self.generate(parts, model_list_schema(), 0.3).await {
            Ok(text) => serde_json::from_str::<ModelList>(&text)
                .map(|l| l.models)
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Model list fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch a validated trade-in valuation for a piece of equipment
    pub async fn trade_in_estimate(
        &self,
        brand: &str,
        model: &str,
        category: Category,
        composition: Option<&[String]>,
    ) -> Result<TradeInEstimate, GeminiError> {
        #[derive(Deserialize)]
        struct RawEstimate {
            low: f64,
            high: f64,
        }

        let mut prompt = format!(
            "Estimate trade-in value for {} {} {} in USD.",
            brand,
            model,
            category.as_str()
        );
        if let Some(composition) = composition {
            prompt.push_str(&format!(" Set composition: {}.", composition.join(", ")));
        }

        let parts = json!([{ "text": prompt }]);
        let text = self.generate(parts, trade_in_schema(), 0.1).await?;

        let raw: RawEstimate =
            serde_json::from_str(&text).map_err(|e| GeminiError::ParseError(e.to_string()))?;

        let estimate = validate_estimate(raw.low, raw.high)?;
        tracing::info!(
            brand,
            model,
            low = estimate.low,
            high = estimate.high,
            "Trade-in estimate fetched"
        );
        Ok(estimate)
    }
}
