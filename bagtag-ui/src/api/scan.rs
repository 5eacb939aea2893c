//! AI scan endpoints
//!
//! Photo and receipt scans store the upload first and only then consult
//! Gemini, so a failed identification still leaves the caller with a
//! usable media URL. Catalog search and model listing are text-only.

use crate::api::AuthUser;
use crate::services::blob_store::{BlobStore, MediaFolder};
use crate::services::gemini::{GeminiClient, ReceiptDetails};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use bagtag_common::model::{Category, ScanSuggestion};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One uploaded image part
struct UploadedImage {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// Pull the first file part out of a multipart body
async fn read_image(mut multipart: Multipart) -> Result<UploadedImage, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Upload read failed: {}", e)))?
            .to_vec();

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        return Ok(UploadedImage {
            file_name,
            mime_type,
            bytes,
        });
    }
    Err(ApiError::BadRequest(
        "Multipart body contains no file".to_string(),
    ))
}

async fn gemini_client(state: &AppState) -> Result<GeminiClient, ApiError> {
    let api_key = crate::config::resolve_gemini_api_key(&state.db, &state.toml_config).await?;
    Ok(GeminiClient::new(state.http.clone(), api_key))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentScanResponse {
    /// Stored photo URL; present even when identification fails
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<ScanSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

/// POST /api/scan/equipment
pub async fn scan_equipment(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<EquipmentScanResponse>> {
    let image = read_image(multipart).await?;

    let store = BlobStore::new(&state.media_root);
    let photo_url = store
        .store(MediaFolder::ClubPhotos, &image.file_name, &image.bytes)
        .await?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    let client = gemini_client(&state).await?;
    let (suggestion, scan_error) = match client.identify_equipment(&encoded, &image.mime_type).await
    {
        Ok(suggestion) => (Some(suggestion), None),
        Err(e) => {
            warn!("Equipment identification failed, photo kept: {}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(Json(EquipmentScanResponse {
        photo_url,
        suggestion,
        scan_error,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptScanResponse {
    /// Stored receipt URL; present even when extraction fails
    pub receipt_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ReceiptDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

/// POST /api/scan/receipt
pub async fn scan_receipt(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<ReceiptScanResponse>> {
    let image = read_image(multipart).await?;

    let store = BlobStore::new(&state.media_root);
    let receipt_url = store
        .store(MediaFolder::ReceiptPhotos, &image.file_name, &image.bytes)
        .await?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    let client = gemini_client(&state).await?;
    let (details, scan_error) = match client.extract_receipt(&encoded, &image.mime_type).await {
        Ok(details) => (Some(details), None),
        Err(e) => {
            warn!("Receipt extraction failed, photo kept: {}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(Json(ReceiptScanResponse {
        receipt_url,
        details,
        scan_error,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/scan/search?q=
pub async fn search_catalog(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ScanSuggestion>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest("Search query is empty".to_string()));
    }

    let client = gemini_client(&state).await?;
    let suggestion = client
        .search_catalog(q)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    Ok(Json(suggestion))
}

#[derive(Debug, Deserialize)]
pub struct ModelQuery {
    pub brand: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<String>,
}

/// GET /api/scan/models?brand=&category=
///
/// Best-effort autocomplete; upstream failures come back as an empty list.
pub async fn list_models(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ModelQuery>,
) -> ApiResult<Json<ModelListResponse>> {
    let category = Category::parse(&query.category)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown category: {:?}", query.category)))?;
    if query.brand.trim().is_empty() {
        return Err(ApiError::BadRequest("Brand is empty".to_string()));
    }

    let client = gemini_client(&state).await?;
    let models = client.list_models(query.brand.trim(), category).await;
    Ok(Json(ModelListResponse { models }))
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/scan/equipment", post(scan_equipment))
        .route("/api/scan/receipt", post(scan_receipt))
        .route("/api/scan/search", get(search_catalog))
        .route("/api/scan/models", get(list_models))
}
