//! Inventory CRUD endpoints
//!
//! All routes are scoped to the authenticated user. Writes funnel through
//! `normalize_for_save` so every stored record is canonical, and deletes
//! are two-step: the first request arms a short confirmation window, the
//! second (within the window) actually deletes.

use crate::api::AuthUser;
use crate::services::gemini::GeminiClient;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bagtag_common::confirm::{ConfirmOutcome, ConfirmState, CONFIRM_WINDOW};
use bagtag_common::db::records;
use bagtag_common::model::{Category, EquipmentRecord, Location};
use bagtag_common::normalize::{compute_derived_totals, normalize_for_save, DerivedTotals, RecordForm};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use tokio::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Brands offered for autocomplete, alphabetical
const GOLF_BRANDS: [&str; 16] = [
    "Bettinardi",
    "Bridgestone",
    "Callaway",
    "Cleveland",
    "Cobra",
    "Honma",
    "Mizuno",
    "Odyssey",
    "PXG",
    "Ping",
    "Scotty Cameron",
    "Srixon",
    "TaylorMade",
    "Titleist",
    "Tour Edge",
    "Wilson",
];

#[derive(Debug, Serialize)]
pub struct CollectionTotals {
    pub bag: DerivedTotals,
    pub locker: DerivedTotals,
}

#[derive(Debug, Serialize)]
pub struct ClubListResponse {
    pub clubs: Vec<EquipmentRecord>,
    pub totals: CollectionTotals,
}

/// GET /api/clubs
///
/// Full collection newest-first, with per-bucket derived totals.
pub async fn list_clubs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ClubListResponse>> {
    let clubs = records::list_for_user(&state.db, user.user_id).await?;
    let totals = CollectionTotals {
        bag: compute_derived_totals(&clubs, Some(Location::Bag)),
        locker: compute_derived_totals(&clubs, Some(Location::Locker)),
    };
    Ok(Json(ClubListResponse { clubs, totals }))
}

/// POST /api/clubs
pub async fn create_club(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<RecordForm>,
) -> ApiResult<(StatusCode, Json<EquipmentRecord>)> {
    let record = normalize_for_save(&form, None)?;
    records::insert(&state.db, user.user_id, &record).await?;

    info!(club_id = %record.id, brand = %record.brand, "Club added");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/clubs/:id
///
/// Re-normalizes the submitted form against the stored record so id,
/// creation time, and the trade-in valuation survive the edit.
pub async fn update_club(
    State(state): State<AppState>,
    user: AuthUser,
    Path(club_id): Path<Uuid>,
    Json(form): Json<RecordForm>,
) -> ApiResult<Json<EquipmentRecord>> {
    let existing = records::get_for_user(&state.db, user.user_id, club_id).await?;
    let record = normalize_for_save(&form, Some(&existing))?;
    records::update(&state.db, user.user_id, &record).await?;
    Ok(Json(record))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<u64>,
}

/// DELETE /api/clubs/:id
///
/// First call arms a confirmation window, second call within the window
/// deletes. A late second call re-arms instead of deleting.
pub async fn delete_club(
    State(state): State<AppState>,
    user: AuthUser,
    Path(club_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    // 404 before arming anything for a club that does not exist
    records::get_for_user(&state.db, user.user_id, club_id).await?;

    let key = (user.user_id, club_id);
    let outcome = {
        let mut windows = state.confirm.lock().await;
        let current = windows.remove(&key).unwrap_or(ConfirmState::Idle);
        let (next, outcome) = current.request(Instant::now());
        if let ConfirmState::Armed { .. } = next {
            windows.insert(key, next);
        }
        outcome
    };

    match outcome {
        ConfirmOutcome::Armed => Ok(Json(DeleteResponse {
            status: "confirmation_required",
            expires_in_seconds: Some(CONFIRM_WINDOW.as_secs()),
        })),
        ConfirmOutcome::Confirmed => {
            records::delete(&state.db, user.user_id, club_id).await?;
            info!(club_id = %club_id, "Club deleted");
            Ok(Json(DeleteResponse {
                status: "deleted",
                expires_in_seconds: None,
            }))
        }
    }
}

/// POST /api/clubs/:id/location
///
/// Toggles the record between bag and locker, returning the updated record.
pub async fn toggle_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(club_id): Path<Uuid>,
) -> ApiResult<Json<EquipmentRecord>> {
    let record = records::get_for_user(&state.db, user.user_id, club_id).await?;
    let target = record.location.toggled();
    records::set_location(&state.db, user.user_id, club_id, target).await?;

    let updated = records::get_for_user(&state.db, user.user_id, club_id).await?;
    Ok(Json(updated))
}

/// POST /api/clubs/:id/tradein
///
/// Fetches a fresh valuation from Gemini and stores low, high, and
/// checked-at as one atomic update.
pub async fn refresh_trade_in(
    State(state): State<AppState>,
    user: AuthUser,
    Path(club_id): Path<Uuid>,
) -> ApiResult<Json<EquipmentRecord>> {
    let record = records::get_for_user(&state.db, user.user_id, club_id).await?;

    let api_key = crate::config::resolve_gemini_api_key(&state.db, &state.toml_config).await?;
    let client = GeminiClient::new(state.http.clone(), api_key);
    let estimate = client
        .trade_in_estimate(
            &record.brand,
            &record.model,
            record.category,
            record.set_composition.as_deref(),
        )
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    records::set_trade_in(
        &state.db,
        user.user_id,
        club_id,
        estimate.low,
        estimate.high,
        Utc::now(),
    )
    .await?;

    let updated = records::get_for_user(&state.db, user.user_id, club_id).await?;
    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct BrandListResponse {
    pub brands: Vec<&'static str>,
}

/// GET /api/brands
pub async fn list_brands() -> Json<BrandListResponse> {
    Json(BrandListResponse {
        brands: GOLF_BRANDS.to_vec(),
    })
}

/// GET /api/demo
///
/// A small showcase inventory for first-run exploration. Never persisted;
/// built fresh through the same normalization path real records use.
pub async fn demo_inventory() -> ApiResult<Json<Vec<EquipmentRecord>>> {
    let forms = [
        demo_form(
            Category::Driver,
            Location::Bag,
            "TaylorMade",
            "Stealth 2",
            "10.5",
            &[],
            "Fujikura Ventus",
            "S",
            "599.99",
            "2023-03-12",
        ),
        demo_form(
            Category::Iron,
            Location::Bag,
            "Mizuno",
            "JPX 923 Forged",
            "",
            &["5", "6", "7", "8", "9", "PW"],
            "Nippon Modus 105",
            "S",
            "1099.00",
            "2023-05-02",
        ),
        demo_form(
            Category::Putter,
            Location::Bag,
            "Scotty Cameron",
            "Newport 2",
            "3.5",
            &[],
            "",
            "",
            "449.99",
            "2022-08-20",
        ),
        demo_form(
            Category::Wedge,
            Location::Locker,
            "Cleveland",
            "RTX ZipCore",
            "56",
            &[],
            "Dynamic Gold Spinner",
            "Wedge",
            "149.99",
            "2021-04-18",
        ),
    ];

    let mut records = Vec::with_capacity(forms.len());
    for form in &forms {
        records.push(normalize_for_save(form, None)?);
    }
    Ok(Json(records))
}

#[allow(clippy::too_many_arguments)]
fn demo_form(
    category: Category,
    location: Location,
    brand: &str,
    model: &str,
    loft: &str,
    composition: &[&str],
    shaft: &str,
    stiffness: &str,
    price: &str,
    purchase_date: &str,
) -> RecordForm {
    RecordForm {
        category,
        location,
        brand: brand.to_string(),
        model: model.to_string(),
        loft: loft.to_string(),
        is_set: !composition.is_empty(),
        set_composition: composition.iter().map(|s| s.to_string()).collect(),
        shaft_make_model: shaft.to_string(),
        shaft_stiffness: stiffness.to_string(),
        price: price.to_string(),
        purchase_date: purchase_date.to_string(),
        notes: String::new(),
        photo_url: String::new(),
        receipt_url: String::new(),
        launch_data: None,
    }
}

/// Periodically drop expired confirmation windows so abandoned delete
/// attempts do not accumulate.
pub async fn confirm_sweeper(state: AppState) {
    let mut interval = tokio::time::interval(Duration::from_secs(30));
    loop {
        interval.tick().await;
        let now = Instant::now();
        let mut windows = state.confirm.lock().await;
        windows.retain(|_, s| s.is_armed(now));
    }
}

/// Build inventory routes
pub fn club_routes() -> Router<AppState> {
    Router::new()
        .route("/api/clubs", get(list_clubs).post(create_club))
        .route("/api/clubs/:id", put(update_club).delete(delete_club))
        .route("/api/clubs/:id/location", post(toggle_location))
        .route("/api/clubs/:id/tradein", post(refresh_trade_in))
        .route("/api/brands", get(list_brands))
        .route("/api/demo", get(demo_inventory))
}
