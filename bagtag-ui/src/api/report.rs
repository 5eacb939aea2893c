//! PDF export endpoint

use crate::api::AuthUser;
use crate::services::report::{render_pdf, report_file_name};
use crate::{ApiResult, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    routing::get,
    Router,
};
use bagtag_common::db::records;
use chrono::Utc;
use tracing::info;

/// GET /api/report/pdf
///
/// Renders the caller's full inventory as a downloadable PDF.
pub async fn export_pdf(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    let clubs = records::list_for_user(&state.db, user.user_id).await?;
    let today = Utc::now().date_naive();
    let bytes = render_pdf(&clubs, today)?;
    let file_name = report_file_name(today);

    info!(records = clubs.len(), size = bytes.len(), "Inventory PDF generated");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok((headers, bytes))
}

/// Build report routes
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/api/report/pdf", get(export_pdf))
}
