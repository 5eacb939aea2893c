//! UI Routes - HTML landing page for the bagtag web interface

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// Root page - inventory home
async fn root_page() -> impl IntoResponse {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>BagTag - Golf Equipment Inventory</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #1a3d1a;
            border-bottom: 2px solid #2d7a2d;
            padding-bottom: 10px;
        }
        code {
            background: #f4f4f4;
            padding: 2px 6px;
            border-radius: 3px;
        }
        .endpoint {
            margin: 8px 0;
        }
    </style>
</head>
<body>
    <h1>BagTag</h1>
    <p>Golf equipment inventory service. Sign up, catalog your clubs into
    bag and locker, scan photos and receipts, and export a PDF report.</p>

    <h2>API</h2>
    <div class="endpoint"><code>POST /api/auth/signup</code> - create an account</div>
    <div class="endpoint"><code>POST /api/auth/login</code> - obtain a bearer token</div>
    <div class="endpoint"><code>GET /api/clubs</code> - list your collection with totals</div>
    <div class="endpoint"><code>POST /api/clubs</code> - add a record</div>
    <div class="endpoint"><code>POST /api/scan/equipment</code> - identify a club from a photo</div>
    <div class="endpoint"><code>POST /api/scan/receipt</code> - extract price and date from a receipt</div>
    <div class="endpoint"><code>POST /api/clubs/:id/tradein</code> - refresh a trade-in valuation</div>
    <div class="endpoint"><code>GET /api/report/pdf</code> - download the inventory report</div>
    <div class="endpoint"><code>GET /api/health</code> - service status</div>
</body>
</html>
"#,
    )
}
