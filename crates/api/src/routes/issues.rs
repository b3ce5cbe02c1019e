//! Route definitions for issue reporting.
//!
//! Mounted at `/issues` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::issues;
use crate::state::AppState;

/// Issue routes.
///
/// ```text
/// GET    /          -> list_issues
/// POST   /          -> submit_issue (multipart)
/// GET    /{id}      -> get_issue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issues::list_issues).post(issues::submit_issue))
        .route("/{id}", get(issues::get_issue))
}
