pub mod health;
pub mod issues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /issues            list, submit
/// /issues/{id}       get with media
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/issues", issues::router())
}
