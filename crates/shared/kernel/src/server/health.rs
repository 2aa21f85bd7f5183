use super::ApiState;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use ogs_derive::{api_handler, api_model};
use ogs_domain::constants::SYSTEM_TAG;

/// Service health as seen by load balancers and the admin UI.
#[api_model]
struct HealthResponse {
    /// `up` while the database answers, `degraded` otherwise
    #[schema(example = "up")]
    status: String,
    version: String,
    database: DatabaseHealth,
    /// Feature slices mounted in this deployment
    slices: Vec<String>,
    /// Seconds since the server state was built
    uptime: u64,
}

#[api_model]
struct DatabaseHealth {
    /// `up` or `down`
    status: String,
    namespace: String,
    name: String,
}

#[api_handler(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Server and database are up", body = HealthResponse),
        (status = SERVICE_UNAVAILABLE, description = "Database unreachable", body = HealthResponse),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let database_up = state.database.is_healthy().await;
    let mut slices: Vec<String> = state.slice_names().map(str::to_owned).collect();
    slices.sort_unstable();

    let body = HealthResponse {
        status: if database_up { "up" } else { "degraded" }.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        database: DatabaseHealth {
            status: if database_up { "up" } else { "down" }.to_owned(),
            namespace: state.database.namespace().to_owned(),
            name: state.database.database().to_owned(),
        },
        slices,
        uptime: state.started_at.elapsed().as_secs(),
    };
    let status = if database_up { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, [(header::CACHE_CONTROL, "no-store"), (header::PRAGMA, "no-cache")], Json(body))
}
