use super::{ApiState, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes every deployment exposes regardless of the enabled slices.
pub fn system_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use ogs_database::Database;
    use ogs_domain::config::ApiConfig;
    use tower::ServiceExt;

    async fn state() -> ApiState {
        let db = Database::builder()
            .url("mem://")
            .session("test", "health")
            .init()
            .await
            .expect("connect to mem://");
        ApiState::builder().config(ApiConfig::default()).db(db).build().expect("build state")
    }

    #[tokio::test]
    async fn health_reports_database() {
        let (router, _) = system_router().split_for_parts();
        let app: Router = router.with_state(state().await);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");

        let bytes = to_bytes(response.into_body(), 16 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "up");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["database"]["status"], "up");
        assert_eq!(body["database"]["namespace"], "test");
        assert_eq!(body["database"]["name"], "health");
        assert_eq!(body["slices"], serde_json::json!([]));
    }
}
