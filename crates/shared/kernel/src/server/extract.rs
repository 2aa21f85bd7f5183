//! Body and query extractors that reject with the [`ErrorBody`](super::ErrorBody) envelope.
//!
//! Plain `axum` extractors answer malformed input with a `text/plain` body (and `422` for
//! JSON that does not match the request type). Handlers take these wrappers instead so
//! every client error looks the same.

use super::ApiError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;

/// A JSON request body.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// URL query parameters.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::{get, post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Toggle {
        action: String,
    }

    #[derive(Deserialize)]
    struct Filter {
        #[allow(dead_code)]
        limit: u32,
    }

    async fn toggle(ApiJson(body): ApiJson<Toggle>) -> String {
        body.action
    }

    async fn filter(ApiQuery(_): ApiQuery<Filter>) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/toggle", post(toggle)).route("/filter", get(filter))
    }

    async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::post("/toggle")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn mismatched_body_is_a_bad_request_envelope() {
        let (status, body) = send(json_request(r#"{"staffId":"abc"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("action"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request_envelope() {
        let (status, body) = send(json_request("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn missing_content_type_is_a_bad_request_envelope() {
        let req = Request::post("/toggle").body(Body::from(r#"{"action":"start"}"#)).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn malformed_query_is_a_bad_request_envelope() {
        let req = Request::get("/filter?limit=many").body(Body::empty()).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let res = app().oneshot(json_request(r#"{"action":"start"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
