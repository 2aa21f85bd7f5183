use crate::Feedback;
use crate::model::{
    BatchFeedbackRequest, BatchFeedbackResponse, CreateFeedbackRequest, FeedbackEntry,
    FeedbackQuery,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::FEEDBACK_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

#[api_handler(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = CREATED, body = FeedbackEntry),
        (status = BAD_REQUEST, description = "Invalid value, day or time", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown student", body = ErrorBody),
    ),
    tag = FEEDBACK_TAG,
)]
pub(crate) async fn create_feedback(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackEntry>), ApiError> {
    let entry = state.try_get_slice::<Feedback>()?.entries.create(body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[api_handler(
    post,
    path = "/api/feedback/batch",
    request_body = BatchFeedbackRequest,
    responses(
        (status = OK, description = "Per-entry results", body = BatchFeedbackResponse),
        (status = BAD_REQUEST, description = "Empty or oversized batch", body = ErrorBody),
    ),
    tag = FEEDBACK_TAG,
)]
pub(crate) async fn create_batch(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<BatchFeedbackRequest>,
) -> Result<Json<BatchFeedbackResponse>, ApiError> {
    let response = state.try_get_slice::<Feedback>()?.entries.create_batch(body.entries).await?;
    Ok(Json(response))
}

#[api_handler(
    get,
    path = "/api/feedback",
    params(FeedbackQuery),
    responses(
        (status = OK, description = "Entries, newest first", body = [FeedbackEntry]),
        (status = BAD_REQUEST, body = ErrorBody),
    ),
    tag = FEEDBACK_TAG,
)]
pub(crate) async fn list_feedback(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<FeedbackQuery>,
) -> Result<Json<Vec<FeedbackEntry>>, ApiError> {
    let entries = state.try_get_slice::<Feedback>()?.entries.list(filter).await?;
    Ok(Json(entries))
}

#[api_handler(
    get,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback id")),
    responses((status = OK, body = FeedbackEntry), (status = NOT_FOUND, body = ErrorBody)),
    tag = FEEDBACK_TAG,
)]
pub(crate) async fn get_feedback(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackEntry>, ApiError> {
    let entry = state.try_get_slice::<Feedback>()?.entries.get(&id).await?;
    Ok(Json(entry))
}

#[api_handler(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback id")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = FEEDBACK_TAG,
)]
pub(crate) async fn delete_feedback(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Feedback>()?.entries.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
