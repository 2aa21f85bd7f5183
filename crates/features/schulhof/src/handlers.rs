use crate::Schulhof;
use crate::model::{SchulhofStatus, StatusQuery, SupervisionOutcome, ToggleSupervisionRequest};
use axum::Json;
use axum::extract::State;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::SCHULHOF_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

#[api_handler(
    get,
    path = "/api/schulhof/status",
    params(StatusQuery),
    responses(
        (status = OK, description = "Today's Schulhof supervision", body = SchulhofStatus),
        (status = BAD_REQUEST, description = "Malformed staff id", body = ErrorBody),
    ),
    tag = SCHULHOF_TAG,
)]
pub(crate) async fn status(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Json<SchulhofStatus>, ApiError> {
    let status = state.try_get_slice::<Schulhof>()?.svc.status(query.staff_id.as_deref()).await?;
    Ok(Json(status))
}

/// Starting provisions the Schulhof room, activity and today's session on first use.
#[api_handler(
    post,
    path = "/api/schulhof/supervision",
    request_body = ToggleSupervisionRequest,
    responses(
        (status = OK, body = SupervisionOutcome),
        (status = BAD_REQUEST, description = "Malformed staff id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown staff member, no session or not supervising", body = ErrorBody),
    ),
    tag = SCHULHOF_TAG,
)]
pub(crate) async fn toggle_supervision(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<ToggleSupervisionRequest>,
) -> Result<Json<SupervisionOutcome>, ApiError> {
    let outcome = state
        .try_get_slice::<Schulhof>()?
        .svc
        .toggle_supervision(&body.staff_id, body.action)
        .await?;
    Ok(Json(outcome))
}
