use crate::Active;
use crate::model::{
    ActiveGroup, CheckInRequest, CheckOutRequest, ClaimSupervisionRequest, ScanOutcome,
    ScanRequest, SessionQuery, StartSessionRequest, StartedSession, Supervision, Supervisor,
    Visit, VisitQuery,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::ACTIVE_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

const fn created_or_ok(created: bool) -> StatusCode {
    if created { StatusCode::CREATED } else { StatusCode::OK }
}

// --- Sessions ---

#[api_handler(
    post,
    path = "/api/active-groups",
    request_body = StartSessionRequest,
    responses(
        (status = CREATED, description = "Session opened", body = StartedSession),
        (status = OK, description = "Today's session reused or reopened", body = StartedSession),
        (status = NOT_FOUND, description = "Unknown activity or room", body = ErrorBody),
        (status = CONFLICT, description = "Room occupied", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn start_session(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartedSession>), ApiError> {
    let started = state
        .try_get_slice::<Active>()?
        .sessions
        .start(&body.activity_id, &body.room_id)
        .await?;
    let status = created_or_ok(started.created);
    Ok((status, Json(StartedSession { session: started.value, created: started.created })))
}

#[api_handler(
    get,
    path = "/api/active-groups",
    params(SessionQuery),
    responses(
        (status = OK, description = "Sessions, newest day first", body = [ActiveGroup]),
        (status = BAD_REQUEST, description = "Malformed day", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn list_sessions(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<SessionQuery>,
) -> Result<Json<Vec<ActiveGroup>>, ApiError> {
    let sessions = state.try_get_slice::<Active>()?.sessions.list(filter).await?;
    Ok(Json(sessions))
}

#[api_handler(
    get,
    path = "/api/active-groups/{id}",
    params(("id" = String, Path, description = "Active group id")),
    responses((status = OK, body = ActiveGroup), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ActiveGroup>, ApiError> {
    let session = state.try_get_slice::<Active>()?.sessions.get(&id).await?;
    Ok(Json(session))
}

#[api_handler(
    post,
    path = "/api/active-groups/{id}/end",
    params(("id" = String, Path, description = "Active group id")),
    responses(
        (status = OK, description = "Session ended with its supervisions and visits", body = ActiveGroup),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn end_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ActiveGroup>, ApiError> {
    let session = state.try_get_slice::<Active>()?.sessions.end(&id).await?;
    Ok(Json(session))
}

// --- Supervision ---

#[api_handler(
    get,
    path = "/api/active-groups/{id}/supervisors",
    params(("id" = String, Path, description = "Active group id")),
    responses((status = OK, body = [Supervisor]), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn list_supervisors(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Supervisor>>, ApiError> {
    let supervisors = state.try_get_slice::<Active>()?.supervision.supervisors(&id).await?;
    Ok(Json(supervisors))
}

#[api_handler(
    post,
    path = "/api/active-groups/{id}/supervisors",
    params(("id" = String, Path, description = "Active group id")),
    request_body = ClaimSupervisionRequest,
    responses(
        (status = CREATED, description = "Supervision started", body = Supervision),
        (status = OK, description = "Already supervising", body = Supervision),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Session has ended", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn claim_supervision(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ClaimSupervisionRequest>,
) -> Result<(StatusCode, Json<Supervision>), ApiError> {
    let claimed = state.try_get_slice::<Active>()?.supervision.claim(&id, &body.staff_id).await?;
    Ok((created_or_ok(claimed.created), Json(claimed.value)))
}

#[api_handler(
    delete,
    path = "/api/active-groups/{id}/supervisors/{staff_id}",
    params(
        ("id" = String, Path, description = "Active group id"),
        ("staff_id" = String, Path, description = "Staff id"),
    ),
    responses(
        (status = OK, description = "Supervision ended", body = Supervision),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn release_supervision(
    State(state): State<ApiState>,
    Path((id, staff_id)): Path<(String, String)>,
) -> Result<Json<Supervision>, ApiError> {
    let released = state.try_get_slice::<Active>()?.supervision.release(&id, &staff_id).await?;
    Ok(Json(released))
}

// --- Visits ---

#[api_handler(
    get,
    path = "/api/active-groups/{id}/visits",
    params(("id" = String, Path, description = "Active group id"), VisitQuery),
    responses((status = OK, body = [Visit]), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn list_visits(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiQuery(filter): ApiQuery<VisitQuery>,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let visits = state.try_get_slice::<Active>()?.visits.list(&id, filter.open_only).await?;
    Ok(Json(visits))
}

#[api_handler(
    post,
    path = "/api/active-groups/{id}/scan",
    params(("id" = String, Path, description = "Active group id")),
    request_body = ScanRequest,
    responses(
        (status = OK, body = ScanOutcome),
        (status = BAD_REQUEST, description = "Malformed tag", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown tag or not a student", body = ErrorBody),
        (status = CONFLICT, description = "Session ended or group full", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn scan(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ScanRequest>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let outcome = state.try_get_slice::<Active>()?.visits.scan(&id, &body.tag).await?;
    Ok(Json(outcome))
}

#[api_handler(
    post,
    path = "/api/visits/check-in",
    request_body = CheckInRequest,
    responses(
        (status = OK, description = "Student present in the session", body = Visit),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Session ended or group full", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn check_in(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CheckInRequest>,
) -> Result<Json<Visit>, ApiError> {
    let check_in = state
        .try_get_slice::<Active>()?
        .visits
        .check_in(&body.active_group_id, &body.student_id)
        .await?;
    Ok(Json(check_in.visit))
}

#[api_handler(
    post,
    path = "/api/visits/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = OK, description = "Visit closed", body = Visit),
        (status = NOT_FOUND, description = "Student is not checked in", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn check_out(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CheckOutRequest>,
) -> Result<Json<Visit>, ApiError> {
    let visit = state.try_get_slice::<Active>()?.visits.check_out(&body.student_id).await?;
    Ok(Json(visit))
}

#[api_handler(
    get,
    path = "/api/visits/current/{student_id}",
    params(("student_id" = String, Path, description = "Student id")),
    responses(
        (status = OK, body = Visit),
        (status = NOT_FOUND, description = "Student is not checked in", body = ErrorBody),
    ),
    tag = ACTIVE_TAG,
)]
pub(crate) async fn current_visit(
    State(state): State<ApiState>,
    Path(student_id): Path<String>,
) -> Result<Json<Visit>, ApiError> {
    let visit = state
        .try_get_slice::<Active>()?
        .visits
        .current(&student_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("student '{student_id}' is not checked in")))?;
    Ok(Json(visit))
}
