use crate::Groups;
use crate::model::{AddMemberRequest, CreateGroupRequest, GroupMember, SchoolGroup, UpdateGroupRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::GROUPS_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiState, ErrorBody};

#[api_handler(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = CREATED, body = SchoolGroup),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown home room", body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = GROUPS_TAG,
)]
pub(crate) async fn create_group(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<SchoolGroup>), ApiError> {
    let group = state.try_get_slice::<Groups>()?.groups.create(body).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[api_handler(
    get,
    path = "/api/groups",
    responses((status = OK, description = "Groups ordered by name", body = [SchoolGroup])),
    tag = GROUPS_TAG,
)]
pub(crate) async fn list_groups(
    State(state): State<ApiState>,
) -> Result<Json<Vec<SchoolGroup>>, ApiError> {
    let groups = state.try_get_slice::<Groups>()?.groups.list().await?;
    Ok(Json(groups))
}

#[api_handler(
    get,
    path = "/api/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses((status = OK, body = SchoolGroup), (status = NOT_FOUND, body = ErrorBody)),
    tag = GROUPS_TAG,
)]
pub(crate) async fn get_group(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SchoolGroup>, ApiError> {
    let group = state.try_get_slice::<Groups>()?.groups.get(&id).await?;
    Ok(Json(group))
}

#[api_handler(
    put,
    path = "/api/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    request_body = UpdateGroupRequest,
    responses(
        (status = OK, body = SchoolGroup),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = GROUPS_TAG,
)]
pub(crate) async fn update_group(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateGroupRequest>,
) -> Result<Json<SchoolGroup>, ApiError> {
    let group = state.try_get_slice::<Groups>()?.groups.update(&id, body).await?;
    Ok(Json(group))
}

#[api_handler(
    delete,
    path = "/api/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = NO_CONTENT, description = "Group and memberships deleted"),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = GROUPS_TAG,
)]
pub(crate) async fn delete_group(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Groups>()?.groups.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/api/groups/{id}/members",
    params(("id" = String, Path, description = "Group id")),
    responses((status = OK, body = [GroupMember]), (status = NOT_FOUND, body = ErrorBody)),
    tag = GROUPS_TAG,
)]
pub(crate) async fn list_members(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GroupMember>>, ApiError> {
    let members = state.try_get_slice::<Groups>()?.groups.list_members(&id).await?;
    Ok(Json(members))
}

#[api_handler(
    post,
    path = "/api/groups/{id}/members",
    params(("id" = String, Path, description = "Group id")),
    request_body = AddMemberRequest,
    responses(
        (status = OK, description = "Student is a member (moved if needed)", body = GroupMember),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = GROUPS_TAG,
)]
pub(crate) async fn add_member(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AddMemberRequest>,
) -> Result<Json<GroupMember>, ApiError> {
    let member = state.try_get_slice::<Groups>()?.groups.add_member(&id, &body.student_id).await?;
    Ok(Json(member))
}

#[api_handler(
    delete,
    path = "/api/groups/{id}/members/{student_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("student_id" = String, Path, description = "Student id"),
    ),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = GROUPS_TAG,
)]
pub(crate) async fn remove_member(
    State(state): State<ApiState>,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Groups>()?.groups.remove_member(&id, &student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
