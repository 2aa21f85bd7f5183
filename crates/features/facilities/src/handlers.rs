use crate::Facilities;
use crate::model::{CreateRoomRequest, Room, RoomQuery, UpdateRoomRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::FACILITIES_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

#[api_handler(
    post,
    path = "/api/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = CREATED, description = "Room created", body = Room),
        (status = BAD_REQUEST, description = "Invalid fields", body = ErrorBody),
        (status = CONFLICT, description = "Name already taken", body = ErrorBody),
    ),
    tag = FACILITIES_TAG,
)]
pub(crate) async fn create_room(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = state.try_get_slice::<Facilities>()?.rooms.create(body).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

#[api_handler(
    get,
    path = "/api/rooms",
    params(RoomQuery),
    responses((status = OK, description = "Rooms ordered by name", body = [Room])),
    tag = FACILITIES_TAG,
)]
pub(crate) async fn list_rooms(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<RoomQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = state.try_get_slice::<Facilities>()?.rooms.list(&filter).await?;
    Ok(Json(rooms))
}

#[api_handler(
    get,
    path = "/api/rooms/{id}",
    params(("id" = String, Path, description = "Room id")),
    responses(
        (status = OK, body = Room),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = FACILITIES_TAG,
)]
pub(crate) async fn get_room(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state.try_get_slice::<Facilities>()?.rooms.get(&id).await?;
    Ok(Json(room))
}

#[api_handler(
    put,
    path = "/api/rooms/{id}",
    params(("id" = String, Path, description = "Room id")),
    request_body = UpdateRoomRequest,
    responses(
        (status = OK, body = Room),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = FACILITIES_TAG,
)]
pub(crate) async fn update_room(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    let room = state.try_get_slice::<Facilities>()?.rooms.update(&id, body).await?;
    Ok(Json(room))
}

#[api_handler(
    delete,
    path = "/api/rooms/{id}",
    params(("id" = String, Path, description = "Room id")),
    responses(
        (status = NO_CONTENT, description = "Room deleted"),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = FACILITIES_TAG,
)]
pub(crate) async fn delete_room(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Facilities>()?.rooms.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
