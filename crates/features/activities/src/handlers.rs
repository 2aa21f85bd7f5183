use crate::Activities;
use crate::model::{
    Activity, ActivityQuery, Category, CreateActivityRequest, CreateCategoryRequest,
    UpdateActivityRequest,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::ACTIVITIES_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

#[api_handler(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = CREATED, body = Category),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = CONFLICT, description = "Name already taken", body = ErrorBody),
    ),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn create_category(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.try_get_slice::<Activities>()?.categories.create(body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[api_handler(
    get,
    path = "/api/categories",
    responses((status = OK, description = "Categories ordered by name", body = [Category])),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn list_categories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.try_get_slice::<Activities>()?.categories.list().await?;
    Ok(Json(categories))
}

#[api_handler(
    get,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses((status = OK, body = Category), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn get_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state.try_get_slice::<Activities>()?.categories.get(&id).await?;
    Ok(Json(category))
}

#[api_handler(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = NO_CONTENT),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Still used by activities", body = ErrorBody),
    ),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn delete_category(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Activities>()?.categories.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    post,
    path = "/api/activities",
    request_body = CreateActivityRequest,
    responses(
        (status = CREATED, body = Activity),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown category or room", body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn create_activity(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    let activity = state.try_get_slice::<Activities>()?.activities.create(body).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[api_handler(
    get,
    path = "/api/activities",
    params(ActivityQuery),
    responses(
        (status = OK, description = "Activities ordered by name", body = [Activity]),
        (status = BAD_REQUEST, description = "Unknown weekday", body = ErrorBody),
    ),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn list_activities(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<ActivityQuery>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let activities = state.try_get_slice::<Activities>()?.activities.list(&filter).await?;
    Ok(Json(activities))
}

#[api_handler(
    get,
    path = "/api/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses((status = OK, body = Activity), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn get_activity(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Activity>, ApiError> {
    let activity = state.try_get_slice::<Activities>()?.activities.get(&id).await?;
    Ok(Json(activity))
}

#[api_handler(
    put,
    path = "/api/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    request_body = UpdateActivityRequest,
    responses(
        (status = OK, body = Activity),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, body = ErrorBody),
    ),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn update_activity(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateActivityRequest>,
) -> Result<Json<Activity>, ApiError> {
    let activity = state.try_get_slice::<Activities>()?.activities.update(&id, body).await?;
    Ok(Json(activity))
}

#[api_handler(
    delete,
    path = "/api/activities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = ACTIVITIES_TAG,
)]
pub(crate) async fn delete_activity(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Activities>()?.activities.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
