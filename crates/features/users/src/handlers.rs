use crate::Users;
use crate::model::{
    AssignTagRequest, CreatePersonRequest, CreateStaffRequest, CreateStudentRequest, Person,
    PersonQuery, Staff, Student, StudentQuery, UpdatePersonRequest,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ogs_derive::api_handler;
use ogs_kernel::domain::constants::USERS_TAG;
use ogs_kernel::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};

// --- Persons ---

#[api_handler(
    post,
    path = "/api/persons",
    request_body = CreatePersonRequest,
    responses(
        (status = CREATED, description = "Person created", body = Person),
        (status = BAD_REQUEST, body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn create_person(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreatePersonRequest>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.create(body).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

#[api_handler(
    get,
    path = "/api/persons",
    params(PersonQuery),
    responses((status = OK, description = "Persons ordered by name", body = [Person])),
    tag = USERS_TAG,
)]
pub(crate) async fn list_persons(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<PersonQuery>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let persons = state.try_get_slice::<Users>()?.persons.list(&filter).await?;
    Ok(Json(persons))
}

#[api_handler(
    get,
    path = "/api/persons/{id}",
    params(("id" = String, Path, description = "Person id")),
    responses((status = OK, body = Person), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn get_person(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.get(&id).await?;
    Ok(Json(person))
}

#[api_handler(
    put,
    path = "/api/persons/{id}",
    params(("id" = String, Path, description = "Person id")),
    request_body = UpdatePersonRequest,
    responses(
        (status = OK, body = Person),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn update_person(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdatePersonRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.update(&id, body).await?;
    Ok(Json(person))
}

#[api_handler(
    delete,
    path = "/api/persons/{id}",
    params(("id" = String, Path, description = "Person id")),
    responses(
        (status = NO_CONTENT, description = "Person and RFID card deleted"),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Still a student or staff member", body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn delete_person(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Users>()?.persons.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    put,
    path = "/api/persons/{id}/tag",
    params(("id" = String, Path, description = "Person id")),
    request_body = AssignTagRequest,
    responses(
        (status = OK, body = Person),
        (status = BAD_REQUEST, description = "Malformed tag", body = ErrorBody),
        (status = NOT_FOUND, body = ErrorBody),
        (status = CONFLICT, description = "Tag held by another person", body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn assign_tag(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AssignTagRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.assign_tag(&id, &body.tag).await?;
    Ok(Json(person))
}

#[api_handler(
    delete,
    path = "/api/persons/{id}/tag",
    params(("id" = String, Path, description = "Person id")),
    responses((status = OK, body = Person), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn unassign_tag(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.unassign_tag(&id).await?;
    Ok(Json(person))
}

#[api_handler(
    get,
    path = "/api/persons/by-tag/{tag}",
    params(("tag" = String, Path, description = "RFID tag, separators allowed")),
    responses((status = OK, body = Person), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn find_by_tag(
    State(state): State<ApiState>,
    Path(tag): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state.try_get_slice::<Users>()?.persons.find_by_tag(&tag).await?;
    Ok(Json(person))
}

// --- Students ---

#[api_handler(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = CREATED, body = Student),
        (status = BAD_REQUEST, body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown person", body = ErrorBody),
        (status = CONFLICT, description = "Person is already a student", body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn create_student(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state.try_get_slice::<Users>()?.students.create(body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[api_handler(
    get,
    path = "/api/students",
    params(StudentQuery),
    responses((status = OK, body = [Student])),
    tag = USERS_TAG,
)]
pub(crate) async fn list_students(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<StudentQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.try_get_slice::<Users>()?.students.list(&filter).await?;
    Ok(Json(students))
}

#[api_handler(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses((status = OK, body = Student), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn get_student(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let student = state.try_get_slice::<Users>()?.students.get(&id).await?;
    Ok(Json(student))
}

#[api_handler(
    get,
    path = "/api/students/by-person/{person_id}",
    params(("person_id" = String, Path, description = "Person id")),
    responses((status = OK, body = Student), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn student_by_person(
    State(state): State<ApiState>,
    Path(person_id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let student = state.try_get_slice::<Users>()?.students.by_person(&person_id).await?;
    Ok(Json(student))
}

#[api_handler(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn delete_student(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Users>()?.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Staff ---

#[api_handler(
    post,
    path = "/api/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = CREATED, body = Staff),
        (status = NOT_FOUND, description = "Unknown person", body = ErrorBody),
        (status = CONFLICT, description = "Person is already staff", body = ErrorBody),
    ),
    tag = USERS_TAG,
)]
pub(crate) async fn create_staff(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Staff>), ApiError> {
    let staff = state.try_get_slice::<Users>()?.staff.create(body).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

#[api_handler(
    get,
    path = "/api/staff",
    responses((status = OK, body = [Staff])),
    tag = USERS_TAG,
)]
pub(crate) async fn list_staff(State(state): State<ApiState>) -> Result<Json<Vec<Staff>>, ApiError> {
    let staff = state.try_get_slice::<Users>()?.staff.list().await?;
    Ok(Json(staff))
}

#[api_handler(
    get,
    path = "/api/staff/{id}",
    params(("id" = String, Path, description = "Staff id")),
    responses((status = OK, body = Staff), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn get_staff(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError> {
    let staff = state.try_get_slice::<Users>()?.staff.get(&id).await?;
    Ok(Json(staff))
}

#[api_handler(
    delete,
    path = "/api/staff/{id}",
    params(("id" = String, Path, description = "Staff id")),
    responses((status = NO_CONTENT), (status = NOT_FOUND, body = ErrorBody)),
    tag = USERS_TAG,
)]
pub(crate) async fn delete_staff(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.try_get_slice::<Users>()?.staff.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
