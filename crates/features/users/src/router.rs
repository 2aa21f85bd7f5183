use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_person, handlers::list_persons))
        .routes(routes!(handlers::get_person, handlers::update_person, handlers::delete_person))
        .routes(routes!(handlers::assign_tag, handlers::unassign_tag))
        .routes(routes!(handlers::find_by_tag))
        .routes(routes!(handlers::create_student, handlers::list_students))
        .routes(routes!(handlers::get_student, handlers::delete_student))
        .routes(routes!(handlers::student_by_person))
        .routes(routes!(handlers::create_staff, handlers::list_staff))
        .routes(routes!(handlers::get_staff, handlers::delete_staff))
}
