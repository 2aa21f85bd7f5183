use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::start_session, handlers::list_sessions))
        .routes(routes!(handlers::get_session))
        .routes(routes!(handlers::end_session))
        .routes(routes!(handlers::list_supervisors, handlers::claim_supervision))
        .routes(routes!(handlers::release_supervision))
        .routes(routes!(handlers::list_visits))
        .routes(routes!(handlers::scan))
        .routes(routes!(handlers::check_in))
        .routes(routes!(handlers::check_out))
        .routes(routes!(handlers::current_visit))
}
