use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_feedback, handlers::list_feedback))
        .routes(routes!(handlers::create_batch))
        .routes(routes!(handlers::get_feedback, handlers::delete_feedback))
}
