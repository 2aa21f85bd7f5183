use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_category, handlers::list_categories))
        .routes(routes!(handlers::get_category, handlers::delete_category))
        .routes(routes!(handlers::create_activity, handlers::list_activities))
        .routes(routes!(
            handlers::get_activity,
            handlers::update_activity,
            handlers::delete_activity
        ))
}
