use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_group, handlers::list_groups))
        .routes(routes!(handlers::get_group, handlers::update_group, handlers::delete_group))
        .routes(routes!(handlers::list_members, handlers::add_member))
        .routes(routes!(handlers::remove_member))
}
