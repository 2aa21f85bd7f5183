use crate::handlers;
use ogs_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_room, handlers::list_rooms))
        .routes(routes!(handlers::get_room, handlers::update_room, handlers::delete_room))
}
