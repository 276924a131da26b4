use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

/// Page routes. Paths keep the trailing slash of the public URLs.
pub fn page_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::dashboard::dashboard))
        .routes(routes!(handlers::activity::search_activities))
        .merge(activity_routes())
}

fn activity_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::activity::list_activities))
        .routes(routes!(handlers::activity::create_activity))
        .routes(routes!(handlers::activity::get_activity))
        .routes(routes!(
            handlers::activity::edit_activity_form,
            handlers::activity::update_activity
        ))
        .routes(routes!(handlers::activity::delete_activity))
}
