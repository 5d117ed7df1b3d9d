use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/contacts", contact_routes(config))
        .nest("/chat", chat_routes())
        .nest("/team", team_routes())
        .nest("/services", service_routes())
}

fn contact_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let router = OpenApiRouter::new().routes(routes!(handlers::contact::submit_contact));
    if !config.admin.enabled {
        return router;
    }
    router
        .routes(routes!(handlers::contact::list_contacts))
        .routes(routes!(handlers::contact::contact_summary))
        .routes(routes!(handlers::contact::get_contact))
        .routes(routes!(handlers::contact::update_contact_status))
}

fn chat_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::chat::post_message))
        .routes(routes!(handlers::chat::get_conversation))
        .routes(routes!(handlers::chat::create_ticket))
}

fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::team::list_team))
        .routes(routes!(handlers::team::get_team_member))
}

fn service_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::service::list_services))
        .routes(routes!(handlers::service::list_services_by_category))
        .routes(routes!(handlers::service::get_service))
}
