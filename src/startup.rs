use crate::config::Config;
use crate::events::{all_polls_sse, poll_events_ws, poll_updates_sse};
use crate::polls::{create_poll, get_poll, health, list_polls, vote_on_poll};
use crate::service::PollService;
use axum::{
    Router,
    extract::Extension,
    http::{
        Method, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(service: PollService, config: &Config) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/polls", get(list_polls).post(create_poll))
        .route("/polls/:id", get(get_poll))
        .route("/polls/:id/vote", post(vote_on_poll))
        .route("/polls/:id/events", get(poll_updates_sse))
        .route("/events", get(all_polls_sse));

    Router::new()
        .nest("/api", api)
        .route("/ws", get(poll_events_ws))
        .fallback(handler_404)
        .layer(Extension(service))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_credentials(true)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
