use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::space as space_handlers;
use super::api::telemetry as telemetry_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Space data feeds
        .route("/api/iss-location", get(space_handlers::iss_location))
        .route("/api/mars-weather", get(space_handlers::mars_weather))
        .route("/api/neos", get(space_handlers::near_objects))
        // Telemetry
        .route("/ws/telemetry", get(telemetry_handlers::stream))
        .route(
            "/api/telemetry/channels",
            get(telemetry_handlers::channel_count),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState::from_config(&config);

    if !state.adapters.credential().is_usable() {
        log::warn!("NASA API key not configured; /api/mars-weather and /api/neos will answer 400");
    }
    match config.upstream.timeout {
        Some(limit) => log::info!(
            "Upstream timeout is {}",
            humantime::format_duration(limit)
        ),
        None => log::warn!("Upstream timeout disabled; a hung upstream blocks its request"),
    }

    let app = build_router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
