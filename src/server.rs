use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{addresses, contacts, health};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Build the full router: public health check plus the token-protected API
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .route("/api/contacts", post(contacts::create))
        .route("/api/contacts/:contactId", get(contacts::get))
        .route(
            "/api/contacts/:contactId/addresses",
            post(addresses::create).get(addresses::list),
        )
        .route(
            "/api/contacts/:contactId/addresses/:addressId",
            get(addresses::get)
                .put(addresses::update)
                .delete(addresses::remove),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let router = Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
        .layer(cors_layer(&config.security));

    if config.logging.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve until ctrl-c
pub async fn serve(listener: TcpListener, state: AppState, config: &AppConfig) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Contact API listening on http://{}", addr);
    }

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
