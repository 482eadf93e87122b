use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_by_token, security_headers_middleware,
    trace_id, user_auth::require_user_auth, RateLimiterState,
};
use crate::routes::{auth, feedback, health, invitations, users};
use crate::services::{AssistantClient, EmailService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
    pub assistant: Option<Arc<AssistantClient>>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let email = EmailService::new(config.email.clone());

    // A misconfigured assistant shouldn't keep the rest of the app from
    // serving; the chat endpoint reports unavailable instead.
    let assistant = if config.assistant.enabled {
        match AssistantClient::new(config.assistant.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::error!("Failed to initialize chat assistant: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        email,
        assistant,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Account routes (no authentication required)
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    // Public feedback routes, reachable by invitation token alone.
    // Rate-limited per token to keep the unauthenticated surface in check.
    let feedback_public_routes = Router::new()
        .route(
            "/api/v1/feedback/invitations/:token",
            get(feedback::get_invitation).post(feedback::submit_feedback),
        )
        .route(
            "/api/v1/feedback/invitations/:token/chat",
            post(feedback::chat),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_by_token,
        ));

    // Routes that require an authenticated user
    let protected_routes = Router::new()
        .route(
            "/api/v1/invitations",
            post(invitations::create_invitations).get(invitations::list_invitations),
        )
        .route("/api/v1/feedback", get(feedback::list_my_feedback))
        .route(
            "/api/v1/users/me",
            get(users::get_me).put(users::update_me),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(feedback_public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
