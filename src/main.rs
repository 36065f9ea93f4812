use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use inksa_auth_api::auth::Role;
use inksa_auth_api::database::DatabaseManager;
use inksa_auth_api::{handlers, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = inksa_auth_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Inksa Auth API in {:?} mode", config.environment);

    // Fail closed: without the privileged credential (or the explicitly
    // configured fallback) the admin-audit routes must not come up at all.
    if let Err(e) = DatabaseManager::init_privileged() {
        tracing::error!("Refusing to start: {}", e);
        std::process::exit(1);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("INKSA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Inksa Auth API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(whoami_routes())
        .merge(delivery_routes())
        .merge(audit_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http())
}

/// Routes any authenticated marketplace role can reach.
fn whoami_routes() -> Router {
    use handlers::protected::auth;

    middleware::protect(
        Router::new().route("/api/auth/whoami", get(auth::session_whoami)),
        Role::ALL,
    )
}

/// Courier-only routes.
fn delivery_routes() -> Router {
    use handlers::protected::delivery;

    middleware::protect(
        Router::new().route("/api/delivery/profile", get(delivery::delivery_profile)),
        &[Role::Delivery],
    )
}

/// Admin-only audit surface.
fn audit_routes() -> Router {
    use handlers::elevated::logs;

    middleware::protect(
        Router::new()
            .route("/api/audit", get(logs::logs_list))
            // Route name used by the first admin frontend; kept as an alias
            .route("/api/logs", get(logs::logs_list))
            .route("/api/audit/export", get(logs::logs_export))
            .route("/api/audit/health", get(logs::audit_health)),
        &[Role::Admin],
    )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Inksa Auth API (Rust)",
            "version": version,
            "description": "Authentication and admin-audit backend for the Inksa Delivery marketplace",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "whoami": "/api/auth/whoami (protected - any role)",
                "delivery": "/api/delivery/profile (protected - delivery)",
                "audit": "/api/audit[?page&limit&sort&admin&action&q] (admin, alias /api/logs)",
                "audit_export": "/api/audit/export (admin)",
                "audit_health": "/api/audit/health (admin)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
