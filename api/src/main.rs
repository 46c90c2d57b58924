use api::routes::routes;
use api::{auth::middleware::log_request, ws::ws_routes};
use axum::{Router, middleware::from_fn};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::{config, state::AppState, ws::WebSocketManager};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    if config::jwt_secret().trim().is_empty() {
        tracing::error!("JWT_SECRET is not set; refusing to start");
        std::process::exit(1);
    }

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, path = %config::database_path(), "Failed to connect to database");
            std::process::exit(1);
        }
    };
    let app_state = AppState::new(db, WebSocketManager::new());

    let app = Router::new()
        .nest("/api", routes(app_state.clone()))
        .nest("/ws", ws_routes(app_state.clone()))
        .layer(from_fn(log_request))
        .layer(CorsLayer::very_permissive())
        .with_state(app_state);

    let addr: SocketAddr = match format!("{}:{}", config::host(), config::port()).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %config::host(), port = config::port(), "Invalid listen address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(
        project = %config::project_name(),
        env = %config::env(),
        %addr,
        "Server listening"
    );
    println!("Starting {} on http://{addr}", config::project_name());

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "Server crashed");
        std::process::exit(1);
    }
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
