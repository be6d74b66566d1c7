use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use chrono::Duration;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::password::PasswordHasher;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::token::TokenService;
use service::auth::AuthService;

use crate::auth::ServerState;
use crate::routes;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Token validity window; config.toml `[auth]` section, 900s when absent.
fn load_token_ttl() -> Duration {
    let secs = configs::load_default()
        .map(|cfg| cfg.auth.token_ttl_secs)
        .unwrap_or(900);
    Duration::seconds(secs)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection and schema
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Process-wide token secret, loaded once at startup
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());

    let repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db });
    let auth = Arc::new(AuthService::new(
        repo,
        PasswordHasher::default(),
        TokenService::new(jwt_secret.as_bytes(), load_token_ttl()),
    ));
    let state = ServerState { auth };

    // Build router
    let app: Router = routes::build_router(build_cors(), state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting user account server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
