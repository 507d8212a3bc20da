use std::sync::Arc;

use sea_orm::Database;
use tracing::info;
use url::Url;

use handin_auth::config::AuthConfig;
use handin_auth::infra::mailer::HttpMailer;
use handin_auth::router::build_router;
use handin_auth::state::AppState;

#[tokio::main]
async fn main() {
    handin_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer_url = Url::parse(&config.mailer_url).expect("invalid MAILER_URL");
    let mailer = HttpMailer::new(reqwest::Client::new(), mailer_url);

    let addr = format!("0.0.0.0:{}", config.auth_port);
    let state = AppState {
        db,
        mailer,
        config: Arc::new(config),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
