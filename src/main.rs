mod config;
mod loader;
mod routes;
mod schema;
mod services;
mod state;
mod store;
mod writer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();
    let port = config.port;
    let cors_permissive = config.cors_permissive;
    tracing::info!(
        settings = %config.settings_path.display(),
        subscriptions = %config.subscriptions_path.display(),
        "opening data files"
    );

    let state = state::AppState::from_config(config);
    tracing::info!(
        settings = state.store.len(),
        events = state.listings.events.len(),
        portfolio = state.listings.portfolio.len(),
        news = state.listings.news.len(),
        subscriptions = state.subscriptions.len(),
        "content loaded"
    );

    let app = routes::app(state, cors_permissive);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sitedesk listening");
    axum::serve(listener, app).await.expect("server failed");
}
