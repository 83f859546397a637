// region:    --- Imports
use crate::config::{Config, StoreBackend};
use crate::database::DatabaseManager;
use crate::handlers;
use crate::store::{InMemoryMarketStore, MarketStore, PostgresMarketStore};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    /// 설정된 백엔드로 저장소 생성
    pub async fn from_config(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Arc<dyn MarketStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set")?;
                let db_manager = DatabaseManager::from_config(config, database_url).await?;
                info!("{:<12} --> 데이터베이스 초기화 성공", "App");
                Arc::new(PostgresMarketStore::new(Arc::new(db_manager)))
            }
            StoreBackend::Memory => {
                info!("{:<12} --> 메모리 저장소 사용", "App");
                Arc::new(InMemoryMarketStore::new())
            }
        };
        Ok(Self::new(store))
    }
}
// endregion: --- App State

// region:    --- Router
/// 라우터 설정
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::handle_get_listings))
        .route("/register", post(handlers::handle_register))
        .route("/listings", get(handlers::handle_get_listings))
        .route("/listings/new", post(handlers::handle_new_listing))
        .route("/listings/:id", get(handlers::handle_get_listing))
        .route("/listings/:id/bid", post(handlers::handle_bid))
        .route("/listings/:id/close", post(handlers::handle_close))
        .route("/listings/:id/comment", post(handlers::handle_comment))
        .route("/listings/:id/watch", post(handlers::handle_watch))
        .route("/listings/:id/unwatch", post(handlers::handle_unwatch))
        .route("/watchlist", get(handlers::handle_get_watchlist))
        .route("/users/:username", get(handlers::handle_get_user))
        .route(
            "/categories",
            get(handlers::handle_get_categories).post(handlers::handle_new_category),
        )
        .route("/categories/:id", get(handlers::handle_get_category))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
// endregion: --- Router
