use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::AppState;
use crate::database;
use crate::services::language_detection::WhatlangDetector;
use crate::services::message_data::MessageData;
use crate::services::safeguarding::SafeguardingService;
use crate::services::word_lists::{WordList, WhitelistTable};
use crate::utils::jwt::JwtService;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn load_safeguarding() -> anyhow::Result<SafeguardingService> {
    let bad_words = match std::env::var("BAD_WORDS_PATH") {
        Ok(path) => WordList::from_file(path)?,
        Err(_) => WordList::embedded(),
    };

    let whitelist = match std::env::var("WHITELIST_PATH") {
        Ok(path) => WhitelistTable::from_file(path)?,
        Err(_) => WhitelistTable::embedded()?,
    };

    if bad_words.is_empty() {
        tracing::warn!("Bad word list is empty, messages will not be censored");
    }

    if whitelist.is_empty() {
        tracing::warn!("Whitelist table is empty, no language exemptions apply");
    }

    let service = SafeguardingService::new(Arc::new(WhatlangDetector), &bad_words, &whitelist)?;
    Ok(service)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", crate::api::routes(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn register_routes() -> anyhow::Result<Router> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://chatguard.db?mode=rwc".to_string());

    let db = database::create_pool(&database_url).await?;

    tracing::info!("Database connected and migrations applied");

    let jwt_service = Arc::new(JwtService::from_env()?);
    let safeguarding = Arc::new(load_safeguarding()?);

    tracing::info!("Safeguarding word lists loaded");

    let state = Arc::new(AppState {
        messages: MessageData::new(db),
        safeguarding,
        jwt_service,
    });

    Ok(build_router(state))
}
