use std::sync::Arc;

use advice::AdviceClient;
use axum::{
    Router,
    routing::{get, post},
};
use config::Config;
use tower_http::trace::TraceLayer;

use crate::{
    api::{self, GetAdviceClient, GetAssets, GetConfig, GetSessions},
    assets::AssetStore,
    session::SessionManager,
};

pub type S = AppState;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    sessions: Arc<SessionManager>,
    advice_client: Arc<AdviceClient>,
    assets: Arc<AssetStore>,
}

impl AppState {
    pub fn new(config: Arc<Config>, advice_client: AdviceClient) -> Self {
        Self {
            assets: AssetStore::from_config(&config).into(),
            sessions: SessionManager::new().into(),
            advice_client: advice_client.into(),
            config,
        }
    }

    pub fn sessions_arc(&self) -> Arc<SessionManager> {
        self.sessions.clone()
    }
}

impl GetConfig for AppState {
    fn config(&self) -> &Config {
        &self.config
    }
}

impl GetSessions for AppState {
    fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

impl GetAdviceClient for AppState {
    fn advice_client(&self) -> &Arc<AdviceClient> {
        &self.advice_client
    }
}

impl GetAssets for AppState {
    fn assets(&self) -> &AssetStore {
        &self.assets
    }
}

pub fn create_router(state: AppState) -> Router {
    let debug_mode = state.config().debug_mode();

    let router = Router::new()
        .route(api::PATH_PAGE, get(api::get_page))
        .route(api::PATH_NAVIGATE, post(api::post_navigate))
        .route(api::PATH_PROFILE, post(api::post_profile))
        .route(api::PATH_ADVICE, post(api::post_advice))
        .route(api::PATH_END_SESSION, post(api::post_end_session))
        .route(api::PATH_ASSET, get(api::get_asset))
        .with_state(state);

    if debug_mode {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
