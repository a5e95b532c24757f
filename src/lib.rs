pub mod admin;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod wizard;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::admin::session::{SessionGuard, TokenStore};
use crate::admin::AdminState;
use crate::clients::backend::BackendClient;
use crate::clients::geocode::GeocodeClient;
use crate::wizard::store::SessionStore;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub geocoder: GeocodeClient,
    pub sessions: SessionStore,
    pub admin: Arc<RwLock<AdminState>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = BackendClient::new(config.backend_base_url.clone());
        let geocoder = GeocodeClient::new(config.geocoding_base_url.clone());
        let guard = SessionGuard::new(TokenStore::new(config.admin_token_file.clone()));
        Self {
            config,
            backend,
            geocoder,
            sessions: SessionStore::new(),
            admin: Arc::new(RwLock::new(AdminState::new(guard))),
        }
    }
}
