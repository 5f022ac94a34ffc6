use crate::auth::{IdentityResolver, OauthFlow};
use crate::config::Config;
use crate::db::Storage;
use crate::handlers;
use crate::pipeline::MemePipeline;
use crate::providers;
use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

#[derive(Clone)]
pub struct ForgeState {
    pub storage: Storage,
    pub identity: IdentityResolver,
    pub pipeline: Arc<MemePipeline>,
    pub oauth: Arc<OauthFlow>,
    pub page_size: u32,
    key: Key,
}

impl ForgeState {
    pub fn new(storage: Storage, cfg: &Config) -> Self {
        let http = providers::http_client();
        let identity = IdentityResolver::new(storage.clone());
        let pipeline = Arc::new(MemePipeline::new(
            storage.clone(),
            &cfg.providers,
            http.clone(),
        ));
        let oauth = Arc::new(OauthFlow::new(cfg.oauth.clone(), http));
        let key = match cfg.session_secret.as_deref() {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => Key::generate(),
        };
        Self {
            storage,
            identity,
            pipeline,
            oauth,
            page_size: cfg.page_size,
            key,
        }
    }
}

impl FromRef<ForgeState> for Key {
    fn from_ref(state: &ForgeState) -> Key {
        state.key.clone()
    }
}

pub fn forge_router(state: ForgeState) -> Router {
    Router::new()
        .route("/", get(handlers::memes::home))
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/login/oauth", get(handlers::auth::oauth_entry))
        .route("/login/oauth/callback", get(handlers::auth::oauth_callback))
        .route("/logout", get(handlers::auth::logout))
        .route("/tags", get(handlers::memes::list_tags))
        .route(
            "/memes",
            get(handlers::memes::browse).post(handlers::memes::create_generated),
        )
        .route("/memes/custom", post(handlers::memes::create_custom))
        .route("/memes/{meme_id}", get(handlers::memes::show))
        .route("/memes/{meme_id}/like", post(handlers::memes::like))
        .with_state(state)
}
