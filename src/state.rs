// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::identity::IdentityResolver,
    config::Config,
    store::StoreState,
    utils::{
        hash::{Argon2Hasher, HasherState},
        jwt::TokenService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: StoreState,
    pub tokens: TokenService,
    pub hasher: HasherState,
    pub config: Config,
}

impl AppState {
    /// Builds the state with the default Argon2 hasher.
    pub fn new(config: Config, store: StoreState) -> Self {
        Self::with_hasher(config, store, Arc::new(Argon2Hasher::default()))
    }

    pub fn with_hasher(config: Config, store: StoreState, hasher: HasherState) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration);
        Self {
            store,
            tokens,
            hasher,
            config,
        }
    }
}

impl FromRef<AppState> for StoreState {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for HasherState {
    fn from_ref(state: &AppState) -> Self {
        state.hasher.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for IdentityResolver {
    fn from_ref(state: &AppState) -> Self {
        IdentityResolver::new(state.tokens.clone(), state.store.clone())
    }
}
