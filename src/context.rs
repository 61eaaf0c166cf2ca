use std::sync::Arc;

use crate::api::Api;
use crate::error::{ClientError, ClientResult};
use crate::flows::SecondaryFailurePolicy;
use crate::models::Credentials;
use crate::session::TokenStore;
use crate::state::Store;

/// Everything a flow needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn Api>,
    pub tokens: Arc<dyn TokenStore>,
    pub store: Store,
    pub policy: SecondaryFailurePolicy,
    pub guest: Option<Credentials>,
}

impl AppContext {
    pub fn new(api: Arc<dyn Api>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            store: Store::new(),
            policy: SecondaryFailurePolicy::default(),
            guest: None,
        }
    }

    pub fn with_policy(mut self, policy: SecondaryFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_guest(mut self, guest: Option<Credentials>) -> Self {
        self.guest = guest;
        self
    }

    /// The stored session token, or `NotLoggedIn` when there is none.
    pub fn token(&self) -> ClientResult<String> {
        self.tokens.read()?.ok_or(ClientError::NotLoggedIn)
    }
}
