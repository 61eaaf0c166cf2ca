pub mod auth;
pub mod post;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use auth::{AuthAction, AuthState, Modal};
pub use post::{PostAction, PostState};

/// The two client-side state containers. Each slice has its own lock so
/// concurrent fetches writing different collections never wait on each
/// other; the last write to a slice wins.
#[derive(Clone, Default)]
pub struct Store {
    auth: Arc<Mutex<AuthState>>,
    post: Arc<Mutex<PostState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn dispatch_auth(&self, action: AuthAction) {
        tracing::debug!(action = action.name(), "auth");
        self.auth.lock().await.apply(action);
    }

    pub async fn dispatch_post(&self, action: PostAction) {
        tracing::debug!(action = action.name(), "post");
        self.post.lock().await.apply(action);
    }

    /// Snapshot of the auth container.
    pub async fn auth(&self) -> AuthState {
        self.auth.lock().await.clone()
    }

    /// Snapshot of the post container.
    pub async fn post(&self) -> PostState {
        self.post.lock().await.clone()
    }
}
