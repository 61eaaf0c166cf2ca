//! User-facing flows: each one is the sequence of state transitions and
//! network calls a single UI action triggers.

pub mod auth;
pub mod post;

use serde::Deserialize;

use crate::api::LikeModel;
use crate::context::AppContext;
use crate::error::ClientResult;
use crate::state::{AuthAction, PostAction};

pub use auth::{
    guest_login, login, logout, open_login_menu, open_profile_editor, open_register_menu,
    register, update_profile, LoginOutcome, DEFAULT_NICKNAME,
};
pub use post::{new_post, open_composer, post_comment, toggle_like};

/// What to do when one of the fetches issued alongside others fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryFailurePolicy {
    /// Log and carry on with whatever did load.
    #[default]
    BestEffort,
    /// Wait for every fetch to settle, then report the first failure.
    FailFast,
}

impl SecondaryFailurePolicy {
    /// Fold the settled results of a fan-out according to the policy.
    pub fn settle(self, results: Vec<(&'static str, ClientResult<()>)>) -> ClientResult<()> {
        let mut first = None;
        for (name, result) in results {
            if let Err(e) = result {
                tracing::warn!("Fetching {} failed: {}", name, e);
                if first.is_none() {
                    first = Some(e);
                }
            }
        }
        match (self, first) {
            (SecondaryFailurePolicy::FailFast, Some(e)) => Err(e),
            _ => Ok(()),
        }
    }
}

pub async fn fetch_my_profile(ctx: &AppContext) -> ClientResult<()> {
    let token = ctx.token()?;
    let profile = ctx.api.my_profile(&token).await?;
    ctx.store
        .dispatch_auth(AuthAction::MyProfileLoaded(profile))
        .await;
    Ok(())
}

pub async fn fetch_profiles(ctx: &AppContext) -> ClientResult<()> {
    let token = ctx.token()?;
    let profiles = ctx.api.profiles(&token).await?;
    ctx.store
        .dispatch_auth(AuthAction::ProfilesLoaded(profiles))
        .await;
    Ok(())
}

pub async fn fetch_posts(ctx: &AppContext) -> ClientResult<()> {
    let token = ctx.token()?;
    let posts = ctx.api.posts(&token).await?;
    ctx.store.dispatch_post(PostAction::PostsLoaded(posts)).await;
    Ok(())
}

pub async fn fetch_comments(ctx: &AppContext) -> ClientResult<()> {
    let token = ctx.token()?;
    let comments = ctx.api.comments(&token).await?;
    ctx.store
        .dispatch_post(PostAction::CommentsLoaded(comments))
        .await;
    Ok(())
}

pub async fn fetch_likes(ctx: &AppContext) -> ClientResult<()> {
    if ctx.api.like_model() == LikeModel::Embedded {
        return Ok(());
    }
    let token = ctx.token()?;
    let likes = ctx.api.likes(&token).await?;
    ctx.store.dispatch_post(PostAction::LikesLoaded(likes)).await;
    Ok(())
}

/// Fetch posts, profiles, comments and likes concurrently. Every request
/// is issued before any is awaited; each writes its own slice as soon as
/// it resolves.
pub async fn fetch_collections(ctx: &AppContext) -> ClientResult<()> {
    let (posts, profiles, comments, likes) = tokio::join!(
        fetch_posts(ctx),
        fetch_profiles(ctx),
        fetch_comments(ctx),
        fetch_likes(ctx)
    );
    ctx.policy.settle(vec![
        ("posts", posts),
        ("profiles", profiles),
        ("comments", comments),
        ("likes", likes),
    ])
}

/// Everything loaded right after a successful login.
pub async fn fetch_session(ctx: &AppContext) -> ClientResult<()> {
    let (me, collections) = tokio::join!(fetch_my_profile(ctx), fetch_collections(ctx));
    ctx.policy
        .settle(vec![("my profile", me), ("collections", collections)])
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::api::fake::FakeApi;
    use crate::context::AppContext;
    use crate::session::MemoryTokenStore;

    pub(crate) fn context(api: FakeApi, token: Option<&str>) -> (Arc<FakeApi>, AppContext) {
        let api = Arc::new(api);
        let tokens = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let ctx = AppContext::new(api.clone(), Arc::new(tokens));
        (api, ctx)
    }
}
