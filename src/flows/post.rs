use crate::api::LikeModel;
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::forms;
use crate::models::{Comment, ImageUpload, LikeRef, NewComment, NewPost, Post, PostId, UserId};
use crate::state::{AuthAction, Modal, PostAction};
use validator::Validate;

pub async fn new_post(
    ctx: &AppContext,
    title: &str,
    image: Option<ImageUpload>,
) -> ClientResult<Post> {
    let request = NewPost {
        title: title.to_string(),
        image,
    };
    forms::validate_new_post(&request)?;
    let token = ctx.token()?;

    ctx.store.dispatch_post(PostAction::Loading(true)).await;
    ctx.store.dispatch_post(PostAction::Composer(false)).await;
    let result = ctx.api.create_post(&token, &request).await;
    if let Ok(post) = &result {
        tracing::info!("Created post {}", post.id);
        ctx.store
            .dispatch_post(PostAction::PostCreated(post.clone()))
            .await;
    }
    ctx.store.dispatch_post(PostAction::Loading(false)).await;
    result
}

pub async fn post_comment(ctx: &AppContext, post: PostId, text: &str) -> ClientResult<Comment> {
    let request = NewComment {
        text: text.to_string(),
        post,
    };
    request.validate()?;
    let token = ctx.token()?;

    let comment = ctx.api.create_comment(&token, &request).await?;
    ctx.store
        .dispatch_post(PostAction::CommentCreated(comment.clone()))
        .await;
    Ok(comment)
}

/// Like the post if the current user has not, otherwise take the like back.
/// Returns whether the post is liked afterwards.
pub async fn toggle_like(ctx: &AppContext, post: PostId) -> ClientResult<bool> {
    let token = ctx.token()?;
    let me = ctx
        .store
        .auth()
        .await
        .my_user_id()
        .ok_or(ClientError::NotLoggedIn)?;

    match ctx.api.like_model() {
        LikeModel::Joined => toggle_joined(ctx, &token, me, post).await,
        LikeModel::Embedded => toggle_embedded(ctx, &token, me, post).await,
    }
}

async fn toggle_joined(
    ctx: &AppContext,
    token: &str,
    me: UserId,
    post: PostId,
) -> ClientResult<bool> {
    let key = LikeRef { login_id: me, post };
    let already = ctx.store.post().await.likes.iter().any(|l| l.matches(&key));

    if already {
        ctx.api.delete_like(token, &key).await?;
        ctx.store.dispatch_post(PostAction::LikeDeleted(key)).await;
        Ok(false)
    } else {
        let like = ctx.api.create_like(token, &key).await?;
        ctx.store.dispatch_post(PostAction::LikeCreated(like)).await;
        Ok(true)
    }
}

async fn toggle_embedded(
    ctx: &AppContext,
    token: &str,
    me: UserId,
    post: PostId,
) -> ClientResult<bool> {
    let mut liked = ctx
        .store
        .post()
        .await
        .post(post)
        .map(|p| p.liked.clone())
        .ok_or_else(|| ClientError::NotFound(format!("post {post}")))?;

    let now_liked = if liked.contains(&me) {
        liked.retain(|id| *id != me);
        false
    } else {
        liked.push(me);
        true
    };

    let updated = ctx.api.replace_liked(token, post, &liked).await?;
    ctx.store.dispatch_post(PostAction::PostReplaced(updated)).await;
    Ok(now_liked)
}

pub async fn open_composer(ctx: &AppContext) {
    ctx.store.dispatch_post(PostAction::Composer(true)).await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Profile, false))
        .await;
}
