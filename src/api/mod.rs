pub mod flavor;
pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{
    Comment, Credentials, Like, LikeRef, NewComment, NewPost, NewProfile, Post, PostId, Profile,
    ProfileUpdate, RegisterOutcome, Registration, UserId,
};

pub use flavor::{Flavor, LikeModel};
pub use http::HttpApi;

/// Every remote call the client makes. Authenticated calls take the
/// session token explicitly; nothing here reads persisted state.
#[async_trait]
pub trait Api: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(&self, creds: &Credentials) -> ClientResult<String>;

    async fn register(&self, form: &Registration) -> ClientResult<RegisterOutcome>;

    /// Create the initial profile of a freshly registered user. Runs right
    /// after registration, so a session token may not exist yet.
    async fn create_profile(
        &self,
        token: Option<&str>,
        profile: &NewProfile,
    ) -> ClientResult<Profile>;

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ClientResult<Profile>;

    async fn my_profile(&self, token: &str) -> ClientResult<Profile>;

    async fn profiles(&self, token: &str) -> ClientResult<Vec<Profile>>;

    async fn posts(&self, token: &str) -> ClientResult<Vec<Post>>;

    async fn create_post(&self, token: &str, post: &NewPost) -> ClientResult<Post>;

    async fn comments(&self, token: &str) -> ClientResult<Vec<Comment>>;

    async fn create_comment(&self, token: &str, comment: &NewComment) -> ClientResult<Comment>;

    async fn likes(&self, token: &str) -> ClientResult<Vec<Like>>;

    async fn create_like(&self, token: &str, like: &LikeRef) -> ClientResult<Like>;

    async fn delete_like(&self, token: &str, like: &LikeRef) -> ClientResult<()>;

    /// Replace the embedded liked-user list of a post (embedded-likes backend).
    async fn replace_liked(
        &self,
        token: &str,
        post: PostId,
        liked: &[UserId],
    ) -> ClientResult<Post>;

    fn like_model(&self) -> LikeModel;
}
