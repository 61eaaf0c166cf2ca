//! In-process `Api` used by unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use super::{Api, LikeModel};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Comment, Credentials, Like, LikeRef, NewComment, NewPost, NewProfile, Post, PostId, Profile,
    ProfileUpdate, RegisterOutcome, Registration, UserId,
};

pub(crate) struct FakeApi {
    pub token: String,
    pub me: Profile,
    pub profiles: Vec<Profile>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
    pub register_outcome: RegisterOutcome,
    pub like_model: LikeModel,
    /// Endpoint names that answer with an error.
    pub failing: HashSet<&'static str>,
    /// Endpoint names that answer 500 instead of 401.
    pub server_errors: HashSet<&'static str>,
    /// Collection fetches wait here until every party has arrived.
    pub gate: Option<Arc<Barrier>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            token: "fresh-token".to_string(),
            me: Profile {
                id: 1,
                user_id: 10,
                nickname: "alice".to_string(),
                ..Profile::default()
            },
            profiles: Vec::new(),
            posts: Vec::new(),
            comments: Vec::new(),
            likes: Vec::new(),
            register_outcome: RegisterOutcome::Created { user_id: 10 },
            like_model: LikeModel::Joined,
            failing: HashSet::new(),
            server_errors: HashSet::new(),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn server_error(mut self, endpoint: &'static str) -> Self {
        self.server_errors.insert(endpoint);
        self
    }

    pub fn gated(mut self, parties: usize) -> Self {
        self.gate = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, endpoint: &str) -> bool {
        self.calls().iter().any(|c| *c == endpoint)
    }

    fn record(&self, endpoint: &'static str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(endpoint);
        self.outcome(endpoint)
    }

    fn outcome(&self, endpoint: &'static str) -> ClientResult<()> {
        if self.server_errors.contains(endpoint) {
            return Err(ClientError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        if self.failing.contains(endpoint) {
            return Err(ClientError::Unauthorized);
        }
        Ok(())
    }

    /// Recorded as soon as the request is issued, answered once the gate
    /// (if any) opens.
    async fn collection(&self, endpoint: &'static str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(endpoint);
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        self.outcome(endpoint)
    }
}

#[async_trait]
impl Api for FakeApi {
    async fn login(&self, _creds: &Credentials) -> ClientResult<String> {
        self.record("login")?;
        Ok(self.token.clone())
    }

    async fn register(&self, _form: &Registration) -> ClientResult<RegisterOutcome> {
        self.record("register")?;
        Ok(self.register_outcome.clone())
    }

    async fn create_profile(
        &self,
        _token: Option<&str>,
        profile: &NewProfile,
    ) -> ClientResult<Profile> {
        self.record("create_profile")?;
        Ok(Profile {
            id: 1,
            user_id: profile.id,
            nickname: profile.nickname.clone(),
            ..Profile::default()
        })
    }

    async fn update_profile(&self, _token: &str, update: &ProfileUpdate) -> ClientResult<Profile> {
        self.record("update_profile")?;
        Ok(Profile {
            id: update.id,
            user_id: self.me.user_id,
            nickname: update.nickname.clone(),
            img_profile: update.image.as_ref().map(|i| i.file_name.clone()),
            ..Profile::default()
        })
    }

    async fn my_profile(&self, _token: &str) -> ClientResult<Profile> {
        self.record("my_profile")?;
        Ok(self.me.clone())
    }

    async fn profiles(&self, _token: &str) -> ClientResult<Vec<Profile>> {
        self.collection("profiles").await?;
        Ok(self.profiles.clone())
    }

    async fn posts(&self, _token: &str) -> ClientResult<Vec<Post>> {
        self.collection("posts").await?;
        Ok(self.posts.clone())
    }

    async fn create_post(&self, _token: &str, post: &NewPost) -> ClientResult<Post> {
        self.record("create_post")?;
        Ok(Post {
            id: 100,
            user_id: self.me.user_id,
            title: post.title.clone(),
            img_post: post.image.as_ref().map(|i| i.file_name.clone()),
            ..Post::default()
        })
    }

    async fn comments(&self, _token: &str) -> ClientResult<Vec<Comment>> {
        self.collection("comments").await?;
        Ok(self.comments.clone())
    }

    async fn create_comment(&self, _token: &str, comment: &NewComment) -> ClientResult<Comment> {
        self.record("create_comment")?;
        Ok(Comment {
            id: 500,
            user_id: self.me.user_id,
            post_id: comment.post,
            text: comment.text.clone(),
            ..Comment::default()
        })
    }

    async fn likes(&self, _token: &str) -> ClientResult<Vec<Like>> {
        self.collection("likes").await?;
        Ok(self.likes.clone())
    }

    async fn create_like(&self, _token: &str, like: &LikeRef) -> ClientResult<Like> {
        self.record("create_like")?;
        Ok(Like {
            user_id: like.login_id,
            post_id: like.post,
            ..Like::default()
        })
    }

    async fn delete_like(&self, _token: &str, _like: &LikeRef) -> ClientResult<()> {
        self.record("delete_like")
    }

    async fn replace_liked(
        &self,
        _token: &str,
        post: PostId,
        liked: &[UserId],
    ) -> ClientResult<Post> {
        self.record("replace_liked")?;
        let mut updated = self
            .posts
            .iter()
            .find(|p| p.id == post)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("post {post}")))?;
        updated.liked = liked.to_vec();
        Ok(updated)
    }

    fn like_model(&self) -> LikeModel {
        self.like_model
    }
}
