use serde::Deserialize;

use crate::models::{LikeRef, PostId, ProfileId};

/// Which backend the client talks to. The two differ in paths, token
/// shape, authorization scheme and how likes are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Laravel,
    Django,
}

/// How likes are represented by a backend. Never mixed in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeModel {
    /// Separate `{user_id, post_id}` records with their own endpoint.
    Joined,
    /// A `liked` array of user ids on each post.
    Embedded,
}

impl Flavor {
    pub fn auth_scheme(self) -> &'static str {
        match self {
            Flavor::Laravel => "Bearer",
            Flavor::Django => "JWT",
        }
    }

    pub fn authorization(self, token: &str) -> String {
        format!("{} {}", self.auth_scheme(), token)
    }

    /// Field of the login response that carries the access token.
    pub fn token_field(self) -> &'static str {
        match self {
            Flavor::Laravel => "access_token",
            Flavor::Django => "access",
        }
    }

    pub fn like_model(self) -> LikeModel {
        match self {
            Flavor::Laravel => LikeModel::Joined,
            Flavor::Django => LikeModel::Embedded,
        }
    }

    pub fn login_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/auth/login",
            Flavor::Django => "authen/jwt/create/",
        }
    }

    pub fn register_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/register",
            Flavor::Django => "api/register/",
        }
    }

    pub fn profiles_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/profiles",
            Flavor::Django => "api/profile/",
        }
    }

    pub fn my_profile_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/profiles/me",
            Flavor::Django => "api/myprofile/",
        }
    }

    pub fn profile_update_path(self, id: ProfileId) -> String {
        match self {
            Flavor::Laravel => "api/profiles/me".to_string(),
            Flavor::Django => format!("api/profile/{id}/"),
        }
    }

    pub fn posts_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/posts",
            Flavor::Django => "api/post/",
        }
    }

    pub fn post_path(self, id: PostId) -> String {
        match self {
            Flavor::Laravel => format!("api/posts/{id}"),
            Flavor::Django => format!("api/post/{id}/"),
        }
    }

    pub fn comments_path(self) -> &'static str {
        match self {
            Flavor::Laravel => "api/comments",
            Flavor::Django => "api/comment/",
        }
    }

    pub fn likes_path(self) -> &'static str {
        "api/likes"
    }

    pub fn like_path(self, like: &LikeRef) -> String {
        format!("api/likes/{}-{}", like.post, like.login_id)
    }
}
