use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::ClientResult;
use crate::forms::ALNUM;

pub type UserId = u64;
pub type PostId = u64;
pub type ProfileId = u64;
pub type CommentId = u64;

/// RFC 3339 or the `Y-m-d H:i:s` form some backends emit, read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|t| t.and_utc())
        })
}

// An unreadable timestamp becomes `None` instead of failing the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

// Both backends are accepted: the aliases cover the field names the
// alternate backend uses for the same columns.

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(alias = "userProfile")]
    pub user_id: UserId,
    pub nickname: String,
    #[serde(default, alias = "img")]
    pub img_profile: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(alias = "userPost")]
    pub user_id: UserId,
    pub title: String,
    #[serde(default, alias = "img")]
    pub img_post: Option<String>,
    /// Liking user ids, only populated by the embedded-likes backend.
    #[serde(default)]
    pub liked: Vec<UserId>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    #[serde(alias = "userComment")]
    pub user_id: UserId,
    #[serde(alias = "post")]
    pub post_id: PostId,
    pub text: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Like {
    pub user_id: UserId,
    pub post_id: PostId,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Like {
    pub fn matches(&self, key: &LikeRef) -> bool {
        self.user_id == key.login_id && self.post_id == key.post
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(
        length(min = 8, max = 64),
        regex(path = *ALNUM)
    )]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Registration {
    #[validate(email)]
    pub email: String,
    #[validate(
        length(min = 8, max = 64),
        regex(path = *ALNUM)
    )]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

/// Result of a registration call. The backend reports a duplicate
/// e-mail as a field message inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created { user_id: UserId },
    EmailTaken { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: UserId,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProfileUpdate {
    pub id: ProfileId,
    #[validate(length(min = 1, max = 20))]
    pub nickname: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, max = 100))]
    pub text: String,
    pub post: PostId,
}

/// Identifies a like by the (user, post) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeRef {
    #[serde(rename = "loginId")]
    pub login_id: UserId,
    pub post: PostId,
}

/// An image file ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_png_or_jpeg(&self) -> bool {
        matches!(self.mime.as_str(), "image/png" | "image/jpeg")
    }
}
