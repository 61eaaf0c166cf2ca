use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{Api, Flavor, LikeModel};
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Comment, Credentials, ImageUpload, Like, LikeRef, NewComment, NewPost, NewProfile, Post,
    PostId, Profile, ProfileUpdate, RegisterOutcome, Registration, UserId,
};

pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";

/// The only registration message treated as a duplicate account.
pub const DUPLICATE_EMAIL: &str = "The email has already been taken.";

/// reqwest-backed implementation of [`Api`].
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    flavor: Flavor,
    method_override: bool,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        // The backend rejects anything that does not look like an Ajax call.
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client,
            base: Url::parse(&base)?,
            flavor: config.flavor,
            method_override: config.method_override,
        })
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(header::AUTHORIZATION, self.flavor.authorization(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> ClientResult<T> {
        tracing::debug!("GET {}", path);
        let request = self.authorized(self.client.get(self.url(path)?), token);
        read_json(request.send().await?).await
    }

    fn image_part(image: &ImageUpload) -> ClientResult<Part> {
        Ok(Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)?)
    }
}

async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Request failed with {}", status);
    Err(ClientError::from_status(status, body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// First field message attached to `email`, either at the top level or
/// under a Laravel-style `errors` object.
fn email_message(value: &Value) -> Option<String> {
    let field = value
        .get("email")
        .or_else(|| value.get("errors").and_then(|e| e.get("email")))?;
    field.as_array()?.first()?.as_str().map(str::to_string)
}

#[derive(Deserialize)]
struct CreatedUser {
    id: UserId,
}

#[async_trait]
impl Api for HttpApi {
    async fn login(&self, creds: &Credentials) -> ClientResult<String> {
        tracing::debug!("POST {}", self.flavor.login_path());
        let response = self
            .client
            .post(self.url(self.flavor.login_path())?)
            .json(creds)
            .send()
            .await?;
        let value: Value = read_json(response).await?;
        value
            .get(self.flavor.token_field())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ClientError::MissingToken(self.flavor.token_field()))
    }

    async fn register(&self, form: &Registration) -> ClientResult<RegisterOutcome> {
        tracing::debug!("POST {}", self.flavor.register_path());
        let response = self
            .client
            .post(self.url(self.flavor.register_path())?)
            .json(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if let Some(message) = email_message(&value) {
            if message == DUPLICATE_EMAIL && (status.is_success() || status.as_u16() == 422) {
                return Ok(RegisterOutcome::EmailTaken { message });
            }
            tracing::debug!("Registration rejected e-mail: {}", message);
        }
        if !status.is_success() {
            return Err(ClientError::from_status(status, body));
        }

        let created: CreatedUser = serde_json::from_value(value)?;
        Ok(RegisterOutcome::Created {
            user_id: created.id,
        })
    }

    async fn create_profile(
        &self,
        token: Option<&str>,
        profile: &NewProfile,
    ) -> ClientResult<Profile> {
        tracing::debug!("POST {}", self.flavor.profiles_path());
        let mut request = self
            .client
            .post(self.url(self.flavor.profiles_path())?)
            .json(profile);
        if let Some(token) = token {
            request = self.authorized(request, token);
        }
        read_json(request.send().await?).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ClientResult<Profile> {
        let path = self.flavor.profile_update_path(update.id);
        let mut form = Form::new().text("nickname", update.nickname.clone());
        if let Some(image) = &update.image {
            form = form.part("img", Self::image_part(image)?);
        }

        let url = self.url(&path)?;
        // Multipart PUT bodies are not parsed by the server, so the
        // primary backend takes a POST carrying the real method instead.
        let request = if self.method_override && self.flavor == Flavor::Laravel {
            tracing::debug!("POST {} (override PUT)", path);
            self.client.post(url).header(METHOD_OVERRIDE, "PUT")
        } else {
            tracing::debug!("PUT {}", path);
            self.client.put(url)
        };

        read_json(self.authorized(request.multipart(form), token).send().await?).await
    }

    async fn my_profile(&self, token: &str) -> ClientResult<Profile> {
        let path = self.flavor.my_profile_path();
        match self.flavor {
            Flavor::Laravel => self.get_json(path, token).await,
            Flavor::Django => {
                let mut list: Vec<Profile> = self.get_json(path, token).await?;
                if list.is_empty() {
                    return Err(ClientError::Unauthorized);
                }
                Ok(list.swap_remove(0))
            }
        }
    }

    async fn profiles(&self, token: &str) -> ClientResult<Vec<Profile>> {
        self.get_json(self.flavor.profiles_path(), token).await
    }

    async fn posts(&self, token: &str) -> ClientResult<Vec<Post>> {
        self.get_json(self.flavor.posts_path(), token).await
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> ClientResult<Post> {
        tracing::debug!("POST {}", self.flavor.posts_path());
        let mut form = Form::new().text("title", post.title.clone());
        if let Some(image) = &post.image {
            form = form.part("img", Self::image_part(image)?);
        }
        let request = self
            .client
            .post(self.url(self.flavor.posts_path())?)
            .multipart(form);
        read_json(self.authorized(request, token).send().await?).await
    }

    async fn comments(&self, token: &str) -> ClientResult<Vec<Comment>> {
        self.get_json(self.flavor.comments_path(), token).await
    }

    async fn create_comment(&self, token: &str, comment: &NewComment) -> ClientResult<Comment> {
        tracing::debug!("POST {}", self.flavor.comments_path());
        let request = self
            .client
            .post(self.url(self.flavor.comments_path())?)
            .json(comment);
        read_json(self.authorized(request, token).send().await?).await
    }

    async fn likes(&self, token: &str) -> ClientResult<Vec<Like>> {
        self.get_json(self.flavor.likes_path(), token).await
    }

    async fn create_like(&self, token: &str, like: &LikeRef) -> ClientResult<Like> {
        tracing::debug!("POST {}", self.flavor.likes_path());
        let request = self
            .client
            .post(self.url(self.flavor.likes_path())?)
            .json(like);
        read_json(self.authorized(request, token).send().await?).await
    }

    async fn delete_like(&self, token: &str, like: &LikeRef) -> ClientResult<()> {
        let path = self.flavor.like_path(like);
        tracing::debug!("DELETE {}", path);
        let request = self
            .client
            .delete(self.url(&path)?)
            .json(&json!({ "like": like }));
        ensure_success(self.authorized(request, token).send().await?).await?;
        Ok(())
    }

    async fn replace_liked(
        &self,
        token: &str,
        post: PostId,
        liked: &[UserId],
    ) -> ClientResult<Post> {
        let path = self.flavor.post_path(post);
        tracing::debug!("PATCH {}", path);
        let request = self
            .client
            .patch(self.url(&path)?)
            .json(&json!({ "liked": liked }));
        read_json(self.authorized(request, token).send().await?).await
    }

    fn like_model(&self) -> LikeModel {
        self.flavor.like_model()
    }
}
