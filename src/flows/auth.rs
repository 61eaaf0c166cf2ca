use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::forms;
use crate::models::{
    Credentials, ImageUpload, NewProfile, Profile, ProfileUpdate, RegisterOutcome, Registration,
};
use crate::state::{AuthAction, Modal, PostAction};
use validator::Validate;

use super::fetch_session;

/// Nickname given to every freshly registered account.
pub const DEFAULT_NICKNAME: &str = "ユーザー";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// The server refused the credentials; the login-error flag is set.
    Rejected,
}

/// Log in with user-supplied credentials.
pub async fn login(ctx: &AppContext, creds: &Credentials) -> ClientResult<LoginOutcome> {
    creds.validate()?;

    ctx.store.dispatch_auth(AuthAction::CredLoading(true)).await;
    let result = authenticate(ctx, creds).await;
    ctx.store.dispatch_auth(AuthAction::CredLoading(false)).await;
    result
}

/// Log in with the configured guest account. Only the guest control shows
/// progress, so a separate loading flag is raised alongside the usual one.
pub async fn guest_login(ctx: &AppContext) -> ClientResult<LoginOutcome> {
    let creds = ctx
        .guest
        .clone()
        .ok_or_else(|| ClientError::Validation(forms::field_error("guest", "not_configured")))?;

    ctx.store.dispatch_auth(AuthAction::CredLoading(true)).await;
    ctx.store.dispatch_auth(AuthAction::GuestLoading(true)).await;
    let result = authenticate(ctx, &creds).await;
    ctx.store.dispatch_auth(AuthAction::GuestLoading(false)).await;
    ctx.store.dispatch_auth(AuthAction::CredLoading(false)).await;
    result
}

async fn authenticate(ctx: &AppContext, creds: &Credentials) -> ClientResult<LoginOutcome> {
    ctx.store.dispatch_auth(AuthAction::LoginError(false)).await;

    let token = match ctx.api.login(creds).await {
        Ok(token) => token,
        Err(e) => {
            ctx.store.dispatch_auth(AuthAction::LoginError(true)).await;
            if e.is_rejection() {
                tracing::info!("Login rejected for {}", creds.email);
                return Ok(LoginOutcome::Rejected);
            }
            return Err(e);
        }
    };

    ctx.tokens.save(&token)?;
    tracing::info!("Logged in as {}", creds.email);
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Login, false))
        .await;

    let session = fetch_session(ctx).await;
    ctx.store.dispatch_auth(AuthAction::AuthChecked).await;
    session?;
    Ok(LoginOutcome::LoggedIn)
}

/// Create an account and its initial profile. Does not log in.
pub async fn register(ctx: &AppContext, form: &Registration) -> ClientResult<RegisterOutcome> {
    form.validate()?;

    ctx.store
        .dispatch_auth(AuthAction::RegisterCorrect(false))
        .await;
    ctx.store.dispatch_auth(AuthAction::RegisterError(false)).await;
    ctx.store.dispatch_auth(AuthAction::CredLoading(true)).await;
    let result = create_account(ctx, form).await;
    ctx.store.dispatch_auth(AuthAction::CredLoading(false)).await;
    result
}

async fn create_account(ctx: &AppContext, form: &Registration) -> ClientResult<RegisterOutcome> {
    let outcome = ctx.api.register(form).await?;
    match &outcome {
        RegisterOutcome::EmailTaken { message } => {
            tracing::info!("Registration refused: {}", message);
            ctx.store.dispatch_auth(AuthAction::RegisterError(true)).await;
        }
        RegisterOutcome::Created { user_id } => {
            let token = ctx.tokens.read()?;
            let initial = NewProfile {
                id: *user_id,
                nickname: DEFAULT_NICKNAME.to_string(),
            };
            ctx.api.create_profile(token.as_deref(), &initial).await?;
            tracing::info!("Registered {} as user {}", form.email, user_id);
            ctx.store
                .dispatch_auth(AuthAction::RegisterCorrect(true))
                .await;
        }
    }
    Ok(outcome)
}

/// Forget the session and return to the logged-out view.
pub async fn logout(ctx: &AppContext) -> ClientResult<()> {
    ctx.tokens.clear()?;
    ctx.store
        .dispatch_auth(AuthAction::EditNickname(String::new()))
        .await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Profile, false))
        .await;
    ctx.store.dispatch_post(PostAction::Composer(false)).await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Login, true))
        .await;
    tracing::info!("Logged out");
    Ok(())
}

pub async fn update_profile(
    ctx: &AppContext,
    nickname: &str,
    image: Option<ImageUpload>,
) -> ClientResult<Profile> {
    let id = ctx
        .store
        .auth()
        .await
        .my_profile
        .map(|p| p.id)
        .ok_or(ClientError::NotLoggedIn)?;
    let update = ProfileUpdate {
        id,
        nickname: nickname.to_string(),
        image,
    };
    update.validate()?;
    let token = ctx.token()?;

    ctx.store.dispatch_auth(AuthAction::ProfileLoading(true)).await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Profile, false))
        .await;
    let result = ctx.api.update_profile(&token, &update).await;
    if let Ok(profile) = &result {
        ctx.store
            .dispatch_auth(AuthAction::ProfileUpdated(profile.clone()))
            .await;
    }
    ctx.store
        .dispatch_auth(AuthAction::ProfileLoading(false))
        .await;
    result
}

pub async fn open_login_menu(ctx: &AppContext) {
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Login, true))
        .await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Register, false))
        .await;
    ctx.store.dispatch_auth(AuthAction::LoginError(false)).await;
}

pub async fn open_register_menu(ctx: &AppContext) {
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Register, true))
        .await;
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Login, false))
        .await;
    ctx.store
        .dispatch_auth(AuthAction::RegisterCorrect(false))
        .await;
    ctx.store.dispatch_auth(AuthAction::RegisterError(false)).await;
}

pub async fn open_profile_editor(ctx: &AppContext) {
    ctx.store
        .dispatch_auth(AuthAction::Modal(Modal::Profile, true))
        .await;
    ctx.store.dispatch_post(PostAction::Composer(false)).await;
}
