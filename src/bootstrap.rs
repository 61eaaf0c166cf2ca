//! Startup session check: turn a stored token (if any) into a loaded
//! session, or fall back to the login screen.

use std::fmt;

use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::flows::{fetch_collections, fetch_my_profile};
use crate::state::{AuthAction, Modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedIn,
    LoggedOut,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedIn => write!(f, "logged in"),
            Self::LoggedOut => write!(f, "logged out"),
        }
    }
}

/// Bootstrap state machine. Pure transitions; `Bootstrap::run` performs
/// the side effects between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootPhase {
    #[default]
    Idle,
    /// A token was found and the user's own profile is being fetched.
    Authenticating,
    /// Profile accepted; collections are loading.
    Authenticated,
    Checked(SessionStatus),
}

impl BootPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Authenticating => "Authenticating",
            Self::Authenticated => "Authenticated",
            Self::Checked(_) => "Checked",
        }
    }

    /// Transition: Idle → Authenticating, or straight to LoggedOut when no
    /// token is stored.
    pub fn start(self, token_present: bool) -> ClientResult<Self> {
        match self {
            Self::Idle if token_present => Ok(Self::Authenticating),
            Self::Idle => Ok(Self::Checked(SessionStatus::LoggedOut)),
            other => Err(invalid("start", other)),
        }
    }

    /// Transition: Authenticating → Authenticated
    pub fn profile_loaded(self) -> ClientResult<Self> {
        match self {
            Self::Authenticating => Ok(Self::Authenticated),
            other => Err(invalid("accept a profile", other)),
        }
    }

    /// Transition: Authenticating → LoggedOut
    pub fn profile_rejected(self) -> ClientResult<Self> {
        match self {
            Self::Authenticating => Ok(Self::Checked(SessionStatus::LoggedOut)),
            other => Err(invalid("reject a profile", other)),
        }
    }

    /// Transition: Authenticated → LoggedIn
    pub fn settled(self) -> ClientResult<Self> {
        match self {
            Self::Authenticated => Ok(Self::Checked(SessionStatus::LoggedIn)),
            other => Err(invalid("settle", other)),
        }
    }

    pub fn status(&self) -> Option<SessionStatus> {
        match self {
            Self::Checked(status) => Some(*status),
            _ => None,
        }
    }
}

fn invalid(action: &str, from: BootPhase) -> ClientError {
    ClientError::InvalidTransition(format!("Cannot {} from {} state", action, from.name()))
}

#[derive(Debug, Default)]
pub struct Bootstrap {
    phase: BootPhase,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    fn advance(&mut self, next: BootPhase) {
        tracing::debug!(from = self.phase.name(), to = next.name(), "bootstrap");
        self.phase = next;
    }

    /// Restore the session from the stored token. A token the server
    /// refuses (401/403) is removed; any other failure of the profile
    /// fetch leaves it in place and reports the error.
    pub async fn run(&mut self, ctx: &AppContext) -> ClientResult<SessionStatus> {
        let token = ctx.tokens.read()?;
        let next = self.phase.start(token.is_some())?;
        self.advance(next);

        if let BootPhase::Checked(status) = self.phase {
            ctx.store.dispatch_auth(AuthAction::AuthChecked).await;
            return Ok(status);
        }

        ctx.store
            .dispatch_auth(AuthAction::Modal(Modal::Login, false))
            .await;
        ctx.store.dispatch_auth(AuthAction::CredLoading(true)).await;

        if let Err(e) = fetch_my_profile(ctx).await {
            let next = self.phase.profile_rejected()?;
            self.advance(next);
            ctx.store
                .dispatch_auth(AuthAction::Modal(Modal::Login, true))
                .await;
            ctx.store.dispatch_auth(AuthAction::CredLoading(false)).await;
            ctx.store.dispatch_auth(AuthAction::AuthChecked).await;

            if e.is_auth_failure() {
                tracing::info!("Stored token rejected, clearing it");
                ctx.tokens.clear()?;
                return Ok(SessionStatus::LoggedOut);
            }
            return Err(e);
        }

        let next = self.phase.profile_loaded()?;
        self.advance(next);

        let collections = fetch_collections(ctx).await;
        ctx.store.dispatch_auth(AuthAction::CredLoading(false)).await;
        let next = self.phase.settled()?;
        self.advance(next);
        ctx.store.dispatch_auth(AuthAction::AuthChecked).await;

        collections?;
        Ok(SessionStatus::LoggedIn)
    }
}

pub async fn bootstrap(ctx: &AppContext) -> ClientResult<SessionStatus> {
    Bootstrap::new().run(ctx).await
}
