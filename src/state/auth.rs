use crate::models::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Login,
    Register,
    Profile,
}

/// Every transition the auth container accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    CredLoading(bool),
    GuestLoading(bool),
    ProfileLoading(bool),
    Modal(Modal, bool),
    RegisterCorrect(bool),
    RegisterError(bool),
    LoginError(bool),
    /// Local-only nickname edit, applied before any server round trip.
    EditNickname(String),
    MyProfileLoaded(Profile),
    /// Server-confirmed profile update: replaces "mine" and the roster entry.
    ProfileUpdated(Profile),
    ProfilesLoaded(Vec<Profile>),
    AuthChecked,
}

impl AuthAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CredLoading(_) => "CredLoading",
            Self::GuestLoading(_) => "GuestLoading",
            Self::ProfileLoading(_) => "ProfileLoading",
            Self::Modal(..) => "Modal",
            Self::RegisterCorrect(_) => "RegisterCorrect",
            Self::RegisterError(_) => "RegisterError",
            Self::LoginError(_) => "LoginError",
            Self::EditNickname(_) => "EditNickname",
            Self::MyProfileLoaded(_) => "MyProfileLoaded",
            Self::ProfileUpdated(_) => "ProfileUpdated",
            Self::ProfilesLoaded(_) => "ProfilesLoaded",
            Self::AuthChecked => "AuthChecked",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub open_login: bool,
    pub open_register: bool,
    pub open_profile: bool,
    pub register_correct: bool,
    pub register_error: bool,
    pub login_error: bool,
    pub is_loading_auth: bool,
    pub is_guest_loading_auth: bool,
    pub is_loading_profile: bool,
    /// Set once the startup session check has finished, either way.
    pub auth_checked: bool,
    pub my_profile: Option<Profile>,
    pub profiles: Vec<Profile>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            open_login: true,
            open_register: false,
            open_profile: false,
            register_correct: false,
            register_error: false,
            login_error: false,
            is_loading_auth: false,
            is_guest_loading_auth: false,
            is_loading_profile: false,
            auth_checked: false,
            my_profile: None,
            profiles: Vec::new(),
        }
    }
}

impl AuthState {
    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::CredLoading(on) => self.is_loading_auth = on,
            AuthAction::GuestLoading(on) => self.is_guest_loading_auth = on,
            AuthAction::ProfileLoading(on) => self.is_loading_profile = on,
            AuthAction::Modal(Modal::Login, open) => self.open_login = open,
            AuthAction::Modal(Modal::Register, open) => self.open_register = open,
            AuthAction::Modal(Modal::Profile, open) => self.open_profile = open,
            AuthAction::RegisterCorrect(on) => self.register_correct = on,
            AuthAction::RegisterError(on) => self.register_error = on,
            AuthAction::LoginError(on) => self.login_error = on,
            AuthAction::EditNickname(nickname) => {
                if let Some(profile) = self.my_profile.as_mut() {
                    profile.nickname = nickname;
                }
            }
            AuthAction::MyProfileLoaded(profile) => self.my_profile = Some(profile),
            AuthAction::ProfileUpdated(profile) => {
                if let Some(entry) = self.profiles.iter_mut().find(|p| p.id == profile.id) {
                    *entry = profile.clone();
                }
                self.my_profile = Some(profile);
            }
            AuthAction::ProfilesLoaded(profiles) => self.profiles = profiles,
            AuthAction::AuthChecked => self.auth_checked = true,
        }
    }

    /// Logged in means a profile with a non-empty nickname is loaded.
    pub fn is_logged_in(&self) -> bool {
        self.my_profile
            .as_ref()
            .is_some_and(|p| !p.nickname.is_empty())
    }

    pub fn my_user_id(&self) -> Option<u64> {
        self.my_profile.as_ref().map(|p| p.user_id)
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading_auth || self.is_loading_profile
    }
}
