use reqwest::StatusCode;

use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Login response has no `{0}` field")]
    MissingToken(&'static str),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl ClientError {
    /// Map a non-success HTTP status onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
            other => ClientError::Status {
                status: other.as_u16(),
                body,
            },
        }
    }

    /// True when the server rejected our credential, as opposed to the
    /// request failing for any other reason.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::NotLoggedIn)
    }

    /// True when the server answered and refused the request (4xx), as
    /// opposed to being unreachable or failing internally.
    pub fn is_rejection(&self) -> bool {
        match self {
            ClientError::Unauthorized => true,
            ClientError::Status { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_maps_to_unauthorized() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[test]
    fn forbidden_status_maps_to_unauthorized() {
        let err = ClientError::from_status(StatusCode::FORBIDDEN, String::new());
        assert!(err.is_auth_failure());
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_error_is_not_auth_failure() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert!(!err.is_auth_failure());
        assert!(!err.is_rejection());
    }

    #[test]
    fn client_errors_are_rejections() {
        assert!(ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()).is_rejection());
        assert!(ClientError::Unauthorized.is_rejection());
        assert!(!ClientError::NotLoggedIn.is_rejection());
    }

    #[test]
    fn missing_token_is_neither_rejection_nor_auth_failure() {
        let err = ClientError::MissingToken("access_token");
        assert!(!err.is_rejection());
        assert!(!err.is_auth_failure());
        assert!(err.to_string().contains("access_token"));
    }
}
