use std::sync::Arc;

/// Issues and verifies bearer credentials.
pub trait TokenGate: Send + Sync {
    fn issue(&self, subject: &str) -> Result<String, AuthError>;

    /// Returns the token's subject when the token is genuine and unexpired.
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token issuance failed: {0}")]
    Issuance(String),
}

/// The single username/password pair allowed to log in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Credentials,
    token_gate: Arc<dyn TokenGate>,
}

impl AuthService {
    pub fn new(credentials: Credentials, token_gate: Arc<dyn TokenGate>) -> Self {
        Self {
            credentials,
            token_gate,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        if username != self.credentials.username || password != self.credentials.password {
            tracing::warn!(%username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        self.token_gate.issue(username)
    }

    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.token_gate.verify(token)
    }
}
