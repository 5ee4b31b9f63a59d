/// Owns the bearer token used to authorize Project API calls
pub trait SessionProvider {
    fn token(&self) -> Option<&str>;
    fn sign_in(&mut self, token: String);
    fn sign_out(&mut self);

    fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }
}

/// Session kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySession {
    token: Option<String>,
}

impl MemorySession {
    pub fn new(token: Option<String>) -> Self {
        let mut session = Self::default();
        if let Some(token) = token {
            session.sign_in(token);
        }
        session
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn sign_in(&mut self, token: String) {
        let token = token.trim();
        self.token = if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        };
    }

    fn sign_out(&mut self) {
        self.token = None;
    }
}
