//! # Bearer Token Capability
//!
//! Token acquisition is the caller's concern. The connection only attaches
//! whatever the provider yields at the moment a request goes out, so tokens
//! that rotate per request (session tokens, forwarded request credentials)
//! work without the connection knowing.

/// Capability supplying the bearer token for outgoing requests
pub trait TokenProvider: Send + Sync {
    /// The current bearer token, or `None` to send the request unauthenticated
    fn bearer_token(&self) -> Option<String>;
}

/// Provider that never yields a token
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Provider wrapping one fixed token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_token_yields_nothing() {
        assert_eq!(NoToken.bearer_token(), None);
    }

    #[test]
    fn test_static_token_yields_its_token() {
        let provider = StaticToken::new("sekret");
        assert_eq!(provider.bearer_token(), Some("sekret".to_string()));
    }
}
