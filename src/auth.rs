//! Shared-secret token check for album writes.
//!
//! A single static secret gates album creation. Clients send it as
//!
//! ```text
//! Authorization: Bearer <secret>
//! ```
//!
//! The bare secret without the `Bearer` scheme is accepted too. The scheme
//! name is matched case-insensitively.
//!
//! # Security Properties
//!
//! - **Constant-time comparison**: the token is compared with `subtle` so
//!   response timing does not leak how many leading bytes matched
//! - **Empty never matches**: an empty token, or an empty configured
//!   secret, is never authorized
//!
//! # Example
//!
//! ```rust
//! use albums_api::auth::TokenAuth;
//!
//! let auth = TokenAuth::new("my-secret");
//! assert!(auth.is_authorized("my-secret"));
//! assert!(!auth.is_authorized("guess"));
//!
//! let token = TokenAuth::credential_from_header("Bearer my-secret");
//! assert_eq!(token, "my-secret");
//! ```

use subtle::ConstantTimeEq;

/// Authorization scheme stripped from header values.
pub const BEARER_SCHEME: &str = "Bearer";

/// Stateless shared-secret authorizer.
#[derive(Clone)]
pub struct TokenAuth {
    /// The configured secret
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl TokenAuth {
    /// Create an authorizer for the given secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// True iff `credential` exactly equals the configured secret.
    pub fn is_authorized(&self, credential: &str) -> bool {
        if credential.is_empty() || self.secret.is_empty() {
            return false;
        }
        credential.as_bytes().ct_eq(&self.secret).into()
    }

    /// Extract the token from an `Authorization` header value.
    ///
    /// Strips an optional `Bearer` scheme (any case) and surrounding whitespace.
    pub fn credential_from_header(value: &str) -> &str {
        let value = value.trim();
        match value.split_once(char::is_whitespace) {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => token.trim(),
            _ if value.eq_ignore_ascii_case(BEARER_SCHEME) => "",
            _ => value,
        }
    }
}
