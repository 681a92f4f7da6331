//! Session slot holding the authenticated identity and its credential

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::identity::Identity;

/// Storage key for the identity record
pub const IDENTITY_KEY: &str = "rms_user";

/// Storage key for the credential token
pub const TOKEN_KEY: &str = "rms_auth";

/// Derive the Basic credential token for a username/password pair
pub fn basic_token(username: &str, password: &str) -> SecretString {
    SecretString::from(STANDARD.encode(format!("{}:{}", username, password)))
}

#[derive(Debug)]
struct Authenticated {
    identity: Identity,
    token: SecretString,
}

/// Holds at most one identity, always paired with its token
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Authenticated>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity, token: SecretString) -> Self {
        Self {
            current: Some(Authenticated { identity, token }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref().map(|a| &a.identity)
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|a| format!("Basic {}", a.token.expose_secret()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Role;

    fn identity() -> Identity {
        Identity {
            id: 1,
            username: "bob".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Customer,
            is_active: true,
            primary_account: None,
        }
    }

    #[test]
    fn test_basic_token() {
        let token = basic_token("bob", "secret1");
        assert_eq!(token.expose_secret(), "Ym9iOnNlY3JldDE=");
    }

    #[test]
    fn test_empty_session_has_neither_identity_nor_header() {
        let session = Session::empty();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(session.authorization_header().is_none());
    }

    #[test]
    fn test_authenticated_session() {
        let session = Session::authenticated(identity(), basic_token("bob", "secret1"));
        assert_eq!(session.identity().map(|i| i.username.as_str()), Some("bob"));
        assert_eq!(
            session.authorization_header().as_deref(),
            Some("Basic Ym9iOnNlY3JldDE=")
        );
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let session = Session::authenticated(identity(), basic_token("bob", "secret1"));
        let debug = format!("{:?}", session);
        assert!(!debug.contains("Ym9iOnNlY3JldDE="));
    }
}
