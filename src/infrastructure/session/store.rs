//! Session store
//!
//! Owns the single session slot and keeps it mirrored in durable storage.
//! Identity and token are always written and cleared together.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::domain::api::Authenticator;
use crate::domain::error::{AuthError, SessionStorageError};
use crate::domain::identity::Identity;
use crate::domain::session::{IDENTITY_KEY, Session, SessionStorage, TOKEN_KEY, basic_token};

const SESSION_KEYS: [&str; 2] = [IDENTITY_KEY, TOKEN_KEY];

enum RestoreError {
    /// Storage could not be read; the record may still be valid
    Unavailable(SessionStorageError),
    /// The stored record is unusable and should be discarded
    Invalid(String),
}

impl From<SessionStorageError> for RestoreError {
    fn from(e: SessionStorageError) -> Self {
        match e {
            SessionStorageError::Corrupt(reason) => Self::Invalid(reason),
            other => Self::Unavailable(other),
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Session>,
}

impl SessionStore {
    /// An empty store; call `restore` to rehydrate from storage
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::empty()),
        }
    }

    /// Rehydrate the session from durable storage without contacting the
    /// server. A partial or undecodable record is discarded; storage that
    /// cannot be read right now is left alone and the session starts empty.
    pub fn restore(&self) -> Option<Identity> {
        let restored = match self.read_stored() {
            Ok(restored) => restored,
            Err(RestoreError::Unavailable(e)) => {
                warn!("Stored session unavailable, starting logged out: {}", e);
                None
            }
            Err(RestoreError::Invalid(reason)) => {
                warn!("Discarding stored session: {}", reason);
                self.clear_storage();
                None
            }
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match restored {
            Some((identity, token)) => {
                debug!(username = %identity.username, "Session restored");
                *state = Session::authenticated(identity.clone(), token.into());
                Some(identity)
            }
            None => {
                *state = Session::empty();
                None
            }
        }
    }

    fn read_stored(&self) -> Result<Option<(Identity, String)>, RestoreError> {
        let identity = self.storage.read(IDENTITY_KEY)?;
        let token = self.storage.read(TOKEN_KEY)?;

        match (identity, token) {
            (None, None) => Ok(None),
            (Some(identity), Some(token)) => {
                let identity: Identity = serde_json::from_str(&identity)
                    .map_err(|e| RestoreError::Invalid(format!("undecodable identity: {}", e)))?;
                Ok(Some((identity, token)))
            }
            _ => Err(RestoreError::Invalid(
                "identity and token must be stored together".to_string(),
            )),
        }
    }

    /// Authenticate and persist the new session
    ///
    /// On any failure the previous session is left untouched, except for a
    /// storage failure, which leaves the session empty.
    pub async fn login(
        &self,
        authenticator: &dyn Authenticator,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Username and password are required".to_string(),
            ));
        }

        let identity = authenticator
            .authenticate(username, password)
            .await
            .map_err(|e| {
                debug!(status = e.status, "Authentication failed");
                AuthError::from(e)
            })?;

        let token = basic_token(username, password);
        let persisted = serde_json::to_string(&identity)
            .map_err(|e| e.to_string())
            .and_then(|record| {
                self.storage
                    .write(&[
                        (IDENTITY_KEY, record.as_str()),
                        (TOKEN_KEY, token.expose_secret()),
                    ])
                    .map_err(|e| e.to_string())
            });

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(reason) = persisted {
            warn!("Failed to persist session: {}", reason);
            *state = Session::empty();
            drop(state);
            self.clear_storage();
            return Err(AuthError::Storage(reason));
        }

        *state = Session::authenticated(identity.clone(), token);
        info!(username = %identity.username, role = %identity.role, "Logged in");
        Ok(identity)
    }

    /// Clear identity and token; safe to call when already logged out
    pub fn logout(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_authenticated() {
            info!("Logged out");
        }
        *state = Session::empty();
        drop(state);

        self.clear_storage();
    }

    /// Log out, but only if `header` is still the active credential
    ///
    /// Used when the server rejects a credential: a session established after
    /// the rejected request was sent is kept.
    pub fn reject_credential(&self, header: &str) -> bool {
        let current = self.authorization_header();
        if current.as_deref() != Some(header) {
            return false;
        }

        warn!("Server rejected the stored credential, clearing session");
        self.logout();
        true
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .identity()
            .cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// `Authorization` header value for the current session
    pub fn authorization_header(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .authorization_header()
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear(&SESSION_KEYS) {
            warn!("Failed to clear stored session: {}", e);
        }
    }
}
