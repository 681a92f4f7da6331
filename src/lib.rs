//! RMS Console
//!
//! Client core of the farm/livestock administration console:
//! - Session store with durable, all-or-nothing persistence
//! - Typed API gateway over the REST backend
//! - Role-gated form engine for users, accounts and livestock

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use anyhow::anyhow;

use domain::identity::Identity;
use domain::session::SessionStorage;
use infrastructure::http::ApiGateway;
use infrastructure::session::{FileSessionStorage, SessionStore};

/// Wired application: configuration, session store and gateway
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<SessionStore>,
    pub gateway: Arc<ApiGateway>,
}

impl AppContext {
    /// Build the context on the configured session file
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(FileSessionStorage::new(config.session.resolved_path()));
        Self::with_storage(config, storage)
    }

    /// Build the context on any session storage; the stored session is
    /// restored here and nowhere else
    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> anyhow::Result<Self> {
        let session = Arc::new(SessionStore::new(storage));
        session.restore();

        let gateway = Arc::new(ApiGateway::new(&config.api, session.clone())?);

        Ok(Self {
            config,
            session,
            gateway,
        })
    }

    /// Identity of the logged-in user, or an error asking to log in
    pub fn require_identity(&self) -> anyhow::Result<Identity> {
        self.session
            .current_identity()
            .ok_or_else(|| anyhow!("Not logged in. Run `rms-console login` first."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{IDENTITY_KEY, TOKEN_KEY};
    use crate::infrastructure::session::InMemorySessionStorage;

    #[test]
    fn test_context_restores_stored_session() {
        let storage = InMemorySessionStorage::with_entries(&[
            (IDENTITY_KEY, r#"{"id":3,"username":"admin","userType":"ADMINISTRATOR"}"#),
            (TOKEN_KEY, "YWRtaW46c2VjcmV0"),
        ]);

        let context = AppContext::with_storage(AppConfig::default(), Arc::new(storage)).unwrap();

        let identity = context.require_identity().unwrap();
        assert!(identity.is_administrator());
    }

    #[test]
    fn test_context_without_session() {
        let context = AppContext::with_storage(
            AppConfig::default(),
            Arc::new(InMemorySessionStorage::new()),
        )
        .unwrap();

        assert!(context.require_identity().is_err());
    }
}
