//! Domain layer - Entities, form rules and the ports to the backend

pub mod account;
pub mod api;
pub mod error;
pub mod form;
pub mod identity;
pub mod livestock;
pub mod session;
pub mod user;

pub use account::{Account, AccountStatus};
pub use api::{AdminApi, Authenticator};
pub use error::{ApiError, AuthError, SessionStorageError};
pub use identity::{Identity, Role};
pub use livestock::{Breed, Livestock, LivestockType};
pub use session::{Session, SessionStorage};
pub use user::User;
