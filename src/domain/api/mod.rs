//! Ports to the REST backend

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::account::Account;
use crate::domain::error::ApiError;
use crate::domain::form::{AccountPayload, LivestockPayload, UserPayload};
use crate::domain::identity::Identity;
use crate::domain::livestock::{Breed, Livestock, LivestockType};
use crate::domain::user::{DeletionCheck, PermanentDeletion, User};

/// Exchanges a username/password pair for an identity
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, ApiError>;
}

/// Endpoint wrappers of the admin backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /user`
    async fn get_users(&self) -> Result<Vec<User>, ApiError>;

    /// `POST /user`
    async fn create_user(&self, payload: &UserPayload) -> Result<User, ApiError>;

    /// `PUT /user/:id`
    async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<User, ApiError>;

    /// `DELETE /user/:id` - soft delete (deactivation)
    async fn delete_user(&self, id: i64) -> Result<(), ApiError>;

    /// `PUT /user/:id/reactivate`
    async fn reactivate_user(&self, id: i64) -> Result<(), ApiError>;

    /// `GET /user/:id/deletion-check`
    async fn deletion_check(&self, id: i64) -> Result<DeletionCheck, ApiError>;

    /// `DELETE /user/:id/permanent`
    async fn permanently_delete_user(
        &self,
        id: i64,
        request: &PermanentDeletion,
    ) -> Result<(), ApiError>;

    /// `GET /account`
    async fn get_accounts(&self) -> Result<Vec<Account>, ApiError>;

    /// `POST /account`
    async fn create_account(&self, payload: &AccountPayload) -> Result<Account, ApiError>;

    /// `PUT /account/:id`
    async fn update_account(&self, id: i64, payload: &AccountPayload)
    -> Result<Account, ApiError>;

    /// `GET /livestock`
    async fn get_livestock(&self) -> Result<Vec<Livestock>, ApiError>;

    /// `POST /livestock`
    async fn create_livestock(&self, payload: &LivestockPayload) -> Result<Livestock, ApiError>;

    /// `PUT /livestock/:id`
    async fn update_livestock(
        &self,
        id: i64,
        payload: &LivestockPayload,
    ) -> Result<Livestock, ApiError>;

    /// `GET /breed`
    async fn get_breeds(&self) -> Result<Vec<Breed>, ApiError>;

    /// `GET /livestocktype`
    async fn get_livestock_types(&self) -> Result<Vec<LivestockType>, ApiError>;
}
