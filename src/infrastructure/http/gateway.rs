//! Typed REST client
//!
//! Every call carries the current session credential and resolves to either
//! decoded JSON or an `ApiError`. One call, one outcome: nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::domain::account::Account;
use crate::domain::api::{AdminApi, Authenticator};
use crate::domain::error::ApiError;
use crate::domain::form::{AccountPayload, LivestockPayload, UserPayload};
use crate::domain::identity::Identity;
use crate::domain::livestock::{Breed, Livestock, LivestockType};
use crate::domain::user::{DeletionCheck, PermanentDeletion, User};
use crate::infrastructure::session::SessionStore;

#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    login_path: String,
    session: Arc<SessionStore>,
}

impl ApiGateway {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send one request with the current session credential
    ///
    /// A body is only attached when supplied. A 401 answer to an
    /// authenticated request clears the session before the error is returned.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let credential = self.session.authorization_header();
        let result = self
            .send(path, method, body, credential.as_deref())
            .await;

        if let (Err(error), Some(credential)) = (&result, &credential) {
            if error.is_unauthorized() {
                self.session.reject_credential(credential);
            }
        }

        result
    }

    async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        credential: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);

        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, credential);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, path, "Request failed: {}", e);
            ApiError::network(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        debug!(method = %method, path, status = status.as_u16(), "Response received");

        let text = response.text().await.map_err(|e| {
            warn!(method = %method, path, "Failed to read response: {}", e);
            ApiError::network(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let status = status.as_u16();
            return Err(match error_message(&text) {
                Some(message) => ApiError::new(status, message),
                None => ApiError::generic(status),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::invalid_response(format!("Invalid JSON response: {}", e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.request(path, Method::GET, None).await?)
    }

    async fn send_json<T, B>(&self, path: &str, method: Method, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        decode(self.request(path, method, Some(&body)).await?)
    }
}

/// Server-supplied message: `error` field, else `message` field
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    ["error", "message"].iter().find_map(|field| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::invalid_response(format!("Failed to encode request: {}", e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::invalid_response(format!("Unexpected response shape: {}", e)))
}

#[async_trait]
impl Authenticator for ApiGateway {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let body = json!({ "username": username, "password": password });
        let value = self
            .send(&self.login_path, Method::POST, Some(&body), None)
            .await?;
        decode(value)
    }
}

#[async_trait]
impl AdminApi for ApiGateway {
    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/user").await
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<User, ApiError> {
        self.send_json("/user", Method::POST, payload).await
    }

    async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<User, ApiError> {
        self.send_json(&format!("/user/{}", id), Method::PUT, payload)
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.request(&format!("/user/{}", id), Method::DELETE, None)
            .await
            .map(|_| ())
    }

    async fn reactivate_user(&self, id: i64) -> Result<(), ApiError> {
        self.request(&format!("/user/{}/reactivate", id), Method::PUT, None)
            .await
            .map(|_| ())
    }

    async fn deletion_check(&self, id: i64) -> Result<DeletionCheck, ApiError> {
        self.get(&format!("/user/{}/deletion-check", id)).await
    }

    async fn permanently_delete_user(
        &self,
        id: i64,
        request: &PermanentDeletion,
    ) -> Result<(), ApiError> {
        let body = encode(request)?;
        self.request(
            &format!("/user/{}/permanent", id),
            Method::DELETE,
            Some(&body),
        )
        .await
        .map(|_| ())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("/account").await
    }

    async fn create_account(&self, payload: &AccountPayload) -> Result<Account, ApiError> {
        self.send_json("/account", Method::POST, payload).await
    }

    async fn update_account(
        &self,
        id: i64,
        payload: &AccountPayload,
    ) -> Result<Account, ApiError> {
        self.send_json(&format!("/account/{}", id), Method::PUT, payload)
            .await
    }

    async fn get_livestock(&self) -> Result<Vec<Livestock>, ApiError> {
        self.get("/livestock").await
    }

    async fn create_livestock(&self, payload: &LivestockPayload) -> Result<Livestock, ApiError> {
        self.send_json("/livestock", Method::POST, payload).await
    }

    async fn update_livestock(
        &self,
        id: i64,
        payload: &LivestockPayload,
    ) -> Result<Livestock, ApiError> {
        self.send_json(&format!("/livestock/{}", id), Method::PUT, payload)
            .await
    }

    async fn get_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        self.get("/breed").await
    }

    async fn get_livestock_types(&self) -> Result<Vec<LivestockType>, ApiError> {
        self.get("/livestocktype").await
    }
}
