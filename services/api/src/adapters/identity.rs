//! services/api/src/adapters/identity.rs
//!
//! This module contains the adapter for the Google Identity Toolkit, which
//! backs Firebase Authentication. It implements the `IdentityService` port
//! from the `core` crate.

use async_trait::async_trait;
use formscan_core::domain::AuthenticatedUser;
use formscan_core::ports::{IdentityService, PortError, PortResult};
use serde_json::Value;

const LOOKUP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that verifies Firebase ID tokens against the Identity Toolkit
/// `accounts:lookup` endpoint.
#[derive(Clone)]
pub struct GoogleIdentityAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GoogleIdentityAdapter {
    /// Creates a new `GoogleIdentityAdapter`. The web API key is checked at
    /// call time, not here.
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

/// Maps an `accounts:lookup` response body to the caller's identity.
fn user_from_lookup(body: &Value) -> PortResult<AuthenticatedUser> {
    let user = body["users"][0]
        .as_object()
        .ok_or_else(|| PortError::Unauthorized("token did not resolve to a user".to_string()))?;

    let uid = user
        .get("localId")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PortError::Unauthorized("user record has no subject identifier".to_string())
        })?;

    Ok(AuthenticatedUser {
        uid: uid.to_string(),
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
    })
}

//=========================================================================================
// `IdentityService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityService for GoogleIdentityAdapter {
    /// Verifies the presented ID token. Any rejection by the provider, and
    /// any failure to reach it, is an authentication failure.
    async fn verify_token(&self, token: &str) -> PortResult<AuthenticatedUser> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PortError::MissingCredential("FIREBASE_API_KEY is not set".to_string())
            })?;

        let response = self
            .client
            .post(format!("{}?key={}", LOOKUP_URL, api_key))
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| PortError::Unauthorized(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unauthorized(
                response.text().await.unwrap_or_default(),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Unauthorized(e.to_string()))?;

        user_from_lookup(&body)
    }
}
