//! crates/formscan_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like identity providers
//! or model APIs.

use crate::domain::{AuthenticatedUser, MediaType};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., identity
/// provider, model API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The presented credential is missing, malformed, or rejected.
    #[error("{0}")]
    Unauthorized(String),
    /// A credential this service itself needs (an upstream API key) is not configured.
    #[error("{0}")]
    MissingCredential(String),
    /// The external service call failed, timed out, or was unreachable.
    #[error("{0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Verifies a bearer credential and yields the caller's identity.
    ///
    /// Fails with `PortError::Unauthorized` when the credential is missing,
    /// malformed, or rejected by the provider's trust-root check.
    async fn verify_token(&self, token: &str) -> PortResult<AuthenticatedUser>;
}

#[async_trait]
pub trait VisionExtractionService: Send + Sync {
    /// Submits an instruction string plus a binary document payload to the
    /// external multimodal model and returns its textual reply verbatim.
    ///
    /// The full reply is buffered before return; a single upstream failure is
    /// surfaced immediately with no retries.
    async fn extract(
        &self,
        prompt: &str,
        media_type: MediaType,
        payload: &[u8],
    ) -> PortResult<String>;
}
