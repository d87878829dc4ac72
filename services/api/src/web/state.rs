//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use formscan_core::ports::{IdentityService, VisionExtractionService};
use formscan_core::prompts::PromptStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Nothing here outlives the process; the prompt store is the only
/// mutable member.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityService>,
    pub vision: Arc<dyn VisionExtractionService>,
    pub prompts: Arc<PromptStore>,
}
