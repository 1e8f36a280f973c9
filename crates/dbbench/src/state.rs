//! Shared application state.
//!
//! Backends are explicitly constructed at startup and handed to the router
//! as owned, shared resources; handlers receive the one backend their
//! route subtree was nested under.

use std::sync::Arc;

use dbbench_core::Backend;

/// A shared backend handle, as stored in router state.
pub type DynBackend = Arc<dyn Backend>;

/// Shared application state for top-level routes.
#[derive(Clone)]
pub struct AppState {
    /// All mounted backends, in mount order.
    pub backends: Vec<DynBackend>,
}

impl AppState {
    pub fn new(backends: Vec<DynBackend>) -> Self {
        Self { backends }
    }
}
