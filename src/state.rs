//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::Shortener;

/// Application state injected into every handler.
///
/// Cheap to clone: the shortener is shared behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<Shortener>,
}

impl AppState {
    pub fn new(shortener: Arc<Shortener>) -> Self {
        Self { shortener }
    }
}
