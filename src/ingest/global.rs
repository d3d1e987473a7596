//! Global RefreshCoordinator instance management
//!
//! This module provides global access to the RefreshCoordinator instance.

use std::sync::{Arc, OnceLock};

use crate::geodata::GeoStore;

use super::coordinator::{DefaultRefreshCoordinator, RefreshCoordinator};

/// Global RefreshCoordinator instance
static REFRESH_COORDINATOR: OnceLock<Arc<dyn RefreshCoordinator>> = OnceLock::new();

/// Initialize the global RefreshCoordinator
///
/// This should be called once during application startup,
/// after the geo store is created.
pub fn init_refresh_coordinator(coordinator: Arc<dyn RefreshCoordinator>) {
    let _ = REFRESH_COORDINATOR.set(coordinator);
}

/// Get the global RefreshCoordinator
///
/// Returns None if the coordinator has not been initialized.
pub fn get_refresh_coordinator() -> Option<Arc<dyn RefreshCoordinator>> {
    REFRESH_COORDINATOR.get().cloned()
}

/// Convenience function: Create and initialize the default coordinator
///
/// This creates a DefaultRefreshCoordinator, initializes it globally,
/// and returns a reference to it.
pub fn init_default_coordinator(store: Arc<GeoStore>) -> Arc<dyn RefreshCoordinator> {
    let coordinator: Arc<dyn RefreshCoordinator> =
        Arc::new(DefaultRefreshCoordinator::new(store));
    init_refresh_coordinator(coordinator.clone());
    coordinator
}
