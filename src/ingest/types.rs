//! Refresh type definitions
//!
//! This module defines the types used for the refresh system:
//! - `RefreshResult`: Result of a refresh cycle
//! - `RefreshEvent`: Events emitted during a refresh
//! - `RefreshStatus`: Current refresh system status

use chrono::{DateTime, Utc};

/// Result of a refresh cycle
#[derive(Debug, Clone)]
pub struct RefreshResult {
    /// Whether the refresh was successful
    pub success: bool,
    /// Error message if failed
    pub message: Option<String>,
    /// Block entries published by this cycle (0 on failure)
    pub total_ips: usize,
    /// When the refresh started
    pub started_at: DateTime<Utc>,
    /// When the refresh finished
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RefreshResult {
    /// Create a successful refresh result
    pub fn success(total_ips: usize, started_at: DateTime<Utc>) -> Self {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            success: true,
            message: None,
            total_ips,
            started_at,
            finished_at,
            duration_ms,
        }
    }

    /// Create a failed refresh result
    pub fn failure(started_at: DateTime<Utc>, error: String) -> Self {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            success: false,
            message: Some(error),
            total_ips: 0,
            started_at,
            finished_at,
            duration_ms,
        }
    }
}

/// Events emitted during refresh cycles
///
/// These events can be subscribed to for monitoring refresh progress.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// Refresh cycle started
    Started,
    /// Refresh cycle completed and a new snapshot was published
    Completed { result: RefreshResult },
    /// Refresh cycle failed; the previous snapshot keeps serving
    Failed { error: String },
}

/// Current status of the refresh system
#[derive(Debug, Clone, Default)]
pub struct RefreshStatus {
    /// Last refresh result
    pub last_refresh: Option<RefreshResult>,
    /// Whether a refresh is currently in progress
    pub is_refreshing: bool,
}
