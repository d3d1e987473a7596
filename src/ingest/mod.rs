//! Dataset ingestion and refresh orchestration
//!
//! A refresh cycle resets the working directory, downloads the dataset
//! archive, unpacks it, parses the two tables, builds a fresh index
//! snapshot, and atomically publishes it. A failure at any stage before
//! publish leaves the previously published snapshot serving.

mod archive;
mod coordinator;
mod fetch;
mod global;
mod types;

pub use archive::unpack_archive;
pub use coordinator::{
    DefaultRefreshCoordinator, RefreshCoordinator, build_snapshot_from_files,
};
pub use fetch::download_archive;
pub use global::{get_refresh_coordinator, init_default_coordinator, init_refresh_coordinator};
pub use types::{RefreshEvent, RefreshResult, RefreshStatus};
