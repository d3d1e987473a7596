use serde::{Deserialize, Serialize};

pub mod health;
pub mod lookup;
pub mod update;

pub use health::{HealthService, health_routes};
pub use lookup::{LookupService, lookup_routes};
pub use update::{UpdateService, update_routes};

/// `/update` 与 `/health` 共用的状态响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub total_ips: usize,
}

impl StatusResponse {
    pub fn ok(total_ips: usize) -> Self {
        Self {
            status: "OK".to_string(),
            total_ips,
        }
    }
}
