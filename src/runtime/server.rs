//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::services::{health_routes, lookup_routes, update_routes};
use crate::config::get_config;
use crate::geodata::GeoStore;
use crate::ingest;

/// Run the HTTP server
///
/// This function:
/// 1. Creates the geo store and refresh coordinator
/// 2. Optionally triggers the startup refresh in the background
/// 3. Configures and starts the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    // 查询路径共享的快照持有者；首轮刷新完成前解析为未知记录
    let store = Arc::new(GeoStore::new());
    let coordinator = ingest::init_default_coordinator(store.clone());

    if config.dataset.refresh_on_startup {
        let startup_coordinator = coordinator.clone();
        tokio::spawn(async move {
            // 失败只影响本轮；空快照继续服务直到下次触发
            let _ = startup_coordinator.refresh().await;
        });
    } else {
        info!("Startup refresh disabled, waiting for /update trigger");
    }

    let cpu_count = config.server.cpu_count.min(32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(store.clone()))
            .service(web::scope("/health").service(health_routes()))
            .service(lookup_routes())
            .service(update_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
