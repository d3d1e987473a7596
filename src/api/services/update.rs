//! 刷新触发服务
//!
//! 触发一次后台刷新并立即返回当前已发布的条目数；刷新结果
//! 通过日志与事件通道观察，不阻塞本次响应。

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{info, warn};

use crate::geodata::GeoStore;
use crate::ingest::get_refresh_coordinator;

use super::StatusResponse;

pub struct UpdateService;

impl UpdateService {
    /// `POST /update`（兼容 GET 触发）
    ///
    /// 刷新在后台进行；返回体中的 total_ips 是当前生效快照的计数，
    /// 不等待新一轮构建完成。
    pub async fn trigger_update(store: web::Data<Arc<GeoStore>>) -> impl Responder {
        match get_refresh_coordinator() {
            Some(coordinator) => {
                info!("Dataset refresh triggered via /update");
                tokio::spawn(async move {
                    // 失败已在 coordinator 内记录；前一份快照继续服务
                    let _ = coordinator.refresh().await;
                });
            }
            None => {
                warn!("Refresh coordinator not initialized, ignoring /update trigger");
            }
        }

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(StatusResponse::ok(store.total_ips()))
    }
}

/// Update 路由配置
pub fn update_routes() -> actix_web::Resource {
    web::resource("/update")
        .route(web::post().to(UpdateService::trigger_update))
        .route(web::get().to(UpdateService::trigger_update))
}
