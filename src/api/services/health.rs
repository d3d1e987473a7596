use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::geodata::GeoStore;

use super::StatusResponse;

/// Health Service
///
/// 直接读已发布快照的计数，不触发任何 I/O：
/// 健康检查要求快速响应，不应依赖刷新流程的状态。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(store: web::Data<Arc<GeoStore>>) -> impl Responder {
        trace!("Received health check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(StatusResponse::ok(store.total_ips()))
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查，检查基本服务可用性
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
