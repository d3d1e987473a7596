//! IP 归属查询服务
//!
//! 查询路径是全函数：非法地址、缺参、未收录地址一律返回全空记录，
//! 从不以传输层错误暴露（"查不到" 是正常业务结果）。

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::trace;

use crate::geodata::{GeoStore, LocationRecord};
use crate::utils::ip::parse_ipv4;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub address: Option<String>,
}

pub struct LookupService;

impl LookupService {
    /// `GET /ip?address=A.B.C.D`
    pub async fn lookup_ip(
        query: web::Query<LookupQuery>,
        store: web::Data<Arc<GeoStore>>,
    ) -> impl Responder {
        let record = match query.address.as_deref().and_then(parse_ipv4) {
            Some(addr) => {
                let record = store.lookup(addr);
                trace!(
                    "Lookup {} -> {}",
                    query.address.as_deref().unwrap_or(""),
                    if record.is_unknown() {
                        "unknown"
                    } else {
                        record.iso_code.as_str()
                    }
                );
                record
            }
            None => {
                trace!(
                    "Unparseable lookup address: {:?}",
                    query.address.as_deref()
                );
                LocationRecord::unknown()
            }
        };

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(&*record)
    }
}

/// Lookup 路由配置
pub fn lookup_routes() -> actix_web::Resource {
    web::resource("/ip")
        .route(web::get().to(LookupService::lookup_ip))
        .route(web::head().to(LookupService::lookup_ip))
}
