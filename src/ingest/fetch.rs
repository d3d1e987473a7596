//! 数据集归档下载
//!
//! 使用共享的 ureq Agent 做流式下载。同步实现，调用方在
//! `spawn_blocking` 中执行，避免阻塞异步运行时。

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::{debug, info};
use ureq::Agent;

use crate::errors::{IpLocatorError, Result};

/// HTTP 连接超时时间
///
/// 只限制建立连接；下载本身不设总超时，大归档按网络自身行为传输。
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// 下载数据集归档到指定路径，返回写入的字节数
pub fn download_archive(url: &str, dest: &Path) -> Result<u64> {
    debug!("Downloading dataset archive from {}", url);

    let resp = get_agent().get(url).call()?;
    let mut reader = resp.into_body().into_reader();

    let mut out = File::create(dest).map_err(|e| {
        IpLocatorError::file_operation(format!("Failed to create {}: {}", dest.display(), e))
    })?;
    let bytes = io::copy(&mut reader, &mut out)
        .map_err(|e| IpLocatorError::download(format!("Failed to write archive: {}", e)))?;

    info!("Downloaded {} bytes to {}", bytes, dest.display());
    Ok(bytes)
}
