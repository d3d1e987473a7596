//! RefreshCoordinator trait and default implementation
//!
//! The RefreshCoordinator provides a unified interface for running
//! dataset refresh cycles and publishing the resulting snapshot.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tracing::{error, info};

use crate::config::get_config;
use crate::errors::{IpLocatorError, Result};
use crate::geodata::{GeoStore, IndexSnapshot, parse_blocks, parse_locations};

use super::types::{RefreshEvent, RefreshResult, RefreshStatus};
use super::{archive, fetch};

/// 归档在工作目录中的落盘文件名
const ARCHIVE_FILENAME: &str = "dataset.tar.gz";
/// locations 表的文件名特征
const LOCATIONS_HINT: &str = "Locations-en";
/// IPv4 blocks 表的文件名特征
const BLOCKS_HINT: &str = "Blocks-IPv4";

/// RefreshCoordinator trait
///
/// Defines the interface for running refresh cycles. Overlapping calls
/// are allowed: each cycle builds independently and publish is a single
/// atomic swap, so whichever cycle finishes last wins.
#[async_trait]
pub trait RefreshCoordinator: Send + Sync {
    /// Execute one refresh cycle
    async fn refresh(&self) -> Result<RefreshResult>;

    /// Get the current refresh status
    fn status(&self) -> RefreshStatus;

    /// Subscribe to refresh events
    fn subscribe(&self) -> broadcast::Receiver<RefreshEvent>;
}

/// Default implementation of RefreshCoordinator
pub struct DefaultRefreshCoordinator {
    store: Arc<GeoStore>,
    status: RwLock<RefreshStatus>,
    event_sender: broadcast::Sender<RefreshEvent>,
}

impl DefaultRefreshCoordinator {
    /// Create a new DefaultRefreshCoordinator
    pub fn new(store: Arc<GeoStore>) -> Self {
        let (sender, _) = broadcast::channel(32);
        Self {
            store,
            status: RwLock::new(RefreshStatus::default()),
            event_sender: sender,
        }
    }

    /// Core refresh logic: build a snapshot off the runtime, then publish
    async fn refresh_data(&self) -> Result<usize> {
        info!("Starting dataset refresh cycle...");

        let config = get_config();
        let url = config.dataset.url.clone();
        let work_dir = PathBuf::from(&config.dataset.work_dir);

        // 下载、解包、解析都是阻塞 I/O，放到线程池执行
        let snapshot =
            tokio::task::spawn_blocking(move || build_snapshot_from_remote(&url, &work_dir))
                .await
                .map_err(|e| {
                    IpLocatorError::validation(format!("Refresh task aborted: {}", e))
                })??;

        let total = snapshot.total();
        self.store.publish(Arc::new(snapshot));

        info!("Dataset refresh completed, {} block entries published", total);
        Ok(total)
    }
}

#[async_trait]
impl RefreshCoordinator for DefaultRefreshCoordinator {
    async fn refresh(&self) -> Result<RefreshResult> {
        let started_at = Utc::now();

        {
            let mut status = self.status.write().await;
            status.is_refreshing = true;
        }

        let _ = self.event_sender.send(RefreshEvent::Started);

        let result = self.refresh_data().await;

        let refresh_result = match &result {
            Ok(total) => RefreshResult::success(*total, started_at),
            Err(e) => RefreshResult::failure(started_at, e.to_string()),
        };

        {
            let mut status = self.status.write().await;
            status.is_refreshing = false;
            status.last_refresh = Some(refresh_result.clone());
        }

        if refresh_result.success {
            let _ = self.event_sender.send(RefreshEvent::Completed {
                result: refresh_result.clone(),
            });
        } else {
            let _ = self.event_sender.send(RefreshEvent::Failed {
                error: refresh_result.message.clone().unwrap_or_default(),
            });
            error!(
                "Dataset refresh failed: {}",
                refresh_result.message.as_deref().unwrap_or("unknown error")
            );
        }

        result.map(|_| refresh_result)
    }

    fn status(&self) -> RefreshStatus {
        // Use try_read to avoid blocking, return default status on failure
        self.status
            .try_read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.event_sender.subscribe()
    }
}

/// 完整流水线：清空工作目录 → 下载 → 解包 → 定位两张表 → 构建快照
fn build_snapshot_from_remote(url: &str, work_dir: &Path) -> Result<IndexSnapshot> {
    reset_work_dir(work_dir)?;

    let archive_path = work_dir.join(ARCHIVE_FILENAME);
    fetch::download_archive(url, &archive_path)?;

    let files = archive::unpack_archive(&archive_path, work_dir)?;
    if files.is_empty() {
        return Err(IpLocatorError::archive("No files in dataset archive"));
    }

    let locations_path = find_dataset_file(&files, LOCATIONS_HINT)?;
    let blocks_path = find_dataset_file(&files, BLOCKS_HINT)?;

    build_snapshot_from_files(&locations_path, &blocks_path)
}

/// 从本地的两张表文件构建快照
///
/// 打开任一数据源失败即中止本轮刷新；行级脏数据由解析层跳过。
pub fn build_snapshot_from_files(
    locations_path: &Path,
    blocks_path: &Path,
) -> Result<IndexSnapshot> {
    let locations_file = File::open(locations_path).map_err(|e| {
        IpLocatorError::file_operation(format!(
            "Failed to open {}: {}",
            locations_path.display(),
            e
        ))
    })?;
    let locations = parse_locations(BufReader::new(locations_file))?;

    let blocks_file = File::open(blocks_path).map_err(|e| {
        IpLocatorError::file_operation(format!("Failed to open {}: {}", blocks_path.display(), e))
    })?;
    let blocks = parse_blocks(BufReader::new(blocks_file), &locations)?;

    Ok(IndexSnapshot::build(blocks))
}

/// 清空并重建工作目录
fn reset_work_dir(work_dir: &Path) -> Result<()> {
    if work_dir.exists() {
        std::fs::remove_dir_all(work_dir).map_err(|e| {
            IpLocatorError::file_operation(format!(
                "Failed to clean work dir {}: {}",
                work_dir.display(),
                e
            ))
        })?;
    }
    std::fs::create_dir_all(work_dir).map_err(|e| {
        IpLocatorError::file_operation(format!(
            "Failed to create work dir {}: {}",
            work_dir.display(),
            e
        ))
    })?;
    Ok(())
}

/// 按文件名特征定位数据集文件
fn find_dataset_file(files: &[PathBuf], hint: &str) -> Result<PathBuf> {
    files
        .iter()
        .find(|path| path.to_string_lossy().contains(hint))
        .cloned()
        .ok_or_else(|| {
            IpLocatorError::dataset_file_not_found(format!(
                "No file matching \"{}\" in dataset archive",
                hint
            ))
        })
}
