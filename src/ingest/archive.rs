//! 归档解包
//!
//! 将 tar.gz 数据集归档解到工作目录，返回解出的文件路径，
//! 供按文件名特征定位 locations / blocks 两张表。

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::errors::{IpLocatorError, Result};

/// 解包归档到目标目录，返回解出的普通文件路径列表
///
/// `unpack_in` 拒绝逃逸出目标目录的条目；被拒绝的条目跳过，
/// 不出现在返回列表里。
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path).map_err(|e| {
        IpLocatorError::archive(format!(
            "Failed to open archive {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut files = Vec::new();
    let entries = archive
        .entries()
        .map_err(|e| IpLocatorError::archive(format!("Corrupt archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| IpLocatorError::archive(format!("Corrupt archive entry: {}", e)))?;

        let rel_path = entry
            .path()
            .map_err(|e| IpLocatorError::archive(format!("Invalid entry path: {}", e)))?
            .into_owned();
        let is_file = entry.header().entry_type().is_file();

        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| IpLocatorError::archive(format!("Failed to unpack entry: {}", e)))?;

        if unpacked && is_file {
            files.push(dest.join(rel_path));
        }
    }

    debug!(
        "Unpacked {} files from {} into {}",
        files.len(),
        archive_path.display(),
        dest.display()
    );

    Ok(files)
}
