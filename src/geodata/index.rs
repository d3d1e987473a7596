//! 范围索引
//!
//! 按首段（0–255）分桶的不可变索引快照。每桶内按起始地址升序，
//! 查找时对查询地址做块对齐归一化后二分，取不超过它的最大起始地址。
//! 分桶把一次查找的扫描范围限制在同首段的块内，而不是整个数据集。

use std::sync::Arc;

use tracing::debug;

use crate::utils::ip::{first_octet, normalize_block};

use super::records::{BlockEntry, LocationRecord};

/// 桶数量：首段取值范围
const BUCKET_COUNT: usize = 256;

/// 一份构建完成的索引快照
///
/// 构建后不再变更；整体替换，从不原地修补。持有旧快照的查询
/// 在替换后仍然读到完整一致的结构，直到引用释放。
pub struct IndexSnapshot {
    buckets: Vec<Vec<BlockEntry>>,
    total: usize,
}

impl IndexSnapshot {
    /// 空快照（首次刷新完成前的初始状态）
    pub fn empty() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
            total: 0,
        }
    }

    /// 从解析产物构建快照
    ///
    /// 按首段分桶、桶内按起始地址升序排序。起始地址相同的条目
    /// 去重后写覆盖，保证桶内起始地址唯一的不变量在脏数据下也成立。
    pub fn build(entries: Vec<BlockEntry>) -> Self {
        let mut buckets: Vec<Vec<BlockEntry>> = vec![Vec::new(); BUCKET_COUNT];

        for entry in entries {
            buckets[first_octet(entry.start) as usize].push(entry);
        }

        for bucket in &mut buckets {
            // 稳定排序保持同键条目的输入顺序，去重时保留后写入的一条
            bucket.sort_by_key(|entry| entry.start);
            bucket.dedup_by(|next, prev| {
                if next.start == prev.start {
                    prev.location = Arc::clone(&next.location);
                    true
                } else {
                    false
                }
            });
        }

        let total = buckets.iter().map(Vec::len).sum();
        debug!("Built index snapshot with {} block entries", total);

        Self { buckets, total }
    }

    /// 解析一个 IPv4 地址到它所在块的位置记录
    ///
    /// 全函数总是返回结果：桶为空、或归一化后的地址小于桶内所有
    /// 起始地址时，返回未知记录。
    pub fn lookup(&self, addr: u32) -> Arc<LocationRecord> {
        let bucket = &self.buckets[first_octet(addr) as usize];
        if bucket.is_empty() {
            return LocationRecord::unknown();
        }

        let target = normalize_block(addr);
        let idx = bucket.partition_point(|entry| entry.start <= target);
        match idx {
            0 => LocationRecord::unknown(),
            _ => Arc::clone(&bucket[idx - 1].location),
        }
    }

    /// 已发布条目总数（不含表头行）
    pub fn total(&self) -> usize {
        self.total
    }
}
