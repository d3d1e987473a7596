//! 快照发布
//!
//! 当前生效的索引快照放在一个可原子替换的引用后面。查询路径只做
//! 无锁读取；发布是一次指针交换，进行中的查询继续持有旧快照直到
//! 引用释放，永远不会读到半成品。

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::index::IndexSnapshot;
use super::records::LocationRecord;

/// 当前索引快照的持有者
///
/// 初始为一份空快照，首轮刷新完成前的查询都解析为未知记录。
pub struct GeoStore {
    current: ArcSwap<IndexSnapshot>,
}

impl GeoStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(IndexSnapshot::empty()),
        }
    }

    /// 原子发布一份新快照
    ///
    /// 对并发查询安全：替换是单次引用交换，不会出现新旧桶混用。
    /// 重复发布同一份快照与发布一次等价。
    pub fn publish(&self, snapshot: Arc<IndexSnapshot>) {
        self.current.store(snapshot);
    }

    /// 取调用时刻生效的快照
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.load_full()
    }

    /// 在当前快照上做一次点查询
    pub fn lookup(&self, addr: u32) -> Arc<LocationRecord> {
        self.current.load().lookup(addr)
    }

    /// 当前已发布的条目总数
    pub fn total_ips(&self) -> usize {
        self.current.load().total()
    }
}

impl Default for GeoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodata::records::BlockEntry;
    use crate::utils::ip::parse_ipv4;

    fn snapshot_with(iso: &str) -> Arc<IndexSnapshot> {
        Arc::new(IndexSnapshot::build(vec![BlockEntry {
            start: parse_ipv4("10.0.0.0").unwrap(),
            location: Arc::new(LocationRecord {
                iso_code: iso.to_string(),
                country_name: iso.to_string(),
                ..Default::default()
            }),
        }]))
    }

    #[test]
    fn test_store_starts_empty() {
        let store = GeoStore::new();
        assert_eq!(store.total_ips(), 0);
        assert!(store.lookup(parse_ipv4("10.0.0.1").unwrap()).is_unknown());
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let store = GeoStore::new();
        store.publish(snapshot_with("US"));
        assert_eq!(store.lookup(parse_ipv4("10.0.0.1").unwrap()).iso_code, "US");

        store.publish(snapshot_with("JP"));
        assert_eq!(store.lookup(parse_ipv4("10.0.0.1").unwrap()).iso_code, "JP");
        assert_eq!(store.total_ips(), 1);
    }

    #[test]
    fn test_republish_same_snapshot_is_idempotent() {
        let store = GeoStore::new();
        let snapshot = snapshot_with("US");
        store.publish(Arc::clone(&snapshot));
        let before = store.lookup(parse_ipv4("10.0.0.1").unwrap());
        store.publish(snapshot);
        let after = store.lookup(parse_ipv4("10.0.0.1").unwrap());
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_inflight_reader_keeps_old_snapshot() {
        let store = GeoStore::new();
        store.publish(snapshot_with("US"));

        // 查询开始时取到的快照在发布后仍然有效
        let held = store.snapshot();
        store.publish(snapshot_with("JP"));

        assert_eq!(held.lookup(parse_ipv4("10.0.0.1").unwrap()).iso_code, "US");
        assert_eq!(store.lookup(parse_ipv4("10.0.0.1").unwrap()).iso_code, "JP");
    }
}
