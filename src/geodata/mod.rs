//! 地理数据核心模块
//!
//! 提供 IP 地址地理位置索引功能，分为三个部分：
//! - 数据集解析（locations / blocks 两张 CSV 表 → 内存记录）
//! - 范围索引（按首段分桶的有序块表 + 二分查找）
//! - 快照发布（不可变索引的原子替换）

mod index;
mod parser;
mod records;
mod store;

pub use index::IndexSnapshot;
pub use parser::{parse_blocks, parse_locations};
pub use records::{BlockEntry, LocationRecord};
pub use store::GeoStore;
