//! 地理位置记录类型定义

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

/// 一条地理位置记录
///
/// 由 locations 表解析产生，解析后不可变；查询路径通过 `Arc` 共享，
/// 序列化输出即 `/ip` 接口的响应体（geoname_id 仅作内部关联键，不出现在响应中）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(skip)]
    pub geoname_id: String,
    pub iso_code: String,
    pub country_name: String,
    pub subdivision: String,
    pub city_name: String,
    pub time_zone: String,
}

impl LocationRecord {
    /// 全空的未知记录
    ///
    /// "查不到" 是正常业务结果而非错误，统一返回这条共享记录。
    pub fn unknown() -> Arc<LocationRecord> {
        static UNKNOWN: OnceLock<Arc<LocationRecord>> = OnceLock::new();
        Arc::clone(UNKNOWN.get_or_init(|| Arc::new(LocationRecord::default())))
    }

    pub fn is_unknown(&self) -> bool {
        self.iso_code.is_empty() && self.country_name.is_empty()
    }
}

/// 一个网络块条目
///
/// 表示 "从 start 起、到同桶内下一条目的 start 为止的地址属于 location"。
#[derive(Debug, Clone)]
pub struct BlockEntry {
    /// 块的起始地址（32 位无符号整数形式）
    pub start: u32,
    /// 块归属的地理位置
    pub location: Arc<LocationRecord>,
}
