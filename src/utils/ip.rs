//! IPv4 地址处理工具
//!
//! 提供统一的地址换算功能，支持：
//! - 点分十进制 ↔ u32 互转
//! - CIDR 基地址提取
//! - 查询地址的块对齐归一化

use std::net::Ipv4Addr;

/// 将点分十进制字符串解析为 32 位无符号整数
///
/// 解析失败（非法格式、IPv6、空串）返回 `None`。
pub fn parse_ipv4(addr: &str) -> Option<u32> {
    let ip: Ipv4Addr = addr.trim().parse().ok()?;
    Some(u32::from_be_bytes(ip.octets()))
}

/// 取地址的首段（最高有效字节），作为分区索引的桶键
#[inline]
pub fn first_octet(addr: u32) -> u8 {
    (addr >> 24) as u8
}

/// 将查询地址的末段清零，对齐到数据集的块边界
///
/// 数据集的网络块以显式基地址表示，查询前先做粗粒度对齐，
/// 再与块基地址做整数比较。
#[inline]
pub fn normalize_block(addr: u32) -> u32 {
    addr & 0xFFFF_FF00
}

/// 从 CIDR 字符串（如 "10.0.0.0/24"）提取基地址的 u32 形式
///
/// 缺少斜杠或基地址非法时返回 `None`。
pub fn cidr_base(cidr: &str) -> Option<u32> {
    let (base, _prefix) = cidr.split_once('/')?;
    parse_ipv4(base)
}
