//! 数据集解析
//!
//! 将 locations / blocks 两张 CSV 表转换为内存记录。
//! 行级错误一律跳过并继续，只有打开数据源的 I/O 失败才中止本轮刷新。

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::utils::ip::cidr_base;

use super::records::{BlockEntry, LocationRecord};

/// locations 表的最小字段数（列布局按上游 schema 固定）
const LOC_MIN_FIELDS: usize = 13;

/// locations 表的列偏移
const COL_GEONAME_ID: usize = 0;
const COL_FALLBACK_ISO: usize = 2;
const COL_FALLBACK_NAME: usize = 3;
const COL_ISO_CODE: usize = 4;
const COL_COUNTRY_NAME: usize = 5;
const COL_SUBDIVISION: usize = 7;
const COL_CITY_NAME: usize = 10;
const COL_TIME_ZONE: usize = 12;

/// locations 表头在 iso-code 列的哨兵值
const LOC_HEADER_SENTINEL: &str = "country_iso";

/// blocks 表头在首列的哨兵值
const BLOCK_HEADER_SENTINEL: &str = "network";

/// 解析 locations 表
///
/// 返回 geoname id → 位置记录的映射。重复 id 后写覆盖；
/// 字段数不足的行跳过；主语种的 iso-code 或国家名为空时，
/// 回退到次语种列（部分行只填了其中一种语种）。
pub fn parse_locations<R: Read>(reader: R) -> Result<HashMap<String, Arc<LocationRecord>>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut locations = HashMap::new();
    let mut skipped = 0usize;

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping unreadable locations row: {}", e);
                skipped += 1;
                continue;
            }
        };

        if record.len() < LOC_MIN_FIELDS {
            skipped += 1;
            continue;
        }

        // 表头行：iso-code 列为哨兵值
        if record[COL_ISO_CODE].starts_with(LOC_HEADER_SENTINEL) {
            continue;
        }

        // 主语种两列齐全才用主语种，否则回退次语种
        let (iso_code, country_name) =
            if record[COL_ISO_CODE].is_empty() || record[COL_COUNTRY_NAME].is_empty() {
                (&record[COL_FALLBACK_ISO], &record[COL_FALLBACK_NAME])
            } else {
                (&record[COL_ISO_CODE], &record[COL_COUNTRY_NAME])
            };

        let geoname_id = record[COL_GEONAME_ID].to_string();
        let location = Arc::new(LocationRecord {
            geoname_id: geoname_id.clone(),
            iso_code: iso_code.to_string(),
            country_name: country_name.to_string(),
            subdivision: record[COL_SUBDIVISION].to_string(),
            city_name: record[COL_CITY_NAME].to_string(),
            time_zone: record[COL_TIME_ZONE].to_string(),
        });

        locations.insert(geoname_id, location);
    }

    if skipped > 0 {
        warn!("Skipped {} malformed locations rows", skipped);
    }
    debug!("Parsed {} location records", locations.len());

    Ok(locations)
}

/// 解析 blocks 表并关联位置记录
///
/// 首列为 CIDR 字符串（`base/prefix`），第二列为 geoname id。
/// 表头行与缺少斜杠的行跳过；geoname id 在 locations 中不存在时
/// 挂接全空记录（数据集偶尔引用没有位置行的 id，这不是错误）。
pub fn parse_blocks<R: Read>(
    reader: R,
    locations: &HashMap<String, Arc<LocationRecord>>,
) -> Result<Vec<BlockEntry>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut unmapped = 0usize;

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping unreadable blocks row: {}", e);
                skipped += 1;
                continue;
            }
        };

        let network = match record.get(0) {
            Some(network) if !network.is_empty() => network,
            _ => {
                skipped += 1;
                continue;
            }
        };

        if network == BLOCK_HEADER_SENTINEL {
            continue;
        }

        // 缺少斜杠或基地址非法的行跳过，不中止整轮解析
        let Some(start) = cidr_base(network) else {
            skipped += 1;
            continue;
        };

        let location = record
            .get(1)
            .and_then(|id| locations.get(id))
            .cloned()
            .unwrap_or_else(|| {
                unmapped += 1;
                LocationRecord::unknown()
            });

        entries.push(BlockEntry { start, location });
    }

    if skipped > 0 {
        warn!("Skipped {} malformed blocks rows", skipped);
    }
    if unmapped > 0 {
        debug!("{} blocks reference geoname ids with no location row", unmapped);
    }
    debug!("Parsed {} block entries", entries.len());

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS_CSV: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,subdivision_1_iso_code,subdivision_1_name,subdivision_2_iso_code,subdivision_2_name,city_name,metro_code,time_zone
100,en,NA,North America,US,United States,CA,California,,,Mountain View,807,America/Los_Angeles
200,en,EU,Europe,,,,,,,,,Europe/Berlin
300,en,AS,Asia,JP,Japan,13,Tokyo,,,Tokyo,,Asia/Tokyo
";

    #[test]
    fn test_parse_locations_basic() {
        let locations = parse_locations(LOCATIONS_CSV.as_bytes()).unwrap();
        // 表头行被跳过，不计入结果
        assert_eq!(locations.len(), 3);

        let us = &locations["100"];
        assert_eq!(us.iso_code, "US");
        assert_eq!(us.country_name, "United States");
        assert_eq!(us.subdivision, "California");
        assert_eq!(us.city_name, "Mountain View");
        assert_eq!(us.time_zone, "America/Los_Angeles");
    }

    #[test]
    fn test_parse_locations_locale_fallback() {
        let locations = parse_locations(LOCATIONS_CSV.as_bytes()).unwrap();
        // 主语种列为空时回退到次语种列（大洲代码/名称所在偏移）
        let fallback = &locations["200"];
        assert_eq!(fallback.iso_code, "EU");
        assert_eq!(fallback.country_name, "Europe");
        assert_eq!(fallback.time_zone, "Europe/Berlin");
    }

    #[test]
    fn test_parse_locations_short_rows_skipped() {
        let csv = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,subdivision_1_iso_code,subdivision_1_name,subdivision_2_iso_code,subdivision_2_name,city_name,metro_code,time_zone
100,en,NA,North America,US,United States,CA,California,,,Mountain View,807,America/Los_Angeles
short,row
";
        let locations = parse_locations(csv.as_bytes()).unwrap();
        assert_eq!(locations.len(), 1);
        assert!(locations.contains_key("100"));
    }

    #[test]
    fn test_parse_locations_duplicate_id_last_wins() {
        let csv = "\
100,en,NA,North America,US,United States,CA,California,,,Old City,807,America/Los_Angeles
100,en,NA,North America,US,United States,CA,California,,,New City,807,America/Los_Angeles
";
        let locations = parse_locations(csv.as_bytes()).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations["100"].city_name, "New City");
    }

    #[test]
    fn test_parse_blocks_basic() {
        let locations = parse_locations(LOCATIONS_CSV.as_bytes()).unwrap();
        let csv = "\
network,geoname_id,registered_country_geoname_id
10.0.0.0/24,100,100
10.0.1.0/24,300,300
";
        let entries = parse_blocks(csv.as_bytes(), &locations).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].start, crate::utils::ip::parse_ipv4("10.0.0.0").unwrap());
        assert_eq!(entries[0].location.iso_code, "US");
        assert_eq!(entries[1].location.iso_code, "JP");
    }

    #[test]
    fn test_parse_blocks_unmapped_id_gets_empty_record() {
        let locations = HashMap::new();
        let csv = "10.0.0.0/24,9999\n";
        let entries = parse_blocks(csv.as_bytes(), &locations).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].location.is_unknown());
    }

    #[test]
    fn test_parse_blocks_malformed_rows_skipped() {
        let locations = HashMap::new();
        let csv = "\
network,geoname_id
no-slash-here,100
10.0.0.0/24,100
,100
";
        let entries = parse_blocks(csv.as_bytes(), &locations).unwrap();
        // 表头、缺斜杠行、空首列行都不产生条目
        assert_eq!(entries.len(), 1);
    }
}
