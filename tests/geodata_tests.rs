use std::io::Write;
use std::sync::Arc;
use std::thread;

use iplocator::geodata::{GeoStore, IndexSnapshot, LocationRecord, parse_blocks, parse_locations};
use iplocator::ingest::build_snapshot_from_files;
use iplocator::utils::ip::parse_ipv4;

/// 按上游 schema 排布的 locations 表样例（含表头）
const LOCATIONS_CSV: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,subdivision_1_iso_code,subdivision_1_name,subdivision_2_iso_code,subdivision_2_name,city_name,metro_code,time_zone
100,en,NA,North America,US,United States,CA,California,,,Mountain View,807,America/Los_Angeles
200,en,AS,Asia,JP,Japan,13,Tokyo,,,Tokyo,,Asia/Tokyo
";

/// blocks 表样例（含表头、引用缺失 id 的行）
const BLOCKS_CSV: &str = "\
network,geoname_id,registered_country_geoname_id
10.0.0.0/24,100,100
10.0.1.0/24,200,200
11.5.0.0/16,9999,9999
";

fn build_fixture_snapshot() -> IndexSnapshot {
    let locations = parse_locations(LOCATIONS_CSV.as_bytes()).unwrap();
    let blocks = parse_blocks(BLOCKS_CSV.as_bytes(), &locations).unwrap();
    IndexSnapshot::build(blocks)
}

#[test]
fn test_lookup_resolves_block_scenario() {
    let snapshot = build_fixture_snapshot();

    // 10.0.0.5 落在 10.0.0.0/24，应命中 US 记录
    let hit = snapshot.lookup(parse_ipv4("10.0.0.5").unwrap());
    assert_eq!(hit.iso_code, "US");
    assert_eq!(hit.country_name, "United States");
    assert_eq!(hit.time_zone, "America/Los_Angeles");

    // 12.0.0.5 没有对应桶，返回未知记录而不是错误
    let miss = snapshot.lookup(parse_ipv4("12.0.0.5").unwrap());
    assert!(miss.is_unknown());
}

#[test]
fn test_lookup_picks_nearest_preceding_block() {
    let snapshot = build_fixture_snapshot();

    // 归一化为 10.0.1.0，命中第二个块
    let hit = snapshot.lookup(parse_ipv4("10.0.1.200").unwrap());
    assert_eq!(hit.iso_code, "JP");
}

#[test]
fn test_unmapped_geoname_id_is_not_an_error() {
    let snapshot = build_fixture_snapshot();

    // 11.5.0.0/16 引用了不存在的 geoname id，仍然可查，返回全空记录
    let hit = snapshot.lookup(parse_ipv4("11.5.0.1").unwrap());
    assert!(hit.is_unknown());
}

#[test]
fn test_header_rows_do_not_corrupt_counts() {
    let snapshot = build_fixture_snapshot();
    // 两张表的表头行都不产生条目
    assert_eq!(snapshot.total(), 3);
}

#[test]
fn test_build_snapshot_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let locations_path = dir.path().join("GeoLite2-City-Locations-en.csv");
    let blocks_path = dir.path().join("GeoLite2-City-Blocks-IPv4.csv");

    std::fs::File::create(&locations_path)
        .unwrap()
        .write_all(LOCATIONS_CSV.as_bytes())
        .unwrap();
    std::fs::File::create(&blocks_path)
        .unwrap()
        .write_all(BLOCKS_CSV.as_bytes())
        .unwrap();

    let snapshot = build_snapshot_from_files(&locations_path, &blocks_path).unwrap();
    assert_eq!(snapshot.total(), 3);
    assert_eq!(
        snapshot.lookup(parse_ipv4("10.0.0.5").unwrap()).iso_code,
        "US"
    );
}

#[test]
fn test_build_snapshot_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = build_snapshot_from_files(
        &dir.path().join("missing-locations.csv"),
        &dir.path().join("missing-blocks.csv"),
    );
    assert!(result.is_err());
}

#[test]
fn test_failed_refresh_leaves_previous_snapshot_serving() {
    let store = GeoStore::new();
    store.publish(Arc::new(build_fixture_snapshot()));

    // 模拟失败的刷新：构建出错，什么都不发布
    let dir = tempfile::tempdir().unwrap();
    let result = build_snapshot_from_files(
        &dir.path().join("missing.csv"),
        &dir.path().join("missing.csv"),
    );
    assert!(result.is_err());

    // 先前发布的快照不受影响
    assert_eq!(store.total_ips(), 3);
    assert_eq!(
        store.lookup(parse_ipv4("10.0.0.5").unwrap()).iso_code,
        "US"
    );
}

/// 并发发布与查询：查询只会看到完整的新快照或完整的旧快照
#[test]
fn test_concurrent_publish_and_lookup() {
    let store = Arc::new(GeoStore::new());
    store.publish(Arc::new(build_fixture_snapshot()));

    let addr = parse_ipv4("10.0.0.5").unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..2000 {
                    let record = store.lookup(addr);
                    // 任一时刻只可能读到两种完整结果之一
                    assert!(record.iso_code == "US" || record.iso_code == "XX");
                }
            })
        })
        .collect();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..200 {
                let replacement = IndexSnapshot::build(vec![iplocator::geodata::BlockEntry {
                    start: parse_ipv4("10.0.0.0").unwrap(),
                    location: Arc::new(LocationRecord {
                        iso_code: "XX".to_string(),
                        country_name: "Replaced".to_string(),
                        ..Default::default()
                    }),
                }]);
                store.publish(Arc::new(replacement));
                store.publish(Arc::new(build_fixture_snapshot()));
            }
        })
    };

    for reader in readers {
        reader.join().unwrap();
    }
    writer.join().unwrap();
}
