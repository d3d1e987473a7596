//! IpLocator - A self-refreshing GeoIP lookup service
//!
//! This library provides the core functionality for the IpLocator service:
//! a range index over a periodically-refreshed geo-IP dataset, served as
//! point lookups over HTTP.
//!
//! # Architecture
//! - `geodata`: dataset parsing, the partitioned range index, snapshot publishing
//! - `ingest`: refresh orchestration (download, unpack, parse, build, publish)
//! - `api`: HTTP services (`/ip`, `/update`, `/health`)
//! - `config`: configuration management
//! - `runtime`: application lifecycle
//! - `system`: logging and system utilities

pub mod api;
pub mod config;
pub mod errors;
pub mod geodata;
pub mod ingest;
pub mod runtime;
pub mod system;
pub mod utils;
