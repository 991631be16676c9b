#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use reportfilters_core::FixedClock;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

pub fn clock(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock(date(y, m, d))
}

fn repo_root_from_crate() -> PathBuf {
    // crates/reportfilters-core -> repo root (two levels up)
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .expect("resolve repo root from CARGO_MANIFEST_DIR")
}

pub fn repo_path(rel: &str) -> PathBuf {
    repo_root_from_crate().join(rel)
}

pub fn fixture_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(rel)
}
