// Shared test fixtures
#![allow(dead_code)]

use chrono::NaiveDate;
use wiseway_ups::{InputFormat, RawOidMap};

/// `snmpget -On` output of a healthy device running on mains.
pub const HEALTHY_WALK: &str = r#"
.1.3.6.1.2.1.33.1.1.2.0 = STRING: "WW3-3K"
.1.3.6.1.2.1.33.1.1.3.0 = STRING: "V1.02"
.1.3.6.1.2.1.33.1.1.4.0 = STRING: "2.1.0"
.1.3.6.1.2.1.33.1.1.5.0 = STRING: "Wiseway3 UPS"
.1.3.6.1.2.1.33.1.2.1.0 = INTEGER: batteryNormal(2)
.1.3.6.1.2.1.33.1.2.2.0 = INTEGER: 0
.1.3.6.1.2.1.33.1.2.3.0 = INTEGER: 45
.1.3.6.1.2.1.33.1.2.4.0 = INTEGER: 100
.1.3.6.1.2.1.33.1.2.5.0 = INTEGER: 2184
.1.3.6.1.2.1.33.1.2.6.0 = INTEGER: 12
.1.3.6.1.2.1.33.1.2.7.0 = INTEGER: 25
.1.3.6.1.2.1.33.1.3.1.0 = Counter32: 0
.1.3.6.1.2.1.33.1.3.3.1.2.1 = INTEGER: 5000
.1.3.6.1.2.1.33.1.3.3.1.3.1 = INTEGER: 2301
.1.3.6.1.2.1.33.1.4.1.0 = INTEGER: normal(3)
.1.3.6.1.2.1.33.1.4.2.0 = INTEGER: 5000
.1.3.6.1.2.1.33.1.4.4.1.2.1 = INTEGER: 2300
.1.3.6.1.2.1.33.1.4.4.1.3.1 = INTEGER: 52
.1.3.6.1.2.1.33.1.4.4.1.4.1 = INTEGER: 1150
.1.3.6.1.2.1.33.1.4.4.1.5.1 = INTEGER: 38
.1.3.6.1.2.1.33.1.5.1.0 = INTEGER: 5000
.1.3.6.1.2.1.33.1.5.3.1.2.1 = INTEGER: 2302
.1.3.6.1.4.1.935.1.1.1.2.2.1.0 = No Such Object available on this agent at this OID
.1.3.6.1.4.1.935.1.1.1.4.1.1.0 = INTEGER: 2
.1.3.6.1.4.1.44782.1.4.1.5.0 = STRING: "WW3K2023001"
.1.3.6.1.4.1.44782.1.4.4.1.2.0 = STRING: "Wiseway"
.1.3.6.1.4.1.44782.1.4.4.1.6.0 = STRING: "2023-03-14"
.1.3.6.1.4.1.44782.1.4.4.1.8.0 = STRING: "2026-03-14"
.1.3.6.1.4.1.44782.1.4.4.1.9.0 = STRING: "2023-03-14"
.1.3.6.1.4.1.44782.1.4.4.1.10.0 = STRING: "2025-03-14"
.1.3.6.1.4.1.44782.1.4.4.1.11.0 = STRING: "3000"
.1.3.6.1.4.1.44782.1.4.4.1.12.0 = STRING: "9"
.1.3.6.1.4.1.44782.1.4.4.1.14.0 = INTEGER: 16
.1.3.6.1.4.1.44782.1.4.4.1.15.0 = INTEGER: 8
.1.3.6.1.4.1.44782.1.4.4.1.17.0 = STRING: "48"
.1.3.6.1.4.1.44782.1.4.4.1.18.0 = STRING: "100.0"
.1.3.6.1.4.1.44782.1.4.4.1.19.0 = STRING: "218.6"
.1.3.6.1.4.1.44782.1.4.4.1.20.0 = STRING: "1.3"
.1.3.6.1.4.1.44782.1.4.4.1.21.0 = STRING: "25.5"
.1.3.6.1.4.1.44782.1.4.4.1.24.0 = STRING: "49.98"
.1.3.6.1.4.1.44782.1.4.4.1.27.0 = STRING: "231.9"
.1.3.6.1.4.1.44782.1.4.4.1.39.0 = INTEGER: 2
.1.3.6.1.4.1.44782.1.4.4.1.40.0 = STRING: "50.00"
.1.3.6.1.4.1.44782.1.4.4.1.42.0 = STRING: "230.0"
.1.3.6.1.4.1.44782.1.4.4.1.45.0 = STRING: "5.1"
.1.3.6.1.4.1.44782.1.4.4.1.48.0 = STRING: "1180"
.1.3.6.1.4.1.44782.1.4.4.1.51.0 = STRING: "39"
.1.3.6.1.4.1.44782.1.4.4.1.57.0 = INTEGER: -99998
.1.3.6.1.4.1.44782.1.4.4.1.59.0 = STRING: "229.8"
.1.3.6.1.4.1.44782.1.4.4.1.71.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.72.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.73.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.74.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.76.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.77.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.78.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.79.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.80.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.81.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.85.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.86.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.89.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.93.0 = INTEGER: 0
.1.3.6.1.4.1.44782.1.4.4.1.94.0 = INTEGER: 1
.1.3.6.1.4.1.44782.1.1.3.1.0 = STRING: "242"
.1.3.6.1.4.1.44782.1.1.3.2.0 = STRING: "187"
.1.3.6.1.4.1.44782.1.1.3.3.0 = STRING: "0"
.1.3.6.1.4.1.44782.1.1.3.5.0 = STRING: "40"
.1.3.6.1.4.1.44782.1.1.3.6.0 = STRING: "95"
.1.3.6.1.4.1.44782.1.1.3.7.0 = INTEGER: -99998
"#;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn healthy() -> RawOidMap {
    RawOidMap::parse(HEALTHY_WALK, InputFormat::Walk).expect("fixture parses")
}

/// The healthy fixture with some values replaced.
pub fn healthy_with(overrides: &[(&str, &str)]) -> RawOidMap {
    let mut raw = healthy();
    for (oid, value) in overrides {
        raw.insert(oid, *value).expect("valid oid");
    }
    raw
}

/// The healthy fixture with some integer values replaced.
pub fn healthy_with_ints(overrides: &[(&str, i64)]) -> RawOidMap {
    let mut raw = healthy();
    for (oid, value) in overrides {
        raw.insert(oid, *value).expect("valid oid");
    }
    raw
}

/// A fixture with some OIDs removed.
pub fn healthy_without(removed: &[&str]) -> RawOidMap {
    healthy()
        .iter()
        .filter(|(oid, _)| !removed.contains(oid))
        .map(|(oid, value)| (oid, value.clone()))
        .collect()
}
