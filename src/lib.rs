//! The wiseway_ups crate turns SNMP poll results of Wiseway3 UPS devices into nagios service
//! results.
//!
//! A poll cycle is handed over as a [RawOidMap]. From there the [catalog] tells which OIDs
//! describe a metric, the [resolver] picks and decodes the first usable one, the [status]
//! mapper names enumerated codes and the [thresholds] evaluator turns numbers into a
//! [Severity]. [checks] composes all of it into one [Resource] per monitored service.
//!
//! ```rust
//! # use wiseway_ups::{RawOidMap, InputFormat, ThresholdConfig, UpsCheck, Service, Severity};
//! let raw = RawOidMap::parse(
//!     ".1.3.6.1.4.1.44782.1.4.4.1.27.0 = STRING: \"231.9\"",
//!     InputFormat::Walk,
//! ).unwrap();
//! let config = ThresholdConfig::default();
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! let resource = UpsCheck::new(&raw, &config, today).run(Service::InputVoltage).unwrap();
//! assert_eq!(resource.state(), Severity::Ok);
//! assert_eq!(
//!     &resource.to_nagios_string(),
//!     "UPS Input Voltage OK: Input voltage: 231.9V | input_voltage=231.9V;210:250;200:260"
//! );
//! ```

pub mod catalog;
pub mod checks;
pub mod config;
mod error;
pub mod oid;
pub mod raw;
pub mod resolver;
mod resource;
mod runner;
mod severity;
pub mod status;
pub mod thresholds;
mod unit;

pub use crate::catalog::{catalog, is_supported_device, Catalog, OidDefinition};
pub use crate::checks::{Service, UpsCheck};
pub use crate::config::ThresholdConfig;
pub use crate::error::{Error, Result};
pub use crate::raw::{InputFormat, RawOidMap, RawValue};
pub use crate::resolver::{resolve, resolve_all, ResolvedMetric};
pub use crate::resource::{CheckResult, PerfData, Range, Report, Resource};
pub use crate::runner::{Runner, RunnerResult};
pub use crate::severity::Severity;
pub use crate::status::{map_status, StatusField};
pub use crate::thresholds::{evaluate, ThresholdSpec};
pub use crate::unit::{render_timespan, Unit};
