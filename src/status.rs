use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::raw::{RawOidMap, RawValue};
use crate::severity::Severity;

/// Label for codes missing from a table.
pub const UNKNOWN: &str = "unknown";

const BATTERY_STATUS: &[(i64, &str)] = &[
    (1, "unknown"),
    (2, "batteryNormal"),
    (3, "batteryLow"),
    (4, "batteryDepleted"),
];

const OUTPUT_SOURCE: &[(i64, &str)] = &[
    (1, "other"),
    (2, "none"),
    (3, "normal"),
    (4, "bypass"),
    (5, "battery"),
    (6, "booster"),
    (7, "reducer"),
];

const POWER_SUPPLY_MODE: &[(i64, &str)] = &[
    (1, "standby"),
    (2, "online"),
    (3, "battery"),
    (4, "bypass"),
    (5, "eco"),
];

const BASE_OUTPUT_STATUS: &[(i64, &str)] = &[
    (1, "unknown"),
    (2, "onLine"),
    (3, "onBattery"),
    (4, "onSmartBoost"),
    (5, "timedSleeping"),
    (6, "softwareBypass"),
    (7, "off"),
    (8, "rebooting"),
    (9, "switchedBypass"),
    (10, "hardwareFailureBypass"),
    (11, "sleepingUntilPowerReturn"),
    (12, "onSmartTrim"),
    (13, "ecoMode"),
    (14, "hotStandby"),
    (15, "onBatteryTest"),
];

const SYSTEM_STATUS: &[(i64, &str)] = &[(1, "normal"), (2, "warning"), (3, "critical")];

/// The enumerated fields a UPS reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusField {
    BatteryStatus,
    OutputSource,
    PowerSupplyMode,
    BaseOutputStatus,
    SystemStatus,
}

impl StatusField {
    pub const ALL: [StatusField; 5] = [
        StatusField::BatteryStatus,
        StatusField::OutputSource,
        StatusField::PowerSupplyMode,
        StatusField::BaseOutputStatus,
        StatusField::SystemStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusField::BatteryStatus => "battery_status",
            StatusField::OutputSource => "output_source",
            StatusField::PowerSupplyMode => "power_supply_mode",
            StatusField::BaseOutputStatus => "base_output_status",
            StatusField::SystemStatus => "system_status",
        }
    }

    /// The OID the code is read from.
    pub fn oid(&self) -> &'static str {
        match self {
            StatusField::BatteryStatus => "1.3.6.1.2.1.33.1.2.1.0",
            StatusField::OutputSource => "1.3.6.1.2.1.33.1.4.1.0",
            StatusField::PowerSupplyMode => "1.3.6.1.4.1.44782.1.4.4.1.39.0",
            StatusField::BaseOutputStatus => "1.3.6.1.4.1.935.1.1.1.4.1.1.0",
            StatusField::SystemStatus => "1.3.6.1.4.1.44782.1.4.4.1.94.0",
        }
    }

    fn table(&self) -> &'static [(i64, &'static str)] {
        match self {
            StatusField::BatteryStatus => BATTERY_STATUS,
            StatusField::OutputSource => OUTPUT_SOURCE,
            StatusField::PowerSupplyMode => POWER_SUPPLY_MODE,
            StatusField::BaseOutputStatus => BASE_OUTPUT_STATUS,
            StatusField::SystemStatus => SYSTEM_STATUS,
        }
    }

    /// How a mapped status name affects the service state. `None` means the status is not
    /// worth reporting at all.
    pub fn severity(&self, status: &str) -> Option<Severity> {
        let severity = match self {
            StatusField::BatteryStatus => match status {
                "batteryNormal" => Severity::Ok,
                "batteryLow" | "batteryDepleted" => Severity::Critical,
                _ => Severity::Warning,
            },
            StatusField::OutputSource => match status {
                "normal" => Severity::Ok,
                "battery" | "bypass" => Severity::Warning,
                _ => Severity::Critical,
            },
            StatusField::PowerSupplyMode => match status {
                UNKNOWN => return None,
                _ => Severity::Ok,
            },
            StatusField::BaseOutputStatus => match status {
                UNKNOWN => return None,
                "onLine" => Severity::Ok,
                "onBattery" | "onSmartBoost" | "softwareBypass" | "switchedBypass"
                | "onSmartTrim" | "ecoMode" | "onBatteryTest" => Severity::Warning,
                _ => Severity::Critical,
            },
            StatusField::SystemStatus => match status {
                "normal" => Severity::Ok,
                "warning" => Severity::Warning,
                "critical" => Severity::Critical,
                _ => return None,
            },
        };
        Some(severity)
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatusField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::UnknownStatusField(s.to_owned()))
    }
}

/// Maps a raw code to its name. Codes outside the table map to `"unknown"`.
pub fn map_status(field: StatusField, code: i64) -> &'static str {
    field
        .table()
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN)
}

/// Maps a raw query value, coercing it into an integer first.
pub fn map_raw_status(field: StatusField, raw: Option<&RawValue>) -> &'static str {
    match raw.and_then(|v| v.as_integer()) {
        Some(code) => map_status(field, code),
        None => UNKNOWN,
    }
}

/// Reads and maps the field from a poll cycle.
pub fn resolve_status(field: StatusField, raw: &RawOidMap) -> &'static str {
    map_raw_status(field, raw.get(field.oid()))
}
