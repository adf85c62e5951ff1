//! The static table of everything this crate reads from a UPS.
//!
//! Each numeric metric lists one or more candidate OIDs in priority order: the vendor MIB
//! (44782) first since it reports the most precise values, then the legacy enterprise MIB
//! (935) and finally the standard UPS-MIB of RFC 1628. The table is built once on first use
//! and never changes afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::raw::RawOidMap;
use crate::severity::Severity;
use crate::unit::Unit;

/// Raw value a device reports instead of a measurement it does not have.
pub const SENTINEL: i64 = -99998;

const DEFAULT_SENTINELS: &[i64] = &[SENTINEL];

/// `upsIdentName`, used to recognize a compatible device.
pub const IDENT_NAME_OID: &str = "1.3.6.1.2.1.33.1.1.5.0";

/// Marker the identification string of a supported device contains.
pub const VENDOR_MARKER: &str = "Wiseway3";

/// How the raw value of a candidate OID is encoded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Encoding {
    /// A plain integer in the target unit.
    Integer,
    /// An integer in a fraction of the target unit, e.g. decivolts with a divisor of 10.
    ScaledInteger { divisor: f64 },
    /// A float encoded as string, e.g. `"231.9"`.
    DecimalString,
}

/// One possible source of a metric.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub oid: String,
    pub encoding: Encoding,
    /// Multiplier applied after decoding, converting the device unit into the SI unit
    /// (60 for minutes reported where seconds are wanted).
    pub factor: f64,
}

impl Candidate {
    pub fn integer(oid: String) -> Self {
        Candidate {
            oid,
            encoding: Encoding::Integer,
            factor: 1.0,
        }
    }

    pub fn scaled(oid: String, divisor: f64) -> Self {
        Candidate {
            oid,
            encoding: Encoding::ScaledInteger { divisor },
            factor: 1.0,
        }
    }

    pub fn decimal(oid: String) -> Self {
        Candidate {
            oid,
            encoding: Encoding::DecimalString,
            factor: 1.0,
        }
    }

    pub fn times(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }
}

/// Definition of one logical metric.
#[derive(Clone, Debug)]
pub struct OidDefinition {
    /// Unique, stable identifier of the metric.
    pub name: &'static str,
    pub description: &'static str,
    /// Sources in priority order.
    pub candidates: Vec<Candidate>,
    /// Raw values meaning "not available".
    pub sentinels: &'static [i64],
    pub unit: Unit,
}

impl OidDefinition {
    fn new(name: &'static str, description: &'static str, unit: Unit) -> Self {
        OidDefinition {
            name,
            description,
            candidates: Vec::new(),
            sentinels: DEFAULT_SENTINELS,
            unit,
        }
    }

    fn source(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }
}

/// A string valued identification or inventory field.
#[derive(Clone, Debug)]
pub struct TextField {
    pub name: &'static str,
    pub oid: String,
}

/// Service group an alarm flag is reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmGroup {
    Battery,
    Power,
    System,
}

/// A flag OID which reads `1` while the alarm is raised.
#[derive(Clone, Debug)]
pub struct AlarmFlag {
    pub name: &'static str,
    pub oid: String,
    pub label: &'static str,
    pub raised: Severity,
    pub group: AlarmGroup,
}

impl AlarmFlag {
    /// Anything other than `1`, including a missing OID, counts as clear.
    pub fn is_raised(&self, raw: &RawOidMap) -> bool {
        raw.get(&self.oid).and_then(|v| v.as_integer()) == Some(1)
    }
}

/// The immutable set of metric, text and alarm definitions.
pub struct Catalog {
    metrics: Vec<OidDefinition>,
    index: HashMap<&'static str, usize>,
    texts: Vec<TextField>,
    alarms: Vec<AlarmFlag>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::build);

/// Returns the process wide catalog.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&OidDefinition> {
        self.index.get(name).map(|&idx| &self.metrics[idx])
    }

    pub fn metrics(&self) -> &[OidDefinition] {
        &self.metrics
    }

    pub fn texts(&self) -> &[TextField] {
        &self.texts
    }

    pub fn text(&self, name: &str) -> Option<&TextField> {
        self.texts.iter().find(|t| t.name == name)
    }

    pub fn alarms(&self) -> &[AlarmFlag] {
        &self.alarms
    }

    /// Every OID a transport layer has to query for a full poll cycle, in catalog order and
    /// without duplicates.
    pub fn requested_oids(&self) -> Vec<String> {
        let mut oids: Vec<String> = Vec::new();
        let mut push = |oid: &str| {
            if !oids.iter().any(|o| o == oid) {
                oids.push(oid.to_owned());
            }
        };

        push(IDENT_NAME_OID);
        for text in &self.texts {
            push(&text.oid);
        }
        for metric in &self.metrics {
            for candidate in &metric.candidates {
                push(&candidate.oid);
            }
        }
        for field in crate::status::StatusField::ALL {
            push(field.oid());
        }
        for alarm in &self.alarms {
            push(&alarm.oid);
        }

        oids
    }

    fn build() -> Catalog {
        let metrics = metric_definitions();
        let index = metrics
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.name, idx))
            .collect();

        Catalog {
            metrics,
            index,
            texts: text_fields(),
            alarms: alarm_flags(),
        }
    }
}

/// Checks the identification string for the vendor marker.
pub fn is_supported_device(raw: &RawOidMap) -> bool {
    raw.get(IDENT_NAME_OID)
        .and_then(|v| v.as_text())
        .is_some_and(|name| name.contains(VENDOR_MARKER))
}

fn rfc1628(suffix: &str) -> String {
    format!("1.3.6.1.2.1.33.1.{}", suffix)
}

fn vendor(suffix: &str) -> String {
    format!("1.3.6.1.4.1.44782.1.4.4.1.{}", suffix)
}

fn vendor_config(suffix: &str) -> String {
    format!("1.3.6.1.4.1.44782.1.1.3.{}", suffix)
}

fn legacy(suffix: &str) -> String {
    format!("1.3.6.1.4.1.935.1.1.1.{}", suffix)
}

fn metric_definitions() -> Vec<OidDefinition> {
    vec![
        // battery
        OidDefinition::new("battery_charge", "remaining battery capacity", Unit::Percentage)
            .source(Candidate::decimal(vendor("18.0")))
            .source(Candidate::integer(legacy("2.2.1.0")))
            .source(Candidate::integer(rfc1628("2.4.0"))),
        OidDefinition::new("battery_runtime", "estimated battery runtime", Unit::Seconds)
            .source(Candidate::decimal(vendor("17.0")).times(60.0))
            .source(Candidate::integer(rfc1628("2.3.0")).times(60.0)),
        OidDefinition::new("seconds_on_battery", "time spent on battery", Unit::Seconds)
            .source(Candidate::integer(rfc1628("2.2.0"))),
        OidDefinition::new("battery_voltage", "battery voltage", Unit::Volts)
            .source(Candidate::decimal(vendor("19.0")))
            .source(Candidate::scaled(rfc1628("2.5.0"), 10.0)),
        OidDefinition::new(
            "battery_current",
            "battery charging (+) or discharging (-) current",
            Unit::Amperes,
        )
        .source(Candidate::decimal(vendor("20.0")))
        .source(Candidate::scaled(rfc1628("2.6.0"), 10.0)),
        OidDefinition::new("battery_temperature", "battery temperature", Unit::Celsius)
            .source(Candidate::decimal(vendor("21.0")))
            .source(Candidate::integer(rfc1628("2.7.0"))),
        // input
        OidDefinition::new("input_line_bads", "input out of tolerance events", Unit::Counter)
            .source(Candidate::integer(rfc1628("3.1.0"))),
        OidDefinition::new("input_voltage", "input voltage", Unit::Volts)
            .source(Candidate::decimal(vendor("27.0")))
            .source(Candidate::scaled(rfc1628("3.3.1.3.1"), 10.0)),
        OidDefinition::new("input_frequency", "input frequency", Unit::Hertz)
            .source(Candidate::decimal(vendor("24.0")))
            .source(Candidate::scaled(rfc1628("3.3.1.2.1"), 100.0)),
        // output
        OidDefinition::new("output_voltage", "output voltage", Unit::Volts)
            .source(Candidate::decimal(vendor("42.0")))
            .source(Candidate::scaled(rfc1628("4.4.1.2.1"), 10.0)),
        OidDefinition::new("output_frequency", "output frequency", Unit::Hertz)
            .source(Candidate::decimal(vendor("40.0")))
            .source(Candidate::scaled(rfc1628("4.2.0"), 100.0)),
        OidDefinition::new("output_current", "output current", Unit::Amperes)
            .source(Candidate::decimal(vendor("45.0")))
            .source(Candidate::scaled(rfc1628("4.4.1.3.1"), 10.0)),
        OidDefinition::new("output_power", "output active power", Unit::Watts)
            .source(Candidate::decimal(vendor("48.0")))
            .source(Candidate::integer(rfc1628("4.4.1.4.1"))),
        OidDefinition::new("output_load", "output load", Unit::Percentage)
            .source(Candidate::decimal(vendor("51.0")))
            .source(Candidate::integer(rfc1628("4.4.1.5.1"))),
        // bypass
        OidDefinition::new("bypass_voltage", "bypass voltage", Unit::Volts)
            .source(Candidate::decimal(vendor("59.0")))
            .source(Candidate::scaled(rfc1628("5.3.1.2.1"), 10.0)),
        OidDefinition::new("bypass_frequency", "bypass frequency", Unit::Hertz)
            .source(Candidate::decimal(vendor("57.0")))
            .source(Candidate::scaled(rfc1628("5.1.0"), 100.0)),
        // ratings
        OidDefinition::new("rated_power", "rated power", Unit::Watts)
            .source(Candidate::decimal(vendor("11.0"))),
        OidDefinition::new("rated_battery_capacity", "rated battery capacity", Unit::AmpereHours)
            .source(Candidate::decimal(vendor("12.0"))),
        OidDefinition::new("number_of_batteries", "number of batteries", Unit::Counter)
            .source(Candidate::integer(vendor("14.0"))),
        OidDefinition::new("batteries_per_group", "batteries in a single group", Unit::Counter)
            .source(Candidate::integer(vendor("15.0"))),
        // limits configured on the device itself
        OidDefinition::new(
            "config_input_voltage_upper",
            "configured input voltage upper limit",
            Unit::Volts,
        )
        .source(Candidate::decimal(vendor_config("1.0"))),
        OidDefinition::new(
            "config_input_voltage_lower",
            "configured input voltage lower limit",
            Unit::Volts,
        )
        .source(Candidate::decimal(vendor_config("2.0"))),
        OidDefinition::new(
            "config_output_voltage_upper",
            "configured output voltage upper limit",
            Unit::Volts,
        )
        .source(Candidate::decimal(vendor_config("3.0"))),
        OidDefinition::new(
            "config_output_voltage_lower",
            "configured output voltage lower limit",
            Unit::Volts,
        )
        .source(Candidate::decimal(vendor_config("4.0"))),
        OidDefinition::new(
            "config_temperature_upper",
            "configured temperature upper limit",
            Unit::Celsius,
        )
        .source(Candidate::decimal(vendor_config("5.0"))),
        OidDefinition::new(
            "config_output_load_upper",
            "configured output load upper limit",
            Unit::Percentage,
        )
        .source(Candidate::decimal(vendor_config("6.0"))),
        OidDefinition::new(
            "config_battery_voltage_lower",
            "configured battery voltage lower limit",
            Unit::Volts,
        )
        .source(Candidate::decimal(vendor_config("7.0"))),
    ]
}

fn text_fields() -> Vec<TextField> {
    let field = |name, oid| TextField { name, oid };
    vec![
        field("model", rfc1628("1.2.0")),
        field("manufacturer", vendor("2.0")),
        field("serial_number", "1.3.6.1.4.1.44782.1.4.1.5.0".to_owned()),
        field("firmware_version", rfc1628("1.3.0")),
        field("agent_version", rfc1628("1.4.0")),
        field("installation_time", vendor("6.0")),
        field("maintenance_expiration", vendor("8.0")),
        field("battery_installation", vendor("9.0")),
        field("battery_next_maintenance", vendor("10.0")),
    ]
}

fn alarm_flags() -> Vec<AlarmFlag> {
    use AlarmGroup::*;
    use Severity::{Critical, Warning};

    let flag = |name, suffix: &str, label, raised, group| AlarmFlag {
        name,
        oid: vendor(suffix),
        label,
        raised,
        group,
    };

    vec![
        flag("battery_abnormal", "72.0", "abnormal", Warning, Battery),
        flag("battery_powered", "73.0", "battery powered", Warning, Battery),
        flag("battery_low_voltage", "74.0", "low voltage", Critical, Battery),
        flag("input_abnormal", "77.0", "Input abnormal alarm", Warning, Power),
        flag("output_abnormal", "78.0", "Output abnormal alarm", Warning, Power),
        flag("bypass_status", "80.0", "Bypass active", Warning, Power),
        flag("shutdown_imminent", "89.0", "Shutdown imminent", Critical, System),
        flag(
            "low_battery_shutdown_imminent",
            "93.0",
            "Low battery shutdown imminent",
            Critical,
            System,
        ),
        flag("abnormal_communication", "71.0", "Communication abnormal", Critical, System),
        flag("temperature_abnormal", "76.0", "Temperature abnormal", Warning, System),
        flag("overload", "79.0", "Overload condition", Warning, System),
        flag("fan_failure", "81.0", "Fan failure", Warning, System),
        flag("shutdown_request", "85.0", "Shutdown request", Warning, System),
        flag("test_in_progress", "86.0", "Test in progress", Warning, System),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::raw::RawValue;

    #[test]
    fn test_names_are_unique() {
        let catalog = catalog();
        let mut seen = HashSet::new();
        for name in catalog
            .metrics()
            .iter()
            .map(|m| m.name)
            .chain(catalog.texts().iter().map(|t| t.name))
            .chain(catalog.alarms().iter().map(|a| a.name))
        {
            assert!(seen.insert(name), "duplicate catalog name {}", name);
        }
    }

    #[test]
    fn test_every_metric_has_a_source() {
        for metric in catalog().metrics() {
            assert!(!metric.candidates.is_empty(), "{} has no candidates", metric.name);
            assert_eq!(metric.sentinels, &[SENTINEL]);
        }
    }

    #[test]
    fn test_candidate_order() {
        let charge = catalog().get("battery_charge").unwrap();
        let oids: Vec<&str> = charge.candidates.iter().map(|c| c.oid.as_str()).collect();
        assert_eq!(
            oids,
            [
                "1.3.6.1.4.1.44782.1.4.4.1.18.0",
                "1.3.6.1.4.1.935.1.1.1.2.2.1.0",
                "1.3.6.1.2.1.33.1.2.4.0",
            ]
        );

        let runtime = catalog().get("battery_runtime").unwrap();
        assert!(runtime.candidates.iter().all(|c| c.factor == 60.0));
        assert_eq!(runtime.unit, Unit::Seconds);

        assert!(catalog().get("no_such_metric").is_none());
    }

    #[test]
    fn test_requested_oids() {
        let oids = catalog().requested_oids();
        assert_eq!(oids[0], IDENT_NAME_OID);
        assert!(oids.contains(&"1.3.6.1.2.1.33.1.2.1.0".to_owned()));
        assert!(oids.contains(&"1.3.6.1.4.1.44782.1.1.3.1.0".to_owned()));
        assert!(oids.contains(&"1.3.6.1.4.1.44782.1.4.4.1.94.0".to_owned()));

        let unique: HashSet<&String> = oids.iter().collect();
        assert_eq!(unique.len(), oids.len());
    }

    #[test]
    fn test_detection() {
        let raw: RawOidMap = [(IDENT_NAME_OID, RawValue::from("UPS Wiseway3 10kVA"))]
            .into_iter()
            .collect();
        assert!(is_supported_device(&raw));

        let raw: RawOidMap = [(IDENT_NAME_OID, RawValue::from("Smart-UPS 1500"))]
            .into_iter()
            .collect();
        assert!(!is_supported_device(&raw));
        assert!(!is_supported_device(&RawOidMap::new()));
    }

    #[test]
    fn test_alarm_flag() {
        let overload = catalog()
            .alarms()
            .iter()
            .find(|a| a.name == "overload")
            .unwrap();
        let raised: RawOidMap = [(overload.oid.as_str(), RawValue::from(1))]
            .into_iter()
            .collect();
        let clear: RawOidMap = [(overload.oid.as_str(), RawValue::from("0"))]
            .into_iter()
            .collect();

        assert!(overload.is_raised(&raised));
        assert!(!overload.is_raised(&clear));
        assert!(!overload.is_raised(&RawOidMap::new()));
    }
}
