//! The services a UPS is monitored with, composed from resolved metrics, mapped status codes,
//! alarm flags and evaluated thresholds.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::{catalog, AlarmGroup};
use crate::config::ThresholdConfig;
use crate::error::{Error, Result};
use crate::raw::RawOidMap;
use crate::resolver::{resolve, ResolvedMetric};
use crate::resource::{CheckResult, PerfData, Resource};
use crate::severity::Severity;
use crate::status::{resolve_status, StatusField};
use crate::thresholds::{effective_spec, evaluate, ThresholdSpec};
use crate::unit::{render_timespan, Unit};

/// Format of the maintenance dates a device reports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
    InputVoltage,
    OutputVoltage,
    BypassVoltage,
    BatteryVoltage,
    BatteryCurrent,
    OutputCurrent,
    BatteryTemperature,
    InputFrequency,
    OutputFrequency,
    BypassFrequency,
    OutputPower,
    OutputLoad,
    BatteryCharge,
    BatteryRuntime,
    BatteryStatus,
    PowerStatus,
    AlarmStatus,
    SystemInfo,
}

impl Service {
    /// Every service, in the order [UpsCheck::run_all] reports them.
    pub const ALL: [Service; 18] = [
        Service::InputVoltage,
        Service::OutputVoltage,
        Service::BypassVoltage,
        Service::BatteryVoltage,
        Service::BatteryCurrent,
        Service::OutputCurrent,
        Service::BatteryTemperature,
        Service::InputFrequency,
        Service::OutputFrequency,
        Service::BypassFrequency,
        Service::OutputPower,
        Service::OutputLoad,
        Service::BatteryCharge,
        Service::BatteryRuntime,
        Service::BatteryStatus,
        Service::PowerStatus,
        Service::AlarmStatus,
        Service::SystemInfo,
    ];

    /// The identifier used on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Service::InputVoltage => "input_voltage",
            Service::OutputVoltage => "output_voltage",
            Service::BypassVoltage => "bypass_voltage",
            Service::BatteryVoltage => "battery_voltage",
            Service::BatteryCurrent => "battery_current",
            Service::OutputCurrent => "output_current",
            Service::BatteryTemperature => "battery_temperature",
            Service::InputFrequency => "input_frequency",
            Service::OutputFrequency => "output_frequency",
            Service::BypassFrequency => "bypass_frequency",
            Service::OutputPower => "output_power",
            Service::OutputLoad => "output_load",
            Service::BatteryCharge => "battery_charge",
            Service::BatteryRuntime => "battery_runtime",
            Service::BatteryStatus => "battery_status",
            Service::PowerStatus => "power_status",
            Service::AlarmStatus => "alarm_status",
            Service::SystemInfo => "system_info",
        }
    }

    /// The service description shown by the monitoring system.
    pub fn name(&self) -> &'static str {
        match self {
            Service::InputVoltage => "UPS Input Voltage",
            Service::OutputVoltage => "UPS Output Voltage",
            Service::BypassVoltage => "UPS Bypass Voltage",
            Service::BatteryVoltage => "UPS Battery Voltage",
            Service::BatteryCurrent => "UPS Battery Current",
            Service::OutputCurrent => "UPS Output Current",
            Service::BatteryTemperature => "UPS Battery Temperature",
            Service::InputFrequency => "UPS Input Frequency",
            Service::OutputFrequency => "UPS Output Frequency",
            Service::BypassFrequency => "UPS Bypass Frequency",
            Service::OutputPower => "UPS Output Power",
            Service::OutputLoad => "UPS Output Load",
            Service::BatteryCharge => "UPS Battery Charge",
            Service::BatteryRuntime => "UPS Battery Runtime",
            Service::BatteryStatus => "UPS Battery Status",
            Service::PowerStatus => "UPS Power Status",
            Service::AlarmStatus => "UPS Alarm Status",
            Service::SystemInfo => "UPS System Info",
        }
    }

    fn measurement(&self) -> Option<Measurement> {
        let m = |metric, label, perf_label| Measurement {
            metric,
            label,
            perf_label,
            boundaries: None,
        };

        let measurement = match self {
            Service::InputVoltage => m("input_voltage", "Input voltage", "input_voltage"),
            Service::OutputVoltage => m("output_voltage", "Output voltage", "output_voltage"),
            Service::BypassVoltage => m("bypass_voltage", "Bypass voltage", "bypass_voltage"),
            Service::BatteryVoltage => m("battery_voltage", "Battery voltage", "battery_voltage"),
            Service::OutputCurrent => m("output_current", "Output current", "output_current"),
            Service::BatteryTemperature => m("battery_temperature", "Temperature", "temperature"),
            Service::InputFrequency => m("input_frequency", "Input frequency", "input_frequency"),
            Service::OutputFrequency => {
                m("output_frequency", "Output frequency", "output_frequency")
            }
            Service::BypassFrequency => {
                m("bypass_frequency", "Bypass frequency", "bypass_frequency")
            }
            Service::OutputPower => m("output_power", "Output power", "output_power"),
            Service::OutputLoad => Measurement {
                boundaries: Some((0.0, 100.0)),
                ..m("output_load", "Load", "output_load")
            },
            Service::BatteryCharge => Measurement {
                boundaries: Some((0.0, 100.0)),
                ..m("battery_charge", "Battery charge", "battery_charge")
            },
            Service::BatteryRuntime => m("battery_runtime", "Battery runtime", "battery_runtime"),
            _ => return None,
        };
        Some(measurement)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.id() == s)
            .ok_or_else(|| Error::UnknownService(s.to_owned()))
    }
}

/// A service checking one numeric metric against its thresholds.
#[derive(Clone, Copy, Debug)]
struct Measurement {
    metric: &'static str,
    label: &'static str,
    perf_label: &'static str,
    boundaries: Option<(f64, f64)>,
}

/// Runs services against one poll cycle.
pub struct UpsCheck<'a> {
    raw: &'a RawOidMap,
    config: &'a ThresholdConfig,
    today: NaiveDate,
}

impl<'a> UpsCheck<'a> {
    /// `today` is the date maintenance dates are compared against.
    pub fn new(raw: &'a RawOidMap, config: &'a ThresholdConfig, today: NaiveDate) -> Self {
        UpsCheck { raw, config, today }
    }

    pub fn run(&self, service: Service) -> Result<Resource> {
        if self.raw.is_empty() {
            return Ok(Resource::new(service.name())
                .with_result(CheckResult::new(Severity::Unknown, "No data")));
        }

        let resource = match service {
            Service::BatteryCurrent => self.battery_current()?,
            Service::BatteryStatus => self.battery_status()?,
            Service::PowerStatus => self.power_status()?,
            Service::AlarmStatus => self.alarm_status(),
            Service::SystemInfo => self.system_info()?,
            _ => match service.measurement() {
                Some(measurement) => self.measure(service, &measurement)?,
                None => return Err(Error::UnknownService(service.id().to_owned())),
            },
        };

        debug!(service = service.id(), state = %resource.state(), "service evaluated");
        Ok(resource)
    }

    /// Runs every service in [Service::ALL] order.
    pub fn run_all(&self) -> Result<Vec<Resource>> {
        Service::ALL.iter().map(|s| self.run(*s)).collect()
    }

    fn measure(&self, service: Service, m: &Measurement) -> Result<Resource> {
        let metric = resolve(m.metric, self.raw)?;
        let spec = effective_spec(m.metric, &self.config.spec_for(m.metric), self.raw);

        let mut perfdata = PerfData::new(m.perf_label, metric.value)
            .with_unit(metric.unit)
            .with_thresholds(&spec);
        if let Some((min, max)) = m.boundaries {
            perfdata = perfdata.with_boundaries(Some(min), Some(max));
        }

        let result = match metric.value {
            None => CheckResult::new(Severity::Unknown, format!("{}: data not available", m.label)),
            Some(value) => {
                let state = evaluate(&metric, &spec);
                let mut summary = format!("{}: {}", m.label, metric.unit.render(value));
                if state != Severity::Ok {
                    summary.push_str(&levels_text(value, &spec, metric.unit));
                }
                CheckResult::new(state, summary)
            }
        };

        Ok(Resource::new(service.name())
            .with_result(result)
            .with_perfdata(perfdata))
    }

    fn battery_current(&self) -> Result<Resource> {
        let metric = resolve("battery_current", self.raw)?;
        let resource = Resource::new(Service::BatteryCurrent.name());

        let Some(current) = metric.value else {
            return Ok(resource
                .with_result(CheckResult::new(
                    Severity::Unknown,
                    "Battery current: data not available",
                ))
                .with_perfdata(PerfData::new("battery_current", None).with_unit(Unit::Amperes)));
        };

        let summary = if current > 0.0 {
            format!("Charging: {:.1}A", current)
        } else if current < 0.0 {
            format!("Discharging: {:.1}A", current.abs())
        } else {
            "No current flow".to_owned()
        };

        Ok(resource
            .with_result(CheckResult::ok(summary))
            .with_perfdata(
                PerfData::new("battery_current", Some(current.abs())).with_unit(Unit::Amperes),
            ))
    }

    fn battery_status(&self) -> Result<Resource> {
        let mut resource = Resource::new(Service::BatteryStatus.name());

        let status = resolve_status(StatusField::BatteryStatus, self.raw);
        let state = StatusField::BatteryStatus
            .severity(status)
            .unwrap_or(Severity::Warning);
        resource.push_result(CheckResult::new(state, format!("Status: {}", status)));

        let on_battery = resolve("seconds_on_battery", self.raw)?;
        if let Some(seconds) = on_battery.value.filter(|s| *s > 0.0) {
            resource.push_result(CheckResult::new(
                Severity::Warning,
                format!("On battery: {}", render_timespan(seconds)),
            ));
            resource.push_perfdata(
                PerfData::new("time_on_battery", Some(seconds)).with_unit(Unit::Seconds),
            );
        }

        let raised = self.raised_alarms(AlarmGroup::Battery);
        if let Some(state) = raised.iter().map(|(_, s)| *s).reduce(Severity::worst) {
            let labels: Vec<&str> = raised.iter().map(|(label, _)| *label).collect();
            resource.push_result(CheckResult::new(state, format!("Alarms: {}", labels.join(", "))));
        }

        Ok(resource)
    }

    fn power_status(&self) -> Result<Resource> {
        let mut resource = Resource::new(Service::PowerStatus.name());

        let source = resolve_status(StatusField::OutputSource, self.raw);
        if let Some(state) = StatusField::OutputSource.severity(source) {
            resource.push_result(CheckResult::new(state, format!("Power source: {}", source)));
        }

        let mode = resolve_status(StatusField::PowerSupplyMode, self.raw);
        if let Some(state) = StatusField::PowerSupplyMode.severity(mode) {
            resource.push_result(CheckResult::notice(state, format!("Power mode: {}", mode)));
        }

        let base = resolve_status(StatusField::BaseOutputStatus, self.raw);
        if let Some(state) = StatusField::BaseOutputStatus.severity(base) {
            resource.push_result(CheckResult::notice(
                state,
                format!("Base output status: {}", base),
            ));
        }

        let line_bads = resolve("input_line_bads", self.raw)?;
        if let Some(count) = line_bads.value.filter(|c| *c > 0.0) {
            resource.push_result(CheckResult::new(
                Severity::Warning,
                format!("Input line failures: {}", count),
            ));
        }
        resource.push_perfdata(
            PerfData::new("input_line_bads", line_bads.value).with_unit(Unit::Counter),
        );

        for (label, state) in self.raised_alarms(AlarmGroup::Power) {
            resource.push_result(CheckResult::new(state, label));
        }

        Ok(resource)
    }

    fn alarm_status(&self) -> Resource {
        let mut resource = Resource::new(Service::AlarmStatus.name());
        let mut criticals = Vec::new();
        let mut warnings = Vec::new();

        for (label, state) in self.raised_alarms(AlarmGroup::System) {
            match state {
                Severity::Critical => criticals.push(label),
                _ => warnings.push(label),
            }
        }

        match resolve_status(StatusField::SystemStatus, self.raw) {
            "normal" => {
                resource.push_result(CheckResult::notice(Severity::Ok, "System status: Normal"))
            }
            "warning" => warnings.push("System status: Warning"),
            "critical" => criticals.push("System status: Critical"),
            _ => {}
        }

        if !criticals.is_empty() {
            resource.push_result(CheckResult::new(
                Severity::Critical,
                format!("Critical: {}", criticals.join(", ")),
            ));
        }
        if !warnings.is_empty() {
            resource.push_result(CheckResult::new(
                Severity::Warning,
                format!("Warning: {}", warnings.join(", ")),
            ));
        }
        if criticals.is_empty() && warnings.is_empty() {
            resource.push_result(CheckResult::ok("No active alarms"));
        }

        resource
    }

    fn system_info(&self) -> Result<Resource> {
        let mut resource = Resource::new(Service::SystemInfo.name());

        let mut identity = vec![format!(
            "Model: {}",
            self.text("model").unwrap_or_else(|| "Unknown".to_owned())
        )];
        if let Some(manufacturer) = self.text("manufacturer") {
            identity.push(format!("Mfr: {}", manufacturer));
        }
        if let Some(serial) = self.text("serial_number") {
            identity.push(format!("S/N: {}", serial));
        }
        resource.push_result(CheckResult::ok(identity.join(", ")));

        let mut versions = Vec::new();
        if let Some(firmware) = self.text("firmware_version") {
            versions.push(format!("FW: {}", firmware));
        }
        if let Some(agent) = self.text("agent_version") {
            versions.push(format!("Agent: {}", agent));
        }
        if !versions.is_empty() {
            resource.push_result(CheckResult::ok(format!("Versions: {}", versions.join(", "))));
        }

        let mut ratings = Vec::new();
        if let Some(power) = self.positive("rated_power")? {
            ratings.push(format!("{:.0}W", power));
        }
        if let Some(capacity) = self.positive("rated_battery_capacity")? {
            ratings.push(format!("{:.0}Ah", capacity));
        }
        if !ratings.is_empty() {
            resource.push_result(CheckResult::ok(format!("Ratings: {}", ratings.join(", "))));
        }

        let mut batteries = Vec::new();
        if let Some(count) = self.positive("number_of_batteries")? {
            batteries.push(format!("{:.0} batteries", count));
        }
        if let Some(count) = self.positive("batteries_per_group")? {
            batteries.push(format!("{:.0} per group", count));
        }
        if !batteries.is_empty() {
            resource.push_result(CheckResult::ok(format!(
                "Battery config: {}",
                batteries.join(", ")
            )));
        }

        if let Some(installation) = self.text("installation_time") {
            resource.push_result(CheckResult::notice(
                Severity::Ok,
                format!("Installation: {}", installation),
            ));
        }
        if let Some(expiration) = self.text("maintenance_expiration") {
            resource.push_result(self.due_date(
                &expiration,
                "Maintenance expired",
                "Maintenance expiration",
            ));
        }
        if let Some(installation) = self.text("battery_installation") {
            resource.push_result(CheckResult::notice(
                Severity::Ok,
                format!("Battery installation: {}", installation),
            ));
        }
        if let Some(next) = self.text("battery_next_maintenance") {
            resource.push_result(self.due_date(
                &next,
                "Battery maintenance due",
                "Battery next maintenance",
            ));
        }

        Ok(resource)
    }

    /// Warns once the date has been reached. Dates which do not parse are shown as they are.
    fn due_date(&self, date: &str, due: &str, pending: &str) -> CheckResult {
        match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(d) if d <= self.today => {
                CheckResult::new(Severity::Warning, format!("{}: {}", due, date))
            }
            Ok(_) => CheckResult::notice(Severity::Ok, format!("{}: {}", pending, date)),
            Err(_) => {
                debug!(date, "unparsable maintenance date");
                CheckResult::notice(Severity::Ok, format!("{}: {}", pending, date))
            }
        }
    }

    fn text(&self, name: &str) -> Option<String> {
        let field = catalog().text(name)?;
        self.raw
            .get(&field.oid)
            .and_then(|v| v.as_text())
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
    }

    fn positive(&self, metric: &str) -> Result<Option<f64>> {
        let ResolvedMetric { value, .. } = resolve(metric, self.raw)?;
        Ok(value.filter(|v| *v > 0.0))
    }

    fn raised_alarms(&self, group: AlarmGroup) -> Vec<(&'static str, Severity)> {
        catalog()
            .alarms()
            .iter()
            .filter(|alarm| alarm.group == group && alarm.is_raised(self.raw))
            .map(|alarm| (alarm.label, alarm.raised))
            .collect()
    }
}

/// ` (warn/crit at 250.0V/260.0V)` for the side of `spec` the value is outside of.
fn levels_text(value: f64, spec: &ThresholdSpec, unit: Unit) -> String {
    let render = |bound: Option<f64>| {
        bound
            .map(|b| unit.render(b))
            .unwrap_or_else(|| "-".to_owned())
    };
    let above = |bound: Option<f64>| bound.is_some_and(|b| value > b);

    if above(spec.warn_upper) || above(spec.crit_upper) {
        format!(" (warn/crit at {}/{})", render(spec.warn_upper), render(spec.crit_upper))
    } else {
        format!(" (warn/crit below {}/{})", render(spec.warn_lower), render(spec.crit_lower))
    }
}
