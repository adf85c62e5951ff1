use std::fmt;

use crate::severity::Severity;
use crate::thresholds::ThresholdSpec;
use crate::unit::Unit;

/// A Resource represents a single service from the perspective of nagios.
///
/// Unless a state is set explicitly it is the worst state of all partial results, or unknown
/// if there are none. The summary joins the partial summaries.
///
/// ```rust
/// # use wiseway_ups::{CheckResult, PerfData, Resource, Severity, Unit};
/// let resource = Resource::new("UPS Output Load")
///     .with_result(CheckResult::new(Severity::Ok, "Output load: 42.00%"))
///     .with_perfdata(PerfData::new("output_load", Some(42.0)).with_unit(Unit::Percentage));
///
/// assert_eq!(
///     &resource.to_nagios_string(),
///     "UPS Output Load OK: Output load: 42.00% | output_load=42%"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    name: String,
    state: Option<Severity>,
    results: Vec<CheckResult>,
    perfdata: Vec<PerfData>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Resource {
            name: name.into(),
            state: None,
            results: Vec::new(),
            perfdata: Vec::new(),
        }
    }

    /// Fixes the state, disabling the determination from the partial results.
    pub fn with_state(mut self, state: Severity) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_result(mut self, result: CheckResult) -> Self {
        self.push_result(result);
        self
    }

    pub fn with_perfdata(mut self, perfdata: PerfData) -> Self {
        self.push_perfdata(perfdata);
        self
    }

    pub fn push_result(&mut self, result: CheckResult) {
        self.results.push(result)
    }

    pub fn push_perfdata(&mut self, perfdata: PerfData) {
        self.perfdata.push(perfdata)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn perfdata(&self) -> &[PerfData] {
        &self.perfdata
    }

    pub fn state(&self) -> Severity {
        if let Some(state) = self.state {
            return state;
        }

        self.results
            .iter()
            .map(|r| r.state)
            .reduce(Severity::worst)
            .unwrap_or(Severity::Unknown)
    }

    /// The partial summaries joined by `, `, notices left out while they are ok.
    pub fn summary(&self) -> String {
        self.results
            .iter()
            .filter(|r| r.in_summary())
            .map(|r| r.summary.as_str())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns a string which nagios understands to determine the service state.
    pub fn to_nagios_string(&self) -> String {
        let mut s = String::new();

        if !self.name.is_empty() {
            s.push_str(&format!("{} ", self.name));
        }

        s.push_str(&self.state().to_string());

        let summary = self.summary();
        if !summary.is_empty() {
            s.push_str(&format!(": {}", summary));
        }

        if !self.perfdata.is_empty() {
            s.push_str(" |");
            for perfdata in &self.perfdata {
                s.push_str(&format!(" {}", perfdata));
            }
        }

        for notice in self.results.iter().filter(|r| !r.in_summary()) {
            s.push_str(&format!("\n{}", notice.summary));
        }

        s
    }
}

/// One partial result of a service.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub state: Severity,
    pub summary: String,
    /// Only shown in the long output while the state is ok.
    pub notice: bool,
}

impl CheckResult {
    pub fn new(state: Severity, summary: impl Into<String>) -> Self {
        CheckResult {
            state,
            summary: summary.into(),
            notice: false,
        }
    }

    pub fn ok(summary: impl Into<String>) -> Self {
        CheckResult::new(Severity::Ok, summary)
    }

    pub fn notice(state: Severity, text: impl Into<String>) -> Self {
        CheckResult {
            notice: true,
            ..CheckResult::new(state, text)
        }
    }

    fn in_summary(&self) -> bool {
        !self.notice || self.state != Severity::Ok
    }
}

/// A nagios threshold range. Values outside of `start..=end` alert, an open side never does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl Range {
    /// `None` if both sides are open.
    pub fn from_bounds(start: Option<f64>, end: Option<f64>) -> Option<Range> {
        if start.is_none() && end.is_none() {
            None
        } else {
            Some(Range { start, end })
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (None, Some(end)) => write!(f, "~:{}", end),
            (Some(start), None) => write!(f, "{}:", start),
            (Some(start), Some(end)) => write!(f, "{}:{}", start, end),
            (None, None) => Ok(()),
        }
    }
}

/// A single performance data point: `label=value[UOM];warn;crit;min;max`.
#[derive(Clone, Debug, PartialEq)]
pub struct PerfData {
    pub label: String,
    /// Rendered as `U` if `None`.
    pub value: Option<f64>,
    pub unit: Unit,
    pub warning: Option<Range>,
    pub critical: Option<Range>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PerfData {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        PerfData {
            label: label.into(),
            value,
            unit: Unit::None,
            warning: None,
            critical: None,
            min: None,
            max: None,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Renders the warning and critical bounds of `spec` as ranges.
    pub fn with_thresholds(mut self, spec: &ThresholdSpec) -> Self {
        self.warning = Range::from_bounds(spec.warn_lower, spec.warn_upper);
        self.critical = Range::from_bounds(spec.crit_lower, spec.crit_upper);
        self
    }

    pub fn with_boundaries(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    fn escaped_label(&self) -> String {
        let label = self.label.replace('=', "_").replace('\'', "''");

        if label.contains(' ') {
            format!("'{}'", label)
        } else {
            label
        }
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self.value {
            Some(v) => format!("{}{}", v, self.unit),
            None => "U".to_owned(),
        };

        let fields = [
            value,
            self.warning.map(|r| r.to_string()).unwrap_or_default(),
            self.critical.map(|r| r.to_string()).unwrap_or_default(),
            self.min.map(|v| v.to_string()).unwrap_or_default(),
            self.max.map(|v| v.to_string()).unwrap_or_default(),
        ];

        write!(
            f,
            "{}={}",
            self.escaped_label(),
            fields.join(";").trim_end_matches(';')
        )
    }
}

/// The output of one plugin run: one or more resources, one line each.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    resources: Vec<Resource>,
}

impl Report {
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The worst state of all resources, unknown if there are none.
    pub fn state(&self) -> Severity {
        self.resources
            .iter()
            .map(Resource::state)
            .reduce(Severity::worst)
            .unwrap_or(Severity::Unknown)
    }

    pub fn to_nagios_string(&self) -> String {
        self.resources
            .iter()
            .map(Resource::to_nagios_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Resource> for Report {
    fn from(resource: Resource) -> Self {
        Report {
            resources: vec![resource],
        }
    }
}

impl From<Vec<Resource>> for Report {
    fn from(resources: Vec<Resource>) -> Self {
        Report { resources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource() {
        let resource = Resource::new("")
            .with_result(CheckResult::ok(""))
            .with_perfdata(PerfData::new("test", Some(12.0)))
            .with_perfdata(PerfData::new("other", None));
        assert_eq!(&resource.to_nagios_string(), "OK | test=12 other=U");

        let resource = Resource::new("")
            .with_result(CheckResult::ok("A test summary"))
            .with_perfdata(PerfData::new("test", Some(12.0)).with_boundaries(Some(0.0), None));
        assert_eq!(
            &resource.to_nagios_string(),
            "OK: A test summary | test=12;;;0"
        );

        let test_data = [
            ("test", "OK | test=0"),
            ("test=a", "OK | test_a=0"),
            ("te'st", "OK | te''st=0"),
            ("te st", "OK | 'te st'=0"),
            ("te st'", "OK | 'te st'''=0"),
        ];
        for (label, expected) in &test_data {
            let resource = Resource::new("")
                .with_state(Severity::Ok)
                .with_perfdata(PerfData::new(*label, Some(0.0)));
            assert_eq!(&resource.to_nagios_string(), expected);
        }
    }

    #[test]
    fn test_resource_with_name() {
        let resource = Resource::new("foo").with_state(Severity::Ok);
        assert_eq!(&resource.to_nagios_string(), "foo OK")
    }

    #[test]
    fn test_state_is_worst_result() {
        let resource = Resource::new("foo")
            .with_result(CheckResult::ok("a"))
            .with_result(CheckResult::new(Severity::Unknown, "b"))
            .with_result(CheckResult::new(Severity::Warning, "c"));
        assert_eq!(resource.state(), Severity::Unknown);
        assert_eq!(resource.state().exit_code(), 3);
        assert_eq!(&resource.to_nagios_string(), "foo UNKNOWN: a, b, c");

        let resource = resource.with_result(CheckResult::new(Severity::Critical, "d"));
        assert_eq!(resource.state(), Severity::Critical);

        assert_eq!(Resource::new("empty").state(), Severity::Unknown);
    }

    #[test]
    fn test_notices_go_to_long_output() {
        let resource = Resource::new("UPS Power Status")
            .with_result(CheckResult::ok("Power source: normal"))
            .with_result(CheckResult::notice(Severity::Ok, "Power mode: online"))
            .with_result(CheckResult::notice(Severity::Critical, "Base output status: off"));
        assert_eq!(
            &resource.to_nagios_string(),
            "UPS Power Status CRITICAL: Power source: normal, Base output status: off\nPower mode: online"
        );
    }

    #[test]
    fn test_perfdata_thresholds() {
        let spec = ThresholdSpec::lower(210.0, 200.0).with_upper(250.0, 260.0);
        let perf = PerfData::new("input_voltage", Some(231.9))
            .with_unit(Unit::Volts)
            .with_thresholds(&spec);
        assert_eq!(
            perf.to_string(),
            "input_voltage=231.9V;210:250;200:260"
        );

        let perf = PerfData::new("output_load", Some(42.0))
            .with_unit(Unit::Percentage)
            .with_thresholds(&ThresholdSpec::upper(80.0, 90.0))
            .with_boundaries(Some(0.0), Some(100.0));
        assert_eq!(perf.to_string(), "output_load=42%;~:80;~:90;0;100");

        let perf = PerfData::new("battery_charge", None)
            .with_unit(Unit::Percentage)
            .with_thresholds(&ThresholdSpec::lower(20.0, 10.0));
        assert_eq!(perf.to_string(), "battery_charge=U;20:;10:");
    }

    #[test]
    fn test_report() {
        let report = Report::from(vec![
            Resource::new("a").with_state(Severity::Ok),
            Resource::new("b").with_state(Severity::Warning),
        ]);
        assert_eq!(report.state(), Severity::Warning);
        assert_eq!(&report.to_nagios_string(), "a OK\nb WARNING");

        assert_eq!(Report::from(Vec::new()).state(), Severity::Unknown);
    }
}
