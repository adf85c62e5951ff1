//! Warning and critical bounds, and their evaluation.
//!
//! Every bound is resolved on its own before evaluation, in this order: the bound configured by
//! the operator, the limit the device reports about itself, the built-in default. The evaluator
//! itself only ever sees concrete numbers or `None`.

use serde::{Deserialize, Serialize};

use crate::catalog::catalog;
use crate::raw::RawOidMap;
use crate::resolver::{resolve_definition, ResolvedMetric};
use crate::severity::Severity;

/// Lower and upper warning/critical bounds of one metric. An absent bound is never checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSpec {
    pub warn_lower: Option<f64>,
    pub crit_lower: Option<f64>,
    pub warn_upper: Option<f64>,
    pub crit_upper: Option<f64>,
}

impl ThresholdSpec {
    pub const NONE: ThresholdSpec = ThresholdSpec {
        warn_lower: None,
        crit_lower: None,
        warn_upper: None,
        crit_upper: None,
    };

    pub fn lower(warn: f64, crit: f64) -> Self {
        ThresholdSpec::NONE.with_lower(warn, crit)
    }

    pub fn upper(warn: f64, crit: f64) -> Self {
        ThresholdSpec::NONE.with_upper(warn, crit)
    }

    pub fn with_lower(mut self, warn: f64, crit: f64) -> Self {
        self.warn_lower = Some(warn);
        self.crit_lower = Some(crit);
        self
    }

    pub fn with_upper(mut self, warn: f64, crit: f64) -> Self {
        self.warn_upper = Some(warn);
        self.crit_upper = Some(crit);
        self
    }

    /// Fills every unset bound from `fallback`.
    pub fn or(self, fallback: ThresholdSpec) -> Self {
        ThresholdSpec {
            warn_lower: self.warn_lower.or(fallback.warn_lower),
            crit_lower: self.crit_lower.or(fallback.crit_lower),
            warn_upper: self.warn_upper.or(fallback.warn_upper),
            crit_upper: self.crit_upper.or(fallback.crit_upper),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ThresholdSpec::NONE
    }

    /// Evaluates a concrete value. Critical bounds take precedence, comparisons are strict.
    pub fn check(&self, value: f64) -> Severity {
        let below = |bound: Option<f64>| bound.is_some_and(|b| value < b);
        let above = |bound: Option<f64>| bound.is_some_and(|b| value > b);

        if below(self.crit_lower) || above(self.crit_upper) {
            Severity::Critical
        } else if below(self.warn_lower) || above(self.warn_upper) {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}

/// Evaluates a resolved metric. A metric without value is always unknown.
pub fn evaluate(metric: &ResolvedMetric, spec: &ThresholdSpec) -> Severity {
    match metric.value {
        Some(value) => spec.check(value),
        None => Severity::Unknown,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

/// A limit the device reports about itself, used as warning level of `metric` with the
/// critical level `crit_offset` further away from nominal.
#[derive(Clone, Copy, Debug)]
pub struct DeviceLimit {
    pub metric: &'static str,
    pub config_metric: &'static str,
    pub side: Side,
    pub crit_offset: f64,
}

pub const DEVICE_LIMITS: &[DeviceLimit] = &[
    DeviceLimit {
        metric: "input_voltage",
        config_metric: "config_input_voltage_upper",
        side: Side::Upper,
        crit_offset: 10.0,
    },
    DeviceLimit {
        metric: "input_voltage",
        config_metric: "config_input_voltage_lower",
        side: Side::Lower,
        crit_offset: 10.0,
    },
    DeviceLimit {
        metric: "output_voltage",
        config_metric: "config_output_voltage_upper",
        side: Side::Upper,
        crit_offset: 10.0,
    },
    DeviceLimit {
        metric: "output_voltage",
        config_metric: "config_output_voltage_lower",
        side: Side::Lower,
        crit_offset: 10.0,
    },
    DeviceLimit {
        metric: "battery_temperature",
        config_metric: "config_temperature_upper",
        side: Side::Upper,
        crit_offset: 5.0,
    },
    DeviceLimit {
        metric: "output_load",
        config_metric: "config_output_load_upper",
        side: Side::Upper,
        crit_offset: 10.0,
    },
    DeviceLimit {
        metric: "battery_voltage",
        config_metric: "config_battery_voltage_lower",
        side: Side::Lower,
        crit_offset: 10.0,
    },
];

/// Bounds derived from the limits the device has configured for `metric`.
///
/// Limits which are missing, sentinel or not positive contribute nothing.
pub fn dynamic_default(metric: &str, raw: &RawOidMap) -> ThresholdSpec {
    let mut spec = ThresholdSpec::NONE;

    for limit in DEVICE_LIMITS.iter().filter(|l| l.metric == metric) {
        let Some(definition) = catalog().get(limit.config_metric) else {
            continue;
        };
        let Some(device) = resolve_definition(definition, raw).value.filter(|v| *v > 0.0) else {
            continue;
        };

        spec = match limit.side {
            Side::Upper => spec.with_upper(device, device + limit.crit_offset),
            Side::Lower => spec.with_lower(device, device - limit.crit_offset),
        };
    }

    spec
}

/// Bounds used when neither the operator nor the device provide one.
pub fn builtin_default(metric: &str) -> ThresholdSpec {
    match metric {
        "input_voltage" | "output_voltage" | "bypass_voltage" => {
            ThresholdSpec::lower(210.0, 200.0).with_upper(250.0, 260.0)
        }
        "battery_voltage" => ThresholdSpec::lower(180.0, 170.0),
        "battery_temperature" => ThresholdSpec::lower(10.0, 5.0).with_upper(40.0, 45.0),
        "input_frequency" | "output_frequency" | "bypass_frequency" => {
            ThresholdSpec::lower(49.0, 48.0).with_upper(51.0, 52.0)
        }
        "output_load" => ThresholdSpec::upper(80.0, 90.0),
        "battery_charge" => ThresholdSpec::lower(20.0, 10.0),
        // 10 and 5 minutes
        "battery_runtime" => ThresholdSpec::lower(600.0, 300.0),
        _ => ThresholdSpec::NONE,
    }
}

/// The bounds a metric is finally evaluated against.
pub fn effective_spec(metric: &str, explicit: &ThresholdSpec, raw: &RawOidMap) -> ThresholdSpec {
    explicit
        .or(dynamic_default(metric, raw))
        .or(builtin_default(metric))
}
