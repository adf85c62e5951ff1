use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::thresholds::ThresholdSpec;

/// Environment variable naming the threshold file if none is given explicitly.
pub const CONFIG_ENV: &str = "WISEWAY_UPS_CONFIG";

/// Operator supplied thresholds, one group per measured quantity. A bound left out falls back
/// to the limit configured on the device and then to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub battery_charge: ThresholdSpec,
    pub battery_runtime: ThresholdSpec,
    pub battery_voltage: ThresholdSpec,
    pub battery_temperature: ThresholdSpec,
    pub input_voltage: ThresholdSpec,
    pub output_voltage: ThresholdSpec,
    pub bypass_voltage: ThresholdSpec,
    /// Shared by input, output and bypass frequency.
    pub frequency: ThresholdSpec,
    pub output_load: ThresholdSpec,
    pub output_current: ThresholdSpec,
    pub output_power: ThresholdSpec,
}

impl ThresholdConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::load_from_str(&s)
    }

    /// Loads the file named by [CONFIG_ENV], or the empty configuration if it is unset.
    pub fn load_from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> Result<Self> {
        let config: ThresholdConfig =
            toml::from_str(s).map_err(|e| Error::Config(e.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// The explicit bounds for a catalog metric. Metrics without a group have none.
    pub fn spec_for(&self, metric: &str) -> ThresholdSpec {
        match metric {
            "battery_charge" => self.battery_charge,
            "battery_runtime" => self.battery_runtime,
            "battery_voltage" => self.battery_voltage,
            "battery_temperature" => self.battery_temperature,
            "input_voltage" => self.input_voltage,
            "output_voltage" => self.output_voltage,
            "bypass_voltage" => self.bypass_voltage,
            "input_frequency" | "output_frequency" | "bypass_frequency" => self.frequency,
            "output_load" => self.output_load,
            "output_current" => self.output_current,
            "output_power" => self.output_power,
            _ => ThresholdSpec::NONE,
        }
    }

    fn groups(&self) -> [(&'static str, &ThresholdSpec); 11] {
        [
            ("battery_charge", &self.battery_charge),
            ("battery_runtime", &self.battery_runtime),
            ("battery_voltage", &self.battery_voltage),
            ("battery_temperature", &self.battery_temperature),
            ("input_voltage", &self.input_voltage),
            ("output_voltage", &self.output_voltage),
            ("bypass_voltage", &self.bypass_voltage),
            ("frequency", &self.frequency),
            ("output_load", &self.output_load),
            ("output_current", &self.output_current),
            ("output_power", &self.output_power),
        ]
    }

    fn validate(&self) -> Result<()> {
        for (group, spec) in self.groups() {
            validate_spec(group, spec)?;
        }
        Ok(())
    }
}

fn validate_spec(group: &str, spec: &ThresholdSpec) -> Result<()> {
    let bounds = [
        ("warn_lower", spec.warn_lower),
        ("crit_lower", spec.crit_lower),
        ("warn_upper", spec.warn_upper),
        ("crit_upper", spec.crit_upper),
    ];
    for (key, bound) in bounds {
        if let Some(v) = bound {
            ensure(v.is_finite(), || {
                format!("{}.{} must be a finite number, got {}", group, key, v)
            })?;
        }
    }

    if let (Some(warn), Some(crit)) = (spec.warn_lower, spec.crit_lower) {
        ensure(crit <= warn, || {
            format!(
                "{}.crit_lower must not be above warn_lower, got {} > {}",
                group, crit, warn
            )
        })?;
    }
    if let (Some(warn), Some(crit)) = (spec.warn_upper, spec.crit_upper) {
        ensure(crit >= warn, || {
            format!(
                "{}.crit_upper must not be below warn_upper, got {} < {}",
                group, crit, warn
            )
        })?;
    }

    Ok(())
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Config(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ThresholdConfig::load_from_str("").unwrap();
        assert_eq!(config, ThresholdConfig::default());
        assert!(config.spec_for("input_voltage").is_empty());
    }

    #[test]
    fn test_frequency_group_is_shared() {
        let config = ThresholdConfig::load_from_str("[frequency]\nwarn_upper = 50.5\n").unwrap();
        for metric in ["input_frequency", "output_frequency", "bypass_frequency"] {
            assert_eq!(config.spec_for(metric).warn_upper, Some(50.5));
        }
        assert!(config.spec_for("seconds_on_battery").is_empty());
    }

    #[test]
    fn test_integers_are_accepted() {
        let config =
            ThresholdConfig::load_from_str("[output_load]\nwarn_upper = 70\ncrit_upper = 85\n")
                .unwrap();
        assert_eq!(config.output_load, ThresholdSpec::upper(70.0, 85.0));
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let err =
            ThresholdConfig::load_from_str("[input_voltage]\nwarn_upper = nan\n").unwrap_err();
        assert!(err.to_string().contains("input_voltage.warn_upper"));
    }
}
