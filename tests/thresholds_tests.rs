// Threshold evaluation against resolved metrics and device supplied limits

mod common;

use wiseway_ups::thresholds::{builtin_default, dynamic_default, effective_spec};
use wiseway_ups::{evaluate, resolve, Severity, ThresholdConfig, ThresholdSpec};

const INPUT_VOLTAGE: &str = "1.3.6.1.4.1.44782.1.4.4.1.27.0";

#[test]
fn test_lower_bounds() {
    let spec = ThresholdSpec::lower(20.0, 10.0);
    for (charge, expected) in [
        ("15", Severity::Warning),
        ("8", Severity::Critical),
        ("50", Severity::Ok),
    ] {
        let raw = common::healthy_with(&[("1.3.6.1.4.1.44782.1.4.4.1.18.0", charge)]);
        let metric = resolve("battery_charge", &raw).unwrap();
        assert_eq!(evaluate(&metric, &spec), expected, "charge {}", charge);
    }
}

#[test]
fn test_device_limit_is_used_without_explicit_bound() {
    let raw = common::healthy_with(&[(INPUT_VOLTAGE, "245")]);
    let config = ThresholdConfig::default();

    let spec = effective_spec("input_voltage", &config.spec_for("input_voltage"), &raw);
    assert_eq!(spec.warn_upper, Some(242.0));
    assert_eq!(spec.crit_upper, Some(252.0));
    assert_eq!(spec.warn_lower, Some(187.0));
    assert_eq!(spec.crit_lower, Some(177.0));

    let metric = resolve("input_voltage", &raw).unwrap();
    assert_eq!(evaluate(&metric, &spec), Severity::Warning);
}

#[test]
fn test_explicit_bound_beats_device_limit() {
    let raw = common::healthy_with(&[(INPUT_VOLTAGE, "245")]);
    let config =
        ThresholdConfig::load_from_str("[input_voltage]\nwarn_upper = 248.0\n").unwrap();

    let spec = effective_spec("input_voltage", &config.spec_for("input_voltage"), &raw);
    assert_eq!(spec.warn_upper, Some(248.0));
    // the other bounds still come from the device
    assert_eq!(spec.crit_upper, Some(252.0));

    let metric = resolve("input_voltage", &raw).unwrap();
    assert_eq!(evaluate(&metric, &spec), Severity::Ok);
}

#[test]
fn test_device_limit_beats_builtin_default() {
    let raw = common::healthy();

    assert_eq!(
        dynamic_default("battery_temperature", &raw),
        ThresholdSpec::upper(40.0, 45.0)
    );
    assert_eq!(
        effective_spec("output_load", &ThresholdSpec::NONE, &raw),
        ThresholdSpec::upper(95.0, 105.0)
    );
    assert_eq!(
        effective_spec("battery_temperature", &ThresholdSpec::NONE, &raw),
        ThresholdSpec::lower(10.0, 5.0).with_upper(40.0, 45.0)
    );
}

#[test]
fn test_unusable_device_limits_are_ignored() {
    let raw = common::healthy();

    // configured as 0
    let output = dynamic_default("output_voltage", &raw);
    assert_eq!(output.warn_upper, None);
    assert_eq!(
        effective_spec("output_voltage", &ThresholdSpec::NONE, &raw),
        builtin_default("output_voltage")
    );

    // sentinel
    assert!(dynamic_default("battery_voltage", &raw).is_empty());

    let raw = common::healthy_with(&[("1.3.6.1.4.1.44782.1.1.3.1.0", "-5")]);
    assert_eq!(dynamic_default("input_voltage", &raw).warn_upper, None);
}

#[test]
fn test_metrics_without_defaults() {
    let raw = common::healthy();
    for metric in ["output_current", "output_power", "seconds_on_battery"] {
        assert!(effective_spec(metric, &ThresholdSpec::NONE, &raw).is_empty());
    }

    let metric = resolve("output_power", &raw).unwrap();
    assert_eq!(evaluate(&metric, &ThresholdSpec::NONE), Severity::Ok);
}
