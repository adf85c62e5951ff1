use std::fmt;

/// SI units the catalog normalizes values into.
///
/// The `Display` form is the unit of measurement used in perfdata, so it must not contain
/// digits, whitespace, semicolons or quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    None,
    Seconds,
    Volts,
    Hertz,
    Celsius,
    Watts,
    Amperes,
    AmpereHours,
    Percentage,
    Counter,
}

impl Unit {
    /// Renders a value the way it is shown in a service summary.
    pub fn render(&self, value: f64) -> String {
        match self {
            Unit::None | Unit::Counter => format!("{}", value),
            Unit::Seconds => render_timespan(value),
            Unit::Volts => format!("{:.1}V", value),
            Unit::Hertz => format!("{:.1} Hz", value),
            Unit::Celsius => format!("{:.1}°C", value),
            Unit::Watts => format!("{:.0}W", value),
            Unit::Amperes => format!("{:.1}A", value),
            Unit::AmpereHours => format!("{:.0}Ah", value),
            Unit::Percentage => format!("{:.2}%", value),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::None => "",
            Unit::Seconds => "s",
            Unit::Volts => "V",
            Unit::Hertz => "Hz",
            Unit::Celsius => "C",
            Unit::Watts => "W",
            Unit::Amperes => "A",
            Unit::AmpereHours => "Ah",
            Unit::Percentage => "%",
            Unit::Counter => "c",
        };
        f.write_str(s)
    }
}

/// Renders seconds as `1 hour 5 minutes`, `12 minutes 3 seconds` or `42 seconds`.
pub fn render_timespan(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    let part = |n: u64, what: &str| {
        if n == 1 {
            format!("1 {}", what)
        } else {
            format!("{} {}s", n, what)
        }
    };

    if hours > 0 {
        format!("{} {}", part(hours, "hour"), part(minutes, "minute"))
    } else if minutes > 0 {
        format!("{} {}", part(minutes, "minute"), part(secs, "second"))
    } else {
        part(secs, "second")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(Unit::Volts.render(231.94), "231.9V");
        assert_eq!(Unit::Hertz.render(50.0), "50.0 Hz");
        assert_eq!(Unit::Watts.render(1234.6), "1235W");
        assert_eq!(Unit::Percentage.render(95.0), "95.00%");
        assert_eq!(Unit::Celsius.render(25.34), "25.3°C");
    }

    #[test]
    fn test_timespan() {
        assert_eq!(render_timespan(42.0), "42 seconds");
        assert_eq!(render_timespan(61.0), "1 minute 1 second");
        assert_eq!(render_timespan(600.0), "10 minutes 0 seconds");
        assert_eq!(render_timespan(3900.0), "1 hour 5 minutes");
    }

    #[test]
    fn test_perf_unit() {
        assert_eq!(Unit::Celsius.to_string(), "C");
        assert_eq!(Unit::None.to_string(), "");
    }
}
