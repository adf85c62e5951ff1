use tracing::{debug, warn};

use crate::catalog::{catalog, Candidate, Encoding, OidDefinition};
use crate::error::{Error, Result};
use crate::raw::{RawOidMap, RawValue};
use crate::unit::Unit;

/// The outcome of resolving one catalog metric against a poll cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMetric {
    pub name: &'static str,
    /// `None` if no candidate delivered usable data.
    pub value: Option<f64>,
    pub unit: Unit,
    /// The OID the value was taken from.
    pub source_oid: Option<String>,
}

impl ResolvedMetric {
    /// A metric nothing could be read for.
    pub fn unavailable(definition: &OidDefinition) -> Self {
        ResolvedMetric {
            name: definition.name,
            value: None,
            unit: definition.unit,
            source_oid: None,
        }
    }
}

/// Resolves the named catalog metric.
///
/// Candidates are tried in catalog order, the first one present in `raw` which neither holds a
/// sentinel nor fails to decode wins. Asking for a metric the catalog does not know is an
/// integration error and reported as [Error::UnknownMetric].
pub fn resolve(metric_name: &str, raw: &RawOidMap) -> Result<ResolvedMetric> {
    let definition = catalog()
        .get(metric_name)
        .ok_or_else(|| Error::UnknownMetric(metric_name.to_owned()))?;
    Ok(resolve_definition(definition, raw))
}

/// Resolves every catalog metric, in catalog order.
pub fn resolve_all(raw: &RawOidMap) -> Vec<ResolvedMetric> {
    catalog()
        .metrics()
        .iter()
        .map(|definition| resolve_definition(definition, raw))
        .collect()
}

pub fn resolve_definition(definition: &OidDefinition, raw: &RawOidMap) -> ResolvedMetric {
    for candidate in &definition.candidates {
        let Some(value) = raw.get(&candidate.oid) else {
            continue;
        };

        match decode(candidate, value, definition.sentinels) {
            Decoded::Value(v) => {
                return ResolvedMetric {
                    name: definition.name,
                    value: Some(v),
                    unit: definition.unit,
                    source_oid: Some(candidate.oid.clone()),
                }
            }
            Decoded::Sentinel => {
                debug!(
                    metric = definition.name,
                    oid = %candidate.oid,
                    "sentinel value, trying next candidate"
                );
            }
            Decoded::Malformed => {
                warn!(
                    metric = definition.name,
                    oid = %candidate.oid,
                    value = %value,
                    "undecodable value, trying next candidate"
                );
            }
        }
    }

    ResolvedMetric::unavailable(definition)
}

#[derive(Debug, PartialEq)]
enum Decoded {
    Value(f64),
    Sentinel,
    Malformed,
}

fn decode(candidate: &Candidate, raw: &RawValue, sentinels: &[i64]) -> Decoded {
    let decoded = match candidate.encoding {
        Encoding::Integer => integer(raw, sentinels),
        Encoding::ScaledInteger { divisor } => match integer(raw, sentinels) {
            Decoded::Value(v) if divisor != 0.0 => Decoded::Value(v / divisor),
            Decoded::Value(_) => Decoded::Malformed,
            other => other,
        },
        Encoding::DecimalString => decimal(raw, sentinels),
    };

    match decoded {
        Decoded::Value(v) => finite(v * candidate.factor),
        other => other,
    }
}

fn integer(raw: &RawValue, sentinels: &[i64]) -> Decoded {
    let Some(i) = raw.as_integer() else {
        return Decoded::Malformed;
    };

    if sentinels.contains(&i) {
        Decoded::Sentinel
    } else {
        Decoded::Value(i as f64)
    }
}

fn decimal(raw: &RawValue, sentinels: &[i64]) -> Decoded {
    let f = match raw {
        RawValue::Integer(i) => *i as f64,
        RawValue::Text(s) => {
            let s = s.trim().trim_matches('"').trim();
            match s.parse::<f64>() {
                Ok(f) => f,
                Err(_) => return Decoded::Malformed,
            }
        }
    };

    if sentinels.iter().any(|&s| s as f64 == f) {
        Decoded::Sentinel
    } else {
        finite(f)
    }
}

fn finite(v: f64) -> Decoded {
    if v.is_finite() {
        Decoded::Value(v)
    } else {
        Decoded::Malformed
    }
}
