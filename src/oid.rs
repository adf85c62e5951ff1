use crate::error::{Error, Result};

/// Validates a dotted-decimal OID and returns it without the leading dot.
///
/// `.1.3.6.1.2.1.33.1.2.1.0` and `1.3.6.1.2.1.33.1.2.1.0` both normalize to the latter.
pub fn normalize_oid(s: &str) -> Result<String> {
    let trimmed = s.trim();
    let body = trimmed.strip_prefix('.').unwrap_or(trimmed);

    if body.is_empty() {
        return Err(invalid(s, "empty oid"));
    }

    for arc in body.split('.') {
        if arc.is_empty() {
            return Err(invalid(s, "empty arc"));
        }
        arc.parse::<u64>()
            .map_err(|e| invalid(s, &format!("arc `{}`: {}", arc, e)))?;
    }

    Ok(body.to_owned())
}

fn invalid(oid: &str, reason: &str) -> Error {
    Error::InvalidOid {
        oid: oid.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_oid() {
        assert_eq!(
            normalize_oid(".1.3.6.1.2.1.33.1.2.1.0").unwrap(),
            "1.3.6.1.2.1.33.1.2.1.0"
        );
        assert_eq!(normalize_oid(" 1.3.6.1 ").unwrap(), "1.3.6.1");
    }

    #[test]
    fn test_normalize_oid_rejects_garbage() {
        assert!(normalize_oid("").is_err());
        assert!(normalize_oid(".").is_err());
        assert!(normalize_oid("1.3..6").is_err());
        assert!(normalize_oid("1.3.six.1").is_err());
        assert!(normalize_oid("1.3.-6.1").is_err());
    }
}
