use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised at integration time. Missing or odd data coming from the device never ends
/// up here, it degrades to unknown values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("metric `{0}` is not part of the oid catalog")]
    UnknownMetric(String),
    #[error("unknown status field `{0}`")]
    UnknownStatusField(String),
    #[error("unknown service `{0}`")]
    UnknownService(String),
    #[error("invalid oid `{oid}`: {reason}")]
    InvalidOid { oid: String, reason: String },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid json input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid threshold configuration: {0}")]
    Config(String),
}
