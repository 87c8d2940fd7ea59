//! Error types for spec loading and request validation.

use std::path::PathBuf;
use thiserror::Error;

/// The fixed vocabulary of validation failure codes.
///
/// These codes are part of the external contract: hosts match on them to
/// decide policy, so their textual form is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidBasePath,
    InvalidPath,
    InvalidMethod,
    InvalidParameters,
    InvalidAccept,
    InvalidContentType,
    InvalidPayload,
}

impl ErrorCode {
    /// Returns the stable textual form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBasePath => "invalid basepath",
            ErrorCode::InvalidPath => "invalid path",
            ErrorCode::InvalidMethod => "invalid method",
            ErrorCode::InvalidParameters => "invalid parameters",
            ErrorCode::InvalidAccept => "invalid accept header",
            ErrorCode::InvalidContentType => "invalid content-type header",
            ErrorCode::InvalidPayload => "invalid payload",
        }
    }
}

impl From<ErrorCode> for &'static str {
    fn from(code: ErrorCode) -> Self {
        code.as_str()
    }
}

impl serde::Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure: the first check that rejected the request.
///
/// This is a verdict, not a fault — it means "this request does not conform",
/// and it is always recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Failure {
    /// Machine-matchable code from the fixed vocabulary.
    pub code: ErrorCode,
    /// Human-readable detail suitable for logging.
    pub detail: String,
}

impl Failure {
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.detail)
    }
}

/// Errors while resolving a spec identifier into a parsed document.
///
/// Distinct from a validation verdict: a load failure means the contract
/// itself could not be obtained. Variants carry message strings rather than
/// source errors so a single load outcome can be cloned to every caller
/// waiting on the same cache key.
#[derive(Debug, Clone, Error)]
pub enum SpecError {
    #[error("failed to fetch spec from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("resource \"{name}\" not found under {}", root.display())]
    ResourceNotFound { name: String, root: PathBuf },

    #[error("resource \"{name}\" escapes the resource root")]
    ResourceOutsideRoot { name: String },

    #[error("cannot read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid JSON in spec: {message}")]
    InvalidJson { message: String },

    #[error("invalid YAML in spec: {message}")]
    InvalidYaml { message: String },

    #[error("cannot fetch {url}: remote spec loading is disabled (enable the `remote` feature)")]
    RemoteDisabled { url: String },
}

impl SpecError {
    /// Returns the process exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SpecError::Fetch { .. }
            | SpecError::ResourceNotFound { .. }
            | SpecError::ResourceOutsideRoot { .. }
            | SpecError::Read { .. }
            | SpecError::RemoteDisabled { .. } => 3, // IO
            SpecError::InvalidJson { .. } | SpecError::InvalidYaml { .. } => 2, // parse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_textual_forms() {
        assert_eq!(ErrorCode::InvalidBasePath.as_str(), "invalid basepath");
        assert_eq!(ErrorCode::InvalidPath.as_str(), "invalid path");
        assert_eq!(ErrorCode::InvalidMethod.as_str(), "invalid method");
        assert_eq!(ErrorCode::InvalidParameters.as_str(), "invalid parameters");
        assert_eq!(ErrorCode::InvalidAccept.as_str(), "invalid accept header");
        assert_eq!(
            ErrorCode::InvalidContentType.as_str(),
            "invalid content-type header"
        );
        assert_eq!(ErrorCode::InvalidPayload.as_str(), "invalid payload");
    }

    #[test]
    fn failure_display() {
        let f = Failure::new(ErrorCode::InvalidPath, "no path found for (/nope)");
        assert_eq!(f.to_string(), "invalid path: no path found for (/nope)");
    }

    #[test]
    fn failure_serializes_code_as_string() {
        let f = Failure::new(ErrorCode::InvalidMethod, "no operation for (TRACE)");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["code"], "invalid method");
        assert_eq!(json["detail"], "no operation for (TRACE)");
    }

    #[test]
    fn spec_error_exit_codes() {
        let err = SpecError::ResourceNotFound {
            name: "petstore.json".into(),
            root: PathBuf::from("resources"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = SpecError::InvalidJson {
            message: "expected value at line 1".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = SpecError::InvalidYaml {
            message: "mapping values are not allowed".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }
}
