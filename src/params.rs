//! Required-parameter validation over pluggable request sources.

use std::collections::HashMap;

use crate::error::{ErrorCode, Failure};
use crate::spec::{Operation, ParamLocation};

/// A named-value lookup over some part of a request.
///
/// This is the seam that decouples parameter validation from how the host
/// actually stores request data: one implementation wraps the query string,
/// another the header table. Header name case handling is the source
/// implementation's concern.
pub trait ParamSource {
    /// The value for `name`, or `None` if the request does not carry it.
    fn get(&self, name: &str) -> Option<String>;
}

impl ParamSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl<F> ParamSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Check that every required query and header parameter is present.
///
/// Every missing parameter is reported, not just the first, tagged with its
/// location as `qparam:<name>` or `header:<name>`. Parameters in other
/// locations (path, body, formData) and optional parameters are not checked.
pub fn validate_parameters(
    operation: &Operation,
    query: &dyn ParamSource,
    headers: &dyn ParamSource,
) -> Result<(), Failure> {
    let mut missing = Vec::new();

    for param in &operation.parameters {
        if !param.required {
            continue;
        }
        match param.location {
            ParamLocation::Query => {
                if query.get(&param.name).is_none() {
                    missing.push(format!("qparam:{}", param.name));
                }
            }
            ParamLocation::Header => {
                if headers.get(&param.name).is_none() {
                    missing.push(format!("header:{}", param.name));
                }
            }
            ParamLocation::Path | ParamLocation::Body | ParamLocation::FormData => {}
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Failure::new(
            ErrorCode::InvalidParameters,
            format!("missing parameters [{}]", missing.join(", ")),
        ))
    }
}
