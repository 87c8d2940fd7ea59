//! Request body well-formedness checking.

use std::io::Read;

use serde_json::Value;

use crate::error::{ErrorCode, Failure};
use crate::spec::Operation;

/// Parse the request body as a JSON document tree.
///
/// This is a baseline well-formedness check only: the parsed tree is not
/// compared against any declared schema.
/// TODO: validate the parsed tree against the operation's body schema once
/// schema binding is implemented.
///
/// The body stream is consumed exactly once; callers must not expect it to
/// be re-readable afterward.
pub fn validate_payload(body: impl Read, _operation: &Operation) -> Result<(), Failure> {
    let _tree: Value = serde_json::from_reader(body).map_err(|e| {
        Failure::new(
            ErrorCode::InvalidPayload,
            format!("request body is not well-formed JSON: {e}"),
        )
    })?;
    Ok(())
}
