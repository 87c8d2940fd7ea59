//! Accept and Content-Type negotiation against declared media types.

use crate::error::{ErrorCode, Failure};
use crate::spec::Operation;

/// An `Accept` header value, either raw or already split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptValue<'a> {
    /// A raw, possibly comma-separated header string.
    Raw(&'a str),
    /// Pre-split media-type tokens.
    Tokens(&'a [&'a str]),
}

/// Check an `Accept` value against the operation's producible media types.
///
/// An absent or blank value is vacuously valid. Otherwise, the check passes
/// if any token equals `*/*` or appears verbatim in `produces`; the failure
/// detail lists every supplied token.
pub fn validate_accept(accept: Option<&AcceptValue<'_>>, operation: &Operation) -> Result<(), Failure> {
    let tokens: Vec<&str> = match accept {
        None => return Ok(()),
        Some(AcceptValue::Raw(raw)) => {
            if raw.trim().is_empty() {
                return Ok(());
            }
            raw.split(',').map(str::trim).collect()
        }
        Some(AcceptValue::Tokens(tokens)) => tokens.iter().map(|t| t.trim()).collect(),
    };
    if tokens.is_empty() {
        return Ok(());
    }

    let ok = tokens
        .iter()
        .any(|t| *t == "*/*" || operation.produces.iter().any(|p| p == t));

    if ok {
        Ok(())
    } else {
        Err(Failure::new(
            ErrorCode::InvalidAccept,
            format!("the accept values of [{}] were not valid", tokens.join(", ")),
        ))
    }
}

/// Check a `Content-Type` value against the operation's consumable media
/// types.
///
/// A blank or absent content type is invalid outright: unlike `Accept`, a
/// caller sending a body must declare what it is sending. A non-blank value
/// must appear verbatim in `consumes`.
pub fn validate_content_type(
    content_type: Option<&str>,
    operation: &Operation,
) -> Result<(), Failure> {
    let ctype = content_type.map(str::trim).unwrap_or("");
    if ctype.is_empty() {
        return Err(Failure::new(
            ErrorCode::InvalidContentType,
            "no content-type was supplied",
        ));
    }

    if operation.consumes.iter().any(|c| c == ctype) {
        Ok(())
    } else {
        Err(Failure::new(
            ErrorCode::InvalidContentType,
            format!("content-type of ({ctype}) is not supported"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(produces: &[&str], consumes: &[&str]) -> Operation {
        Operation {
            produces: produces.iter().map(|s| s.to_string()).collect(),
            consumes: consumes.iter().map(|s| s.to_string()).collect(),
            parameters: Vec::new(),
        }
    }

    #[test]
    fn absent_accept_is_valid() {
        let op = operation(&[], &[]);
        assert!(validate_accept(None, &op).is_ok());
    }

    #[test]
    fn blank_accept_is_valid() {
        let op = operation(&["application/json"], &[]);
        assert!(validate_accept(Some(&AcceptValue::Raw("")), &op).is_ok());
        assert!(validate_accept(Some(&AcceptValue::Raw("   ")), &op).is_ok());
        assert!(validate_accept(Some(&AcceptValue::Tokens(&[])), &op).is_ok());
    }

    #[test]
    fn wildcard_always_matches() {
        let op = operation(&["application/json"], &[]);
        assert!(validate_accept(Some(&AcceptValue::Raw("*/*")), &op).is_ok());

        // Even with an empty produces set
        let bare = operation(&[], &[]);
        assert!(validate_accept(Some(&AcceptValue::Raw("*/*")), &bare).is_ok());
    }

    #[test]
    fn verbatim_produces_match() {
        let op = operation(&["application/json", "text/html"], &[]);
        assert!(validate_accept(Some(&AcceptValue::Raw("text/html")), &op).is_ok());
    }

    #[test]
    fn comma_separated_accept_matches_any_token() {
        let op = operation(&["application/json"], &[]);
        let accept = AcceptValue::Raw("text/plain, application/json");
        assert!(validate_accept(Some(&accept), &op).is_ok());
    }

    #[test]
    fn pre_split_tokens_match() {
        let op = operation(&["application/json"], &[]);
        let tokens = ["text/plain", "application/json"];
        assert!(validate_accept(Some(&AcceptValue::Tokens(&tokens)), &op).is_ok());
    }

    #[test]
    fn unmatched_accept_names_all_tokens() {
        let op = operation(&["application/json"], &[]);
        let accept = AcceptValue::Raw("text/plain, text/html");
        let err = validate_accept(Some(&accept), &op).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidAccept);
        assert!(err.detail.contains("text/plain"));
        assert!(err.detail.contains("text/html"));
    }

    #[test]
    fn blank_content_type_always_fails() {
        let op = operation(&[], &[]);
        let err = validate_content_type(None, &op).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidContentType);

        let err = validate_content_type(Some("  "), &op).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidContentType);
    }

    #[test]
    fn declared_content_type_passes() {
        let op = operation(&[], &["application/json"]);
        assert!(validate_content_type(Some("application/json"), &op).is_ok());
    }

    #[test]
    fn undeclared_content_type_fails_with_detail() {
        let op = operation(&[], &["application/json"]);
        let err = validate_content_type(Some("text/plain"), &op).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidContentType);
        assert!(err.detail.contains("text/plain"));
    }
}
