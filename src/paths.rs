//! Path template matching and operation resolution.

use crate::error::{ErrorCode, Failure};
use crate::spec::{Operation, PathItem, SpecDocument, Verb};

/// Resolve a request URL path to a declared path template.
///
/// The document's declared base path, when present, is stripped from the
/// front of `url_path` before matching. Matching is structural: an exact
/// template key match wins, otherwise templates are compared segment by
/// segment, with `{param}` placeholders matching any single non-empty
/// segment. There is no prefix or partial matching.
pub fn resolve_path<'s>(
    doc: &'s SpecDocument,
    url_path: &str,
) -> Result<(&'s str, &'s PathItem), Failure> {
    let relative = strip_base_path(doc, url_path);

    if let Some((template, item)) = doc.paths.get_key_value(relative) {
        return Ok((template.as_str(), item));
    }

    for (template, item) in &doc.paths {
        if template_matches(template, relative) {
            return Ok((template.as_str(), item));
        }
    }

    Err(Failure::new(
        ErrorCode::InvalidPath,
        format!("no path found for ({url_path})"),
    ))
}

/// Resolve the declared operation for a verb token on a resolved path.
///
/// The token is case-normalized before lookup; a token outside the six
/// supported methods, or a verb with no declared operation, is rejected.
pub fn resolve_operation<'s>(
    item: &'s PathItem,
    verb_token: &str,
) -> Result<(Verb, &'s Operation), Failure> {
    let not_found = || {
        Failure::new(
            ErrorCode::InvalidMethod,
            format!("no operation found for the verb of ({verb_token})"),
        )
    };

    let verb = Verb::parse(verb_token).ok_or_else(not_found)?;
    let operation = item.operation(verb).ok_or_else(not_found)?;
    Ok((verb, operation))
}

fn strip_base_path<'a>(doc: &SpecDocument, url_path: &'a str) -> &'a str {
    let Some(base) = doc.base_path.as_deref() else {
        return url_path;
    };
    if base.is_empty() || base == "/" {
        return url_path;
    }
    match url_path.strip_prefix(base) {
        // Only strip at a segment boundary: /v1x must not match base /v1.
        Some(rest) if rest.is_empty() => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => url_path,
    }
}

/// Whether `template` structurally matches `path`.
///
/// Both are split on `/`; segment counts must agree, and each template
/// segment must either equal the path segment or be a `{param}` placeholder
/// matched against a non-empty segment.
fn template_matches(template: &str, path: &str) -> bool {
    let mut template_segments = template.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (template_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) => {
                let is_placeholder = t.starts_with('{') && t.ends_with('}') && t.len() > 2;
                if is_placeholder {
                    if p.is_empty() {
                        return false;
                    }
                } else if t != p {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
