//! Validation session: the ordered conformance checks for one request.
//!
//! The session is a typestate pipeline. Each step consumes the previous
//! state and either advances or stops with the failing check's [`Failure`];
//! checks that need a resolved operation are only reachable through
//! [`VerbResolved`], so calling them out of order does not compile. A
//! session never backtracks and never runs a later check after an earlier
//! one failed.

use std::io::Read;

use crate::error::{ErrorCode, Failure};
use crate::negotiate::{validate_accept, validate_content_type, AcceptValue};
use crate::params::{validate_parameters, ParamSource};
use crate::paths::{resolve_operation, resolve_path};
use crate::payload::validate_payload;
use crate::spec::{Operation, PathItem, SpecDocument, Verb};

/// Host-supplied switches for a validation session.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// When true, the declared base path must exactly equal the supplied
    /// one before any path matching is attempted.
    pub check_base_path: bool,
}

/// Everything the core needs to know about one inbound request.
pub struct Request<'a> {
    /// Full request URL path.
    pub path: &'a str,
    /// Base path the host mounted the API under, for the optional
    /// base-path check.
    pub base_path: Option<&'a str>,
    /// HTTP verb token, any case.
    pub verb: &'a str,
    /// Query-parameter lookup.
    pub query: &'a dyn ParamSource,
    /// Header lookup.
    pub headers: &'a dyn ParamSource,
    /// `Accept` header, if any.
    pub accept: Option<AcceptValue<'a>>,
    /// `Content-Type` header, if any.
    pub content_type: Option<&'a str>,
    /// Request body stream; consumed exactly once when present.
    pub body: Option<&'a mut dyn Read>,
}

/// The outcome of a validation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Failure),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// The failure that stopped the session, if it was invalid.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(failure) => Some(failure),
        }
    }
}

/// A freshly started session against one document.
#[derive(Debug, Clone, Copy)]
pub struct Session<'s> {
    doc: &'s SpecDocument,
}

impl<'s> Session<'s> {
    pub fn new(doc: &'s SpecDocument) -> Self {
        Self { doc }
    }

    /// Compare the supplied base path with the declared one.
    ///
    /// A document with no declared base path compares as the empty string.
    /// A mismatch fails the session before any path matching, since path
    /// matching is meaningless under the wrong mount point.
    pub fn check_base_path(&self, supplied: &str) -> Result<(), Failure> {
        let expected = self.doc.base_path.as_deref().unwrap_or("");
        if expected == supplied {
            Ok(())
        } else {
            Err(Failure::new(
                ErrorCode::InvalidBasePath,
                format!("basepath of ({supplied}) does not match expected ({expected})"),
            ))
        }
    }

    /// Match the request path against the declared templates.
    pub fn resolve_path(self, url_path: &str) -> Result<PathResolved<'s>, Failure> {
        let (template, item) = resolve_path(self.doc, url_path)?;
        Ok(PathResolved { template, item })
    }
}

/// A session whose request path matched a declared template.
#[derive(Debug, Clone, Copy)]
pub struct PathResolved<'s> {
    template: &'s str,
    item: &'s PathItem,
}

impl<'s> PathResolved<'s> {
    /// The matched path template.
    pub fn template(&self) -> &'s str {
        self.template
    }

    pub fn path_item(&self) -> &'s PathItem {
        self.item
    }

    /// Look up the operation declared for the request's verb.
    pub fn resolve_verb(self, verb_token: &str) -> Result<VerbResolved<'s>, Failure> {
        let (verb, operation) = resolve_operation(self.item, verb_token)?;
        Ok(VerbResolved { verb, operation })
    }
}

/// A session with a resolved operation; the remaining checks hang off this
/// state and cannot be reached without it.
#[derive(Debug, Clone, Copy)]
pub struct VerbResolved<'s> {
    verb: Verb,
    operation: &'s Operation,
}

impl<'s> VerbResolved<'s> {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn operation(&self) -> &'s Operation {
        self.operation
    }

    /// Check that every required query and header parameter is present.
    pub fn check_parameters(
        &self,
        query: &dyn ParamSource,
        headers: &dyn ParamSource,
    ) -> Result<(), Failure> {
        validate_parameters(self.operation, query, headers)
    }

    /// Check the `Accept` value against the operation's producible types.
    pub fn check_accept(&self, accept: Option<&AcceptValue<'_>>) -> Result<(), Failure> {
        validate_accept(accept, self.operation)
    }

    /// Check the `Content-Type` value against the operation's consumable
    /// types. Callers should skip this for safe verbs; see
    /// [`Verb::is_safe`].
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<(), Failure> {
        validate_content_type(content_type, self.operation)
    }

    /// Check that the body parses as JSON. The stream is consumed once.
    pub fn check_payload(&self, body: impl Read) -> Result<(), Failure> {
        validate_payload(body, self.operation)
    }
}

/// Run the full check sequence for one request.
///
/// Checks run in fixed order — base path (optional), path, verb,
/// parameters, accept, content-type and payload — and the first failure is
/// terminal. Content-type and payload checks are skipped for safe verbs
/// (GET, DELETE, OPTIONS), and the payload check also requires a body
/// stream to be present.
pub fn validate_request(
    doc: &SpecDocument,
    request: Request<'_>,
    options: &ValidationOptions,
) -> Verdict {
    match run_checks(doc, request, options) {
        Ok(()) => Verdict::Valid,
        Err(failure) => Verdict::Invalid(failure),
    }
}

fn run_checks(
    doc: &SpecDocument,
    request: Request<'_>,
    options: &ValidationOptions,
) -> Result<(), Failure> {
    let session = Session::new(doc);

    if options.check_base_path {
        session.check_base_path(request.base_path.unwrap_or(""))?;
    }

    let resolved = session
        .resolve_path(request.path)?
        .resolve_verb(request.verb)?;

    resolved.check_parameters(request.query, request.headers)?;
    resolved.check_accept(request.accept.as_ref())?;

    if !resolved.verb().is_safe() {
        resolved.check_content_type(request.content_type)?;
        if let Some(body) = request.body {
            resolved.check_payload(body)?;
        }
    }

    Ok(())
}
