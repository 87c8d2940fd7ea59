//! OpenAPI/Swagger request validation.
//!
//! Given a parsed contract document and a description of an inbound HTTP
//! request, this library decides whether the request conforms to the
//! documented API surface: base path, path template, HTTP method, required
//! parameters, `Accept`/`Content-Type` negotiation, and body
//! well-formedness. The outcome is either valid or a single structured
//! failure naming the first check that rejected the request.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use oas_validate::{validate_request, Request, SpecDocument, ValidationOptions, Verdict};
//!
//! let doc = SpecDocument::from_json_str(r#"{
//!     "swagger": "2.0",
//!     "basePath": "/v1",
//!     "paths": {
//!         "/items/{id}": {
//!             "get": {
//!                 "produces": ["application/json"],
//!                 "parameters": [
//!                     { "name": "x-api-key", "in": "header", "required": true }
//!                 ]
//!             }
//!         }
//!     }
//! }"#).unwrap();
//!
//! let query: HashMap<String, String> = HashMap::new();
//! let headers: HashMap<String, String> =
//!     [("x-api-key".to_string(), "secret".to_string())].into();
//!
//! let verdict = validate_request(
//!     &doc,
//!     Request {
//!         path: "/v1/items/42",
//!         base_path: Some("/v1"),
//!         verb: "GET",
//!         query: &query,
//!         headers: &headers,
//!         accept: None,
//!         content_type: None,
//!         body: None,
//!     },
//!     &ValidationOptions { check_base_path: true },
//! );
//!
//! assert!(matches!(verdict, Verdict::Valid));
//! ```
//!
//! # Spec identifiers
//!
//! Documents are named by an identifier string classified by an ordered
//! rule list: `http(s)://` URLs are fetched remotely (behind the `remote`
//! feature), `{...}` is inline JSON, a leading `---` is inline YAML, and
//! anything else names a bundled resource file. A [`SpecCache`] memoizes
//! loads with LRU and idle-TTL eviction and collapses concurrent misses on
//! the same identifier into one load.
//!
//! # Failure model
//!
//! Non-conforming requests produce a [`Failure`] with a code from a fixed
//! vocabulary ([`ErrorCode`]); problems obtaining the contract itself are a
//! distinct [`SpecError`]. Checks that need a resolved operation are only
//! reachable through the typestate session ([`Session`] →
//! [`PathResolved`] → [`VerbResolved`]), so running them out of order is a
//! compile error rather than a runtime contract.

mod cache;
mod error;
mod loader;
mod negotiate;
mod params;
mod paths;
mod payload;
mod session;
mod spec;

pub use cache::{CacheConfig, SpecCache, DEFAULT_CAPACITY, DEFAULT_IDLE_TTL};
pub use error::{ErrorCode, Failure, SpecError};
pub use loader::{
    parse_spec_text, LoaderOptions, SpecLoader, SpecSource, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_RESOURCE_ROOT,
};
pub use negotiate::{validate_accept, validate_content_type, AcceptValue};
pub use params::{validate_parameters, ParamSource};
pub use paths::{resolve_operation, resolve_path};
pub use payload::validate_payload;
pub use session::{
    validate_request, PathResolved, Request, Session, ValidationOptions, VerbResolved, Verdict,
};
pub use spec::{Info, Operation, ParamLocation, Parameter, PathItem, SpecDocument, Verb};
