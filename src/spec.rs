//! Parsed contract data model.
//!
//! A `SpecDocument` is the immutable, in-memory form of an OpenAPI/Swagger
//! document: the base path, the declared path templates, and per-verb
//! operations with their media types and parameters. Once parsed it is never
//! mutated, so it can be shared across concurrent validation sessions.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::SpecError;

/// The six HTTP methods the contract model supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Options,
}

impl Verb {
    /// Parse a verb token, case-insensitively.
    ///
    /// Returns `None` for any token outside the six supported methods.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Verb::Get),
            "PUT" => Some(Verb::Put),
            "POST" => Some(Verb::Post),
            "DELETE" => Some(Verb::Delete),
            "PATCH" => Some(Verb::Patch),
            "OPTIONS" => Some(Verb::Options),
            _ => None,
        }
    }

    /// Whether this verb is treated as not carrying a meaningful request
    /// body. Safe verbs skip content-type and payload checks.
    pub fn is_safe(&self) -> bool {
        matches!(self, Verb::Get | Verb::Delete | Verb::Options)
    }

    /// Uppercase name of the verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declared parameter lives in the request.
///
/// Only `query` and `header` are validated by this crate; the other
/// locations are carried through from the document but not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Query,
    Header,
    Path,
    Body,
    #[serde(rename = "formData")]
    FormData,
}

/// A single declared operation parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    #[serde(default)]
    pub required: bool,
}

/// The declared behavior of one verb on one path template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Media types this operation can produce (matched against `Accept`).
    #[serde(default)]
    pub produces: Vec<String>,
    /// Media types this operation consumes (matched against `Content-Type`).
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// Per-verb operations declared on one path template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub options: Option<Operation>,
}

impl PathItem {
    /// The operation declared for `verb`, if any.
    pub fn operation(&self, verb: Verb) -> Option<&Operation> {
        match verb {
            Verb::Get => self.get.as_ref(),
            Verb::Put => self.put.as_ref(),
            Verb::Post => self.post.as_ref(),
            Verb::Delete => self.delete.as_ref(),
            Verb::Patch => self.patch.as_ref(),
            Verb::Options => self.options.as_ref(),
        }
    }

    /// Verbs that have a declared operation, in model order.
    pub fn declared_verbs(&self) -> Vec<Verb> {
        [
            Verb::Get,
            Verb::Put,
            Verb::Post,
            Verb::Delete,
            Verb::Patch,
            Verb::Options,
        ]
        .into_iter()
        .filter(|v| self.operation(*v).is_some())
        .collect()
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
}

/// An immutable parsed contract document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecDocument {
    /// Declared spec format version (e.g. `"2.0"`).
    pub swagger: Option<String>,
    #[serde(default)]
    pub info: Info,
    #[serde(rename = "basePath")]
    pub base_path: Option<String>,
    /// Path template → declared operations, in declaration order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl SpecDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, SpecError> {
        serde_json::from_str(content).map_err(|e| SpecError::InvalidJson {
            message: e.to_string(),
        })
    }

    /// Parse a document from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, SpecError> {
        serde_yaml::from_str(content).map_err(|e| SpecError::InvalidYaml {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_parse_case_insensitive() {
        assert_eq!(Verb::parse("get"), Some(Verb::Get));
        assert_eq!(Verb::parse("GET"), Some(Verb::Get));
        assert_eq!(Verb::parse(" Post "), Some(Verb::Post));
        assert_eq!(Verb::parse("options"), Some(Verb::Options));
    }

    #[test]
    fn verb_parse_unknown() {
        assert_eq!(Verb::parse("TRACE"), None);
        assert_eq!(Verb::parse("HEAD"), None);
        assert_eq!(Verb::parse(""), None);
    }

    #[test]
    fn safe_verbs() {
        assert!(Verb::Get.is_safe());
        assert!(Verb::Delete.is_safe());
        assert!(Verb::Options.is_safe());
        assert!(!Verb::Post.is_safe());
        assert!(!Verb::Put.is_safe());
        assert!(!Verb::Patch.is_safe());
    }

    #[test]
    fn parse_minimal_document() {
        let doc = SpecDocument::from_json_str(
            r#"{
                "swagger": "2.0",
                "info": { "title": "Items", "version": "1.0" },
                "basePath": "/v1",
                "paths": {
                    "/items/{id}": {
                        "get": {
                            "produces": ["application/json"],
                            "parameters": [
                                { "name": "x-api-key", "in": "header", "required": true }
                            ]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.base_path.as_deref(), Some("/v1"));
        assert_eq!(doc.info.title.as_deref(), Some("Items"));
        let item = &doc.paths["/items/{id}"];
        let op = item.operation(Verb::Get).unwrap();
        assert_eq!(op.produces, vec!["application/json"]);
        assert_eq!(op.parameters[0].name, "x-api-key");
        assert_eq!(op.parameters[0].location, ParamLocation::Header);
        assert!(op.parameters[0].required);
        assert_eq!(item.declared_verbs(), vec![Verb::Get]);
    }

    #[test]
    fn parse_yaml_document() {
        let doc = SpecDocument::from_yaml_str(
            "---\nswagger: \"2.0\"\nbasePath: /v2\npaths:\n  /pets:\n    post:\n      consumes:\n        - application/json\n",
        )
        .unwrap();

        assert_eq!(doc.base_path.as_deref(), Some("/v2"));
        let op = doc.paths["/pets"].operation(Verb::Post).unwrap();
        assert_eq!(op.consumes, vec!["application/json"]);
    }

    #[test]
    fn parameter_required_defaults_false() {
        let doc = SpecDocument::from_json_str(
            r#"{"paths":{"/a":{"get":{"parameters":[{"name":"q","in":"query"}]}}}}"#,
        )
        .unwrap();
        let op = doc.paths["/a"].operation(Verb::Get).unwrap();
        assert!(!op.parameters[0].required);
        assert_eq!(op.parameters[0].location, ParamLocation::Query);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = SpecDocument::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SpecError::InvalidJson { .. }));
    }
}
