//! Spec loading from various sources.
//!
//! A spec identifier is classified by a closed, ordered rule list and then
//! loaded from the matching source: a remote URL, the identifier text itself
//! (inline JSON or YAML), or a bundled resource file.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::SpecError;
use crate::spec::SpecDocument;

/// Default timeout for remote spec fetches (10 seconds).
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default directory under which bundled resources are resolved.
pub const DEFAULT_RESOURCE_ROOT: &str = "resources";

/// How a spec identifier should be loaded.
///
/// The classification rules form a closed, ordered list; the first matching
/// rule wins. Reordering them changes which identifiers mean what, so the
/// order is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecSource {
    /// `http://` or `https://` prefix: fetch a remote document.
    Url,
    /// Starts with `{` and ends with `}`: the identifier is the JSON text.
    InlineJson,
    /// Starts with `---`: the identifier is the YAML text.
    InlineYaml,
    /// Anything else: the name of a bundled resource file.
    Resource,
}

impl SpecSource {
    /// Classify a spec identifier.
    pub fn classify(spec_id: &str) -> Self {
        if spec_id.starts_with("http://") || spec_id.starts_with("https://") {
            return SpecSource::Url;
        }
        if spec_id.starts_with('{') && spec_id.ends_with('}') {
            return SpecSource::InlineJson;
        }
        if spec_id.starts_with("---") {
            return SpecSource::InlineYaml;
        }
        SpecSource::Resource
    }
}

/// Options controlling where and how specs are loaded.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Directory under which bundled resource names are resolved.
    pub resource_root: PathBuf,
    /// Timeout applied to remote fetches.
    pub http_timeout: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from(DEFAULT_RESOURCE_ROOT),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Loads spec documents from identifiers.
#[derive(Debug, Clone, Default)]
pub struct SpecLoader {
    options: LoaderOptions,
}

impl SpecLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load and parse the document named by `spec_id`.
    ///
    /// # Errors
    ///
    /// Returns a `SpecError` describing the failure: fetch or read errors,
    /// an unresolvable resource, or a malformed document. A load failure is
    /// never a validation verdict.
    pub fn load(&self, spec_id: &str) -> Result<SpecDocument, SpecError> {
        match SpecSource::classify(spec_id) {
            SpecSource::Url => self.load_url(spec_id),
            SpecSource::InlineJson => SpecDocument::from_json_str(spec_id),
            SpecSource::InlineYaml => SpecDocument::from_yaml_str(spec_id),
            SpecSource::Resource => self.load_resource(spec_id),
        }
    }

    #[cfg(feature = "remote")]
    fn load_url(&self, url: &str) -> Result<SpecDocument, SpecError> {
        let fetch_err = |message: String| SpecError::Fetch {
            url: url.to_string(),
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.options.http_timeout)
            .build()
            .map_err(|e| fetch_err(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_err(e.to_string()))?;

        let text = response.text().map_err(|e| fetch_err(e.to_string()))?;
        parse_spec_text(&text)
    }

    #[cfg(not(feature = "remote"))]
    fn load_url(&self, url: &str) -> Result<SpecDocument, SpecError> {
        Err(SpecError::RemoteDisabled {
            url: url.to_string(),
        })
    }

    /// Resolve a bundled resource name under the resource root and parse it.
    ///
    /// Leading slashes in the name are ignored so callers cannot escape the
    /// root by supplying an absolute path; `..` components are rejected.
    fn load_resource(&self, name: &str) -> Result<SpecDocument, SpecError> {
        let relative = Path::new(name.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(SpecError::ResourceOutsideRoot {
                name: name.to_string(),
            });
        }

        let path = self.options.resource_root.join(relative);
        if !path.is_file() {
            return Err(SpecError::ResourceNotFound {
                name: name.to_string(),
                root: self.options.resource_root.clone(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| SpecError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        parse_spec_text(&content)
    }
}

/// Parse spec text as JSON or YAML based on its content.
///
/// A document whose first non-whitespace byte is `{` is JSON; anything else
/// is treated as YAML.
pub fn parse_spec_text(content: &str) -> Result<SpecDocument, SpecError> {
    if content.trim_start().starts_with('{') {
        SpecDocument::from_json_str(content)
    } else {
        SpecDocument::from_yaml_str(content)
    }
}
