//! Lazy Loading Configuration
//!
//! `Options` names the lifecycle classes and the marker attribute. It is
//! resolved once at activation and shared read-only afterwards.

use fos_dom::Document;
use serde::Deserialize;

use crate::LazyError;

/// Window global a page can set before activation to override the defaults
pub const OPTIONS_GLOBAL: &str = "lazyOptions";

/// Class names and marker attribute
///
/// Every field is required when deserializing: an override replaces the
/// defaults wholesale or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Added when the reveal starts, removed once the resource loads
    pub loading: String,
    /// Added when the resource fails to load
    pub failed: String,
    /// Added when the element enters the viewport
    pub on: String,
    /// Added when the resource loads
    pub loaded: String,
    /// Marker attribute suffix: elements carry `data-<attribute>`
    pub attribute: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            loading: "lazy-loading".to_string(),
            failed: "lazy-failed".to_string(),
            on: "lazy".to_string(),
            loaded: "lazy-loaded".to_string(),
            attribute: "lazy".to_string(),
        }
    }
}

impl Options {
    /// Parse a complete override from JSON
    pub fn from_json(json: &str) -> Result<Self, LazyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pick the options for this activation: an explicit override first,
    /// then the page's window global, then the compiled-in defaults.
    pub fn resolve(doc: &Document, explicit: Option<Options>) -> Self {
        if let Some(options) = explicit {
            return options;
        }
        match doc.window().global(OPTIONS_GLOBAL).map(Self::from_json) {
            Some(Ok(options)) => options,
            Some(Err(err)) => {
                tracing::warn!("Ignoring {}: {}", OPTIONS_GLOBAL, err);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Marker attribute name, e.g. `data-lazy`
    pub fn marker(&self) -> String {
        format!("data-{}", self.attribute)
    }

    /// Companion source-set attribute, e.g. `data-lazy-srcset`
    pub fn srcset_marker(&self) -> String {
        format!("data-{}-srcset", self.attribute)
    }
}

/// Embedder-side activation settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Overrides both the window global and the defaults
    pub options: Option<Options>,
    /// Stop watching elements once they are removed from the document.
    /// Off by default: removed elements stay registered.
    pub release_detached: bool,
}

impl Settings {
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }
}
