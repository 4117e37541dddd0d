use crate::error::{Error, Result};
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name the adapter registers under.
pub const PLUGIN_NAME: &str = "@yarnpkg/esbuild-plugin-pnp";

/// Namespace tag attached to paths the adapter resolved.
pub const MANAGED_NAMESPACE: &str = "pnp";

/// Extensions tried, in order, when a specifier omits one.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js", ".css", ".json",
];

/// Static adapter configuration.
///
/// Fixed when the plugin is constructed; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PnpConfig {
    /// Stands in for the importer of entry points.
    pub base_dir: PathBuf,

    /// Extensions handed to the runtime's resolver.
    pub extensions: Vec<String>,

    /// Regex restricting which specifiers the adapter intercepts.
    /// Empty matches everything.
    pub filter: String,
}

impl Default for PnpConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            filter: String::new(),
        }
    }
}

impl PnpConfig {
    /// Create a config rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the probed extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the applicability filter pattern.
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = pattern.into();
        self
    }

    /// Compile the filter pattern.
    pub fn compile_filter(&self) -> Result<Filter> {
        Filter::new(&self.filter)
    }
}
