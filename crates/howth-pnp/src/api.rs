//! Managed resolution contexts.
//!
//! A Plug'n'Play runtime owns the actual resolution algorithm: which package
//! a path belongs to, which dependencies it may see, and how paths inside
//! zip-backed package storage are synthesized. The adapter only consumes it
//! through the traits below.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Specifier that resolves to the runtime's own manifest file (`.pnp.cjs`).
pub const MANIFEST_SPECIFIER: &str = "pnpapi";

/// Options for [`PnpApi::resolve_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequestOptions {
    /// Whether `fs`, `node:path` and friends resolve to "no path".
    pub consider_builtins: bool,
    /// Extensions tried, in order, when a specifier omits one.
    pub extensions: Vec<String>,
}

impl Default for ResolveRequestOptions {
    fn default() -> Self {
        Self {
            consider_builtins: true,
            extensions: Vec::new(),
        }
    }
}

/// Identifies one package instance in the dependency tree.
///
/// The top-level workspace locator has neither a name nor a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageLocator {
    pub name: Option<String>,
    pub reference: Option<String>,
}

impl PackageLocator {
    /// Locator for a named package at a given reference.
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            reference: Some(reference.into()),
        }
    }

    /// Locator of the top-level workspace.
    #[must_use]
    pub fn top_level() -> Self {
        Self {
            name: None,
            reference: None,
        }
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.name.is_none() && self.reference.is_none()
    }
}

/// How a package is materialized on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkType {
    /// A plain directory (or archive) owned by the package.
    Hard,
    /// An indirection (workspace, `portal:`, peer-dependent virtual instance)
    /// pointing at content stored elsewhere.
    Soft,
}

/// Per-package data exposed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInformation {
    pub package_location: PathBuf,
    pub link_type: LinkType,
    /// Dependency name to reference; `None` marks an unfulfilled peer dependency.
    #[serde(default)]
    pub package_dependencies: BTreeMap<String, Option<String>>,
}

/// A managed resolution context governing a subtree of the file graph.
///
/// Implementations must be safe to call from many threads at once; the
/// adapter treats them as read-only.
pub trait PnpApi: Send + Sync {
    /// Resolve `specifier` as if required from `issuer`.
    ///
    /// `Ok(None)` means the request is deliberately unresolved (for example a
    /// builtin module when `consider_builtins` is set). An issuer of `None`
    /// resolves from the project root.
    fn resolve_request(
        &self,
        specifier: &str,
        issuer: Option<&Path>,
        options: &ResolveRequestOptions,
    ) -> Result<Option<PathBuf>>;

    /// The package owning `path`, if the runtime knows one.
    fn find_package_locator(&self, path: &Path) -> Option<PackageLocator>;

    fn get_package_information(&self, locator: &PackageLocator) -> Option<PackageInformation>;

    /// Map a virtual path to the physical path it stands for.
    ///
    /// Runtimes without virtual-path support keep the default, which
    /// reports nothing.
    fn resolve_virtual(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// Finds the managed context governing a path (the runtime's `findPnpApi`).
pub trait PnpLocator: Send + Sync {
    fn find_pnp_api(&self, path: &Path) -> Option<Arc<dyn PnpApi>>;
}

impl<F> PnpLocator for F
where
    F: Fn(&Path) -> Option<Arc<dyn PnpApi>> + Send + Sync,
{
    fn find_pnp_api(&self, path: &Path) -> Option<Arc<dyn PnpApi>> {
        self(path)
    }
}
