//! Shared fixtures: an in-memory Plug'n'Play runtime.

#![allow(dead_code)]

use howth_pnp::{
    Error, PackageInformation, PackageLocator, PnpApi, PnpLocator, ResolveRequestOptions, Result,
    MANIFEST_SPECIFIER,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Route `RUST_LOG=howth_pnp=trace` output into the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A recorded `resolve_request` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub specifier: String,
    pub issuer: Option<PathBuf>,
    pub options: ResolveRequestOptions,
}

/// A runtime backed by lookup tables.
pub struct MemoryPnp {
    manifest: Option<PathBuf>,
    requests: BTreeMap<String, PathBuf>,
    failing: BTreeMap<String, String>,
    packages: Vec<(PackageLocator, PackageInformation)>,
    virtuals: BTreeMap<PathBuf, PathBuf>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryPnp {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: Some(manifest.into()),
            requests: BTreeMap::new(),
            failing: BTreeMap::new(),
            packages: Vec::new(),
            virtuals: BTreeMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runtime that cannot locate its own manifest.
    pub fn without_manifest() -> Self {
        Self {
            manifest: None,
            ..Self::new("/unused")
        }
    }

    pub fn request(mut self, specifier: &str, path: impl Into<PathBuf>) -> Self {
        self.requests.insert(specifier.to_string(), path.into());
        self
    }

    pub fn failing(mut self, specifier: &str, message: &str) -> Self {
        self.failing
            .insert(specifier.to_string(), message.to_string());
        self
    }

    pub fn package(mut self, locator: PackageLocator, info: PackageInformation) -> Self {
        self.packages.push((locator, info));
        self
    }

    pub fn virtual_path(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.virtuals.insert(from.into(), to.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl PnpApi for MemoryPnp {
    fn resolve_request(
        &self,
        specifier: &str,
        issuer: Option<&Path>,
        options: &ResolveRequestOptions,
    ) -> Result<Option<PathBuf>> {
        self.calls.lock().unwrap().push(Call {
            specifier: specifier.to_string(),
            issuer: issuer.map(Path::to_path_buf),
            options: options.clone(),
        });

        if specifier == MANIFEST_SPECIFIER && issuer.is_none() {
            return Ok(self.manifest.clone());
        }
        if let Some(message) = self.failing.get(specifier) {
            return Err(Error::api(message.clone()));
        }
        if options.consider_builtins && is_builtin(specifier) {
            return Ok(None);
        }
        Ok(self.requests.get(specifier).cloned())
    }

    fn find_package_locator(&self, path: &Path) -> Option<PackageLocator> {
        self.packages
            .iter()
            .filter(|(_, info)| path.starts_with(&info.package_location))
            .max_by_key(|(_, info)| info.package_location.as_os_str().len())
            .map(|(locator, _)| locator.clone())
    }

    fn get_package_information(&self, locator: &PackageLocator) -> Option<PackageInformation> {
        self.packages
            .iter()
            .find(|(l, _)| l == locator)
            .map(|(_, info)| info.clone())
    }

    fn resolve_virtual(&self, path: &Path) -> Option<PathBuf> {
        self.virtuals.get(path).cloned()
    }
}

fn is_builtin(specifier: &str) -> bool {
    specifier.starts_with("node:") || matches!(specifier, "fs" | "path" | "os" | "crypto")
}

/// A locator that hands out `api` for every path under `root`.
pub fn locator_under(root: impl Into<PathBuf>, api: Arc<MemoryPnp>) -> Arc<dyn PnpLocator> {
    let root = root.into();
    let locator = move |path: &Path| -> Option<Arc<dyn PnpApi>> {
        if path.starts_with(&root) {
            Some(api.clone() as Arc<dyn PnpApi>)
        } else {
            None
        }
    };
    Arc::new(locator)
}
