//! Plug'n'Play resolution adapter.
//!
//! Routes bundler resolve/load requests through the managed resolution
//! context that governs the importing file. Files outside any managed
//! context are left to the bundler untouched.

use crate::api::{LinkType, PnpApi, PnpLocator, ResolveRequestOptions, MANIFEST_SPECIFIER};
use crate::config::{PnpConfig, MANAGED_NAMESPACE, PLUGIN_NAME};
use crate::error::Result;
use crate::filter::Filter;
use crate::handlers::{DefaultLoadHandler, DefaultResolveHandler, LoadHandler, ResolveHandler};
use crate::plugin::{
    HookOptions, OnLoadArgs, OnLoadResult, OnResolveArgs, OnResolveResult, Plugin, PluginBuild,
};
use howth_pnp_util::path::{non_empty, with_trailing_separator};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Construction options for [`PnpPlugin`].
#[derive(Clone)]
pub struct PnpPluginOptions {
    pub config: PnpConfig,
    pub on_resolve: Arc<dyn ResolveHandler>,
    pub on_load: Arc<dyn LoadHandler>,
}

impl Default for PnpPluginOptions {
    fn default() -> Self {
        Self::new(PnpConfig::default())
    }
}

impl PnpPluginOptions {
    /// Options with the default resolve and load handlers.
    #[must_use]
    pub fn new(config: PnpConfig) -> Self {
        Self {
            config,
            on_resolve: Arc::new(DefaultResolveHandler),
            on_load: Arc::new(DefaultLoadHandler),
        }
    }

    /// Replace the resolve handler.
    #[must_use]
    pub fn with_on_resolve(mut self, handler: impl ResolveHandler + 'static) -> Self {
        self.on_resolve = Arc::new(handler);
        self
    }

    /// Replace the load handler.
    #[must_use]
    pub fn with_on_load(mut self, handler: impl LoadHandler + 'static) -> Self {
        self.on_load = Arc::new(handler);
        self
    }
}

impl fmt::Debug for PnpPluginOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PnpPluginOptions")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

struct Inner {
    base_dir: PathBuf,
    request_options: ResolveRequestOptions,
    filter: Filter,
    on_resolve: Arc<dyn ResolveHandler>,
    on_load: Arc<dyn LoadHandler>,
    locator: Option<Arc<dyn PnpLocator>>,
}

/// The resolution adapter.
///
/// Cheap to clone; clones share the same immutable state, which is what the
/// registered callbacks hold on to.
#[derive(Clone)]
pub struct PnpPlugin {
    inner: Arc<Inner>,
}

/// Build the adapter plugin.
///
/// `locator` is the runtime's context lookup. Passing `None` yields an inert
/// plugin whose setup registers nothing, so the same pipeline runs with or
/// without Plug'n'Play installed.
pub fn pnp_plugin(
    options: PnpPluginOptions,
    locator: Option<Arc<dyn PnpLocator>>,
) -> Result<PnpPlugin> {
    PnpPlugin::new(options, locator)
}

impl PnpPlugin {
    /// Create the adapter.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFilter`](crate::Error::InvalidFilter) if the
    /// configured filter does not compile.
    pub fn new(options: PnpPluginOptions, locator: Option<Arc<dyn PnpLocator>>) -> Result<Self> {
        let PnpPluginOptions {
            config,
            on_resolve,
            on_load,
        } = options;

        let filter = config.compile_filter()?;

        Ok(Self {
            inner: Arc::new(Inner {
                base_dir: config.base_dir,
                request_options: ResolveRequestOptions {
                    consider_builtins: true,
                    extensions: config.extensions,
                },
                filter,
                on_resolve,
                on_load,
                locator,
            }),
        })
    }

    /// Whether a context locator is available.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.locator.is_some()
    }

    /// Resolve a request.
    ///
    /// Returns `Ok(None)` when no managed context governs the importer, or
    /// when a custom resolve handler defers. Errors from the managed context
    /// are returned unchanged.
    pub fn resolve(&self, args: &OnResolveArgs) -> Result<Option<OnResolveResult>> {
        let Some(locator) = self.inner.locator.as_deref() else {
            return Ok(None);
        };

        let importer = self.effective_importer(args);

        let Some(api) = locator.find_pnp_api(&importer) else {
            trace!(
                specifier = %args.path,
                importer = %importer.display(),
                "no managed context, deferring"
            );
            return Ok(None);
        };

        let resolved =
            api.resolve_request(&args.path, Some(&*importer), &self.inner.request_options)?;

        let watch_files = watch_files(&*api, resolved.as_deref())?;

        match &resolved {
            Some(path) => debug!(
                specifier = %args.path,
                importer = %importer.display(),
                path = %path.display(),
                "resolved through managed context"
            ),
            None => debug!(
                specifier = %args.path,
                importer = %importer.display(),
                "unresolved in managed context"
            ),
        }

        self.inner
            .on_resolve
            .on_resolve(args, resolved.as_deref(), watch_files)
    }

    /// Load a path previously tagged with the managed namespace.
    pub fn load(&self, args: &OnLoadArgs) -> Result<OnLoadResult> {
        trace!(path = %args.path.display(), "loading managed path");
        self.inner.on_load.on_load(args)
    }

    /// Entry points have no importer; they resolve from the base directory.
    fn effective_importer<'a>(&self, args: &'a OnResolveArgs) -> Cow<'a, Path> {
        match non_empty(args.importer.as_deref()) {
            Some(importer) => Cow::Borrowed(importer),
            None => Cow::Owned(with_trailing_separator(&self.inner.base_dir)),
        }
    }
}

/// Files whose change should restart the build.
///
/// Always starts with the runtime manifest. Paths inside soft-linked packages
/// add their physical location, or the path itself when the runtime has no
/// virtual mapping for it.
fn watch_files(api: &dyn PnpApi, resolved: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut watch_files = Vec::with_capacity(2);

    if let Some(manifest) =
        api.resolve_request(MANIFEST_SPECIFIER, None, &ResolveRequestOptions::default())?
    {
        watch_files.push(manifest);
    }

    let Some(path) = resolved else {
        return Ok(watch_files);
    };

    let soft = api
        .find_package_locator(path)
        .and_then(|locator| api.get_package_information(&locator))
        .is_some_and(|info| info.link_type == LinkType::Soft);

    if soft {
        watch_files.push(api.resolve_virtual(path).unwrap_or_else(|| path.to_path_buf()));
    }

    Ok(watch_files)
}

impl Plugin for PnpPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn setup(&self, build: &mut dyn PluginBuild) -> Result<()> {
        if !self.is_enabled() {
            debug!("no Plug'n'Play runtime available, registering no hooks");
            return Ok(());
        }

        let resolver = self.clone();
        build.on_resolve(
            HookOptions::new(self.inner.filter.clone()),
            Arc::new(move |args: &OnResolveArgs| resolver.resolve(args)),
        );

        // The bundler cannot read files stored inside zip archives, so every
        // managed path is read through the load handler instead.
        if build.supports_on_load() {
            let loader = self.clone();
            build.on_load(
                HookOptions::new(self.inner.filter.clone()).with_namespace(MANAGED_NAMESPACE),
                Arc::new(move |args: &OnLoadArgs| loader.load(args).map(Some)),
            );
        }

        Ok(())
    }
}

impl fmt::Debug for PnpPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PnpPlugin")
            .field("base_dir", &self.inner.base_dir)
            .field("extensions", &self.inner.request_options.extensions)
            .field("filter", &self.inner.filter)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
