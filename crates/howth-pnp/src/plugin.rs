//! Plugin contract between a bundler and its resolution plugins.
//!
//! Plugins register callbacks during [`Plugin::setup`]; the bundler then runs
//! them for every resolve and load request whose path matches the callback's
//! filter.
//!
//! ## Example
//!
//! ```ignore
//! use howth_pnp::{BuildHooks, OnResolveArgs};
//!
//! let mut hooks = BuildHooks::new();
//! hooks.register(&plugin)?;
//!
//! match hooks.resolve(&OnResolveArgs::new("lodash").with_importer("/app/src/index.js"))? {
//!     Some(result) => println!("{:?}", result.path),
//!     None => { /* fall back to the bundler's own resolver */ }
//! }
//! ```

use crate::error::Result;
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Namespace of plain filesystem paths.
pub const FILE_NAMESPACE: &str = "file";

/// How an import was expressed in the importing module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    EntryPoint,
    #[default]
    ImportStatement,
    RequireCall,
    DynamicImport,
    RequireResolve,
    ImportRule,
    UrlToken,
}

/// Arguments of a resolve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnResolveArgs {
    /// The specifier as written (`lodash`, `./utils`, `node:fs`).
    pub path: String,
    /// File containing the import; `None` (or empty) for entry points.
    pub importer: Option<PathBuf>,
    /// Namespace of the importer.
    pub namespace: String,
    /// Directory relative specifiers resolve against.
    pub resolve_dir: Option<PathBuf>,
    pub kind: ImportKind,
}

impl OnResolveArgs {
    /// A request for `specifier` with no importer.
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            path: specifier.into(),
            importer: None,
            namespace: FILE_NAMESPACE.to_string(),
            resolve_dir: None,
            kind: ImportKind::default(),
        }
    }

    /// An entry-point request.
    pub fn entry(specifier: impl Into<String>) -> Self {
        Self::new(specifier).with_kind(ImportKind::EntryPoint)
    }

    #[must_use]
    pub fn with_importer(mut self, importer: impl Into<PathBuf>) -> Self {
        let importer = importer.into();
        self.resolve_dir = importer.parent().map(Path::to_path_buf);
        self.importer = Some(importer);
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ImportKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Outcome of a resolve callback that claimed the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OnResolveResult {
    pub path: Option<PathBuf>,
    /// Namespace subsequent loads of `path` are routed through.
    pub namespace: Option<String>,
    /// Leave the import as-is in the output.
    pub external: bool,
    /// Files whose modification invalidates the build.
    pub watch_files: Vec<PathBuf>,
}

impl OnResolveResult {
    /// A path owned by `namespace`.
    pub fn managed(
        namespace: impl Into<String>,
        path: impl Into<PathBuf>,
        watch_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            namespace: Some(namespace.into()),
            external: false,
            watch_files,
        }
    }

    /// Mark the specifier external.
    #[must_use]
    pub fn external() -> Self {
        Self {
            external: true,
            ..Default::default()
        }
    }
}

/// Arguments of a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLoadArgs {
    pub path: PathBuf,
    pub namespace: String,
}

impl OnLoadArgs {
    pub fn new(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
        }
    }
}

/// How the bundler should parse loaded contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    /// Pick a loader from the file extension.
    #[default]
    Default,
    Js,
    Jsx,
    Ts,
    Tsx,
    Json,
    Css,
    Text,
}

impl Loader {
    /// Resolve [`Loader::Default`] to a concrete loader for `path`.
    ///
    /// Explicit loaders are returned unchanged.
    #[must_use]
    pub fn infer(self, path: &Path) -> Self {
        if self != Self::Default {
            return self;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("ts" | "mts" | "cts") => Self::Ts,
            Some("tsx") => Self::Tsx,
            Some("jsx") => Self::Jsx,
            Some("js" | "mjs" | "cjs") => Self::Js,
            Some("json") => Self::Json,
            Some("css") => Self::Css,
            _ => Self::Text,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Json => "json",
            Self::Css => "css",
            Self::Text => "text",
        }
    }
}

/// Outcome of a load callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLoadResult {
    pub contents: String,
    pub loader: Loader,
}

impl OnLoadResult {
    pub fn new(contents: impl Into<String>, loader: Loader) -> Self {
        Self {
            contents: contents.into(),
            loader,
        }
    }
}

/// Which requests a callback sees.
#[derive(Debug, Clone, Default)]
pub struct HookOptions {
    pub filter: Filter,
    /// Restrict to one namespace; `None` runs for all of them.
    pub namespace: Option<String>,
}

impl HookOptions {
    #[must_use]
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            namespace: None,
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    fn applies(&self, path: &str, namespace: &str) -> bool {
        if let Some(ns) = &self.namespace {
            if ns != namespace {
                return false;
            }
        }
        self.filter.is_match(path)
    }
}

/// Resolve callback. `Ok(None)` passes the request on to the next callback.
pub type ResolveCallback =
    Arc<dyn Fn(&OnResolveArgs) -> Result<Option<OnResolveResult>> + Send + Sync>;

/// Load callback. `Ok(None)` passes the request on to the next callback.
pub type LoadCallback = Arc<dyn Fn(&OnLoadArgs) -> Result<Option<OnLoadResult>> + Send + Sync>;

/// Registration surface a bundler hands to [`Plugin::setup`].
pub trait PluginBuild {
    fn on_resolve(&mut self, options: HookOptions, callback: ResolveCallback);

    fn on_load(&mut self, options: HookOptions, callback: LoadCallback);

    /// Whether load callbacks are honoured. Hosts that always read files
    /// themselves return `false`.
    fn supports_on_load(&self) -> bool {
        true
    }
}

/// A bundler plugin.
pub trait Plugin: Send + Sync {
    /// Plugin name for debugging and error messages.
    fn name(&self) -> &str;

    /// Register callbacks.
    fn setup(&self, build: &mut dyn PluginBuild) -> Result<()>;
}

/// In-process callback registry.
///
/// Callbacks run in registration order; the first one returning `Some` wins.
/// When none does, the caller falls back to its default behaviour.
#[derive(Default)]
pub struct BuildHooks {
    resolve: Vec<(HookOptions, ResolveCallback)>,
    load: Vec<(HookOptions, LoadCallback)>,
    load_disabled: bool,
}

impl BuildHooks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry for a host that never delegates file reads.
    #[must_use]
    pub fn without_load() -> Self {
        Self {
            load_disabled: true,
            ..Self::default()
        }
    }

    /// Run a plugin's setup against this registry.
    pub fn register(&mut self, plugin: &dyn Plugin) -> Result<()> {
        tracing::debug!(plugin = plugin.name(), "setting up plugin");
        plugin.setup(self)
    }

    /// Resolve through the registered callbacks.
    /// Returns `None` if no callback handled the request.
    pub fn resolve(&self, args: &OnResolveArgs) -> Result<Option<OnResolveResult>> {
        for (options, callback) in &self.resolve {
            if !options.applies(&args.path, &args.namespace) {
                continue;
            }
            if let Some(result) = callback(args)? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Load through the registered callbacks.
    /// Returns `None` if no callback handled the request.
    pub fn load(&self, args: &OnLoadArgs) -> Result<Option<OnLoadResult>> {
        let path = args.path.to_string_lossy();
        for (options, callback) in &self.load {
            if !options.applies(&path, &args.namespace) {
                continue;
            }
            if let Some(result) = callback(args)? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    #[must_use]
    pub fn resolve_hook_count(&self) -> usize {
        self.resolve.len()
    }

    #[must_use]
    pub fn load_hook_count(&self) -> usize {
        self.load.len()
    }
}

impl PluginBuild for BuildHooks {
    fn on_resolve(&mut self, options: HookOptions, callback: ResolveCallback) {
        self.resolve.push((options, callback));
    }

    fn on_load(&mut self, options: HookOptions, callback: LoadCallback) {
        self.load.push((options, callback));
    }

    fn supports_on_load(&self) -> bool {
        !self.load_disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AliasPlugin {
        from: &'static str,
        to: &'static str,
    }

    impl Plugin for AliasPlugin {
        fn name(&self) -> &str {
            "alias"
        }

        fn setup(&self, build: &mut dyn PluginBuild) -> Result<()> {
            let to = self.to;
            build.on_resolve(
                HookOptions::new(Filter::new(&format!("^{}$", self.from))?),
                Arc::new(move |_args: &OnResolveArgs| -> Result<Option<OnResolveResult>> {
                    Ok(Some(OnResolveResult::managed(FILE_NAMESPACE, to, Vec::new())))
                }),
            );
            Ok(())
        }
    }

    #[test]
    fn test_loader_infer() {
        assert_eq!(Loader::Default.infer(Path::new("/a/b.tsx")), Loader::Tsx);
        assert_eq!(Loader::Default.infer(Path::new("/a/b.MTS")), Loader::Ts);
        assert_eq!(Loader::Default.infer(Path::new("/a/b.cjs")), Loader::Js);
        assert_eq!(Loader::Default.infer(Path::new("/a/b.json")), Loader::Json);
        assert_eq!(Loader::Default.infer(Path::new("/a/b.css")), Loader::Css);
        assert_eq!(Loader::Default.infer(Path::new("/a/LICENSE")), Loader::Text);
        assert_eq!(Loader::Css.infer(Path::new("/a/b.js")), Loader::Css);
    }

    #[test]
    fn test_loader_serde() {
        assert_eq!(serde_json::to_string(&Loader::Default).unwrap(), r#""default""#);
        assert_eq!(Loader::Tsx.as_str(), "tsx");
    }

    #[test]
    fn test_entry_args() {
        let args = OnResolveArgs::entry("./src/index.ts");
        assert_eq!(args.kind, ImportKind::EntryPoint);
        assert!(args.importer.is_none());
        assert_eq!(args.namespace, FILE_NAMESPACE);
    }

    #[test]
    fn test_with_importer_sets_resolve_dir() {
        let args = OnResolveArgs::new("./utils").with_importer("/app/src/index.js");
        assert_eq!(args.resolve_dir, Some(PathBuf::from("/app/src")));
    }

    #[test]
    fn test_external_result() {
        let result = OnResolveResult::external();
        assert!(result.external);
        assert!(result.path.is_none());
        assert!(result.watch_files.is_empty());
    }

    #[test]
    fn test_hooks_filter_and_fallthrough() {
        let mut hooks = BuildHooks::new();
        hooks
            .register(&AliasPlugin {
                from: "@",
                to: "/app/src/index.ts",
            })
            .unwrap();

        let hit = hooks.resolve(&OnResolveArgs::new("@")).unwrap().unwrap();
        assert_eq!(hit.path, Some(PathBuf::from("/app/src/index.ts")));

        // Filter does not match: no callback answers
        assert!(hooks.resolve(&OnResolveArgs::new("lodash")).unwrap().is_none());
    }

    #[test]
    fn test_hooks_first_answer_wins() {
        let mut hooks = BuildHooks::new();
        hooks.on_resolve(
            HookOptions::default(),
            Arc::new(|_args: &OnResolveArgs| -> Result<Option<OnResolveResult>> { Ok(None) }),
        );
        hooks.on_resolve(
            HookOptions::default(),
            Arc::new(|_args: &OnResolveArgs| -> Result<Option<OnResolveResult>> {
                Ok(Some(OnResolveResult::external()))
            }),
        );
        hooks.on_resolve(
            HookOptions::default(),
            Arc::new(|_args: &OnResolveArgs| -> Result<Option<OnResolveResult>> {
                Ok(Some(OnResolveResult::managed("x", "/never", Vec::new())))
            }),
        );

        let result = hooks.resolve(&OnResolveArgs::new("fs")).unwrap().unwrap();
        assert!(result.external);
    }

    #[test]
    fn test_load_namespace_scoping() {
        let mut hooks = BuildHooks::new();
        hooks.on_load(
            HookOptions::default().with_namespace("virtual"),
            Arc::new(|_args: &OnLoadArgs| -> Result<Option<OnLoadResult>> {
                Ok(Some(OnLoadResult::new("export {}", Loader::Js)))
            }),
        );

        assert!(hooks
            .load(&OnLoadArgs::new("/a.js", FILE_NAMESPACE))
            .unwrap()
            .is_none());
        assert!(hooks
            .load(&OnLoadArgs::new("/a.js", "virtual"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_without_load() {
        let hooks = BuildHooks::without_load();
        assert!(!hooks.supports_on_load());
        assert!(BuildHooks::new().supports_on_load());
    }
}
