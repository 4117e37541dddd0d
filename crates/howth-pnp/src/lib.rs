#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Plug'n'Play resolution adapter for bundler plugins.
//!
//! Redirects module resolution through a Plug'n'Play runtime, which keeps
//! dependencies inside content-addressed archives instead of a
//! `node_modules` tree, and funnels reads of the resulting paths through a
//! loader that understands that storage.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod plugin;
pub mod pnp;

pub use api::{
    LinkType, PackageInformation, PackageLocator, PnpApi, PnpLocator, ResolveRequestOptions,
    MANIFEST_SPECIFIER,
};
pub use config::{PnpConfig, DEFAULT_EXTENSIONS, MANAGED_NAMESPACE, PLUGIN_NAME};
pub use error::{Error, Result};
pub use filter::Filter;
pub use handlers::{DefaultLoadHandler, DefaultResolveHandler, LoadHandler, ResolveHandler};
pub use plugin::{
    BuildHooks, HookOptions, ImportKind, LoadCallback, Loader, OnLoadArgs, OnLoadResult,
    OnResolveArgs, OnResolveResult, Plugin, PluginBuild, ResolveCallback, FILE_NAMESPACE,
};
pub use pnp::{pnp_plugin, PnpPlugin, PnpPluginOptions};
