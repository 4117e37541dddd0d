//! Overridable translation strategies.
//!
//! The adapter does the routing; these decide what a routed request turns
//! into. Both have defaults and both accept plain closures.

use crate::config::MANAGED_NAMESPACE;
use crate::error::{Error, Result};
use crate::plugin::{Loader, OnLoadArgs, OnLoadResult, OnResolveArgs, OnResolveResult};
use howth_pnp_util::fs::read_to_string_lossy;
use std::path::{Path, PathBuf};

/// Turns a managed resolution into the bundler's result.
pub trait ResolveHandler: Send + Sync {
    /// `resolved` is `None` when the runtime deliberately left the specifier
    /// unresolved. Return `Ok(None)` to hand the request back to the
    /// bundler's default chain.
    fn on_resolve(
        &self,
        args: &OnResolveArgs,
        resolved: Option<&Path>,
        watch_files: Vec<PathBuf>,
    ) -> Result<Option<OnResolveResult>>;
}

/// Produces module contents for a managed path.
pub trait LoadHandler: Send + Sync {
    fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult>;
}

/// Tags resolved paths with the managed namespace; everything else is external.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolveHandler;

impl ResolveHandler for DefaultResolveHandler {
    fn on_resolve(
        &self,
        _args: &OnResolveArgs,
        resolved: Option<&Path>,
        watch_files: Vec<PathBuf>,
    ) -> Result<Option<OnResolveResult>> {
        Ok(Some(match resolved {
            Some(path) => OnResolveResult::managed(MANAGED_NAMESPACE, path, watch_files),
            None => OnResolveResult::external(),
        }))
    }
}

/// Reads the file as UTF-8 text and lets the bundler pick the loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoadHandler;

impl LoadHandler for DefaultLoadHandler {
    fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult> {
        let contents = read_to_string_lossy(&args.path).map_err(|source| Error::Read {
            path: args.path.clone(),
            source,
        })?;
        Ok(OnLoadResult::new(contents, Loader::Default))
    }
}

impl<F> ResolveHandler for F
where
    F: Fn(&OnResolveArgs, Option<&Path>, Vec<PathBuf>) -> Result<Option<OnResolveResult>>
        + Send
        + Sync,
{
    fn on_resolve(
        &self,
        args: &OnResolveArgs,
        resolved: Option<&Path>,
        watch_files: Vec<PathBuf>,
    ) -> Result<Option<OnResolveResult>> {
        self(args, resolved, watch_files)
    }
}

impl<F> LoadHandler for F
where
    F: Fn(&OnLoadArgs) -> Result<OnLoadResult> + Send + Sync,
{
    fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult> {
        self(args)
    }
}
