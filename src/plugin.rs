//! # Build Plugin Module
//!
//! Punto di aggancio al ciclo di vita della build host.
//!
//! ## Responsabilità:
//! - `BuildResult` / `Metafile`: risultato della build con il manifest degli output
//! - `Plugin` / `PluginBuild`: registrazione degli handler di fine build
//! - `CompressPlugin`: il pass di compressione registrato come handler `on_end`
//!
//! ## Binding della configurazione:
//! Le opzioni sono fissate alla costruzione di `CompressPlugin` e risolte sui
//! default a ogni fine build. `setup` non accetta opzioni.
//!
//! ## Esempio:
//! ```rust,no_run
//! use build_compressor::{BuildResult, CompressPlugin, Metafile, PartialCompressOptions, PluginBuild};
//!
//! # async fn example() -> Result<(), build_compressor::CompressError> {
//! let mut build = PluginBuild::new();
//! build.register(&CompressPlugin::new(PartialCompressOptions {
//!     excludes: Some(vec!["*.map".to_string()]),
//!     ..Default::default()
//! }));
//!
//! let metafile = Metafile::from_json(r#"{"outputs": {"out/app.js": {}}}"#)?;
//! for report in build.end(BuildResult::with_metafile(metafile)).await {
//!     println!("{}", report?.summary());
//! }
//! # Ok(())
//! # }
//! ```

use crate::compressor::FanOut;
use crate::config::{CompressOptions, PartialCompressOptions};
use crate::error::{CompressError, Result};
use crate::report::CompressionReport;
use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Build metadata emitted by the bundler. Only the output keys are used
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metafile {
    #[serde(default)]
    pub inputs: IndexMap<String, serde_json::Value>,
    pub outputs: IndexMap<String, serde_json::Value>,
}

impl Metafile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompressError::Config(format!("invalid metafile: {}", e)))
    }

    /// Metafile listing `paths` as outputs, in the given order
    pub fn from_outputs<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: IndexMap::new(),
            outputs: paths
                .into_iter()
                .map(|path| (path.into(), serde_json::Value::Object(Default::default())))
                .collect(),
        }
    }

    /// Output paths in manifest order
    pub fn output_paths(&self) -> Vec<String> {
        self.outputs.keys().cloned().collect()
    }
}

/// What the host hands to end-of-build handlers
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub metafile: Option<Metafile>,
    /// Directory relative manifest paths are resolved against
    pub working_dir: Option<PathBuf>,
}

impl BuildResult {
    pub fn with_metafile(metafile: Metafile) -> Self {
        Self {
            metafile: Some(metafile),
            working_dir: None,
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

type OnEndCallback = Box<dyn Fn(Arc<BuildResult>) -> BoxFuture<'static, Result<CompressionReport>> + Send + Sync>;

/// An extension registered with the host build
pub trait Plugin {
    fn name(&self) -> &str;

    /// Register hooks. Called once, when the plugin is added to a build
    fn setup(&self, build: &mut PluginBuild);
}

/// Hook registry for one build configuration
#[derive(Default)]
pub struct PluginBuild {
    on_end: Vec<OnEndCallback>,
}

impl PluginBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: Plugin>(&mut self, plugin: &P) {
        debug!("Registering plugin {}", plugin.name());
        plugin.setup(self);
    }

    /// Register a handler run once per build completion
    pub fn on_end<F, Fut>(&mut self, callback: F)
    where
        F: Fn(Arc<BuildResult>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CompressionReport>> + Send + 'static,
    {
        self.on_end
            .push(Box::new(move |result: Arc<BuildResult>| callback(result).boxed()));
    }

    pub fn on_end_count(&self) -> usize {
        self.on_end.len()
    }

    /// Signal build completion: run every handler in registration order
    pub async fn end(&self, result: BuildResult) -> Vec<Result<CompressionReport>> {
        let result = Arc::new(result);
        let mut results = Vec::with_capacity(self.on_end.len());
        for callback in &self.on_end {
            results.push(callback(Arc::clone(&result)).await);
        }
        results
    }
}

/// Writes `.gz`, `.zz` and `.br` siblings for every build output
#[derive(Debug, Clone, Default)]
pub struct CompressPlugin {
    options: Arc<PartialCompressOptions>,
}

impl CompressPlugin {
    pub const NAME: &'static str = "build-compressor";

    pub fn new(options: PartialCompressOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Run one compression pass for a finished build
    pub async fn on_end(&self, result: &BuildResult) -> Result<CompressionReport> {
        Self::compress_build(&self.options, result).await
    }

    async fn compress_build(partial: &PartialCompressOptions, result: &BuildResult) -> Result<CompressionReport> {
        let metafile = result.metafile.as_ref().ok_or(CompressError::MissingMetafile)?;

        let options = CompressOptions::resolve(partial);
        let fan_out = FanOut::new(options)?;

        let manifest = metafile.output_paths();
        Ok(fan_out
            .run(&manifest, result.working_dir.as_deref())
            .await)
    }
}

impl Plugin for CompressPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn setup(&self, build: &mut PluginBuild) {
        let options = Arc::clone(&self.options);
        build.on_end(move |result| {
            let options = Arc::clone(&options);
            async move { Self::compress_build(&options, &result).await }
        });
    }
}
