//! Cache-first diagram rendering.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use krokidoc_cache::{ArtifactCache, ArtifactPaths, Lookup};
use ureq::Agent;

use crate::client::{create_agent, send_render_request};
use crate::consts::{DEFAULT_PREFIX, DEFAULT_TIMEOUT};
use crate::error::{RenderError, RenderErrorKind};
use crate::request::RenderRequest;

/// A rendered diagram on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Web path relative to the output root (e.g. `_images/kroki-ab12.svg`).
    pub relative_path: String,
    /// Path on disk.
    pub absolute_path: PathBuf,
}

impl From<ArtifactPaths> for RenderedArtifact {
    fn from(paths: ArtifactPaths) -> Self {
        Self {
            relative_path: paths.relative,
            absolute_path: paths.absolute,
        }
    }
}

/// Result of [`Renderer::obtain`], consumed once by the embedder.
pub type RenderOutcome = Result<RenderedArtifact, RenderError>;

/// Renders diagrams through Kroki, reusing artifacts already on disk.
///
/// # Example
///
/// ```ignore
/// use krokidoc_cache::ArtifactCache;
/// use krokidoc_render::{DiagramType, OutputFormat, RenderRequest, Renderer};
///
/// let renderer = Renderer::new(ArtifactCache::new("_build/html", "_images"));
/// let request = RenderRequest::new(
///     DiagramType::Mermaid,
///     "graph TD\n  A --> B",
///     OutputFormat::Svg,
///     "https://kroki.io",
/// );
/// let artifact = renderer.obtain(&request)?;
/// ```
pub struct Renderer {
    cache: ArtifactCache,
    prefix: String,
    /// HTTP agent for connection pooling (reused across render calls).
    agent: Agent,
}

impl Renderer {
    /// Create a renderer storing artifacts in `cache`.
    #[must_use]
    pub fn new(cache: ArtifactCache) -> Self {
        Self {
            cache,
            prefix: DEFAULT_PREFIX.to_owned(),
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set the artifact filename prefix (default: `kroki`).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set HTTP timeout for Kroki requests.
    ///
    /// Default is 30 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Return the artifact for `request`, rendering it on a cache miss.
    ///
    /// An existing artifact is returned without any network traffic. On a
    /// miss, exactly one POST is made; there is no retry. A failed write may
    /// leave a truncated file behind, which later builds treat as a hit.
    pub fn obtain(&self, request: &RenderRequest) -> RenderOutcome {
        let key = request.key();
        let cache_key = key.compute();
        let extension = request.output_format().extension();

        let paths = match self.cache.lookup(&cache_key, &self.prefix, extension) {
            Lookup::Hit(paths) => return Ok(paths.into()),
            Lookup::Miss(paths) => paths,
        };

        self.fetch_into(request, &paths)
            .map_err(|kind| RenderError {
                diagram_type: request.diagram_type(),
                output_format: request.output_format(),
                kind,
            })?;

        tracing::info!(
            "rendered {} diagram to {}",
            request.diagram_type(),
            paths.relative
        );
        Ok(paths.into())
    }

    /// Fetch the artifact from the service and stream it to disk.
    fn fetch_into(
        &self,
        request: &RenderRequest,
        paths: &ArtifactPaths,
    ) -> Result<(), RenderErrorKind> {
        let io_error = |source: io::Error| RenderErrorKind::Io {
            path: paths.absolute.clone(),
            source,
        };

        self.cache.ensure_artifact_dir().map_err(io_error)?;

        let body = send_render_request(&self.agent, request.service_url(), &request.key())?;

        let mut file = self.cache.create(paths).map_err(io_error)?;
        io::copy(&mut body.into_reader(), &mut file).map_err(io_error)?;

        Ok(())
    }
}
