//! Diagram rendering via Kroki for krokidoc.
//!
//! This crate turns a [`RenderRequest`] into an artifact on disk:
//! - [`DiagramType`] / [`OutputFormat`]: the closed sets accepted by the service
//! - [`Renderer`]: cache lookup, one HTTP POST on a miss, body streamed to disk
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`language`]: Diagram type and output format definitions
//! - [`request`]: Immutable `RenderRequest`
//! - [`renderer`]: `Renderer::obtain` and `RenderedArtifact`
//! - [`client`]: HTTP transport to the Kroki service
//!
//! # Example
//!
//! ```ignore
//! use krokidoc_cache::ArtifactCache;
//! use krokidoc_render::{DiagramType, OutputFormat, RenderRequest, Renderer};
//!
//! let renderer = Renderer::new(ArtifactCache::new("_build/html", "_images"));
//! let request = RenderRequest::new(
//!     DiagramType::PlantUml,
//!     "@startuml\nA -> B\n@enduml",
//!     OutputFormat::Svg,
//!     "https://kroki.io",
//! );
//!
//! // Second call with the same request is served from disk.
//! let artifact = renderer.obtain(&request)?;
//! println!("{}", artifact.relative_path);
//! ```

mod client;
mod consts;
mod error;
mod language;
mod renderer;
mod request;

pub use consts::{DEFAULT_PREFIX, DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT};
pub use error::{RenderError, RenderErrorKind};
pub use language::{DiagramType, OutputFormat};
pub use renderer::{RenderOutcome, RenderedArtifact, Renderer};
pub use request::RenderRequest;
