//! `kroki` directive support for krokidoc.
//!
//! This crate turns `kroki` directives in reST sources into `.. raw:: html`
//! blocks:
//! - [`parse`]: positional arguments, options and content to a [`DiagramNode`]
//! - [`Embedder`]: a render outcome to an image link or inline SVG
//! - [`KrokiProcessor`]: a whole document, block by block
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`args`]: `ArgumentKind` classification of positional arguments
//! - [`options`]: Named option validation (`Align`, class normalization)
//! - [`context`]: `DirectiveContext`, `DependencyTracker` and `DiagramSettings`
//! - [`parser`]: Mutual-exclusion rules producing `DiagramNode`
//! - [`embed`]: HTML output for render outcomes
//! - [`document`]: reST-style block scanner
//! - [`processor`]: `KrokiProcessor` tying scanner, parser, renderer and embedder
//!
//! # Example
//!
//! ```ignore
//! use krokidoc_cache::ArtifactCache;
//! use krokidoc_directive::{DiagramSettings, Embedder, KrokiProcessor};
//! use krokidoc_render::Renderer;
//!
//! let renderer = Renderer::new(ArtifactCache::new("_build/html", "_images"));
//! let processor = KrokiProcessor::new(renderer, "docs")
//!     .settings(DiagramSettings::default())
//!     .embedder(Embedder::new());
//!
//! let doc = processor.process_document("index", ".. kroki:: mermaid\n\n   A->B: hi\n");
//! assert_eq!(doc.rendered, 1);
//! ```

mod args;
mod context;
mod document;
mod embed;
mod error;
mod node;
mod options;
mod parser;
mod processor;

pub use args::{ArgumentKind, MAX_ARGUMENTS, PositionalArgs};
pub use context::{BuildDependencies, DependencyTracker, DiagramSettings, DirectiveContext};
pub use document::{DirectiveBlock, scan};
pub use embed::Embedder;
pub use error::{DirectiveError, DirectiveWarning};
pub use node::{DiagramNode, RenderHints};
pub use options::{Align, DirectiveOptions, normalize_class};
pub use parser::{DirectiveInput, parse};
pub use processor::{KrokiProcessor, ProcessedDocument};
