//! Parsed diagram node.

use krokidoc_render::RenderRequest;

use crate::options::Align;

/// Presentation hints carried from the directive to the embedder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderHints {
    pub align: Option<Align>,
    /// Normalized user classes, appended after the base classes.
    pub classes: Vec<String>,
    pub caption: Option<String>,
}

/// A diagram ready for rendering, produced by a valid directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub request: RenderRequest,
    pub hints: RenderHints,
    /// Document the directive appeared in.
    pub docname: String,
}
