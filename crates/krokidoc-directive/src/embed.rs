//! HTML embedding of rendered diagrams.
//!
//! Output layout:
//!
//! ```text
//! <div class="kroki kroki-TYPE CLASSES">        (<figure> when captioned)
//!   <div align="A" class="align-A">             (only with :align:)
//!     <a href="URI"><img src="URI" alt="ALT" /></a>   or inline <svg>
//!   </div>
//!   <figcaption>..</figcaption>                 (only with :caption:)
//! </div>
//! ```

use std::fmt::Write;
use std::fs;

use krokidoc_render::{RenderOutcome, RenderedArtifact};

use crate::node::DiagramNode;

/// Turns render outcomes into HTML.
#[derive(Debug, Clone, Default)]
pub struct Embedder {
    inline_svg: bool,
    extra_class: Option<String>,
}

impl Embedder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed SVG artifacts verbatim instead of linking to them.
    #[must_use]
    pub fn inline_svg(mut self, enabled: bool) -> Self {
        self.inline_svg = enabled;
        self
    }

    /// Class placed before the base classes on every container.
    #[must_use]
    pub fn extra_class(mut self, class: impl Into<String>) -> Self {
        self.extra_class = Some(class.into());
        self
    }

    /// Emit markup for `node`, or `None` when the diagram is dropped.
    ///
    /// A failed outcome is logged with the diagram's type, format and source.
    #[must_use]
    pub fn embed(&self, node: &DiagramNode, outcome: RenderOutcome) -> Option<String> {
        let request = &node.request;

        let artifact = match outcome {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::warn!(
                    "kroki {} diagram ({}) with code {:?}: {}",
                    request.diagram_type(),
                    request.output_format(),
                    request.diagram_source(),
                    err
                );
                return None;
            }
        };

        let body = if request.output_format().is_vector() && self.inline_svg {
            match fs::read_to_string(&artifact.absolute_path) {
                Ok(svg) => svg,
                Err(err) => {
                    tracing::warn!(
                        "kroki {} diagram ({}) with code {:?}: unable to read {}: {}",
                        request.diagram_type(),
                        request.output_format(),
                        request.diagram_source(),
                        artifact.absolute_path.display(),
                        err
                    );
                    return None;
                }
            }
        } else {
            image_link(node, &artifact)
        };

        Some(self.wrap(node, &body))
    }

    fn wrap(&self, node: &DiagramNode, body: &str) -> String {
        let hints = &node.hints;
        let type_class = format!("kroki-{}", node.request.diagram_type());
        let classes = self
            .extra_class
            .iter()
            .map(String::as_str)
            .chain(["kroki", type_class.as_str()])
            .chain(hints.classes.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        let tag = if hints.caption.is_some() {
            "figure"
        } else {
            "div"
        };

        let mut html = String::new();
        let _ = write!(html, r#"<{tag} class="{classes}">"#);
        if let Some(align) = hints.align {
            let _ = write!(html, r#"<div align="{align}" class="align-{align}">"#);
        }
        html.push_str(body);
        if hints.align.is_some() {
            html.push_str("</div>\n");
        }
        if let Some(caption) = &hints.caption {
            let _ = writeln!(
                html,
                r#"<figcaption><span class="caption-text">{}</span></figcaption>"#,
                escape_html(caption)
            );
        }
        let _ = writeln!(html, "</{tag}>");
        html
    }
}

/// Link-wrapped image pointing at the artifact.
fn image_link(node: &DiagramNode, artifact: &RenderedArtifact) -> String {
    let uri = escape_html(&document_relative_uri(
        &node.docname,
        &artifact.relative_path,
    ));
    let alt_text = node
        .hints
        .caption
        .as_deref()
        .unwrap_or(node.request.diagram_source());
    let alt = escape_html(alt_text);

    format!(
        r#"<a href="{uri}"><img src="{uri}" alt="{}" /></a>"#,
        alt.trim()
    )
}

/// Path from the document's output location to a root-relative web path.
fn document_relative_uri(docname: &str, relative_path: &str) -> String {
    let depth = docname.matches('/').count();
    format!("{}{relative_path}", "../".repeat(depth))
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
