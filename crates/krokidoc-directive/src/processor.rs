//! Document processor.
//!
//! Runs every `kroki` block of a document through parse, render and embed,
//! and replaces the block with a `.. raw:: html` directive holding the
//! resulting markup, so the document stays valid reST.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use krokidoc_render::Renderer;

use crate::context::{BuildDependencies, DiagramSettings, DirectiveContext};
use crate::document::scan;
use crate::embed::Embedder;
use crate::error::DirectiveWarning;
use crate::parser::parse;

/// Indentation of the HTML under `.. raw:: html`.
const RAW_INDENT: &str = "   ";

/// Result of processing one document.
#[derive(Debug, Default)]
pub struct ProcessedDocument {
    /// Document text with every `kroki` block replaced by a `raw` block.
    pub output: String,
    /// Malformed directives, in document order.
    pub warnings: Vec<DirectiveWarning>,
    /// External diagram files the document read.
    pub dependencies: BuildDependencies,
    /// Diagrams embedded in the output.
    pub rendered: usize,
    /// Valid directives dropped because rendering or embedding failed.
    pub dropped: usize,
}

/// Expands `kroki` directives in documents below a source root.
///
/// # Example
///
/// ```ignore
/// use krokidoc_cache::ArtifactCache;
/// use krokidoc_directive::{Embedder, KrokiProcessor};
/// use krokidoc_render::Renderer;
///
/// let renderer = Renderer::new(ArtifactCache::new("_build/html", "_images"));
/// let processor = KrokiProcessor::new(renderer, "docs")
///     .embedder(Embedder::new().inline_svg(true));
///
/// let doc = processor.process_document("guide/index", &std::fs::read_to_string(
///     "docs/guide/index.rst",
/// )?);
/// ```
pub struct KrokiProcessor {
    renderer: Renderer,
    embedder: Embedder,
    settings: DiagramSettings,
    source_root: PathBuf,
}

impl KrokiProcessor {
    /// Create a processor for documents under `source_root`.
    #[must_use]
    pub fn new(renderer: Renderer, source_root: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            embedder: Embedder::default(),
            settings: DiagramSettings::default(),
            source_root: source_root.into(),
        }
    }

    /// Set the service URL and default format applied to every directive.
    #[must_use]
    pub fn settings(mut self, settings: DiagramSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn embedder(mut self, embedder: Embedder) -> Self {
        self.embedder = embedder;
        self
    }

    /// Expand every `kroki` block in `text`.
    ///
    /// `docname` is the document's path below the source root without
    /// extension (e.g. `guide/index`). Malformed directives and failed renders
    /// are logged and skipped; the rest of the document is unaffected.
    #[must_use]
    pub fn process_document(&self, docname: &str, text: &str) -> ProcessedDocument {
        let base_dir = self
            .source_root
            .join(docname)
            .parent()
            .map_or_else(|| self.source_root.clone(), Path::to_path_buf);
        let read_file = |path: &Path| fs::read_to_string(path);

        let mut doc = ProcessedDocument {
            output: String::with_capacity(text.len()),
            ..Default::default()
        };
        let mut cursor = 0;

        for block in scan(text) {
            doc.output.push_str(&text[cursor..block.span.start]);
            cursor = block.span.end;

            let parsed = {
                let mut ctx = DirectiveContext {
                    docname,
                    base_dir: &base_dir,
                    source_root: &self.source_root,
                    line: block.line,
                    settings: &self.settings,
                    read_file: &read_file,
                    dependencies: &mut doc.dependencies,
                };
                parse(&block.input, &mut ctx)
            };

            let node = match parsed {
                Ok(node) => node,
                Err(warning) => {
                    tracing::debug!("{docname}: {warning}");
                    doc.warnings.push(warning);
                    continue;
                }
            };

            let outcome = self.renderer.obtain(&node.request);
            match self.embedder.embed(&node, outcome) {
                Some(html) => {
                    push_raw_html(&mut doc.output, &html, block.indent);
                    doc.rendered += 1;
                }
                None => doc.dropped += 1,
            }
        }

        doc.output.push_str(&text[cursor..]);
        tracing::debug!(
            "processed {docname}: {} rendered, {} dropped, {} warnings",
            doc.rendered,
            doc.dropped,
            doc.warnings.len()
        );
        doc
    }
}

/// Append `html` as a `.. raw:: html` directive at column `indent`, so it
/// stays inside the enclosing construct.
fn push_raw_html(output: &mut String, html: &str, indent: usize) {
    let pad = " ".repeat(indent);
    let _ = writeln!(output, "{pad}.. raw:: html\n");
    for line in html.lines() {
        if !line.trim().is_empty() {
            let _ = write!(output, "{pad}{RAW_INDENT}{line}");
        }
        output.push('\n');
    }
}
