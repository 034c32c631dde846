//! Positional argument classification.
//!
//! A `kroki` directive accepts up to three free-form arguments. Each one is a
//! diagram type, an output format, or a filename, told apart by set
//! membership alone.

use krokidoc_render::{DiagramType, OutputFormat};

/// Maximum number of positional arguments.
pub const MAX_ARGUMENTS: usize = 3;

/// What a positional argument turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    Type(DiagramType),
    Format(OutputFormat),
    Filename(String),
}

impl ArgumentKind {
    /// Classify a single token.
    ///
    /// Diagram types are checked before formats; the two sets do not overlap.
    /// Anything else is taken as a filename.
    #[must_use]
    pub fn classify(token: &str) -> Self {
        if let Some(diagram_type) = DiagramType::parse(token) {
            Self::Type(diagram_type)
        } else if let Some(format) = OutputFormat::parse(token) {
            Self::Format(format)
        } else {
            Self::Filename(token.to_owned())
        }
    }
}

/// Positional arguments folded by kind.
///
/// A later argument of the same kind replaces an earlier one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PositionalArgs {
    pub diagram_type: Option<DiagramType>,
    pub output_format: Option<OutputFormat>,
    pub filename: Option<String>,
}

impl PositionalArgs {
    /// Classify and fold `tokens`.
    #[must_use]
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut args = Self::default();
        for token in tokens {
            match ArgumentKind::classify(token.as_ref()) {
                ArgumentKind::Type(t) => args.diagram_type = Some(t),
                ArgumentKind::Format(f) => args.output_format = Some(f),
                ArgumentKind::Filename(name) => args.filename = Some(name),
            }
        }
        args
    }
}
