//! Directive diagnostics.

use std::io;
use std::path::PathBuf;

/// Malformed `kroki` directive.
///
/// None of these abort a build: the directive produces no output and the
/// error is reported as a [`DirectiveWarning`].
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("kroki directive takes at most {max} arguments, got {count}")]
    TooManyArguments { count: usize, max: usize },

    #[error("unknown option to kroki directive: {0:?}")]
    UnknownOption(String),

    #[error("duplicate option to kroki directive: {0:?}")]
    DuplicateOption(String),

    #[error("invalid value {value:?} for option {name:?}: expected {expected}")]
    InvalidOption {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("kroki directive cannot have both filename option and a filename argument")]
    AmbiguousFilename,

    #[error("kroki directive cannot have both content and a filename argument")]
    AmbiguousContent,

    #[error("external kroki file {} not found or reading it failed: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "ignoring kroki directive without content; specify a filename argument/option or content"
    )]
    MissingContent,

    #[error("kroki directive cannot have both type option and a type argument")]
    AmbiguousType,

    #[error("kroki directive has to define diagram type")]
    TypeRequired,

    #[error("kroki directive cannot have both format option and a format argument")]
    AmbiguousFormat,
}

/// A directive error at its source line (1-indexed).
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct DirectiveWarning {
    pub line: usize,
    #[source]
    pub kind: DirectiveError,
}
