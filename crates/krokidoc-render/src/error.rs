//! Render error types.

use std::path::PathBuf;

use crate::language::{DiagramType, OutputFormat};

/// Failure to obtain a rendered diagram.
///
/// Carries the request's type and format so the caller can log the failure
/// with full context.
#[derive(Debug, thiserror::Error)]
#[error("kroki did not produce a {diagram_type} diagram ({output_format}): {kind}")]
pub struct RenderError {
    pub diagram_type: DiagramType,
    pub output_format: OutputFormat,
    #[source]
    pub kind: RenderErrorKind,
}

/// Kind of render error.
#[derive(Debug, thiserror::Error)]
pub enum RenderErrorKind {
    /// Connection, DNS, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The artifact could not be written.
    #[error("unable to write diagram to file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
