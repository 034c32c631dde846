//! Canonical render request.

use krokidoc_cache::DiagramKey;

use crate::language::{DiagramType, OutputFormat};

/// A single diagram to render.
///
/// Immutable once constructed; the type and format are enum members, so an
/// unsupported value can never reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    diagram_type: DiagramType,
    diagram_source: String,
    output_format: OutputFormat,
    service_url: String,
}

impl RenderRequest {
    /// Create a new render request.
    #[must_use]
    pub fn new(
        diagram_type: DiagramType,
        diagram_source: impl Into<String>,
        output_format: OutputFormat,
        service_url: impl Into<String>,
    ) -> Self {
        Self {
            diagram_type,
            diagram_source: diagram_source.into(),
            output_format,
            service_url: service_url.into(),
        }
    }

    #[must_use]
    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    #[must_use]
    pub fn diagram_source(&self) -> &str {
        &self.diagram_source
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Cache key parameters for this request.
    ///
    /// Also serves as the JSON payload posted to the service.
    #[must_use]
    pub fn key(&self) -> DiagramKey<'_> {
        DiagramKey {
            service_url: &self.service_url,
            diagram_source: &self.diagram_source,
            diagram_type: self.diagram_type.as_str(),
            output_format: self.output_format.as_str(),
        }
    }
}
