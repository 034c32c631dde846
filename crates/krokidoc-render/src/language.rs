//! Diagram types and output formats understood by Kroki.

use std::fmt;

use serde::Deserialize;

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramType {
    BlockDiag,
    Bpmn,
    Bytefield,
    SeqDiag,
    ActDiag,
    NwDiag,
    PacketDiag,
    RackDiag,
    C4PlantUml,
    Ditaa,
    Erd,
    GraphViz,
    Mermaid,
    Nomnoml,
    PlantUml,
    Svgbob,
    Vega,
    VegaLite,
    WaveDrom,
}

impl DiagramType {
    /// Every supported diagram type.
    pub const ALL: [Self; 19] = [
        Self::BlockDiag,
        Self::Bpmn,
        Self::Bytefield,
        Self::SeqDiag,
        Self::ActDiag,
        Self::NwDiag,
        Self::PacketDiag,
        Self::RackDiag,
        Self::C4PlantUml,
        Self::Ditaa,
        Self::Erd,
        Self::GraphViz,
        Self::Mermaid,
        Self::Nomnoml,
        Self::PlantUml,
        Self::Svgbob,
        Self::Vega,
        Self::VegaLite,
        Self::WaveDrom,
    ];

    /// Parse a diagram type from its Kroki name.
    ///
    /// Returns None if the name is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Infer the diagram type from a file extension (with or without the dot).
    ///
    /// Only unambiguous extensions are mapped; anything else needs an
    /// explicit type.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.strip_prefix('.').unwrap_or(ext) {
            "puml" => Some(Self::PlantUml),
            "dot" | "gv" => Some(Self::GraphViz),
            "bpmn" => Some(Self::Bpmn),
            "ditaa" => Some(Self::Ditaa),
            "bob" => Some(Self::Svgbob),
            _ => None,
        }
    }

    /// Kroki name for this diagram type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockDiag => "blockdiag",
            Self::Bpmn => "bpmn",
            Self::Bytefield => "bytefield",
            Self::SeqDiag => "seqdiag",
            Self::ActDiag => "actdiag",
            Self::NwDiag => "nwdiag",
            Self::PacketDiag => "packetdiag",
            Self::RackDiag => "rackdiag",
            Self::C4PlantUml => "c4plantuml",
            Self::Ditaa => "ditaa",
            Self::Erd => "erd",
            Self::GraphViz => "graphviz",
            Self::Mermaid => "mermaid",
            Self::Nomnoml => "nomnoml",
            Self::PlantUml => "plantuml",
            Self::Svgbob => "svgbob",
            Self::Vega => "vega",
            Self::VegaLite => "vegalite",
            Self::WaveDrom => "wavedrom",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for rendered diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    /// Vector image, the only format that can be inlined.
    #[default]
    Svg,
    Jpeg,
    Base64,
    Txt,
    Utxt,
}

impl OutputFormat {
    /// Every supported output format.
    pub const ALL: [Self; 6] = [
        Self::Png,
        Self::Svg,
        Self::Jpeg,
        Self::Base64,
        Self::Txt,
        Self::Utxt,
    ];

    /// Parse format from its name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Jpeg => "jpeg",
            Self::Base64 => "base64",
            Self::Txt => "txt",
            Self::Utxt => "utxt",
        }
    }

    /// File extension of artifacts in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Whether the artifact is vector markup that can be embedded inline.
    #[must_use]
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Svg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
