//! Diagram cache key computation.
//!
//! Provides [`DiagramKey`] for computing content-based hashes used as cache keys.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Render parameters for cache key computation.
///
/// Contains everything that affects the rendered artifact. The serialized
/// form (without `service_url`) is also the JSON body sent to the service.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiagramKey<'a> {
    /// Rendering service URL. Hashed, but not part of the payload.
    #[serde(skip)]
    pub service_url: &'a str,
    /// Diagram source code.
    pub diagram_source: &'a str,
    /// Diagram type name (e.g., "plantuml", "mermaid").
    pub diagram_type: &'a str,
    /// Output format name (e.g., "svg", "png").
    pub output_format: &'a str,
}

impl DiagramKey<'_> {
    /// Canonical JSON serialization of the payload fields.
    ///
    /// Field order is fixed: `diagram_source`, `diagram_type`, `output_format`.
    #[must_use]
    pub fn canonical_payload(&self) -> String {
        serde_json::json!({
            "diagram_source": self.diagram_source,
            "diagram_type": self.diagram_type,
            "output_format": self.output_format,
        })
        .to_string()
    }

    /// Compute the cache key for these parameters.
    ///
    /// # Hash Format
    ///
    /// SHA-256 of `"{service_url}{canonical_payload}"`, hex encoded.
    #[must_use]
    pub fn compute(&self) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(self.service_url.as_bytes());
        hasher.update(self.canonical_payload().as_bytes());
        CacheKey(hex::encode(hasher.finalize()))
    }
}

/// Hex-encoded SHA-256 digest identifying a unique render request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hex digest (64 lowercase characters).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Artifact file name: `{prefix}-{hex}.{extension}`.
    #[must_use]
    pub fn file_name(&self, prefix: &str, extension: &str) -> String {
        format!("{prefix}-{}.{extension}", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_key<'a>(source: &'a str, diagram_type: &'a str, format: &'a str) -> DiagramKey<'a> {
        DiagramKey {
            service_url: "https://kroki.io",
            diagram_source: source,
            diagram_type,
            output_format: format,
        }
    }

    #[test]
    fn test_key_is_deterministic() {
        let key1 = make_key("A -> B", "plantuml", "svg");
        let key2 = make_key("A -> B", "plantuml", "svg");

        assert_eq!(key1.compute(), key2.compute());
        assert_eq!(key1.compute().as_str().len(), 64);
    }

    #[test]
    fn test_source_matters() {
        let key1 = make_key("A -> B", "plantuml", "svg");
        let key2 = make_key("C -> D", "plantuml", "svg");

        assert_ne!(key1.compute(), key2.compute());
    }

    #[test]
    fn test_type_and_format_matter() {
        let base = make_key("graph", "graphviz", "svg");
        let other_type = DiagramKey {
            diagram_type: "mermaid",
            ..base
        };
        let other_format = DiagramKey {
            output_format: "png",
            ..base
        };

        assert_ne!(base.compute(), other_type.compute());
        assert_ne!(base.compute(), other_format.compute());
    }

    #[test]
    fn test_service_url_matters() {
        let public = make_key("A -> B", "plantuml", "svg");
        let local = DiagramKey {
            service_url: "http://localhost:8000",
            ..public
        };

        assert_ne!(public.compute(), local.compute());
    }

    #[test]
    fn test_canonical_payload_field_order() {
        let key = make_key("A->B: hi", "mermaid", "svg");

        assert_eq!(
            key.canonical_payload(),
            r#"{"diagram_source":"A->B: hi","diagram_type":"mermaid","output_format":"svg"}"#
        );
    }

    #[test]
    fn test_canonical_payload_matches_request_body() {
        let key = make_key("say \"hi\"\n", "plantuml", "png");

        let payload: serde_json::Value = serde_json::from_str(&key.canonical_payload()).unwrap();

        assert_eq!(payload, serde_json::to_value(key).unwrap());
        assert_eq!(payload["diagram_source"], "say \"hi\"\n");
    }

    #[test]
    fn test_hash_format() {
        let hash = make_key("test source", "plantuml", "svg").compute();

        assert!(
            hash.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "Hash should be lowercase hex: {hash}"
        );
    }

    #[test]
    fn test_file_name() {
        let key = make_key("A -> B", "plantuml", "png").compute();
        let name = key.file_name("kroki", "png");

        assert!(name.starts_with("kroki-"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "kroki-".len() + 64 + ".png".len());
    }
}
