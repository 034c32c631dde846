//! Content-addressed cache for rendered diagrams.
//!
//! Two pieces make up the cache:
//!
//! - [`DiagramKey`] / [`CacheKey`]: deterministic SHA-256 key over the service
//!   URL and the canonical render payload
//! - [`ArtifactCache`]: maps a key to `{output_dir}/{image_dir}/{prefix}-{hex}.{ext}`
//!   and reports hits by file existence
//!
//! There is no invalidation: a changed source, type, format or service URL
//! produces a different key, so stale entries are simply never looked up again.
//!
//! # Example
//!
//! ```
//! use krokidoc_cache::{ArtifactCache, DiagramKey, Lookup};
//!
//! let key = DiagramKey {
//!     service_url: "https://kroki.io",
//!     diagram_source: "A -> B",
//!     diagram_type: "plantuml",
//!     output_format: "svg",
//! }
//! .compute();
//!
//! let cache = ArtifactCache::new("/nonexistent/build", "_images");
//! assert!(matches!(cache.lookup(&key, "kroki", "svg"), Lookup::Miss(_)));
//! ```

mod key;
mod store;

pub use key::{CacheKey, DiagramKey};
pub use store::{ArtifactCache, ArtifactPaths, Lookup};
