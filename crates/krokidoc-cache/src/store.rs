//! On-disk artifact store.
//!
//! [`ArtifactCache`] maps a [`CacheKey`] to a file under the build output
//! directory:
//!
//! ```text
//! {output_dir}/
//! +-- {image_dir}/
//!     +-- kroki-3f2a...e1.svg
//!     +-- kroki-9bc0...47.png
//! ```
//!
//! An existing file is a cache hit regardless of its contents. Entries are
//! never rewritten or evicted.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use crate::CacheKey;

/// Location of a cached artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Web path relative to the output root, always `/`-separated.
    pub relative: String,
    /// Path on disk.
    pub absolute: PathBuf,
}

/// Result of looking up an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The artifact already exists on disk.
    Hit(ArtifactPaths),
    /// The artifact must be rendered and written to these paths.
    Miss(ArtifactPaths),
}

/// Content-addressed artifact store rooted at a build output directory.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    output_dir: PathBuf,
    image_dir: String,
}

impl ArtifactCache {
    /// Create a store writing to `{output_dir}/{image_dir}`.
    ///
    /// `image_dir` is a relative, `/`-separated subdirectory (e.g. `_images`).
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, image_dir: impl Into<String>) -> Self {
        let image_dir: String = image_dir.into();
        Self {
            output_dir: output_dir.into(),
            image_dir: image_dir.trim_matches('/').to_owned(),
        }
    }

    /// Directory holding the artifacts on disk.
    #[must_use]
    pub fn artifact_dir(&self) -> PathBuf {
        self.image_dir
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.output_dir.clone(), |dir, segment| dir.join(segment))
    }

    /// Derive the paths for an artifact without touching the disk.
    #[must_use]
    pub fn locate(&self, key: &CacheKey, prefix: &str, extension: &str) -> ArtifactPaths {
        let file_name = key.file_name(prefix, extension);
        let relative = if self.image_dir.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{file_name}", self.image_dir)
        };

        ArtifactPaths {
            relative,
            absolute: self.artifact_dir().join(file_name),
        }
    }

    /// Check whether the artifact for `key` already exists.
    #[must_use]
    pub fn lookup(&self, key: &CacheKey, prefix: &str, extension: &str) -> Lookup {
        let paths = self.locate(key, prefix, extension);
        if paths.absolute.is_file() {
            tracing::debug!("diagram cache hit: {}", paths.absolute.display());
            Lookup::Hit(paths)
        } else {
            tracing::debug!("diagram cache miss: {}", paths.absolute.display());
            Lookup::Miss(paths)
        }
    }

    /// Create the artifact directory if it does not exist yet.
    pub fn ensure_artifact_dir(&self) -> io::Result<()> {
        fs::create_dir_all(self.artifact_dir())
    }

    /// Create the artifact file.
    ///
    /// Truncates an existing file. Callers only create on a miss, after
    /// [`ensure_artifact_dir`](Self::ensure_artifact_dir).
    pub fn create(&self, paths: &ArtifactPaths) -> io::Result<File> {
        File::create(&paths.absolute)
    }
}
