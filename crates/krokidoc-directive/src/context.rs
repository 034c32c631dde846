//! Directive processing context.
//!
//! Provides file system access, source location and diagram settings to the
//! directive parser.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use krokidoc_render::{DEFAULT_SERVICE_URL, OutputFormat};

/// Receives every external file a directive reads.
///
/// Lets incremental builds rebuild a document when an included diagram file
/// changes.
pub trait DependencyTracker {
    /// Record that the current document depends on `path`.
    fn note_dependency(&mut self, path: &Path);
}

/// Dependencies collected for one document, deduplicated and sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildDependencies {
    paths: BTreeSet<PathBuf>,
}

impl BuildDependencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl DependencyTracker for BuildDependencies {
    fn note_dependency(&mut self, path: &Path) {
        self.paths.insert(path.to_path_buf());
    }
}

/// Build-wide diagram settings threaded into every directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSettings {
    /// Kroki service URL stored in each request.
    pub service_url: String,
    /// Format used when a directive names none.
    pub default_format: OutputFormat,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_owned(),
            default_format: OutputFormat::default(),
        }
    }
}

/// Context for one directive occurrence.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use krokidoc_directive::{BuildDependencies, DiagramSettings, DirectiveContext};
///
/// let settings = DiagramSettings::default();
/// let mut deps = BuildDependencies::new();
/// let ctx = DirectiveContext {
///     docname: "guide/intro",
///     base_dir: Path::new("docs/guide"),
///     source_root: Path::new("docs"),
///     line: 12,
///     settings: &settings,
///     read_file: &|path| std::fs::read_to_string(path),
///     dependencies: &mut deps,
/// };
///
/// assert_eq!(ctx.resolve_path("seq.puml"), Path::new("docs/guide/seq.puml"));
/// assert_eq!(ctx.resolve_path("/shared/seq.puml"), Path::new("docs/shared/seq.puml"));
/// ```
pub struct DirectiveContext<'a> {
    /// Name of the current document: path below the source root without
    /// extension, `/`-separated.
    pub docname: &'a str,
    /// Directory of the current document.
    pub base_dir: &'a Path,
    /// Documentation source root, used for `/`-prefixed filenames.
    pub source_root: &'a Path,
    /// Line number where the directive appears (1-indexed).
    pub line: usize,
    pub settings: &'a DiagramSettings,
    /// Callback to read a file from the file system.
    pub read_file: &'a dyn Fn(&Path) -> io::Result<String>,
    pub dependencies: &'a mut dyn DependencyTracker,
}

impl DirectiveContext<'_> {
    /// Resolve a filename as written in a directive.
    ///
    /// A leading `/` makes the name relative to the source root; anything
    /// else is relative to the current document's directory.
    #[must_use]
    pub fn resolve_path(&self, filename: &str) -> PathBuf {
        match filename.strip_prefix('/') {
            Some(rooted) => self.source_root.join(rooted),
            None => self.base_dir.join(filename),
        }
    }

    /// Register `path` as a dependency, then read it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_dependency(&mut self, path: &Path) -> io::Result<String> {
        self.dependencies.note_dependency(path);
        (self.read_file)(path)
    }
}
