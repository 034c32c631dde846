//! `krokidoc build` command implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::Args;
use krokidoc_cache::ArtifactCache;
use krokidoc_config::{CliSettings, Config};
use krokidoc_directive::{DiagramSettings, Embedder, KrokiProcessor};
use krokidoc_render::{OutputFormat, Renderer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover krokidoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for processed documents and images (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, env = "KROKI_URL")]
    kroki_url: Option<String>,

    /// Default output format: png, svg, jpeg, base64, txt or utxt (overrides config).
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Embed SVG diagrams inline instead of linking to image files.
    #[arg(long)]
    inline_svg: bool,

    /// Enable verbose output (show render and cache logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Totals over all processed documents.
#[derive(Debug, Default)]
struct BuildSummary {
    documents: usize,
    rendered: usize,
    dropped: usize,
    warnings: usize,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a document cannot be read
    /// or written. Directive warnings and failed renders do not fail the build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            kroki_url: self.kroki_url,
            output_format: self.format,
            inline_svg: self.inline_svg.then_some(true),
            source_dir: self.source_dir,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;

        if !build.source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Source directory not found: {}",
                build.source_dir.display()
            )));
        }

        output.info(&format!("Source: {}", build.source_dir.display()));
        output.info(&format!("Output: {}", build.output_dir.display()));
        output.info(&format!("Kroki URL: {}", config.kroki.url));

        let renderer = Renderer::new(ArtifactCache::new(&build.output_dir, &build.image_dir))
            .prefix(config.kroki.prefix.as_str())
            .timeout(config.kroki.timeout());
        let processor = KrokiProcessor::new(renderer, &build.source_dir)
            .settings(DiagramSettings {
                service_url: config.kroki.url.clone(),
                default_format: config.kroki.output_format,
            })
            .embedder(Embedder::new().inline_svg(config.kroki.inline_svg));

        let mut summary = BuildSummary::default();
        for path in find_documents(&build.source_dir, &build.output_dir)? {
            let Ok(relative) = path.strip_prefix(&build.source_dir) else {
                continue;
            };
            let docname = docname(relative);
            let text = fs::read_to_string(&path)?;

            let doc = processor.process_document(&docname, &text);
            for warning in &doc.warnings {
                output.diagnostic(relative, warning);
            }

            let dest = build.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &doc.output)?;
            tracing::debug!("wrote {}", dest.display());

            summary.documents += 1;
            summary.rendered += doc.rendered;
            summary.dropped += doc.dropped;
            summary.warnings += doc.warnings.len();
        }

        let message = format!(
            "Built {} documents: {} diagrams, {} failed, {} warnings",
            summary.documents, summary.rendered, summary.dropped, summary.warnings
        );
        if summary.dropped > 0 || summary.warnings > 0 {
            output.warning(&message);
        } else {
            output.success(&message);
        }

        Ok(())
    }
}

/// Parse an output format name for clap.
fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| {
        let choices: Vec<_> = OutputFormat::ALL
            .into_iter()
            .map(OutputFormat::as_str)
            .collect();
        format!("expected one of {}", choices.join(", "))
    })
}

/// All `.rst` documents under `source_dir`, skipping anything in `output_dir`.
fn find_documents(source_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = format!(
        "{}/**/*.rst",
        glob::Pattern::escape(&source_dir.to_string_lossy())
    );

    let mut documents = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.starts_with(output_dir) || !path.is_file() {
            continue;
        }
        documents.push(path);
    }
    Ok(documents)
}

/// Document name: path relative to the source root, without extension,
/// `/`-separated.
fn docname(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
