//! `kroki` directive parser.
//!
//! Turns positional arguments, named options and block content into a
//! [`DiagramNode`]. The mutually exclusive ways of naming a filename, type and
//! format are checked in a fixed order; the first violation wins.

use std::path::Path;

use krokidoc_render::{DiagramType, RenderRequest};

use crate::args::{MAX_ARGUMENTS, PositionalArgs};
use crate::context::DirectiveContext;
use crate::error::{DirectiveError, DirectiveWarning};
use crate::node::{DiagramNode, RenderHints};
use crate::options::DirectiveOptions;

/// Raw directive as found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveInput {
    /// Whitespace-separated tokens after `kroki::`.
    pub arguments: Vec<String>,
    /// `(name, value)` pairs in source order.
    pub options: Vec<(String, String)>,
    /// Block content, dedented.
    pub content: String,
}

/// Parse a directive into a node.
///
/// # Errors
///
/// Returns a [`DirectiveWarning`] at `ctx.line` when the directive is
/// malformed. The caller reports it and emits nothing for the directive.
pub fn parse(
    input: &DirectiveInput,
    ctx: &mut DirectiveContext<'_>,
) -> Result<DiagramNode, DirectiveWarning> {
    parse_node(input, ctx).map_err(|kind| DirectiveWarning {
        line: ctx.line,
        kind,
    })
}

fn parse_node(
    input: &DirectiveInput,
    ctx: &mut DirectiveContext<'_>,
) -> Result<DiagramNode, DirectiveError> {
    if input.arguments.len() > MAX_ARGUMENTS {
        return Err(DirectiveError::TooManyArguments {
            count: input.arguments.len(),
            max: MAX_ARGUMENTS,
        });
    }

    let options = DirectiveOptions::parse(&input.options)?;
    let args = PositionalArgs::from_tokens(&input.arguments);

    let filename = match (options.filename, args.filename) {
        (Some(_), Some(_)) => return Err(DirectiveError::AmbiguousFilename),
        (option, argument) => option.or(argument),
    };

    let has_content = !input.content.trim().is_empty();
    if has_content && filename.is_some() {
        return Err(DirectiveError::AmbiguousContent);
    }

    let resolved = filename.as_deref().map(|name| ctx.resolve_path(name));
    let source = match &resolved {
        Some(path) => ctx
            .read_dependency(path)
            .map_err(|source| DirectiveError::Unreadable {
                path: path.clone(),
                source,
            })?,
        None => input.content.clone(),
    };

    if source.trim().is_empty() {
        return Err(DirectiveError::MissingContent);
    }

    let diagram_type = match (options.diagram_type, args.diagram_type) {
        (Some(_), Some(_)) => return Err(DirectiveError::AmbiguousType),
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => resolved
            .as_deref()
            .and_then(infer_type)
            .ok_or(DirectiveError::TypeRequired)?,
    };

    let output_format = match (options.output_format, args.output_format) {
        (Some(_), Some(_)) => return Err(DirectiveError::AmbiguousFormat),
        (option, argument) => option.or(argument),
    }
    .unwrap_or(ctx.settings.default_format);

    Ok(DiagramNode {
        request: RenderRequest::new(
            diagram_type,
            source,
            output_format,
            ctx.settings.service_url.as_str(),
        ),
        hints: RenderHints {
            align: options.align,
            classes: options.classes,
            caption: options.caption,
        },
        docname: ctx.docname.to_owned(),
    })
}

fn infer_type(path: &Path) -> Option<DiagramType> {
    let ext = path.extension()?.to_str()?;
    DiagramType::from_extension(ext)
}
