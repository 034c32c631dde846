//! Named directive options.
//!
//! Recognized options: `filename`, `type`, `format`, `align`, `caption` and
//! `class`. Values are validated here so the parser only deals with
//! well-typed fields.

use std::fmt;

use krokidoc_render::{DiagramType, OutputFormat};

use crate::error::DirectiveError;

/// Horizontal alignment of a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated named options of one directive.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    pub filename: Option<String>,
    pub diagram_type: Option<DiagramType>,
    pub output_format: Option<OutputFormat>,
    pub align: Option<Align>,
    pub caption: Option<String>,
    pub classes: Vec<String>,
}

impl DirectiveOptions {
    /// Validate raw `(name, value)` pairs in source order.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown or repeated option, or a value outside
    /// the option's allowed set.
    pub fn parse<N, V>(pairs: &[(N, V)]) -> Result<Self, DirectiveError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        let mut seen: Vec<&str> = Vec::with_capacity(pairs.len());

        for (name, value) in pairs {
            let name = name.as_ref();
            let value = value.as_ref().trim();

            if seen.contains(&name) {
                return Err(DirectiveError::DuplicateOption(name.to_owned()));
            }
            seen.push(name);

            match name {
                "filename" => options.filename = Some(value.to_owned()),
                "type" => {
                    let parsed = DiagramType::parse(value).ok_or_else(|| invalid(
                        "type",
                        value,
                        DiagramType::ALL.into_iter().map(DiagramType::as_str),
                    ))?;
                    options.diagram_type = Some(parsed);
                }
                "format" => {
                    let parsed = OutputFormat::parse(value).ok_or_else(|| invalid(
                        "format",
                        value,
                        OutputFormat::ALL.into_iter().map(OutputFormat::as_str),
                    ))?;
                    options.output_format = Some(parsed);
                }
                "align" => {
                    let parsed = Align::parse(value).ok_or_else(|| invalid(
                        "align",
                        value,
                        Align::ALL.into_iter().map(Align::as_str),
                    ))?;
                    options.align = Some(parsed);
                }
                "caption" => options.caption = Some(value.to_owned()),
                "class" => options.classes = parse_classes(value)?,
                other => return Err(DirectiveError::UnknownOption(other.to_owned())),
            }
        }

        Ok(options)
    }
}

fn invalid(
    name: &'static str,
    value: &str,
    choices: impl Iterator<Item = &'static str>,
) -> DirectiveError {
    DirectiveError::InvalidOption {
        name,
        value: value.to_owned(),
        expected: format!("one of {}", choices.collect::<Vec<_>>().join(", ")),
    }
}

/// Split a `class` option value into normalized class names.
fn parse_classes(value: &str) -> Result<Vec<String>, DirectiveError> {
    value
        .split_whitespace()
        .map(|raw| {
            normalize_class(raw).ok_or_else(|| DirectiveError::InvalidOption {
                name: "class",
                value: raw.to_owned(),
                expected: "a name that can be made into a CSS class".to_owned(),
            })
        })
        .collect()
}

/// Normalize a name into a CSS identifier.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, then strips leading digits and hyphens and trailing hyphens.
/// Returns `None` if nothing is left.
#[must_use]
pub fn normalize_class(name: &str) -> Option<String> {
    let mut id = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else {
            pending_dash = true;
        }
    }

    let id = id.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-');
    if id.is_empty() {
        None
    } else {
        Some(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(pairs: &[(&str, &str)]) -> Result<DirectiveOptions, DirectiveError> {
        DirectiveOptions::parse(pairs)
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse(&[
            ("filename", "seq.puml"),
            ("type", "plantuml"),
            ("format", "png"),
            ("align", "center"),
            ("caption", "A sequence"),
            ("class", "wide Dark_Mode"),
        ])
        .unwrap();

        assert_eq!(
            options,
            DirectiveOptions {
                filename: Some("seq.puml".to_owned()),
                diagram_type: Some(DiagramType::PlantUml),
                output_format: Some(OutputFormat::Png),
                align: Some(Align::Center),
                caption: Some("A sequence".to_owned()),
                classes: vec!["wide".to_owned(), "dark-mode".to_owned()],
            }
        );
    }

    #[test]
    fn test_parse_no_options() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(
            DirectiveOptions::parse(&pairs).unwrap(),
            DirectiveOptions::default()
        );
    }

    #[test]
    fn test_invalid_type_lists_choices() {
        let err = parse(&[("type", "uml")]).unwrap_err();

        assert!(matches!(err, DirectiveError::InvalidOption { name: "type", .. }));
        let msg = err.to_string();
        assert!(msg.contains("\"uml\""), "{msg}");
        assert!(msg.contains("plantuml"), "{msg}");
    }

    #[test]
    fn test_invalid_format() {
        let err = parse(&[("format", "pdf")]).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidOption { name: "format", .. }));
    }

    #[test]
    fn test_invalid_align() {
        let err = parse(&[("align", "justify")]).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidOption { name: "align", .. }));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse(&[("width", "100")]).unwrap_err();
        assert!(matches!(err, DirectiveError::UnknownOption(name) if name == "width"));
    }

    #[test]
    fn test_duplicate_option() {
        let err = parse(&[("caption", "a"), ("caption", "b")]).unwrap_err();
        assert!(matches!(err, DirectiveError::DuplicateOption(name) if name == "caption"));
    }

    #[test]
    fn test_normalize_class() {
        assert_eq!(normalize_class("wide"), Some("wide".to_owned()));
        assert_eq!(normalize_class("Dark_Mode"), Some("dark-mode".to_owned()));
        assert_eq!(normalize_class("a..b"), Some("a-b".to_owned()));
        assert_eq!(normalize_class("2col"), Some("col".to_owned()));
        assert_eq!(normalize_class("-x-"), Some("x".to_owned()));
        assert_eq!(normalize_class("123"), None);
        assert_eq!(normalize_class("!!"), None);
    }

    #[test]
    fn test_unusable_class_is_rejected() {
        let err = parse(&[("class", "ok 42")]).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidOption { name: "class", .. }));
    }
}
