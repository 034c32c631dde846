//! reST-style `kroki` block scanner.
//!
//! Recognizes:
//!
//! ```text
//! .. kroki:: [argument ...]
//!    :option: value
//!    :flag:
//!
//!    content, indented past the marker
//! ```
//!
//! The block ends at the first non-blank line indented no deeper than the
//! `..` marker. Trailing blank lines stay outside the block. The directive
//! name is matched case-insensitively and tabs in indentation advance to the
//! next multiple of 8 columns.

use std::borrow::Cow;
use std::ops::Range;

use crate::parser::DirectiveInput;

const MARKER: &str = ".. kroki::";

const TAB_WIDTH: usize = 8;

/// A `kroki` block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
    /// Line of the marker (1-indexed).
    pub line: usize,
    /// Indentation of the marker, in columns.
    pub indent: usize,
    /// Byte range of the whole block, including its final newline.
    pub span: Range<usize>,
    pub input: DirectiveInput,
}

struct Line<'a> {
    offset: usize,
    /// Line text without its terminator.
    text: &'a str,
    /// Line length including its terminator.
    len: usize,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        indent_width(self.text)
    }
}

/// Width of the leading whitespace in columns.
fn indent_width(text: &str) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - width % TAB_WIDTH,
            _ => break,
        }
    }
    width
}

/// Replace tabs in the leading whitespace with spaces.
fn expand_indent(text: &str) -> Cow<'_, str> {
    let body = text.trim_start_matches([' ', '\t']);
    let lead = &text[..text.len() - body.len()];
    if lead.contains('\t') {
        Cow::Owned(format!("{}{body}", " ".repeat(indent_width(lead))))
    } else {
        Cow::Borrowed(text)
    }
}

/// Find every `kroki` block in `text`, in document order.
#[must_use]
pub fn scan(text: &str) -> Vec<DirectiveBlock> {
    let mut offset = 0;
    let lines: Vec<Line<'_>> = text
        .split_inclusive('\n')
        .map(|raw| {
            let line = Line {
                offset,
                text: raw.trim_end_matches(['\n', '\r']),
                len: raw.len(),
            };
            offset += raw.len();
            line
        })
        .collect();

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        let indent = line.indent();
        let Some(arguments) = marker_arguments(line.text.trim_start_matches([' ', '\t'])) else {
            i += 1;
            continue;
        };

        let mut end = i + 1;
        let mut j = i + 1;
        while j < lines.len() {
            if lines[j].is_blank() {
                j += 1;
            } else if lines[j].indent() > indent {
                j += 1;
                end = j;
            } else {
                break;
            }
        }

        let (options, content) = parse_body(&lines[i + 1..end]);
        let last = &lines[end - 1];
        blocks.push(DirectiveBlock {
            line: i + 1,
            indent,
            span: line.offset..last.offset + last.len,
            input: DirectiveInput {
                arguments,
                options,
                content,
            },
        });
        i = end;
    }

    blocks
}

/// Arguments after the marker, or `None` if the line is not a `kroki` marker.
fn marker_arguments(line: &str) -> Option<Vec<String>> {
    let head = line.get(..MARKER.len())?;
    if !head.eq_ignore_ascii_case(MARKER) {
        return None;
    }
    let rest = &line[MARKER.len()..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.split_whitespace().map(str::to_owned).collect())
}

/// Split a block body into its option list and dedented content.
fn parse_body(body: &[Line<'_>]) -> (Vec<(String, String)>, String) {
    let mut options: Vec<(String, String)> = Vec::new();
    let mut k = 0;
    let mut option_indent = 0;

    while k < body.len() && !body[k].is_blank() {
        let line = &body[k];
        let trimmed = line.text.trim_start();
        if let Some(option) = parse_option(trimmed) {
            option_indent = line.indent();
            options.push(option);
        } else if let Some((_, value)) = options.last_mut()
            && line.indent() > option_indent
        {
            // Continuation of a wrapped option value
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(trimmed.trim_end());
        } else {
            break;
        }
        k += 1;
    }

    let content_lines: Vec<&str> = body[k..]
        .iter()
        .skip_while(|line| line.is_blank())
        .map(|line| line.text)
        .collect();
    (options, dedent(&content_lines))
}

/// Parse `:name: value` (value may be empty).
fn parse_option(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(':')?;
    let close = rest.find(':')?;
    let name = &rest[..close];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    let value = &rest[close + 1..];
    if !value.is_empty() && !value.starts_with(char::is_whitespace) {
        return None;
    }
    Some((name.to_owned(), value.trim().to_owned()))
}

/// Remove the common indentation of non-blank lines and join with `\n`.
fn dedent(lines: &[&str]) -> String {
    let lines: Vec<Cow<'_, str>> = lines.iter().map(|line| expand_indent(line)).collect();
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(common..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_scan_block_with_options_and_content() {
        let text = "\
Title
=====

.. kroki:: mermaid svg
   :caption: Hello
   :align: center

   sequenceDiagram
     A->>B: hi

After.
";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.line, 4);
        assert_eq!(block.indent, 0);
        assert_eq!(block.input.arguments, vec!["mermaid", "svg"]);
        assert_eq!(
            block.input.options,
            owned(&[("caption", "Hello"), ("align", "center")])
        );
        assert_eq!(block.input.content, "sequenceDiagram\n  A->>B: hi");
        assert_eq!(
            &text[block.span.clone()],
            "\
.. kroki:: mermaid svg
   :caption: Hello
   :align: center

   sequenceDiagram
     A->>B: hi
"
        );
    }

    #[test]
    fn test_scan_arguments_only() {
        let text = ".. kroki:: diagrams/seq.puml\n\nText\n";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].input.arguments, vec!["diagrams/seq.puml"]);
        assert!(blocks[0].input.options.is_empty());
        assert_eq!(blocks[0].input.content, "");
        assert_eq!(&text[blocks[0].span.clone()], ".. kroki:: diagrams/seq.puml\n");
    }

    #[test]
    fn test_scan_content_without_options() {
        let text = ".. kroki:: ditaa\n\n    +--+\n    |  |\n    +--+\n";
        let blocks = scan(text);

        assert_eq!(blocks[0].input.content, "+--+\n|  |\n+--+");
        assert_eq!(blocks[0].span, 0..text.len());
    }

    #[test]
    fn test_scan_indented_block() {
        let text = "- item\n\n  .. kroki:: graphviz\n\n     digraph { a -> b }\n\n- next\n";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].indent, 2);
        assert_eq!(blocks[0].line, 3);
        assert_eq!(blocks[0].input.content, "digraph { a -> b }");
    }

    #[test]
    fn test_scan_multiple_blocks() {
        let text = ".. kroki:: a.puml\n.. kroki:: b.puml\n";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].line, 1);
        assert_eq!(blocks[1].line, 2);
        assert_eq!(blocks[1].input.arguments, vec!["b.puml"]);
    }

    #[test]
    fn test_scan_flag_and_wrapped_option() {
        let text = ".. kroki::\n   :type: mermaid\n   :caption: A long\n      caption\n   :class:\n\n   A->B: hi\n";
        let blocks = scan(text);

        assert_eq!(
            blocks[0].input.options,
            owned(&[
                ("type", "mermaid"),
                ("caption", "A long caption"),
                ("class", "")
            ])
        );
        assert!(blocks[0].input.arguments.is_empty());
    }

    #[test]
    fn test_scan_ignores_other_directives() {
        let text = ".. image:: x.png\n.. krokiish:: x\n.. note::\n\n   .. kroki is mentioned\n";
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_scan_crlf() {
        let text = ".. kroki:: mermaid\r\n\r\n   A->B: hi\r\n";
        let blocks = scan(text);

        assert_eq!(blocks[0].input.content, "A->B: hi");
        assert_eq!(blocks[0].span, 0..text.len());
    }

    #[test]
    fn test_scan_tab_indented_content() {
        let text = ".. kroki:: mermaid\n\n\tA->B: hi\n\t  B->A: ok\n\nAfter\n";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].input.content, "A->B: hi\n  B->A: ok");
        assert_eq!(
            &text[blocks[0].span.clone()],
            ".. kroki:: mermaid\n\n\tA->B: hi\n\t  B->A: ok\n"
        );
    }

    #[test]
    fn test_scan_mixed_tab_and_space_indentation() {
        // A tab after four spaces reaches column 8, same as eight spaces
        let text = ".. kroki:: ditaa\n\n        +--+\n    \t|  |\n";
        let blocks = scan(text);

        assert_eq!(blocks[0].input.content, "+--+\n|  |");
    }

    #[test]
    fn test_scan_directive_name_is_case_insensitive() {
        let text = ".. Kroki:: mermaid\n\n   A->B: hi\n\n.. KROKI:: b.puml\n";
        let blocks = scan(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].input.arguments, vec!["mermaid"]);
        assert_eq!(blocks[0].input.content, "A->B: hi");
        assert_eq!(blocks[1].input.arguments, vec!["b.puml"]);
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("abc"), 0);
        assert_eq!(indent_width("   x"), 3);
        assert_eq!(indent_width("\tx"), 8);
        assert_eq!(indent_width("  \tx"), 8);
        assert_eq!(indent_width("\t  x"), 10);
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option(":align: left"),
            Some(("align".to_owned(), "left".to_owned()))
        );
        assert_eq!(
            parse_option(":class:"),
            Some(("class".to_owned(), String::new()))
        );
        assert_eq!(parse_option("A:B: hi"), None);
        assert_eq!(parse_option(":: x"), None);
        assert_eq!(parse_option(":a b: x"), None);
        assert_eq!(parse_option(":time:12:00"), None);
    }
}
