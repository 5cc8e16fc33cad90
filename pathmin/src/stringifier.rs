// this_file: pathmin/src/stringifier.rs

//! Writes the document tree back to SVG text.

use crate::ast::{Document, Element, Node};
use crate::config::{Js2SvgOptions, LineEnding};
use std::fmt::Write;
use thiserror::Error;

/// Stringifier error types
#[derive(Error, Debug)]
pub enum StringifyError {
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Stringify result type
pub type StringifyResult<T> = Result<T, StringifyError>;

/// SVG stringifier with configurable output options.
pub struct Stringifier {
    pretty: bool,
    indent: String,
    self_closing: bool,
    eol: LineEnding,
    final_newline: bool,
}

impl Stringifier {
    pub fn new() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            self_closing: true,
            eol: LineEnding::default(),
            final_newline: false,
        }
    }

    /// Builds a stringifier from output options.
    pub fn from_options(options: &Js2SvgOptions) -> Self {
        Self {
            pretty: options.pretty,
            indent: " ".repeat(options.indent),
            self_closing: options.self_closing,
            eol: options.eol,
            final_newline: options.final_newline,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = " ".repeat(spaces);
        self
    }

    pub fn self_closing(mut self, self_closing: bool) -> Self {
        self.self_closing = self_closing;
        self
    }

    /// Serializes a document.
    pub fn stringify(&self, document: &Document) -> StringifyResult<String> {
        let mut out = String::new();
        if let Some(declaration) = &document.declaration {
            match &declaration.encoding {
                Some(encoding) => write!(
                    out,
                    r#"<?xml version="{}" encoding="{}"?>"#,
                    declaration.version, encoding
                )?,
                None => write!(out, r#"<?xml version="{}"?>"#, declaration.version)?,
            }
            if self.pretty {
                out.push_str(self.eol.as_str());
            }
        }
        for node in &document.prologue {
            self.write_node(node, &mut out, 0)?;
            if self.pretty {
                out.push_str(self.eol.as_str());
            }
        }
        self.write_element(&document.root, &mut out, 0)?;
        for node in &document.epilogue {
            if self.pretty {
                out.push_str(self.eol.as_str());
            }
            self.write_node(node, &mut out, 0)?;
        }
        if self.final_newline && !out.ends_with('\n') {
            out.push_str(self.eol.as_str());
        }
        Ok(out)
    }

    fn write_element(
        &self,
        element: &Element,
        out: &mut String,
        depth: usize,
    ) -> StringifyResult<()> {
        write!(out, "<{}", element.name)?;
        for (name, value) in &element.attributes {
            write!(out, r#" {}="{}""#, name, escape_attribute(value))?;
        }
        if element.children.is_empty() {
            if self.self_closing {
                out.push_str("/>");
            } else {
                write!(out, "></{}>", element.name)?;
            }
            return Ok(());
        }
        out.push('>');
        let element_children_only = element.children.iter().all(Node::is_element);
        for child in &element.children {
            if self.pretty && element_children_only {
                out.push_str(self.eol.as_str());
                for _ in 0..=depth {
                    out.push_str(&self.indent);
                }
            }
            self.write_node(child, out, depth + 1)?;
        }
        if self.pretty && element_children_only {
            out.push_str(self.eol.as_str());
            for _ in 0..depth {
                out.push_str(&self.indent);
            }
        }
        write!(out, "</{}>", element.name)?;
        Ok(())
    }

    fn write_node(&self, node: &Node, out: &mut String, depth: usize) -> StringifyResult<()> {
        match node {
            Node::Element(element) => self.write_element(element, out, depth)?,
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(comment) => write!(out, "<!--{comment}-->")?,
            Node::CData(cdata) => write!(out, "<![CDATA[{cdata}]]>")?,
            Node::ProcessingInstruction { target, data } => {
                if data.is_empty() {
                    write!(out, "<?{target}?>")?;
                } else {
                    write!(out, "<?{target} {data}?>")?;
                }
            }
            Node::DocType(doctype) => write!(out, "<!DOCTYPE{doctype}>")?,
        }
        Ok(())
    }
}

impl Default for Stringifier {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
