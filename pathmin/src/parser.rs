// this_file: pathmin/src/parser.rs

//! SVG parser built on quick-xml's streaming reader.

use crate::ast::{Document, Element, Node, XmlDeclaration};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

/// Parse error types
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("attribute error: {0}")]
    Attr(String),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    NoRoot,
}

/// Parse result type
pub type ParseResult<T> = Result<T, ParseError>;

/// Elements whose text content keeps its whitespace.
static TEXT_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from(["text", "tspan", "textPath", "title", "desc", "style", "script", "pre"])
});

/// `<!ENTITY name "value">` declarations inside a DOCTYPE.
static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+(\w+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#).unwrap()
});

/// SVG parser
pub struct Parser {
    preserve_comments: bool,
    expand_entities: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            preserve_comments: true,
            expand_entities: true,
        }
    }

    pub fn preserve_comments(mut self, preserve: bool) -> Self {
        self.preserve_comments = preserve;
        self
    }

    pub fn expand_entities(mut self, expand: bool) -> Self {
        self.expand_entities = expand;
        self
    }

    /// Parses an SVG string into a [`Document`].
    pub fn parse(&self, input: &str) -> ParseResult<Document> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().expand_empty_elements = false;

        let mut document = Document::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut current: Option<Element> = None;
        let mut found_root = false;
        let mut entities: HashMap<String, String> = HashMap::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref start)) => {
                    let element = self.parse_element(start, &entities)?;
                    if let Some(open) = current.take() {
                        stack.push(open);
                    }
                    current = Some(element);
                }
                Ok(Event::Empty(ref start)) => {
                    let element = self.parse_element(start, &entities)?;
                    match current.as_mut() {
                        Some(open) => open.add_child(Node::Element(element)),
                        None => {
                            document.root = element;
                            found_root = true;
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(finished) = current.take() {
                        match stack.pop() {
                            Some(mut parent) => {
                                parent.add_child(Node::Element(finished));
                                current = Some(parent);
                            }
                            None => {
                                document.root = finished;
                                found_root = true;
                            }
                        }
                    }
                }
                Ok(Event::Text(ref text)) => {
                    let raw = std::str::from_utf8(text)?;
                    let unescaped = quick_xml::escape::unescape(raw)
                        .unwrap_or(std::borrow::Cow::Borrowed(raw));
                    let mut content = unescaped.into_owned();
                    if self.expand_entities && !entities.is_empty() {
                        content = expand(&content, &entities);
                    }
                    let Some(open) = current.as_mut() else {
                        continue;
                    };
                    let keep_whitespace = TEXT_ELEMENTS.contains(open.name.as_str());
                    if keep_whitespace || !content.trim().is_empty() {
                        if !keep_whitespace {
                            content = content.trim().to_string();
                        }
                        open.add_child(Node::Text(content));
                    }
                }
                Ok(Event::CData(ref cdata)) => {
                    let content = std::str::from_utf8(cdata)?.to_string();
                    if let Some(open) = current.as_mut() {
                        open.add_child(Node::CData(content));
                    }
                }
                Ok(Event::Comment(ref comment)) => {
                    if self.preserve_comments {
                        let node = Node::Comment(std::str::from_utf8(comment)?.to_string());
                        match current.as_mut() {
                            Some(open) => open.add_child(node),
                            None if !found_root => document.prologue.push(node),
                            None => document.epilogue.push(node),
                        }
                    }
                }
                Ok(Event::PI(ref pi)) => {
                    let content = std::str::from_utf8(pi)?;
                    let (target, data) = match content.split_once(char::is_whitespace) {
                        Some((target, data)) => (target.to_string(), data.to_string()),
                        None => (content.to_string(), String::new()),
                    };
                    let node = Node::ProcessingInstruction { target, data };
                    match current.as_mut() {
                        Some(open) => open.add_child(node),
                        None if !found_root => document.prologue.push(node),
                        None => document.epilogue.push(node),
                    }
                }
                Ok(Event::Decl(ref decl)) => {
                    let version = decl
                        .version()
                        .map(|v| String::from_utf8_lossy(&v).to_string())
                        .unwrap_or_else(|_| "1.0".to_string());
                    let encoding = decl
                        .encoding()
                        .and_then(Result::ok)
                        .map(|e| String::from_utf8_lossy(&e).to_string());
                    document.declaration = Some(XmlDeclaration { version, encoding });
                }
                Ok(Event::DocType(ref doctype)) => {
                    let content = std::str::from_utf8(doctype)?.to_string();
                    if self.expand_entities {
                        for capture in ENTITY_DECL.captures_iter(&content) {
                            let value = capture
                                .get(2)
                                .or_else(|| capture.get(3))
                                .map(|m| m.as_str())
                                .unwrap_or_default();
                            entities.insert(capture[1].to_string(), value.to_string());
                        }
                    }
                    if !found_root {
                        document.prologue.push(Node::DocType(content));
                    }
                }
                Ok(Event::Eof) => break,
                Err(source) => {
                    let position = usize::try_from(reader.buffer_position()).unwrap_or(0);
                    let (line, column) = line_and_column(input, position);
                    return Err(ParseError::Syntax {
                        line,
                        column,
                        message: source.to_string(),
                    });
                }
            }
            buf.clear();
        }

        if !found_root {
            return Err(ParseError::NoRoot);
        }
        Ok(document)
    }

    fn parse_element(
        &self,
        start: &BytesStart,
        entities: &HashMap<String, String>,
    ) -> ParseResult<Element> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut element = Element::new(&name);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| ParseError::Attr(e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
            let mut value = attribute
                .unescape_value()
                .map_err(|e| ParseError::Attr(e.to_string()))?
                .to_string();
            if self.expand_entities && !entities.is_empty() {
                value = expand(&value, entities);
            }
            element.set_attr(key, value);
        }
        Ok(element)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces `&name;` references with their declared values.
fn expand(text: &str, entities: &HashMap<String, String>) -> String {
    let mut result = text.to_string();
    for (name, value) in entities {
        result = result.replace(&format!("&{name};"), value);
    }
    result
}

fn line_and_column(input: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (offset, ch) in input.char_indices() {
        if offset >= position {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Convenience wrapper with default settings.
pub fn parse_svg(input: &str) -> ParseResult<Document> {
    Parser::new().parse(input)
}
