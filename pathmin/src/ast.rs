// this_file: pathmin/src/ast.rs

//! In-memory tree for SVG documents.
//!
//! The tree is built by the parser, mutated by plugins and written back by
//! the stringifier. Attribute order is preserved so untouched documents
//! round-trip cleanly.

use indexmap::IndexMap;

/// A complete SVG document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Nodes before the root element (doctype, comments, PIs).
    pub prologue: Vec<Node>,
    /// The root element, typically `<svg>`.
    pub root: Element,
    /// Nodes after the root element.
    pub epilogue: Vec<Node>,
    /// XML declaration data, when present.
    pub declaration: Option<XmlDeclaration>,
}

/// The `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
}

/// An element with ordered attributes and child nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    ProcessingInstruction { target: String, data: String },
    DocType(String),
}

impl Document {
    pub fn new() -> Self {
        Self {
            prologue: Vec::new(),
            root: Element::new("svg"),
            epilogue: Vec::new(),
            declaration: None,
        }
    }
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&String> {
        self.attributes.get(name)
    }

    pub fn set_attr(&mut self, name: String, value: String) {
        self.attributes.insert(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Child elements only.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }
}

impl Node {
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_operations() {
        let mut element = Element::new("path");
        element.set_attr("d".to_string(), "M0 0".to_string());
        assert!(element.has_attr("d"));
        assert_eq!(element.attr("d"), Some(&"M0 0".to_string()));
        assert_eq!(element.remove_attr("d"), Some("M0 0".to_string()));
        assert!(!element.has_attr("d"));
    }

    #[test]
    fn test_child_element_iteration() {
        let mut group = Element::new("g");
        group.add_child(Node::Element(Element::new("path")));
        group.add_child(Node::Text("text".to_string()));
        group.add_child(Node::Element(Element::new("rect")));
        let names: Vec<&str> = group.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["path", "rect"]);
    }
}
