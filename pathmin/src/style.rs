// this_file: pathmin/src/style.rs

//! Computed-style lookup for the properties the path pass depends on.
//!
//! Resolution covers presentation attributes and inline `style`
//! declarations, inherited down the open element stack. Anything the
//! resolver cannot pin down statically (a document stylesheet, a CSS
//! variable) is reported as dynamic, and every consumer treats dynamic as
//! the pessimistic answer.

use crate::ast::Element;
use std::collections::HashMap;

/// Properties the resolver tracks. All of them inherit.
const TRACKED: [&str; 6] = [
    "marker-start",
    "marker-mid",
    "marker-end",
    "stroke",
    "stroke-linecap",
    "stroke-linejoin",
];

/// A resolved style value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputedValue {
    /// The value is known not to change at runtime.
    Static(String),
    /// The value depends on context that cannot be resolved here.
    Dynamic,
}

impl ComputedValue {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ComputedValue::Dynamic)
    }

    pub fn as_static(&self) -> Option<&str> {
        match self {
            ComputedValue::Static(value) => Some(value),
            ComputedValue::Dynamic => None,
        }
    }
}

/// Scope-stack resolver for the tracked properties.
pub struct StyleResolver {
    scopes: Vec<HashMap<&'static str, String>>,
    has_stylesheet: bool,
}

impl StyleResolver {
    /// `has_stylesheet` forces every lookup to be dynamic: selectors
    /// cannot be matched statically here.
    pub fn new(has_stylesheet: bool) -> Self {
        Self {
            scopes: Vec::new(),
            has_stylesheet,
        }
    }

    /// Opens an element scope. Inline `style` declarations win over
    /// presentation attributes, as in the cascade.
    pub fn push(&mut self, element: &Element) {
        let mut scope = HashMap::new();
        for name in TRACKED {
            if let Some(value) = element.attr(name) {
                scope.insert(name, value.trim().to_string());
            }
        }
        if let Some(style) = element.attr("style") {
            for declaration in style.split(';') {
                let Some((name, value)) = declaration.split_once(':') else {
                    continue;
                };
                if let Some(name) = TRACKED.iter().find(|tracked| **tracked == name.trim()) {
                    scope.insert(*name, value.trim().to_string());
                }
            }
        }
        self.scopes.push(scope);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Resolves a tracked property against the open scopes.
    pub fn computed(&self, name: &str) -> Option<ComputedValue> {
        if self.has_stylesheet {
            return Some(ComputedValue::Dynamic);
        }
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                if value.contains("var(") {
                    return Some(ComputedValue::Dynamic);
                }
                if value == "inherit" {
                    continue;
                }
                return Some(ComputedValue::Static(value.clone()));
            }
        }
        None
    }
}

/// Style-derived permissions for the path rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInfo {
    /// A `marker-start` or `marker-end` applies to the element.
    pub has_marker: bool,
    /// A `marker-mid` applies, so vertices must survive.
    pub has_marker_mid: bool,
    /// A stroke may be painted.
    pub maybe_has_stroke: bool,
    /// A non-butt line cap may render zero-length segments.
    pub maybe_has_linecap: bool,
    /// Closing with `z` cannot change how joins and caps render.
    pub is_safe_to_use_z: bool,
}

impl StyleInfo {
    /// Derives the flag set from resolved styles.
    pub fn gather(resolver: &StyleResolver) -> Self {
        let has_marker = resolver.computed("marker-start").is_some()
            || resolver.computed("marker-end").is_some();
        let has_marker_mid = resolver.computed("marker-mid").is_some();

        let stroke = resolver.computed("stroke");
        let maybe_has_stroke = stroke
            .as_ref()
            .is_some_and(|value| value.is_dynamic() || value.as_static() != Some("none"));

        let linecap = resolver.computed("stroke-linecap");
        let maybe_has_linecap = linecap
            .as_ref()
            .is_some_and(|value| value.is_dynamic() || value.as_static() != Some("butt"));

        let linejoin = resolver.computed("stroke-linejoin");
        let is_safe_to_use_z = if maybe_has_stroke {
            linecap.as_ref().and_then(ComputedValue::as_static) == Some("round")
                && linejoin.as_ref().and_then(ComputedValue::as_static) == Some("round")
        } else {
            true
        };

        Self {
            has_marker,
            has_marker_mid,
            maybe_has_stroke,
            maybe_has_linecap,
            is_safe_to_use_z,
        }
    }

    /// The safe assumption set when no context is available.
    pub fn conservative() -> Self {
        Self {
            has_marker: true,
            has_marker_mid: true,
            maybe_has_stroke: true,
            maybe_has_linecap: true,
            is_safe_to_use_z: false,
        }
    }

    /// The permissive set for bare path data with no styling at all.
    pub fn unstyled() -> Self {
        Self {
            has_marker: false,
            has_marker_mid: false,
            maybe_has_stroke: false,
            maybe_has_linecap: false,
            is_safe_to_use_z: true,
        }
    }

    /// Zero-length segments may still paint line caps.
    pub fn maybe_has_stroke_and_linecap(&self) -> bool {
        self.maybe_has_stroke && self.maybe_has_linecap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Element;

    fn element(attrs: &[(&str, &str)]) -> Element {
        let mut element = Element::new("path");
        for (name, value) in attrs {
            element.set_attr(name.to_string(), value.to_string());
        }
        element
    }

    #[test]
    fn test_unstyled_path_is_fully_permissive() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[]));
        let info = StyleInfo::gather(&resolver);
        assert!(!info.maybe_has_stroke);
        assert!(!info.has_marker);
        assert!(info.is_safe_to_use_z);
    }

    #[test]
    fn test_stroke_none_counts_as_no_stroke() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[("stroke", "none")]));
        let info = StyleInfo::gather(&resolver);
        assert!(!info.maybe_has_stroke);
        assert!(info.is_safe_to_use_z);
    }

    #[test]
    fn test_stroke_without_round_joins_is_unsafe_for_z() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[("stroke", "red")]));
        let info = StyleInfo::gather(&resolver);
        assert!(info.maybe_has_stroke);
        assert!(!info.is_safe_to_use_z);
    }

    #[test]
    fn test_round_caps_and_joins_make_z_safe() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[
            ("stroke", "red"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ]));
        let info = StyleInfo::gather(&resolver);
        assert!(info.maybe_has_stroke);
        assert!(info.maybe_has_linecap);
        assert!(info.is_safe_to_use_z);
    }

    #[test]
    fn test_inline_style_wins_over_attribute() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[
            ("stroke", "red"),
            ("style", "stroke: none; stroke-linecap : square"),
        ]));
        assert_eq!(
            resolver.computed("stroke"),
            Some(ComputedValue::Static("none".to_string()))
        );
        assert_eq!(
            resolver.computed("stroke-linecap"),
            Some(ComputedValue::Static("square".to_string()))
        );
    }

    #[test]
    fn test_properties_inherit_through_the_stack() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[("marker-mid", "url(#dot)")]));
        resolver.push(&element(&[]));
        let info = StyleInfo::gather(&resolver);
        assert!(info.has_marker_mid);
        resolver.pop();
        resolver.pop();
        assert_eq!(resolver.computed("marker-mid"), None);
    }

    #[test]
    fn test_stylesheet_forces_dynamic() {
        let mut resolver = StyleResolver::new(true);
        resolver.push(&element(&[]));
        assert_eq!(resolver.computed("stroke"), Some(ComputedValue::Dynamic));
        let info = StyleInfo::gather(&resolver);
        assert!(info.maybe_has_stroke);
        assert!(!info.is_safe_to_use_z);
    }

    #[test]
    fn test_css_variable_is_dynamic() {
        let mut resolver = StyleResolver::new(false);
        resolver.push(&element(&[("stroke", "var(--accent)")]));
        assert_eq!(resolver.computed("stroke"), Some(ComputedValue::Dynamic));
    }
}
