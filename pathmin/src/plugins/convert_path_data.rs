// this_file: pathmin/src/plugins/convert_path_data.rs

//! Convert path data to relative or absolute whichever is shorter,
//! collapse redundant segments, simplify curves and round coordinates
//! with bounded error.

use crate::ast::{Document, Element, Node};
use crate::path::convert::{self, Options, Precision};
use crate::path::format::FormatOptions;
use crate::path::geometry::MakeArcs;
use crate::path::Path;
use crate::plugin::{Plugin, PluginInfo, PluginResult};
use crate::style::{StyleInfo, StyleResolver};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements whose `d` attribute holds path data.
static PATH_ELEMENTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["path", "glyph", "missing-glyph"]));

/// Options forwarded to a transform-flattening hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub apply_transforms_stroked: bool,
    pub transform_precision: i32,
}

/// A host-installed pass that folds the `transform` attribute into the
/// path data before optimization.
pub type TransformHook = Box<dyn Fn(&mut Element, &TransformOptions) + Send + Sync>;

/// Plugin for optimizing path data
pub struct ConvertPathDataPlugin {
    transform_hook: Option<TransformHook>,
}

impl ConvertPathDataPlugin {
    pub fn new() -> Self {
        Self {
            transform_hook: None,
        }
    }

    /// Installs the transform-flattening collaborator.
    pub fn with_transform_hook(mut self, hook: TransformHook) -> Self {
        self.transform_hook = Some(hook);
        self
    }
}

impl Default for ConvertPathDataPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the path data pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertPathDataParams {
    pub apply_transforms: bool,
    pub apply_transforms_stroked: bool,
    pub make_arcs: Option<MakeArcs>,
    pub straight_curves: bool,
    pub convert_to_q: bool,
    pub line_shorthands: bool,
    pub collapse_repeated: bool,
    pub curve_smooth_shorthands: bool,
    pub convert_to_z: bool,
    pub remove_useless: bool,
    pub smart_arc_rounding: bool,
    pub utilize_absolute: bool,
    pub force_absolute_path: bool,
    pub float_precision: Precision,
    pub transform_precision: i32,
    pub leading_zero: bool,
    pub negative_extra_space: bool,
    pub no_space_after_flags: bool,
}

impl Default for ConvertPathDataParams {
    fn default() -> Self {
        Self {
            apply_transforms: true,
            apply_transforms_stroked: true,
            make_arcs: Some(MakeArcs::default()),
            straight_curves: true,
            convert_to_q: true,
            line_shorthands: true,
            collapse_repeated: true,
            curve_smooth_shorthands: true,
            convert_to_z: true,
            remove_useless: true,
            smart_arc_rounding: true,
            utilize_absolute: true,
            force_absolute_path: false,
            float_precision: Precision::Enabled(3),
            transform_precision: 5,
            leading_zero: true,
            negative_extra_space: true,
            no_space_after_flags: false,
        }
    }
}

impl ConvertPathDataParams {
    /// Parses parameters from a JSON value.
    pub fn from_value(value: Option<&Value>) -> Self {
        let mut params = Self::default();
        let Some(Value::Object(map)) = value else {
            return params;
        };

        if let Some(Value::Bool(v)) = map.get("applyTransforms") {
            params.apply_transforms = *v;
        }
        if let Some(Value::Bool(v)) = map.get("applyTransformsStroked") {
            params.apply_transforms_stroked = *v;
        }
        match map.get("makeArcs") {
            Some(Value::Bool(false)) => params.make_arcs = None,
            Some(Value::Object(arcs)) => {
                let mut make_arcs = MakeArcs::default();
                if let Some(threshold) = arcs.get("threshold").and_then(Value::as_f64) {
                    make_arcs.threshold = threshold;
                }
                if let Some(tolerance) = arcs.get("tolerance").and_then(Value::as_f64) {
                    make_arcs.tolerance = tolerance;
                }
                params.make_arcs = Some(make_arcs);
            }
            _ => {}
        }
        if let Some(Value::Bool(v)) = map.get("straightCurves") {
            params.straight_curves = *v;
        }
        if let Some(Value::Bool(v)) = map.get("convertToQ") {
            params.convert_to_q = *v;
        }
        if let Some(Value::Bool(v)) = map.get("lineShorthands") {
            params.line_shorthands = *v;
        }
        if let Some(Value::Bool(v)) = map.get("collapseRepeated") {
            params.collapse_repeated = *v;
        }
        if let Some(Value::Bool(v)) = map.get("curveSmoothShorthands") {
            params.curve_smooth_shorthands = *v;
        }
        if let Some(Value::Bool(v)) = map.get("convertToZ") {
            params.convert_to_z = *v;
        }
        if let Some(Value::Bool(v)) = map.get("removeUseless") {
            params.remove_useless = *v;
        }
        if let Some(Value::Bool(v)) = map.get("smartArcRounding") {
            params.smart_arc_rounding = *v;
        }
        if let Some(Value::Bool(v)) = map.get("utilizeAbsolute") {
            params.utilize_absolute = *v;
        }
        if let Some(Value::Bool(v)) = map.get("forceAbsolutePath") {
            params.force_absolute_path = *v;
        }
        match map.get("floatPrecision") {
            Some(Value::Bool(false)) => params.float_precision = Precision::Disabled,
            Some(Value::Number(n)) => {
                if let Some(digits) = n.as_i64() {
                    params.float_precision = Precision::Enabled(digits as i32);
                }
            }
            _ => {}
        }
        if let Some(Value::Number(n)) = map.get("transformPrecision") {
            if let Some(digits) = n.as_i64() {
                params.transform_precision = digits as i32;
            }
        }
        if let Some(Value::Bool(v)) = map.get("leadingZero") {
            params.leading_zero = *v;
        }
        if let Some(Value::Bool(v)) = map.get("negativeExtraSpace") {
            params.negative_extra_space = *v;
        }
        if let Some(Value::Bool(v)) = map.get("noSpaceAfterFlags") {
            params.no_space_after_flags = *v;
        }
        params
    }

    /// The pipeline options these parameters describe.
    pub fn options(&self) -> Options {
        Options {
            make_arcs: self.make_arcs,
            precision: self.float_precision,
            straight_curves: self.straight_curves,
            convert_to_q: self.convert_to_q,
            line_shorthands: self.line_shorthands,
            collapse_repeated: self.collapse_repeated,
            curve_smooth_shorthands: self.curve_smooth_shorthands,
            convert_to_z: self.convert_to_z,
            remove_useless: self.remove_useless,
            smart_arc_rounding: self.smart_arc_rounding,
            utilize_absolute: self.utilize_absolute,
            force_absolute_path: self.force_absolute_path,
            format: FormatOptions {
                leading_zero: self.leading_zero,
                negative_extra_space: self.negative_extra_space,
                no_space_after_flags: self.no_space_after_flags,
            },
        }
    }
}

impl Plugin for ConvertPathDataPlugin {
    fn name(&self) -> &'static str {
        "convertPathData"
    }

    fn description(&self) -> &'static str {
        "optimizes path data: writes in shorter form, applies transformations"
    }

    fn apply(
        &mut self,
        document: &mut Document,
        _plugin_info: &PluginInfo,
        params: Option<&Value>,
    ) -> PluginResult<()> {
        let params = ConvertPathDataParams::from_value(params);
        let mut resolver = StyleResolver::new(has_stylesheet(&document.root));
        visit(
            &mut document.root,
            &params,
            self.transform_hook.as_ref(),
            &mut resolver,
        );
        Ok(())
    }
}

fn visit(
    element: &mut Element,
    params: &ConvertPathDataParams,
    hook: Option<&TransformHook>,
    resolver: &mut StyleResolver,
) {
    resolver.push(element);
    if PATH_ELEMENTS.contains(element.name.as_str()) && element.has_attr("d") {
        if params.apply_transforms && element.has_attr("transform") {
            if let Some(hook) = hook {
                hook(
                    element,
                    &TransformOptions {
                        apply_transforms_stroked: params.apply_transforms_stroked,
                        transform_precision: params.transform_precision,
                    },
                );
            }
        }
        optimize_element(element, params, resolver);
    }
    for child in &mut element.children {
        if let Node::Element(child) = child {
            visit(child, params, hook, resolver);
        }
    }
    resolver.pop();
}

fn optimize_element(element: &mut Element, params: &ConvertPathDataParams, resolver: &StyleResolver) {
    let Some(data) = element.attr("d").cloned() else {
        return;
    };
    match Path::parse(&data) {
        Ok(path) => {
            let info = StyleInfo::gather(resolver);
            let optimized = convert::run(path, &params.options(), &info);
            if optimized != data {
                log::debug!(
                    "convertPathData: {} bytes -> {} bytes",
                    data.len(),
                    optimized.len()
                );
            }
            element.set_attr("d".to_string(), optimized);
        }
        Err(error) => {
            log::warn!("convertPathData: leaving unparseable path data untouched: {error}");
        }
    }
}

fn has_stylesheet(element: &Element) -> bool {
    if element.name == "style"
        && element.children.iter().any(|child| match child {
            Node::Text(text) => !text.trim().is_empty(),
            Node::CData(cdata) => !cdata.trim().is_empty(),
            _ => false,
        })
    {
        return true;
    }
    element.child_elements().any(has_stylesheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(svg: &str, params: Option<Value>) -> Document {
        let mut document = crate::parser::parse_svg(svg).unwrap();
        let mut plugin = ConvertPathDataPlugin::new();
        plugin
            .apply(&mut document, &PluginInfo::default(), params.as_ref())
            .unwrap();
        document
    }

    fn first_d(document: &Document) -> String {
        fn find(element: &Element) -> Option<String> {
            if let Some(d) = element.attr("d") {
                return Some(d.clone());
            }
            element.child_elements().find_map(find)
        }
        find(&document.root).unwrap()
    }

    #[test]
    fn test_optimizes_path_elements() {
        let document = apply(r#"<svg><path d="M 10,10 L 20,20"/></svg>"#, None);
        assert_eq!(first_d(&document), "M10 10l10 10");
    }

    #[test]
    fn test_converts_to_z_without_stroke() {
        let document = apply(r#"<svg><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/></svg>"#, None);
        assert_eq!(first_d(&document), "M0 0h50v50H0z");
    }

    #[test]
    fn test_stroke_blocks_z_conversion() {
        let document = apply(
            r#"<svg><path stroke="red" d="M0 0 L50 0 L50 50 L0 50 L0 0"/></svg>"#,
            None,
        );
        assert_eq!(first_d(&document), "M0 0h50v50H0V0");
    }

    #[test]
    fn test_inherited_stroke_from_group() {
        // the round cap inherited from the group keeps the zero segment
        let document = apply(
            r#"<svg><g stroke="red" stroke-linecap="round"><path d="M0 0 l5 5 l0 0"/></g></svg>"#,
            None,
        );
        assert_eq!(first_d(&document), "M0 0l5 5h0");
    }

    #[test]
    fn test_float_precision_false_disables_rounding() {
        let document = apply(
            r#"<svg><path d="M0 0 L10.12345 0.98765"/></svg>"#,
            Some(json!({"floatPrecision": false})),
        );
        assert_eq!(first_d(&document), "M0 0l10.12345.98765");
    }

    #[test]
    fn test_unparseable_path_is_left_alone() {
        let document = apply(r#"<svg><path d="banana"/></svg>"#, None);
        assert_eq!(first_d(&document), "banana");
    }

    #[test]
    fn test_non_path_elements_untouched() {
        let document = apply(r#"<svg><rect d="M 10,10 L 20,20"/></svg>"#, None);
        assert_eq!(first_d(&document), "M 10,10 L 20,20");
    }

    #[test]
    fn test_glyph_elements_are_optimized() {
        let document = apply(r#"<svg><glyph d="M 0,0 L 10,0"/></svg>"#, None);
        assert_eq!(first_d(&document), "M0 0h10");
    }

    #[test]
    fn test_stylesheet_forces_conservative_choices() {
        let document = apply(
            r#"<svg><style>.a{stroke:red}</style><path d="M0 0 h50 v50 h-50 v-50"/></svg>"#,
            None,
        );
        // a stylesheet may add a stroke, so the closing line survives
        assert_eq!(first_d(&document), "M0 0h50v50H0V0");
    }

    #[test]
    fn test_transform_hook_runs_before_optimization() {
        let mut document = crate::parser::parse_svg(
            r#"<svg><path transform="translate(5)" d="M0 0 h10"/></svg>"#,
        )
        .unwrap();
        let mut plugin = ConvertPathDataPlugin::new().with_transform_hook(Box::new(
            |element: &mut Element, options: &TransformOptions| {
                assert_eq!(options.transform_precision, 5);
                element.remove_attr("transform");
                element.set_attr("d".to_string(), "M5 0 h10".to_string());
            },
        ));
        plugin
            .apply(&mut document, &PluginInfo::default(), None)
            .unwrap();
        let path = document.root.child_elements().next().unwrap();
        assert!(!path.has_attr("transform"));
        assert_eq!(path.attr("d"), Some(&"M5 0h10".to_string()));
    }

    #[test]
    fn test_markers_only_path_gets_a_closepath() {
        let document = apply(
            r#"<svg><path marker-start="url(#m)" d="M0 0 l0.0001 0"/></svg>"#,
            None,
        );
        assert_eq!(first_d(&document), "M0 0z");
    }
}
