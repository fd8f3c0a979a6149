//! Pretty-printer from a [`DivisionTree`] back to description text.
//!
//! The output parses back to an equivalent tree. Splitter drags and
//! visibility changes write the tree through here so the stored description
//! always matches what is laid out.

use std::fmt::Write;

use trellis_core::geometry::Axis;

use crate::division::{Division, DivisionId, DivisionKind, Fit};
use crate::tree::DivisionTree;

/// Render the whole tree. The root is written without its brackets.
pub fn print(tree: &DivisionTree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        write_body(tree, root, &mut out);
    }
    out
}

fn write_body(tree: &DivisionTree, id: DivisionId, out: &mut String) {
    let Some(division) = tree.get(id) else {
        return;
    };
    let attributes = attributes(division);
    out.push_str(&attributes.join(" "));
    let children = tree.children(id);
    if !attributes.is_empty() && !children.is_empty() {
        out.push(' ');
    }
    for child in children {
        match tree.get(*child) {
            Some(d) if d.is_splitter() => out.push('|'),
            Some(_) => {
                out.push('<');
                write_body(tree, *child, out);
                out.push('>');
            }
            None => {}
        }
    }
}

fn attributes(division: &Division) -> Vec<String> {
    let mut attrs = Vec::new();
    if let Some(name) = division.name() {
        attrs.push(name.to_string());
    }

    match division.kind.layout() {
        DivisionKind::Arrange(Axis::Vertical) => attrs.push("vert".into()),
        DivisionKind::Grid {
            columns,
            rows,
            collapses,
        } => {
            attrs.push(match (*columns, *rows) {
                (1, 1) => "grid".into(),
                (c, r) if c == r => format!("grid={}", c),
                (c, r) => format!("grid=[{},{}]", c, r),
            });
            for c in collapses {
                attrs.push(format!(
                    "collapse({},{},{},{})",
                    c.x, c.y, c.width, c.height
                ));
            }
        }
        DivisionKind::Dock => attrs.push("dock".into()),
        DivisionKind::Switchable => attrs.push("switchable".into()),
        DivisionKind::Arrange(Axis::Horizontal)
        | DivisionKind::DockPane(_)
        | DivisionKind::Splitter => {}
    }

    if let Some(side) = division.side {
        attrs.push(side.as_str().into());
    }

    if !division.weight.is_none() {
        let keyword = match division.weight_axis {
            Some(Axis::Horizontal) => "width",
            Some(Axis::Vertical) => "height",
            None => "weight",
        };
        attrs.push(format!("{}={}", keyword, division.weight));
    }
    if !division.min_px.is_none() {
        attrs.push(format!("min={}", division.min_px));
    }
    if !division.max_px.is_none() {
        attrs.push(format!("max={}", division.max_px));
    }
    if !division.margin.is_empty() {
        attrs.push(format!("margin={}", division.margin));
    }
    if !division.gap.is_empty() {
        attrs.push(format!("gap={}", division.gap));
    }
    if !division.arrange.is_empty() {
        attrs.push(format!("arrange={}", division.arrange));
    }
    write_fit(division, &mut attrs);

    if !division.kind.is_dock_pane() {
        if !division.display {
            attrs.push("undisplayed".into());
        } else if !division.visible {
            attrs.push("invisible".into());
        }
    }
    attrs
}

fn write_fit(division: &Division, attrs: &mut Vec<String>) {
    let parameters = &division.fit_parameters;
    if division.fit == Fit::BOTH && parameters.is_empty() {
        attrs.push("fit".into());
        return;
    }
    let mut pending = (!parameters.is_empty()).then(|| parameters.to_string());
    for (flag, keyword) in [(Fit::HORIZONTAL, "hfit"), (Fit::VERTICAL, "vfit")] {
        if !division.fit.contains(flag) {
            continue;
        }
        let mut attr = keyword.to_string();
        if let Some(value) = pending.take() {
            let _ = write!(attr, "={}", value);
        }
        attrs.push(attr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn reprint(source: &str) -> String {
        print(&parse(source).expect("parse"))
    }

    #[test]
    fn test_simple_row() {
        assert_eq!(reprint("<a weight=30%><b>"), "<a weight=30%><b>");
        assert_eq!(reprint("  <a>  |  <b min=20 max=80>"), "<a>|<b min=20 max=80>");
    }

    #[test]
    fn test_root_attributes_and_kinds() {
        assert_eq!(
            reprint("vert margin=[5,10] <g grid=[3,2] collapse(0,0,2,1)><s switchable>"),
            "vert margin=[5,10] <g grid=[3,2] collapse(0,0,2,1)><s switchable>"
        );
        assert_eq!(reprint("<g grid=[2]>"), "<g grid=2>");
    }

    #[test]
    fn test_dock_panes_skip_undisplayed() {
        assert_eq!(
            reprint("<d dock <p right width=120>>"),
            "<d dock <p right width=120>>"
        );
        assert_eq!(
            reprint("<d dock <p left vert <x>|<y>>>"),
            "<d dock <p vert left <x>|<y>>>"
        );
    }

    #[test]
    fn test_fit_and_arrays() {
        assert_eq!(
            reprint("<f hfit=[100,repeated] vfit gap=5 arrange=[20,30%]>"),
            "<f gap=5 arrange=[20,30%] hfit=100 vfit>"
        );
        assert_eq!(reprint("<f fit>"), "<f fit>");
    }

    #[test]
    fn test_display_flags() {
        assert_eq!(reprint("<a undisplayed invisible><b invisible>"), "<a undisplayed><b invisible>");
    }

    #[test]
    fn test_splitter_weight_lands_on_leaf() {
        assert_eq!(reprint("<a>|25%<b>"), "<a weight=25%>|<b>");
    }
}
