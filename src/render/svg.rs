// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Static SVG snapshot of a settled [`Scene`].

use std::fmt::Write as _;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Theme {
    pub link_stroke: String,
    pub link_opacity: f64,
    pub link_width: f64,
    pub node_radius: f64,
    /// Fill of nodes with known children.
    pub branch_fill: String,
    pub leaf_fill: String,
    pub node_stroke_width: f64,
    pub font: String,
    /// Horizontal distance between a node marker and its label.
    pub label_offset: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            link_stroke: "#212121".to_owned(),
            link_opacity: 0.4,
            link_width: 1.5,
            node_radius: 6.0,
            branch_fill: "#40c9c4".to_owned(),
            leaf_fill: "#555".to_owned(),
            node_stroke_width: 10.0,
            font: "10px sans-serif".to_owned(),
            label_offset: 6.0,
        }
    }
}

const ARROW_MARKER_ID: &str = "end";

/// Renders `scene` as a standalone SVG document.
///
/// Nodes with children get their label on the left, leaves on the right.
/// Element keys (`data-key`) are node ids, matching the reconcile keys.
pub fn render_scene_svg(scene: &Scene, theme: &Theme) -> String {
    let mut out = String::with_capacity(512 + scene.nodes().len() * 192);
    let mut ids = itoa::Buffer::new();

    let view_box = scene.view_box().unwrap_or_default();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" style="font: {}; user-select: none;">"#,
        view_box.x,
        view_box.y,
        view_box.width,
        view_box.height,
        escape(&theme.font)
    );
    let _ = writeln!(
        out,
        r#"<defs><marker id="{ARROW_MARKER_ID}" viewBox="0 -5 10 10" refX="18" refY="0" markerWidth="6" markerHeight="6" orient="auto"><path d="M0,-5L10,0L0,5" fill="{}"/></marker></defs>"#,
        escape(&theme.link_stroke)
    );

    let _ = writeln!(
        out,
        r#"<g fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}">"#,
        escape(&theme.link_stroke),
        theme.link_opacity,
        theme.link_width
    );
    for (target, link) in scene.links() {
        let _ = writeln!(
            out,
            r#"<path data-key="{}" d="{}" marker-end="url(#{ARROW_MARKER_ID})"/>"#,
            ids.format(target.get()),
            link.curve.to_svg_path()
        );
    }
    out.push_str("</g>\n");

    let _ = writeln!(out, r#"<g stroke-linejoin="round" stroke-width="3">"#);
    for (id, node) in scene.nodes() {
        let (fill, anchor, label_x) = if node.glyph.has_children {
            (&theme.branch_fill, "end", -theme.label_offset)
        } else {
            (&theme.leaf_fill, "start", theme.label_offset)
        };
        let _ = writeln!(
            out,
            r#"<g data-key="{}" transform="translate({},{})"><circle r="{}" fill="{}" stroke-width="{}"/><text dy="1em" x="{}" text-anchor="{}">{}</text></g>"#,
            ids.format(id.get()),
            node.position.x,
            node.position.y,
            theme.node_radius,
            escape(fill),
            theme.node_stroke_width,
            label_x,
            anchor,
            escape(&node.label)
        );
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
