// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smol_str::SmolStr;

use super::geometry::{BoundingBox, LinkCurve, Margins, Point};
use crate::model::ids::NodeId;

/// Read-only view of a rooted hierarchy, as much as layout needs of it.
pub trait Hierarchy {
    fn root(&self) -> NodeId;

    /// Returns `None` when `id` is not part of the hierarchy.
    fn hierarchy_node(&self, id: NodeId) -> Option<HierarchyNode<'_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyNode<'a> {
    pub label: &'a str,
    /// Currently visible children, in order. Empty while collapsed.
    pub children: &'a [NodeId],
    /// Whether any children are known, visible or not.
    pub has_children: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Distance between adjacent siblings along the `y` axis.
    pub sibling_spacing: f64,
    /// Distance between depth levels along the `x` axis.
    pub level_spacing: f64,
    /// Minimum gap between neighbours with different parents, in sibling units.
    pub cousin_separation: f64,
    pub margins: Margins,
    /// Narrowest view box handed to surfaces, however small the tree.
    pub min_view_width: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            sibling_spacing: 30.0,
            level_spacing: 238.5,
            cousin_separation: 2.0,
            margins: Margins::default(),
            min_view_width: 1000.0,
        }
    }
}

impl LayoutOptions {
    fn separation(&self, level: usize) -> f64 {
        if level == 0 {
            1.0
        } else {
            self.cousin_separation.max(1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePlacement {
    id: NodeId,
    parent: Option<NodeId>,
    depth: usize,
    position: Point,
    label: SmolStr,
    has_children: bool,
}

impl NodePlacement {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkPlacement {
    source: NodeId,
    target: NodeId,
    curve: LinkCurve,
}

impl LinkPlacement {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Links are keyed by their target: every non-root node has exactly one parent.
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn curve(&self) -> LinkCurve {
        self.curve
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    nodes: Vec<NodePlacement>,
    index: BTreeMap<NodeId, usize>,
    links: Vec<LinkPlacement>,
    bbox: BoundingBox,
    view_box: BoundingBox,
}

impl TreeLayout {
    /// Visible nodes in pre-order, root first.
    pub fn nodes(&self) -> &[NodePlacement] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkPlacement] {
        &self.links
    }

    /// Region covering every visible node, grown by the configured margins.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// `bbox` widened to the configured minimum view width.
    pub fn view_box(&self) -> BoundingBox {
        self.view_box
    }

    pub fn placement(&self, id: NodeId) -> Option<&NodePlacement> {
        self.index.get(&id).and_then(|idx| self.nodes.get(*idx))
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.placement(id).map(NodePlacement::position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    UnknownNode { parent: Option<NodeId>, node: NodeId },
    CycleDetected { node: NodeId },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode { parent: Some(parent), node } => {
                write!(f, "node {parent} references unknown child {node}")
            }
            Self::UnknownNode { parent: None, node } => write!(f, "root node {node} is unknown"),
            Self::CycleDetected { node } => {
                write!(f, "tree contains a cycle (node {node} reached twice)")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Occupied extent of one depth level of a subtree, in sibling units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    min: f64,
    max: f64,
}

impl Span {
    const ZERO: Self = Self { min: 0.0, max: 0.0 };

    fn shifted(self, by: f64) -> Self {
        Self { min: self.min + by, max: self.max + by }
    }
}

/// Tidy tree layout of the visible part of `tree`.
///
/// Children are packed along `y` in order. Each subtree is pushed down just far
/// enough that, on every depth level both share, it clears the already placed
/// siblings by one unit (siblings) or `cousin_separation` units (deeper
/// levels). Parents are centered between their first and last child. `x` is
/// `depth * level_spacing`; the root sits at the origin.
pub fn layout_tree<H>(tree: &H, options: &LayoutOptions) -> Result<TreeLayout, LayoutError>
where
    H: Hierarchy + ?Sized,
{
    let root = tree.root();
    let mut visited = BTreeSet::<NodeId>::new();
    let mut offsets = BTreeMap::<NodeId, f64>::new();
    measure(tree, root, None, options, &mut visited, &mut offsets)?;

    let mut nodes = Vec::<NodePlacement>::with_capacity(visited.len());
    let mut links = Vec::<LinkPlacement>::with_capacity(visited.len().saturating_sub(1));
    let mut stack = vec![(root, None::<(NodeId, Point)>, 0usize, 0.0f64)];
    while let Some((id, parent, depth, y)) = stack.pop() {
        let node = tree
            .hierarchy_node(id)
            .ok_or(LayoutError::UnknownNode { parent: parent.map(|(p, _)| p), node: id })?;
        let position = Point::new(depth as f64 * options.level_spacing, y);

        if let Some((parent_id, parent_position)) = parent {
            links.push(LinkPlacement {
                source: parent_id,
                target: id,
                curve: LinkCurve::new(parent_position, position),
            });
        }
        nodes.push(NodePlacement {
            id,
            parent: parent.map(|(p, _)| p),
            depth,
            position,
            label: SmolStr::new(node.label),
            has_children: node.has_children,
        });

        for child in node.children.iter().rev() {
            let offset = offsets.get(child).copied().unwrap_or(0.0);
            let child_y = y + offset * options.sibling_spacing;
            stack.push((*child, Some((id, position)), depth + 1, child_y));
        }
    }

    let index = nodes.iter().enumerate().map(|(idx, n)| (n.id, idx)).collect::<BTreeMap<_, _>>();
    let bbox = BoundingBox::covering(nodes.iter().map(|n| n.position), options.margins)
        .unwrap_or_default();
    let view_box = bbox.with_min_width(options.min_view_width);

    Ok(TreeLayout { nodes, index, links, bbox, view_box })
}

/// First walk: returns the subtree contour relative to `id` and records each
/// child's offset from its parent in `offsets`.
fn measure<H>(
    tree: &H,
    id: NodeId,
    parent: Option<NodeId>,
    options: &LayoutOptions,
    visited: &mut BTreeSet<NodeId>,
    offsets: &mut BTreeMap<NodeId, f64>,
) -> Result<Vec<Span>, LayoutError>
where
    H: Hierarchy + ?Sized,
{
    if !visited.insert(id) {
        return Err(LayoutError::CycleDetected { node: id });
    }
    let node = tree.hierarchy_node(id).ok_or(LayoutError::UnknownNode { parent, node: id })?;
    if node.children.is_empty() {
        return Ok(vec![Span::ZERO]);
    }

    let mut merged = Vec::<Span>::new();
    let mut child_offsets = Vec::<(NodeId, f64)>::with_capacity(node.children.len());
    for &child in node.children {
        let contour = measure(tree, child, Some(id), options, visited, offsets)?;
        let offset = if merged.is_empty() {
            0.0
        } else {
            merged
                .iter()
                .zip(&contour)
                .enumerate()
                .map(|(level, (placed, next))| placed.max + options.separation(level) - next.min)
                .fold(f64::NEG_INFINITY, f64::max)
        };
        merge_contour(&mut merged, &contour, offset);
        child_offsets.push((child, offset));
    }

    let first = child_offsets.first().map(|(_, o)| *o).unwrap_or(0.0);
    let last = child_offsets.last().map(|(_, o)| *o).unwrap_or(0.0);
    let center = (first + last) / 2.0;
    for (child, offset) in child_offsets {
        offsets.insert(child, offset - center);
    }

    let mut contour = Vec::with_capacity(merged.len() + 1);
    contour.push(Span::ZERO);
    contour.extend(merged.into_iter().map(|span| span.shifted(-center)));
    Ok(contour)
}

fn merge_contour(merged: &mut Vec<Span>, contour: &[Span], offset: f64) {
    for (level, span) in contour.iter().enumerate() {
        let span = span.shifted(offset);
        match merged.get_mut(level) {
            Some(existing) => {
                existing.min = existing.min.min(span.min);
                existing.max = existing.max.max(span.max);
            }
            None => merged.push(span),
        }
    }
}
