// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Identity-keyed transitions between layouts.
//!
//! [`reconcile`] compares the previously rendered [`Scene`] with a fresh
//! [`TreeLayout`](crate::layout::TreeLayout) and emits a [`Frame`] of
//! enter/update/exit operations for a [`RenderSurface`] to animate.

use std::time::Duration;

use smol_str::SmolStr;

use crate::layout::{BoundingBox, LinkCurve, Point};
use crate::model::NodeId;

pub mod reconcile;
pub mod scene;
pub mod surface;
pub mod svg;

pub use reconcile::{reconcile, Anchor, Reconciliation};
pub use scene::{Scene, SceneLink, SceneNode};
pub use surface::{RecordingSurface, RenderSurface, SurfaceError, SvgSurface};
pub use svg::{render_scene_svg, Theme};

/// Start and end value of an animated attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: Copy> Transition<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    pub fn settled(value: T) -> Self {
        Self { from: value, to: value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// How a node marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeGlyph {
    /// The node has known children (shown or cached).
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeOp {
    pub phase: Phase,
    pub id: NodeId,
    pub label: SmolStr,
    pub glyph: NodeGlyph,
    pub position: Transition<Point>,
    pub opacity: Transition<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkOp {
    pub phase: Phase,
    /// Key of the link.
    pub target: NodeId,
    pub source: NodeId,
    pub curve: Transition<LinkCurve>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    ViewBox(Transition<BoundingBox>),
    Node(NodeOp),
    Link(LinkOp),
}

/// One reconcile pass worth of operations, all sharing a duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    anchor: NodeId,
    duration: Duration,
    ops: Vec<RenderOp>,
}

impl Frame {
    pub fn new(anchor: NodeId, duration: Duration, ops: Vec<RenderOp>) -> Self {
        Self { anchor, duration, ops }
    }

    /// Node the entering and exiting elements grow out of or collapse into.
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn node_ops(&self) -> impl Iterator<Item = &NodeOp> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Node(node) => Some(node),
            _ => None,
        })
    }

    pub fn link_ops(&self) -> impl Iterator<Item = &LinkOp> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Link(link) => Some(link),
            _ => None,
        })
    }

    pub fn node_op(&self, id: NodeId) -> Option<&NodeOp> {
        self.node_ops().find(|op| op.id == id)
    }

    pub fn link_op(&self, target: NodeId) -> Option<&LinkOp> {
        self.link_ops().find(|op| op.target == target)
    }

    pub fn nodes_in(&self, phase: Phase) -> Vec<NodeId> {
        self.node_ops().filter(|op| op.phase == phase).map(|op| op.id).collect()
    }

    pub fn links_in(&self, phase: Phase) -> Vec<NodeId> {
        self.link_ops().filter(|op| op.phase == phase).map(|op| op.target).collect()
    }

    pub fn view_box(&self) -> Option<Transition<BoundingBox>> {
        self.ops.iter().find_map(|op| match op {
            RenderOp::ViewBox(view_box) => Some(*view_box),
            _ => None,
        })
    }
}
