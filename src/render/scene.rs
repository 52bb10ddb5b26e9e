// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use super::NodeGlyph;
use crate::layout::{BoundingBox, LinkCurve, Point};
use crate::model::NodeId;

/// What is on screen once a frame has finished animating.
///
/// A scene is the "previous visual state" handed to the next reconcile pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    links: BTreeMap<NodeId, SceneLink>,
    view_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub label: SmolStr,
    pub glyph: NodeGlyph,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLink {
    pub source: NodeId,
    pub curve: LinkCurve,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, SceneNode> {
        &self.nodes
    }

    /// Links keyed by target node.
    pub fn links(&self) -> &BTreeMap<NodeId, SceneLink> {
        &self.links
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn view_box(&self) -> Option<BoundingBox> {
        self.view_box
    }

    pub(crate) fn insert_node(&mut self, id: NodeId, node: SceneNode) {
        self.nodes.insert(id, node);
    }

    pub(crate) fn insert_link(&mut self, target: NodeId, link: SceneLink) {
        self.links.insert(target, link);
    }

    pub(crate) fn set_view_box(&mut self, view_box: BoundingBox) {
        self.view_box = Some(view_box);
    }
}
