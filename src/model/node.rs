// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::ids::NodeId;
use crate::layout::Point;

/// Progress of the on-demand child fetch for one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Failed {
        message: String,
    },
}

impl FetchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }
}

/// A single logical node.
///
/// `cached_children` is the full known child set and survives collapsing; the
/// visible children are that same list when `expanded`, and absent otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    id: NodeId,
    name: SmolStr,
    source_ref: Option<String>,
    parent: Option<NodeId>,
    depth: usize,
    cached_children: Vec<NodeId>,
    expanded: bool,
    fetch: FetchStatus,
    stashed: Point,
}

impl TreeNode {
    pub(crate) fn new(
        id: NodeId,
        name: SmolStr,
        source_ref: Option<String>,
        parent: Option<NodeId>,
        depth: usize,
        stashed: Point,
    ) -> Self {
        Self {
            id,
            name,
            source_ref,
            parent,
            depth,
            cached_children: Vec::new(),
            expanded: false,
            fetch: FetchStatus::Idle,
            stashed,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Children as currently shown; `None` while collapsed.
    pub fn children(&self) -> Option<&[NodeId]> {
        self.expanded.then_some(self.cached_children.as_slice())
    }

    pub fn cached_children(&self) -> &[NodeId] {
        &self.cached_children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn fetch_status(&self) -> &FetchStatus {
        &self.fetch
    }

    /// Position this node was rendered at before the most recent layout pass.
    pub fn stashed_position(&self) -> Point {
        self.stashed
    }

    pub(crate) fn set_source_ref(&mut self, source_ref: Option<String>) {
        self.source_ref = source_ref;
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub(crate) fn cached_children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.cached_children
    }

    pub(crate) fn set_fetch_status(&mut self, status: FetchStatus) {
        self.fetch = status;
    }

    pub(crate) fn stash(&mut self, position: Point) {
        self.stashed = position;
    }
}
