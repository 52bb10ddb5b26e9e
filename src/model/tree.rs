// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use smol_str::SmolStr;

use super::ids::{IdAllocator, NodeId};
use super::node::{FetchStatus, TreeNode};
use super::policy::ExpandPolicy;
use super::record::{ChildRecord, NodeSpec};
use crate::layout::{Hierarchy, HierarchyNode, Point, TreeLayout};

/// What a toggle did, or what the caller still has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Collapse,
    Expand,
    /// Nothing is cached yet; the caller must fetch and then merge.
    NeedsFetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged {
        added: Vec<NodeId>,
        duplicates: usize,
    },
    /// The target node is not part of this tree; nothing was merged.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownNode(NodeId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "node {id} is not part of the tree"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Single-rooted tree of named nodes with cached (possibly hidden) children.
///
/// Nodes are never removed. Collapsing only hides a node's children, and every
/// mutation bumps `rev` so observers can tell snapshots apart.
#[derive(Debug, Clone)]
pub struct Tree {
    root: NodeId,
    nodes: BTreeMap<NodeId, TreeNode>,
    ids: IdAllocator,
    rev: u64,
}

impl Tree {
    pub fn new(name: impl Into<SmolStr>, source_ref: Option<String>) -> Self {
        let mut ids = IdAllocator::default();
        let root = ids.allocate();
        let mut nodes = BTreeMap::new();
        nodes.insert(root, TreeNode::new(root, name.into(), source_ref, None, 0, Point::ORIGIN));
        Self { root, nodes, ids, rev: 0 }
    }

    /// Builds a tree from a nested descriptor.
    ///
    /// The root starts expanded; any other node with children starts collapsed
    /// (children moved into its cache) unless `policy` pre-expands its name.
    pub fn from_spec(spec: &NodeSpec, policy: &ExpandPolicy) -> Self {
        let mut tree = Self::new(spec.name.as_str(), spec.source_ref.clone());
        let root = tree.root;
        tree.seed_children(root, &spec.children, policy);
        tree.rev = 0;
        tree
    }

    fn seed_children(&mut self, parent: NodeId, specs: &[NodeSpec], policy: &ExpandPolicy) {
        let records = specs.iter().map(|spec| {
            let record = ChildRecord::new(spec.name.as_str());
            match &spec.source_ref {
                Some(source_ref) => record.with_source_ref(source_ref.clone()),
                None => record,
            }
        });
        let MergeOutcome::Merged { added, .. } = self.merge_children(parent, records) else {
            return;
        };

        let is_root = parent == self.root;
        let pre_expand = is_root || self.node(parent).is_some_and(|n| policy.pre_expands(n.name()));
        if let Some(node) = self.nodes.get_mut(&parent) {
            let expanded = pre_expand && !node.cached_children().is_empty();
            node.set_expanded(expanded);
        }

        // `added` follows spec order with duplicates dropped, so pair by name.
        for child_id in added {
            let Some(name) = self.node(child_id).map(|n| n.name().to_owned()) else {
                continue;
            };
            if let Some(child_spec) = specs.iter().find(|s| s.name == name) {
                self.seed_children(child_id, &child_spec.children, policy);
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode, TreeError> {
        self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// A node is visible when every ancestor is expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = match self.node(id) {
            Some(node) => node.parent(),
            None => return false,
        };
        while let Some(ancestor) = current {
            match self.node(ancestor) {
                Some(node) if node.is_expanded() => current = node.parent(),
                _ => return false,
            }
        }
        true
    }

    /// Visible nodes in pre-order, root first.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }

    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)?
            .cached_children()
            .iter()
            .copied()
            .find(|child| self.node(*child).is_some_and(|n| n.name() == name))
    }

    /// Resolves a `/`-separated name path starting at the root's name.
    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        if self.node(self.root)?.name() != first {
            return None;
        }
        segments.try_fold(self.root, |current, segment| self.find_child(current, segment))
    }

    /// Flips a node between collapsed and expanded.
    ///
    /// Expanding only reuses cached children; with an empty cache the node
    /// stays collapsed and [`ToggleAction::NeedsFetch`] is returned.
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleAction, TreeError> {
        let node = self.node_mut(id)?;
        let action = if node.is_expanded() {
            node.set_expanded(false);
            ToggleAction::Collapse
        } else if !node.cached_children().is_empty() {
            node.set_expanded(true);
            ToggleAction::Expand
        } else {
            return Ok(ToggleAction::NeedsFetch);
        };
        self.bump_rev();
        Ok(action)
    }

    /// Merges fetched child records into `id`'s cached children and expands it.
    ///
    /// Records are matched by name against the existing cache; known names keep
    /// their node (and id), and within the batch the first occurrence of a name
    /// wins. Merging the same batch twice adds nothing the second time.
    pub fn merge_children<I>(&mut self, id: NodeId, records: I) -> MergeOutcome
    where
        I: IntoIterator<Item = ChildRecord>,
    {
        let Some(parent) = self.nodes.get(&id) else {
            return MergeOutcome::Dropped;
        };
        let depth = parent.depth() + 1;
        let stashed = parent.stashed_position();
        let mut by_name = parent
            .cached_children()
            .iter()
            .filter_map(|child| self.nodes.get(child).map(|n| (SmolStr::new(n.name()), *child)))
            .collect::<HashMap<_, _>>();

        let mut added = Vec::new();
        let mut duplicates = 0usize;
        for record in records {
            let (name, source_ref) = record.into_parts();
            if let Some(existing) = by_name.get(&name) {
                duplicates += 1;
                if let Some(node) = self.nodes.get_mut(existing) {
                    if node.source_ref().is_none() && source_ref.is_some() {
                        node.set_source_ref(source_ref);
                    }
                }
                continue;
            }
            let child_id = self.ids.allocate();
            self.nodes.insert(
                child_id,
                TreeNode::new(child_id, name.clone(), source_ref, Some(id), depth, stashed),
            );
            by_name.insert(name, child_id);
            added.push(child_id);
        }

        if let Some(parent) = self.nodes.get_mut(&id) {
            parent.cached_children_mut().extend(added.iter().copied());
            let expanded = !parent.cached_children().is_empty();
            parent.set_expanded(expanded);
        }
        self.bump_rev();

        MergeOutcome::Merged { added, duplicates }
    }

    pub fn set_fetch_status(&mut self, id: NodeId, status: FetchStatus) -> Result<(), TreeError> {
        self.node_mut(id)?.set_fetch_status(status);
        Ok(())
    }

    /// Records every laid-out node's position as its previous position.
    pub fn stash_positions(&mut self, layout: &TreeLayout) {
        for placement in layout.nodes() {
            if let Some(node) = self.nodes.get_mut(&placement.id()) {
                node.stash(placement.position());
            }
        }
    }

    pub(crate) fn set_root_origin(&mut self, origin: Point) {
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.stash(origin);
        }
    }
}

impl Hierarchy for Tree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn hierarchy_node(&self, id: NodeId) -> Option<HierarchyNode<'_>> {
        let node = self.node(id)?;
        Some(HierarchyNode {
            label: node.name(),
            children: node.children().unwrap_or(&[]),
            has_children: !node.cached_children().is_empty(),
        })
    }
}
