// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Expansion protocol: toggle, fetch, merge, re-render.
//!
//! [`TreeView`] is the synchronous state machine. It never awaits; a toggle
//! that needs data hands back a [`FetchRequest`] and the result is fed in later
//! through [`TreeView::complete_fetch`]. [`Controller`] pairs a view with a
//! [`ChildSource`](crate::source::ChildSource) and runs the fetches.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{ConfigError, TransitionConfig, ViewConfig};
use crate::layout::{layout_tree, LayoutError, LayoutOptions, TreeLayout};
use crate::model::{
    ChildRecord, FetchStatus, MergeOutcome, NodeId, ToggleAction, Tree, TreeError,
};
use crate::render::{reconcile, Anchor, Frame, RenderSurface, Scene, SurfaceError};
use crate::source::FetchError;

pub mod driver;

pub use driver::{Controller, Settled, ViewEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionSpeed {
    #[default]
    Normal,
    /// Long transitions, for following an update by eye.
    Slow,
}

impl TransitionSpeed {
    pub fn duration(self, config: &TransitionConfig) -> Duration {
        match self {
            Self::Normal => config.duration(),
            Self::Slow => config.slow_duration(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub node: NodeId,
    pub source_ref: String,
    pub speed: TransitionSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// An ancestor is collapsed.
    Hidden,
    FetchInFlight,
    /// Nothing cached and no source reference to fetch from.
    NoSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Rendered(Frame),
    FetchRequested(FetchRequest),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Rendered(Frame),
    /// Merged, but the node is hidden so nothing was drawn.
    Suppressed,
    /// The node is gone; nothing was merged.
    Dropped,
    Failed(FetchError),
}

#[derive(Debug)]
pub enum ViewError {
    Tree(TreeError),
    Layout(LayoutError),
    Surface(SurfaceError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "tree error: {err}"),
            Self::Layout(err) => write!(f, "layout error: {err}"),
            Self::Surface(err) => write!(f, "render error: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Surface(err) => Some(err),
        }
    }
}

impl From<TreeError> for ViewError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<LayoutError> for ViewError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<SurfaceError> for ViewError {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}

/// A tree bound to a render surface.
///
/// Every render pass lays out the current tree, reconciles it against the
/// previously presented scene, presents the frame and only then stashes the
/// new positions.
#[derive(Debug)]
pub struct TreeView<R> {
    tree: Tree,
    options: LayoutOptions,
    transition: TransitionConfig,
    surface: R,
    scene: Scene,
    layout: Option<TreeLayout>,
}

impl<R: RenderSurface> TreeView<R> {
    pub fn new(mut tree: Tree, config: &ViewConfig, surface: R) -> Self {
        tree.set_root_origin(config.origin);
        Self {
            tree,
            options: config.layout_options(),
            transition: config.transition,
            surface,
            scene: Scene::default(),
            layout: None,
        }
    }

    /// Builds the tree described by `config.root` with the configured pre-expand policy.
    pub fn from_config(config: &ViewConfig, surface: R) -> Result<Self, ConfigError> {
        let tree = Tree::from_spec(&config.root, &config.expand_policy()?);
        Ok(Self::new(tree, config, surface))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// What is on screen after the last presented frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> Option<&TreeLayout> {
        self.layout.as_ref()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }

    /// Initial render, anchored at the root.
    pub fn mount(&mut self) -> Result<Frame, ViewError> {
        self.render_pass(self.tree.root(), TransitionSpeed::Normal)
    }

    pub fn toggle(
        &mut self,
        id: NodeId,
        speed: TransitionSpeed,
    ) -> Result<ToggleOutcome, ViewError> {
        let node = self.tree.node(id).ok_or(TreeError::UnknownNode(id))?;
        if !self.tree.is_visible(id) {
            return Ok(ToggleOutcome::Ignored(IgnoreReason::Hidden));
        }
        if node.fetch_status().is_fetching() {
            debug!(node = %id, "toggle ignored while fetching");
            return Ok(ToggleOutcome::Ignored(IgnoreReason::FetchInFlight));
        }
        let source_ref = node.source_ref().map(str::to_owned);

        match self.tree.toggle(id)? {
            ToggleAction::Collapse | ToggleAction::Expand => {
                Ok(ToggleOutcome::Rendered(self.render_pass(id, speed)?))
            }
            ToggleAction::NeedsFetch => {
                let Some(source_ref) = source_ref else {
                    return Ok(ToggleOutcome::Ignored(IgnoreReason::NoSource));
                };
                self.tree.set_fetch_status(id, FetchStatus::Fetching)?;
                debug!(node = %id, source_ref = %source_ref, "requesting children");
                Ok(ToggleOutcome::FetchRequested(FetchRequest { node: id, source_ref, speed }))
            }
        }
    }

    /// Applies a fetch result against the tree as it is now.
    ///
    /// A failure marks the node failed and leaves it collapsed; toggling it
    /// again retries. Results for nodes that are gone, or that have no fetch
    /// outstanding, are dropped.
    pub fn complete_fetch(
        &mut self,
        request: FetchRequest,
        result: Result<Vec<ChildRecord>, FetchError>,
    ) -> Result<FetchOutcome, ViewError> {
        let id = request.node;
        let Some(node) = self.tree.node(id) else {
            debug!(node = %id, "fetch result for unknown node dropped");
            return Ok(FetchOutcome::Dropped);
        };
        if !node.fetch_status().is_fetching() {
            debug!(node = %id, "fetch result without an outstanding fetch dropped");
            return Ok(FetchOutcome::Dropped);
        }

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    node = %id,
                    source_ref = %request.source_ref,
                    error = %err,
                    "fetching children failed"
                );
                self.tree.set_fetch_status(id, FetchStatus::Failed { message: err.to_string() })?;
                return Ok(FetchOutcome::Failed(err));
            }
        };

        self.tree.set_fetch_status(id, FetchStatus::Idle)?;
        match self.tree.merge_children(id, records) {
            MergeOutcome::Dropped => return Ok(FetchOutcome::Dropped),
            MergeOutcome::Merged { added, duplicates } => {
                debug!(node = %id, added = added.len(), duplicates, "merged children");
            }
        }

        if !self.tree.is_visible(id) {
            return Ok(FetchOutcome::Suppressed);
        }
        Ok(FetchOutcome::Rendered(self.render_pass(id, request.speed)?))
    }

    /// Lays out, reconciles and presents the current tree, anchored at `anchor`.
    pub fn render_pass(
        &mut self,
        anchor: NodeId,
        speed: TransitionSpeed,
    ) -> Result<Frame, ViewError> {
        let layout = layout_tree(&self.tree, &self.options)?;
        let previous =
            self.tree.node(anchor).ok_or(TreeError::UnknownNode(anchor))?.stashed_position();
        let current = layout.position(anchor).unwrap_or(previous);

        let pass = reconcile(
            &self.scene,
            &layout,
            Anchor { id: anchor, previous, current },
            speed.duration(&self.transition),
        );
        self.surface.present(&pass.frame, &pass.scene)?;

        self.tree.stash_positions(&layout);
        self.scene = pass.scene;
        self.layout = Some(layout);
        debug!(
            anchor = %anchor,
            rev = self.tree.rev(),
            visible = self.scene.nodes().len(),
            "render pass"
        );
        Ok(pass.frame)
    }
}
