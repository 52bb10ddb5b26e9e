// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tracing::debug;

use super::scene::{Scene, SceneLink, SceneNode};
use super::{Frame, LinkOp, NodeGlyph, NodeOp, Phase, RenderOp, Transition};
use crate::layout::{LinkCurve, Point, TreeLayout};
use crate::model::NodeId;

/// The node an update originates from.
///
/// Entering elements start at `previous`; exiting elements end at `current`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub id: NodeId,
    pub previous: Point,
    pub current: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub frame: Frame,
    /// The scene as it will look once `frame` has played out.
    pub scene: Scene,
}

/// Diffs `prev` against `layout` by node id.
///
/// Nodes only in `layout` enter (fading in from the anchor's previous
/// position), nodes in both update (moving from where they were drawn), and
/// nodes only in `prev` exit (fading out into the anchor's new position).
/// Links are keyed by target id and classified the same way.
pub fn reconcile(
    prev: &Scene,
    layout: &TreeLayout,
    anchor: Anchor,
    duration: Duration,
) -> Reconciliation {
    let mut ops = Vec::with_capacity(1 + 2 * (layout.nodes().len() + prev.nodes().len()));
    let mut scene = Scene::default();

    let view_box = layout.view_box();
    ops.push(RenderOp::ViewBox(Transition::new(prev.view_box().unwrap_or(view_box), view_box)));
    scene.set_view_box(view_box);

    let (mut entering, mut updating, mut exiting) = (0usize, 0usize, 0usize);

    for placement in layout.nodes() {
        let id = placement.id();
        let glyph = NodeGlyph { has_children: placement.has_children() };
        let (phase, from, opacity) = match prev.node(id) {
            Some(drawn) => {
                updating += 1;
                (Phase::Update, drawn.position, Transition::settled(1.0))
            }
            None => {
                entering += 1;
                (Phase::Enter, anchor.previous, Transition::new(0.0, 1.0))
            }
        };
        ops.push(RenderOp::Node(NodeOp {
            phase,
            id,
            label: placement.label().into(),
            glyph,
            position: Transition::new(from, placement.position()),
            opacity,
        }));
        scene.insert_node(
            id,
            SceneNode { label: placement.label().into(), glyph, position: placement.position() },
        );
    }

    for (id, drawn) in prev.nodes() {
        if layout.placement(*id).is_some() {
            continue;
        }
        exiting += 1;
        ops.push(RenderOp::Node(NodeOp {
            phase: Phase::Exit,
            id: *id,
            label: drawn.label.clone(),
            glyph: drawn.glyph,
            position: Transition::new(drawn.position, anchor.current),
            opacity: Transition::new(1.0, 0.0),
        }));
    }

    for link in layout.links() {
        let target = link.target();
        let (phase, from) = match prev.links().get(&target) {
            Some(drawn) => (Phase::Update, drawn.curve),
            None => (Phase::Enter, LinkCurve::collapsed_at(anchor.previous)),
        };
        ops.push(RenderOp::Link(LinkOp {
            phase,
            target,
            source: link.source(),
            curve: Transition::new(from, link.curve()),
        }));
        scene.insert_link(target, SceneLink { source: link.source(), curve: link.curve() });
    }

    for (target, drawn) in prev.links() {
        if scene.links().contains_key(target) {
            continue;
        }
        ops.push(RenderOp::Link(LinkOp {
            phase: Phase::Exit,
            target: *target,
            source: drawn.source,
            curve: Transition::new(drawn.curve, LinkCurve::collapsed_at(anchor.current)),
        }));
    }

    debug!(anchor = %anchor.id, entering, updating, exiting, "reconciled scene");

    Reconciliation { frame: Frame::new(anchor.id, duration, ops), scene }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{reconcile, Anchor};
    use crate::layout::{layout_tree, LayoutOptions, LinkCurve, Point, TreeLayout};
    use crate::model::fixtures::{records, two_level_spec};
    use crate::model::{ExpandPolicy, NodeId, Tree};
    use crate::render::{Phase, Scene, Transition};

    const DURATION: Duration = Duration::from_millis(250);

    fn layout(tree: &Tree) -> TreeLayout {
        layout_tree(tree, &LayoutOptions::default()).expect("layout")
    }

    fn anchor_at(tree: &Tree, layout: &TreeLayout, id: NodeId) -> Anchor {
        let previous = tree.node(id).expect("anchor").stashed_position();
        Anchor { id, previous, current: layout.position(id).unwrap_or(previous) }
    }

    #[test]
    fn first_render_enters_everything_from_the_root_origin() {
        let tree = Tree::from_spec(&two_level_spec(), &ExpandPolicy::RootOnly);
        let layout = layout(&tree);
        let root = tree.root();

        let result =
            reconcile(&Scene::default(), &layout, anchor_at(&tree, &layout, root), DURATION);

        assert_eq!(result.frame.nodes_in(Phase::Enter).len(), 3);
        assert!(result.frame.nodes_in(Phase::Update).is_empty());
        assert!(result.frame.nodes_in(Phase::Exit).is_empty());
        for op in result.frame.node_ops() {
            assert_eq!(op.position.from, Point::ORIGIN);
            assert_eq!(op.opacity, Transition::new(0.0, 1.0));
        }
        for op in result.frame.link_ops() {
            assert_eq!(op.phase, Phase::Enter);
            assert_eq!(op.curve.from, LinkCurve::collapsed_at(Point::ORIGIN));
        }
        assert_eq!(result.frame.duration(), DURATION);
        assert_eq!(result.scene.nodes().len(), 3);
        assert_eq!(result.scene.links().len(), 2);
    }

    #[test]
    fn collapse_exits_children_into_the_anchor() {
        let mut tree = Tree::from_spec(&two_level_spec(), &ExpandPolicy::RootOnly);
        let root = tree.root();
        let first = layout(&tree);
        let mounted =
            reconcile(&Scene::default(), &first, anchor_at(&tree, &first, root), DURATION);
        tree.stash_positions(&first);

        tree.toggle(root).expect("collapse");
        let second = layout(&tree);
        let result = reconcile(&mounted.scene, &second, anchor_at(&tree, &second, root), DURATION);

        assert_eq!(result.frame.nodes_in(Phase::Update), vec![root]);
        let exiting = result.frame.nodes_in(Phase::Exit);
        assert_eq!(exiting.len(), 2);
        for id in exiting {
            let op = result.frame.node_op(id).expect("op");
            assert_eq!(op.position.to, Point::ORIGIN);
            assert_eq!(op.opacity, Transition::new(1.0, 0.0));
            let link = result.frame.link_op(id).expect("link");
            assert_eq!(link.phase, Phase::Exit);
            assert_eq!(link.curve.to, LinkCurve::collapsed_at(Point::ORIGIN));
        }
        assert_eq!(result.scene.nodes().len(), 1);
        assert!(result.scene.links().is_empty());
    }

    #[test]
    fn expand_grows_children_out_of_the_anchor_and_updates_the_rest() {
        let mut tree = Tree::from_spec(&two_level_spec(), &ExpandPolicy::RootOnly);
        let root = tree.root();
        let a = tree.resolve_path("P1/a").expect("a");
        let b = tree.resolve_path("P1/b").expect("b");
        let first = layout(&tree);
        let mounted =
            reconcile(&Scene::default(), &first, anchor_at(&tree, &first, root), DURATION);
        tree.stash_positions(&first);
        let a_before = first.position(a).expect("a");
        let b_before = first.position(b).expect("b");

        tree.toggle(a).expect("expand a");
        let second = layout(&tree);
        let anchor = anchor_at(&tree, &second, a);
        let result = reconcile(&mounted.scene, &second, anchor, DURATION);

        assert_eq!(anchor.previous, a_before);
        let entering = result.frame.nodes_in(Phase::Enter);
        assert_eq!(entering.len(), 2);
        for id in &entering {
            let op = result.frame.node_op(*id).expect("op");
            assert_eq!(op.position.from, a_before);
            assert_eq!(result.frame.link_op(*id).expect("link").phase, Phase::Enter);
        }
        let b_op = result.frame.node_op(b).expect("b");
        assert_eq!(b_op.phase, Phase::Update);
        assert_eq!(b_op.position.from, b_before);
        assert_eq!(b_op.position.to, second.position(b).expect("b"));
        assert!(result.frame.node_op(a).expect("a").glyph.has_children);
    }

    #[test]
    fn view_box_animates_from_the_previous_bounds() {
        let mut tree = Tree::new("P1", None);
        let root = tree.root();
        let first = layout(&tree);
        let mounted =
            reconcile(&Scene::default(), &first, anchor_at(&tree, &first, root), DURATION);
        assert_eq!(mounted.frame.view_box(), Some(Transition::settled(first.view_box())));
        tree.stash_positions(&first);

        tree.merge_children(root, records(&["a", "b", "c"]));
        let second = layout(&tree);
        let result = reconcile(&mounted.scene, &second, anchor_at(&tree, &second, root), DURATION);

        assert_eq!(
            result.frame.view_box(),
            Some(Transition::new(first.view_box(), second.view_box()))
        );
        assert_eq!(result.scene.view_box(), Some(second.view_box()));
    }

    #[test]
    fn view_box_is_widened_to_the_minimum_view_width() {
        let tree = Tree::new("solo", None);
        let options = LayoutOptions { min_view_width: 800.0, ..LayoutOptions::default() };
        let layout = layout_tree(&tree, &options).expect("layout");

        let result = reconcile(
            &Scene::default(),
            &layout,
            anchor_at(&tree, &layout, tree.root()),
            DURATION,
        );

        let view_box = result.frame.view_box().expect("view box").to;
        assert_eq!(layout.bbox().width, 100.0);
        assert_eq!(view_box.width, 800.0);
        assert_eq!(result.scene.view_box(), Some(view_box));
    }

    #[test]
    fn unchanged_layout_only_updates_in_place() {
        let tree = Tree::from_spec(&two_level_spec(), &ExpandPolicy::All);
        let root = tree.root();
        let layout = layout(&tree);
        let mounted =
            reconcile(&Scene::default(), &layout, anchor_at(&tree, &layout, root), DURATION);

        let again = reconcile(&mounted.scene, &layout, anchor_at(&tree, &layout, root), DURATION);

        assert!(again.frame.nodes_in(Phase::Enter).is_empty());
        assert!(again.frame.nodes_in(Phase::Exit).is_empty());
        for op in again.frame.node_ops() {
            assert_eq!(op.position.from, op.position.to);
        }
        assert_eq!(again.scene, mounted.scene);
    }
}
