// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::record::{ChildRecord, NodeSpec};

pub(crate) fn records(names: &[&str]) -> Vec<ChildRecord> {
    names.iter().map(|name| ChildRecord::new(*name)).collect()
}

/// `P1 -> [a -> [a1, a2], b]`
pub(crate) fn two_level_spec() -> NodeSpec {
    NodeSpec::new("P1")
        .with_source_ref("https://example.test/users")
        .with_child(
            NodeSpec::new("a").with_child(NodeSpec::new("a1")).with_child(NodeSpec::new("a2")),
        )
        .with_child(NodeSpec::new("b"))
}

/// A lopsided tree that forces deep contours to push siblings apart.
///
/// `r -> [x -> [x1 -> [x11, x12, x13]], y, z -> [z1, z2, z3, z4]]`
pub(crate) fn lopsided_spec() -> NodeSpec {
    NodeSpec::new("r")
        .with_child(
            NodeSpec::new("x").with_child(
                NodeSpec::new("x1")
                    .with_child(NodeSpec::new("x11"))
                    .with_child(NodeSpec::new("x12"))
                    .with_child(NodeSpec::new("x13")),
            ),
        )
        .with_child(NodeSpec::new("y"))
        .with_child(
            NodeSpec::new("z")
                .with_child(NodeSpec::new("z1"))
                .with_child(NodeSpec::new("z2"))
                .with_child(NodeSpec::new("z3"))
                .with_child(NodeSpec::new("z4")),
        )
}
