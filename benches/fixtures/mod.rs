// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use canopy::model::{ChildRecord, ExpandPolicy, NodeSpec, Tree};

/// Complete tree with `fanout` children per node, `depth` levels below the root.
pub fn uniform_spec(fanout: usize, depth: usize) -> NodeSpec {
    fn build(name: String, fanout: usize, remaining: usize) -> NodeSpec {
        let mut spec = NodeSpec::new(name.clone());
        if remaining > 0 {
            for idx in 0..fanout {
                spec = spec.with_child(build(format!("{name}.{idx}"), fanout, remaining - 1));
            }
        }
        spec
    }
    build("root".to_owned(), fanout, depth)
}

/// Ragged tree: a node named `name` at `level` gets `(name.len() * 7 + level) % max_fanout + 1`
/// children, so fanout varies with name length.
pub fn ragged_spec(max_fanout: usize, depth: usize) -> NodeSpec {
    fn build(name: String, max_fanout: usize, level: usize, depth: usize) -> NodeSpec {
        let mut spec = NodeSpec::new(name.clone());
        if level < depth {
            let fanout = (name.len() * 7 + level) % max_fanout + 1;
            for idx in 0..fanout {
                let child = build(format!("{name}/{idx}"), max_fanout, level + 1, depth);
                spec = spec.with_child(child);
            }
        }
        spec
    }
    build("r".to_owned(), max_fanout, 0, depth)
}

pub fn expanded(spec: &NodeSpec) -> Tree {
    Tree::from_spec(spec, &ExpandPolicy::All)
}

pub fn user_records(count: usize) -> Vec<ChildRecord> {
    (0..count).map(|idx| ChildRecord::new(format!("user_{idx:05}"))).collect()
}
