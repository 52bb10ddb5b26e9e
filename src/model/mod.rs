// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logical tree model.
//!
//! A [`Tree`] owns named nodes with stable ids, their cached children and their
//! expansion state. Fetched child records are merged in by name.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod policy;
pub mod record;
pub mod tree;

pub use ids::NodeId;
pub use node::{FetchStatus, TreeNode};
pub use policy::ExpandPolicy;
pub use record::{ChildRecord, NodeSpec};
pub use tree::{MergeOutcome, ToggleAction, Tree, TreeError};
