// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree layout.
//!
//! This module positions the visible nodes of a tree, computes the link curves
//! between them and the bounding box the viewport needs.

pub mod geometry;
pub mod tidy;

pub use geometry::{BoundingBox, LinkCurve, Margins, Point};
pub use tidy::{
    layout_tree, Hierarchy, HierarchyNode, LayoutError, LayoutOptions, LinkPlacement,
    NodePlacement, TreeLayout,
};
