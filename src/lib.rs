// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canopy: expandable tree views with animated, identity-keyed updates.
//!
//! A [`model::Tree`] holds named nodes whose children may be fetched on
//! demand. [`layout::layout_tree`] places the visible part as a tidy tree,
//! [`render::reconcile`] diffs it against what was drawn before, and
//! [`controller::TreeView`] ties toggles, fetches and render passes together.

pub mod config;
pub mod controller;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

pub use config::{ConfigError, ViewConfig};
pub use controller::{Controller, TransitionSpeed, TreeView, ViewError};
