// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// One child descriptor as delivered by a remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_ref: Option<String>,
}

impl ChildRecord {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into(), source_ref: None }
    }

    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }

    pub(crate) fn into_parts(self) -> (SmolStr, Option<String>) {
        (self.name, self.source_ref)
    }
}

impl From<&str> for ChildRecord {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChildRecord {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Nested descriptor used to seed a tree at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NodeSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), source_ref: None, children: Vec::new() }
    }

    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}
