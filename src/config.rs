// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Initial view configuration, loadable from JSON.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::layout::{LayoutOptions, Margins, Point};
use crate::model::{ExpandPolicy, NodeSpec};
use crate::render::Theme;
use crate::source::RecordFields;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewConfig {
    /// Root node and any children known up front.
    pub root: NodeSpec,
    pub margins: Margins,
    pub spacing: SpacingConfig,
    pub transition: TransitionConfig,
    pub expand: ExpandConfig,
    pub source: SourceConfig,
    pub theme: Theme,
    /// Minimum width of the view box.
    pub viewport_width: Option<f64>,
    /// Stashed position of the root before the first layout.
    pub origin: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpacingConfig {
    /// Distance between siblings.
    pub sibling: f64,
    /// Distance between depth levels.
    pub level: f64,
    /// Gap between cousins, as a multiple of `sibling`.
    pub cousin_factor: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            sibling: layout.sibling_spacing,
            level: layout.level_spacing,
            cousin_factor: layout.cousin_separation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: u64,
    pub slow_duration_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: 250, slow_duration_ms: 2500 }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn slow_duration(&self) -> Duration {
        Duration::from_millis(self.slow_duration_ms)
    }
}

/// Serializable form of [`ExpandPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpandConfig {
    #[default]
    RootOnly,
    All,
    NameLength(usize),
    NamePattern(String),
}

impl ExpandConfig {
    pub fn to_policy(&self) -> Result<ExpandPolicy, ConfigError> {
        Ok(match self {
            Self::RootOnly => ExpandPolicy::RootOnly,
            Self::All => ExpandPolicy::All,
            Self::NameLength(len) => ExpandPolicy::NameLength(*len),
            Self::NamePattern(pattern) => {
                let regex = Regex::new(pattern).map_err(|err| {
                    ConfigError::Invalid(format!("expand pattern `{pattern}`: {err}"))
                })?;
                ExpandPolicy::NamePattern(regex)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Field of each fetched item holding the child name.
    pub name_field: String,
    /// Field of each fetched item holding the child's own source reference.
    pub source_ref_field: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let fields = RecordFields::default();
        Self {
            name_field: fields.name_field,
            source_ref_field: fields.source_ref_field,
            timeout_ms: None,
        }
    }
}

impl SourceConfig {
    pub fn record_fields(&self) -> RecordFields {
        RecordFields {
            name_field: self.name_field.clone(),
            source_ref_field: self.source_ref_field.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl ViewConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(ViewConfig)).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.name.is_empty() {
            return Err(ConfigError::Invalid("root name must not be empty".to_owned()));
        }
        let spacing = [
            ("spacing.sibling", self.spacing.sibling),
            ("spacing.level", self.spacing.level),
            ("spacing.cousin_factor", self.spacing.cousin_factor),
        ];
        for (field, value) in spacing {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{field} must be positive, got {value}")));
            }
        }
        self.expand.to_policy()?;
        Ok(())
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            sibling_spacing: self.spacing.sibling,
            level_spacing: self.spacing.level,
            cousin_separation: self.spacing.cousin_factor,
            margins: self.margins,
            min_view_width: self.viewport_width.unwrap_or(LayoutOptions::default().min_view_width),
        }
    }

    pub fn expand_policy(&self) -> Result<ExpandPolicy, ConfigError> {
        self.expand.to_policy()
    }
}
