// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::scene::Scene;
use super::svg::{render_scene_svg, Theme};
use super::Frame;

/// Something that can play a [`Frame`].
///
/// `scene` is the state the frame settles into; surfaces that cannot animate
/// may draw it directly.
pub trait RenderSurface {
    fn present(&mut self, frame: &Frame, scene: &Scene) -> Result<(), SurfaceError>;
}

#[derive(Debug)]
pub enum SurfaceError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to write {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Keeps every presented frame. Used by tests and headless drivers.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    frames: Vec<Frame>,
}

impl RecordingSurface {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn take(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl RenderSurface for RecordingSurface {
    fn present(&mut self, frame: &Frame, _scene: &Scene) -> Result<(), SurfaceError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Renders the settled scene to SVG after each frame, optionally writing it to disk.
#[derive(Debug, Default)]
pub struct SvgSurface {
    theme: Theme,
    output: Option<PathBuf>,
    document: String,
    presented: usize,
}

impl SvgSurface {
    pub fn new(theme: Theme) -> Self {
        Self { theme, ..Self::default() }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The most recent snapshot, empty before the first frame.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl RenderSurface for SvgSurface {
    fn present(&mut self, _frame: &Frame, scene: &Scene) -> Result<(), SurfaceError> {
        self.document = render_scene_svg(scene, &self.theme);
        self.presented += 1;
        if let Some(path) = &self.output {
            std::fs::write(path, &self.document)
                .map_err(|source| SurfaceError::Io { path: path.clone(), source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{RecordingSurface, RenderSurface, SurfaceError, SvgSurface};
    use crate::model::NodeId;
    use crate::render::{Frame, Scene, Theme};

    fn empty_frame() -> Frame {
        Frame::new(NodeId::new(0), Duration::from_millis(250), Vec::new())
    }

    #[test]
    fn recording_surface_keeps_frames_in_order() {
        let mut surface = RecordingSurface::default();
        surface.present(&empty_frame(), &Scene::default()).expect("present");
        let slow = Frame::new(NodeId::new(0), Duration::from_millis(2500), Vec::new());
        surface.present(&slow, &Scene::default()).expect("present");

        assert_eq!(surface.frames().len(), 2);
        assert_eq!(surface.last().map(Frame::duration), Some(Duration::from_millis(2500)));
        assert_eq!(surface.take().len(), 2);
        assert!(surface.frames().is_empty());
    }

    #[test]
    fn svg_surface_writes_the_snapshot() {
        let path = std::env::temp_dir()
            .join(format!("canopy-surface-{}-{}.svg", std::process::id(), line!()));
        let mut surface = SvgSurface::new(Theme::default()).with_output(&path);

        surface.present(&empty_frame(), &Scene::default()).expect("present");

        assert_eq!(surface.presented(), 1);
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, surface.document());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn svg_surface_reports_unwritable_targets() {
        let path = std::env::temp_dir().join("canopy-missing-dir").join("nested").join("out.svg");
        let mut surface = SvgSurface::new(Theme::default()).with_output(&path);

        let err = surface.present(&empty_frame(), &Scene::default()).unwrap_err();

        assert!(matches!(&err, SurfaceError::Io { path: p, .. } if p == &path));
        assert!(err.to_string().contains("out.svg"));
    }
}
