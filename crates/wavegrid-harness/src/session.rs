#![forbid(unsafe_code)]

//! Scripted drag-scroll sessions.
//!
//! A session plays the part of the host scroll view: it moves the content
//! offset at a constant speed while a finger is down, releases, and then keeps
//! ticking until the springs settle. Every frame produces a [`FrameSummary`].

use std::time::Duration;

use serde::Serialize;
use wavegrid_core::{Point, Rect, Size};
use wavegrid_layout::{SimulationService, SpringFlowLayout, SpringLayoutConfig, StaticLayout};

use crate::error::{HarnessError, Result};

/// One display frame at 60 Hz.
pub const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, PartialEq)]
pub struct DragScript {
    /// Visible size of the scroll view.
    pub viewport: Size,
    /// Content offset before the drag starts.
    pub start_offset: f64,
    /// Finger position relative to the viewport's top-left corner.
    pub touch: Point,
    /// Offset change per frame; positive scrolls toward the end of content.
    pub speed: f64,
    /// Frames with the finger down.
    pub drag_frames: usize,
    /// Upper bound on frames spent waiting for the springs after release.
    pub settle_frames: usize,
}

impl Default for DragScript {
    fn default() -> Self {
        Self {
            viewport: Size::new(390.0, 844.0),
            start_offset: 600.0,
            touch: Point::new(195.0, 600.0),
            speed: 12.0,
            drag_frames: 45,
            settle_frames: 600,
        }
    }
}

impl DragScript {
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(HarnessError::invalid_argument("viewport must be non-empty"));
        }
        if !self.speed.is_finite() {
            return Err(HarnessError::invalid_argument("speed must be finite"));
        }
        if self.drag_frames == 0 {
            return Err(HarnessError::invalid_argument("drag needs at least one frame"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Drag,
    Settle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub frame: usize,
    pub phase: Phase,
    pub offset_y: f64,
    pub delta: f64,
    /// The engine asked for a static relayout.
    pub relayout: bool,
    pub added: usize,
    pub removed: usize,
    pub active: usize,
    pub running: bool,
    /// Largest distance of any simulated center from its anchor.
    pub max_displacement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub frames: Vec<FrameSummary>,
    /// Frames after release until the springs settled, if they did.
    pub settled_after: Option<usize>,
    pub peak_displacement: f64,
}

/// Drives one [`SpringFlowLayout`] through a [`DragScript`].
pub struct Session<L, S = wavegrid_layout::SpringAnimator> {
    engine: SpringFlowLayout<L, S>,
    script: DragScript,
    offset: f64,
    max_offset: f64,
    frames: Vec<FrameSummary>,
}

impl<L: StaticLayout> Session<L> {
    pub fn new(layout: L, config: SpringLayoutConfig, script: DragScript) -> Result<Self> {
        script.validate()?;
        let max_offset = (layout.content_size().height - script.viewport.height).max(0.0);
        let offset = script.start_offset.clamp(0.0, max_offset);
        let bounds = Rect::from_origin_size(Point::new(0.0, offset), script.viewport);
        let engine = SpringFlowLayout::new(layout, bounds, config)?;
        Ok(Self {
            engine,
            script,
            offset,
            max_offset,
            frames: Vec::new(),
        })
    }
}

impl<L: StaticLayout, S: SimulationService> Session<L, S> {
    #[must_use]
    pub fn engine(&self) -> &SpringFlowLayout<L, S> {
        &self.engine
    }

    /// Play the whole script.
    pub fn run(mut self) -> SessionReport {
        let _span =
            tracing::info_span!("drag_session", frames = self.script.drag_frames).entered();

        self.engine.prepare_layout();
        for _ in 0..self.script.drag_frames {
            let next = (self.offset + self.script.speed).clamp(0.0, self.max_offset);
            let pointer = Point::new(self.script.touch.x, next + self.script.touch.y);
            self.frame(Phase::Drag, next, Some(pointer));
        }

        let mut settled_after = None;
        for n in 0..self.script.settle_frames {
            if !self.engine.simulation().is_running() {
                settled_after = Some(n);
                break;
            }
            self.frame(Phase::Settle, self.offset, None);
        }
        if settled_after.is_none() && !self.engine.simulation().is_running() {
            settled_after = Some(self.script.settle_frames);
        }
        match settled_after {
            Some(n) => tracing::info!(frames = n, "springs settled after release"),
            None => tracing::warn!(
                limit = self.script.settle_frames,
                "springs still moving at end of session"
            ),
        }

        let peak_displacement = self
            .frames
            .iter()
            .map(|f| f.max_displacement)
            .fold(0.0, f64::max);
        SessionReport {
            frames: self.frames,
            settled_after,
            peak_displacement,
        }
    }

    fn frame(&mut self, phase: Phase, offset: f64, pointer: Option<Point>) {
        let delta = offset - self.offset;
        self.offset = offset;
        let bounds = Rect::from_origin_size(Point::new(0.0, offset), self.script.viewport);

        let relayout = self.engine.should_invalidate_for_bounds_change(bounds, &pointer);
        let pass = self.engine.prepare_layout();
        let step = self.engine.tick(FRAME);

        let summary = FrameSummary {
            frame: self.frames.len(),
            phase,
            offset_y: offset,
            delta,
            relayout,
            added: pass.added,
            removed: pass.removed,
            active: self.engine.registry().len(),
            running: step.running,
            max_displacement: self.max_displacement(),
        };
        tracing::debug!(
            frame = summary.frame,
            offset_y = summary.offset_y,
            active = summary.active,
            running = summary.running,
            max_displacement = summary.max_displacement,
            "frame"
        );
        self.frames.push(summary);
    }

    fn max_displacement(&self) -> f64 {
        self.engine
            .registry()
            .attachments()
            .iter()
            .filter_map(|a| {
                self.engine
                    .simulation()
                    .attachment_state(a.handle)
                    .map(|state| state.center.distance(a.anchor))
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use wavegrid_layout::FlowLayoutConfig;

    fn session(script: DragScript) -> Session<impl StaticLayout> {
        let layout = Catalog::sample(11).flow_layout(FlowLayoutConfig::default(), 390.0);
        Session::new(layout, SpringLayoutConfig::default(), script).unwrap()
    }

    #[test]
    fn drag_displaces_then_settles() {
        let report = session(DragScript::default()).run();
        assert_eq!(report.frames.len() - report.settled_after.unwrap(), 45);
        assert!(report.peak_displacement > 0.0);
        assert!(report.frames[0].running);
        let last = report.frames.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.max_displacement, 0.0);
    }

    #[test]
    fn still_finger_is_quiet() {
        let script = DragScript {
            speed: 0.0,
            ..DragScript::default()
        };
        let report = session(script).run();
        assert_eq!(report.peak_displacement, 0.0);
        assert_eq!(report.settled_after, Some(0));
        assert!(report.frames.iter().all(|f| f.relayout && !f.running));
    }

    #[test]
    fn offset_clamped_to_content() {
        let script = DragScript {
            start_offset: 1e9,
            ..DragScript::default()
        };
        let s = session(script);
        let content = s.engine().content_size().height;
        assert_eq!(s.engine().bounds().y, content - 844.0);
    }

    #[test]
    fn invalid_script_rejected() {
        let layout = Catalog::sample(11).flow_layout(FlowLayoutConfig::default(), 390.0);
        let script = DragScript {
            drag_frames: 0,
            ..DragScript::default()
        };
        let err = Session::new(layout, SpringLayoutConfig::default(), script)
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
