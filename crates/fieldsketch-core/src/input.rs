//! Abstract input events.
//!
//! Gesture decoding (pan vs pinch vs draw) happens in the host. The canvas
//! only sees these already-classified events, with draw points in world
//! coordinates and pan/zoom in screen pixels.

use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Device that produced a draw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Position and pressure of one draw sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawSample {
    /// World coordinates.
    pub point: Point,
    /// 0..=1; mice report 0.5.
    pub pressure: f64,
    pub pointer: PointerKind,
}

impl DrawSample {
    pub fn mouse(point: Point) -> Self {
        Self {
            point,
            pressure: 0.5,
            pointer: PointerKind::Mouse,
        }
    }

    /// Convert a screen-space sample into world space.
    pub fn from_screen(viewport: &Viewport, screen: Point, pressure: f64, pointer: PointerKind) -> Self {
        Self {
            point: viewport.screen_to_world(screen),
            pressure: pressure.clamp(0.0, 1.0),
            pointer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    DrawStart(DrawSample),
    DrawMove(DrawSample),
    DrawEnd(DrawSample),
    /// Screen-space pan delta.
    Pan { dx: f64, dy: f64 },
    /// Zoom by `factor` around a screen-space anchor.
    Zoom { factor: f64, anchor: Point },
    /// Finish a multi-click tool (Enter, or `C` to close a polygon).
    Commit { close: bool },
    /// Abandon the tool interaction in progress (Escape).
    Cancel,
}

impl InputEvent {
    pub fn draw_start(point: Point) -> Self {
        InputEvent::DrawStart(DrawSample::mouse(point))
    }

    pub fn draw_move(point: Point) -> Self {
        InputEvent::DrawMove(DrawSample::mouse(point))
    }

    pub fn draw_end(point: Point) -> Self {
        InputEvent::DrawEnd(DrawSample::mouse(point))
    }

    /// The draw sample carried by this event, if any.
    pub fn sample(&self) -> Option<&DrawSample> {
        match self {
            InputEvent::DrawStart(s) | InputEvent::DrawMove(s) | InputEvent::DrawEnd(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.sample().is_some()
    }
}
