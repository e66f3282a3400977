//! Gesture recognizer: turns a continuous pointer drag into discrete
//! directional gestures.
//!
//! Qualification rule: the dominant axis must strictly exceed the other
//! axis in absolute magnitude, and its magnitude must reach the minimum
//! drag distance.
//!
//! The auxiliary-modifier flag merges two independently-sampled input
//! signals (continuous poll + edge callback); either backend alone is
//! observed to miss transitions. First true wins for the rest of the drag,
//! and the flag is seeded on the pointer-down edge so a modifier arriving
//! in the same tick is not lost.

use bevy::prelude::*;

/// Screen-space drag direction. Window coordinates grow downward, so a
/// drag toward the top of the screen is `Up` (negative Y delta).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureDir {
    Up,
    Down,
    Left,
    Right,
}

impl GestureDir {
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, GestureDir::Up | GestureDir::Down)
    }
}

/// One recognized directional gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub dir: GestureDir,
    /// Dominant-axis travel in px.
    pub magnitude: f32,
    /// Emitted while the pointer was still held (chained segment) rather
    /// than on release.
    pub mid_drag: bool,
    /// The auxiliary modifier was held at some point during this drag.
    pub aux_held: bool,
}

#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    min_drag: f32,
    active: bool,
    start: Vec2,
    aux_held: bool,
    frames: u32,
}

impl GestureRecognizer {
    pub fn new(min_drag: f32) -> Self {
        Self {
            min_drag,
            active: false,
            start: Vec2::ZERO,
            aux_held: false,
            frames: 0,
        }
    }

    #[inline]
    pub fn drag_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn aux_held(&self) -> bool {
        self.active && self.aux_held
    }

    /// Ticks the current drag has been held for.
    #[inline]
    pub fn drag_frames(&self) -> u32 {
        self.frames
    }

    fn classify(&self, delta: Vec2) -> Option<(GestureDir, f32)> {
        let (ax, ay) = (delta.x.abs(), delta.y.abs());
        if ay > ax {
            if ay < self.min_drag {
                return None;
            }
            Some((if delta.y < 0.0 { GestureDir::Up } else { GestureDir::Down }, ay))
        } else if ax > ay {
            if ax < self.min_drag {
                return None;
            }
            Some((if delta.x < 0.0 { GestureDir::Left } else { GestureDir::Right }, ax))
        } else {
            // Perfect diagonal: no dominant axis.
            None
        }
    }

    /// Per-tick sample. Emits at most one gesture.
    ///
    /// `allow_retrigger` lets the consumer suppress mid-drag emission while
    /// it cannot act on another gesture anyway (e.g. a cooldown window).
    pub fn sample(
        &mut self,
        pointer_down: bool,
        pos: Vec2,
        aux_polled: bool,
        aux_edge: bool,
        allow_retrigger: bool,
    ) -> Option<GestureEvent> {
        if pointer_down && !self.active {
            // Drag start. Seed the aux flag with whatever is already true
            // this tick; both signals may arrive on the same frame.
            self.active = true;
            self.start = pos;
            self.aux_held = aux_polled || aux_edge;
            self.frames = 0;
            return None;
        }

        if !self.active {
            return None;
        }

        // Sticky OR: once held during this drag, held for the whole drag.
        self.aux_held |= aux_polled || aux_edge;
        self.frames += 1;

        let delta = pos - self.start;

        if pointer_down {
            if !allow_retrigger {
                return None;
            }
            let (dir, magnitude) = self.classify(delta)?;
            // Re-seed so a chained gesture can follow without releasing.
            // This also means the eventual release only emits if the
            // movement *after* this point qualifies on its own.
            self.start = pos;
            return Some(GestureEvent { dir, magnitude, mid_drag: true, aux_held: self.aux_held });
        }

        // Release edge.
        self.active = false;
        let (dir, magnitude) = self.classify(delta)?;
        Some(GestureEvent { dir, magnitude, mid_drag: false, aux_held: self.aux_held })
    }

    /// Edge re-center: reset the drag origin to `neutral` after the pointer
    /// has been repositioned by the windowing layer. The user must restart
    /// the gesture from there.
    pub fn recenter(&mut self, neutral: Vec2) {
        self.start = neutral;
    }
}

/// True when the pointer is too close to the window edge to perform a drag
/// in `required` direction.
pub fn direction_blocked_by_edge(
    pos: Vec2,
    required: GestureDir,
    window_size: Vec2,
    margin: f32,
) -> bool {
    match required {
        GestureDir::Up => pos.y <= margin,
        GestureDir::Down => pos.y >= window_size.y - margin,
        GestureDir::Left => pos.x <= margin,
        GestureDir::Right => pos.x >= window_size.x - margin,
    }
}
