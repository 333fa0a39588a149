//! Logical input: per-frame raw state, edge detection, and the per-tick snapshot.
//!
//! Device polling happens elsewhere. The variable-rate pass turns each frame's
//! [`RawInput`] into an [`InputSnapshot`] with [`EdgeDetector`], and an [`InputLatch`]
//! holds edges until the fixed-rate tick consumes them.

use crate::{
    bitmask_flags::BitmaskFlags,
    constants::MOVE_INPUT_DEADZONE_SQ,
    define_bitmask_flags,
    types::Vec2,
};

define_bitmask_flags!(InputButton, u8, {
    Jump,
    Sprint,
    CursorLock,
});

pub type ButtonFlags = BitmaskFlags<u8>;

/// Device-level state of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawInput {
    pub move_vector: Vec2,
    pub buttons: ButtonFlags,
}

impl RawInput {
    pub fn new(move_vector: Vec2) -> Self {
        Self {
            move_vector,
            buttons: ButtonFlags::default(),
        }
    }

    pub fn with(mut self, button: InputButton) -> Self {
        self.buttons.add(button);
        self
    }
}

/// Immutable logical input for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_vector: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub sprint_pressed: bool,
    /// True once sprint has been held past the hold threshold.
    pub sprint_held: bool,
    pub cursor_lock_pressed: bool,
}

impl InputSnapshot {
    /// Move input outside the dead zone.
    #[inline]
    pub fn has_move_input(&self) -> bool {
        self.move_vector.norm_squared() > MOVE_INPUT_DEADZONE_SQ
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.move_vector != Vec2::zeros()
    }
}

/// Derives press edges by comparing each frame against the previous one.
#[derive(Clone, Copy, Debug)]
pub struct EdgeDetector {
    previous: ButtonFlags,
    sprint_hold_threshold: f32,
    sprint_held_for: f32,
}

impl EdgeDetector {
    pub fn new(sprint_hold_threshold: f32) -> Self {
        Self {
            previous: ButtonFlags::default(),
            sprint_hold_threshold,
            sprint_held_for: 0.0,
        }
    }

    /// Sample one frame of raw input that lasted `dt` seconds.
    pub fn sample(&mut self, raw: &RawInput, dt: f32) -> InputSnapshot {
        let edges = raw.buttons.rising_edges(self.previous);
        self.previous = raw.buttons;

        let sprint_down = raw.buttons.has(InputButton::Sprint);
        self.sprint_held_for = if sprint_down {
            self.sprint_held_for + dt.max(0.0)
        } else {
            0.0
        };

        InputSnapshot {
            move_vector: raw.move_vector,
            jump_pressed: edges.has(InputButton::Jump),
            jump_held: raw.buttons.has(InputButton::Jump),
            sprint_pressed: edges.has(InputButton::Sprint),
            sprint_held: sprint_down && self.sprint_held_for >= self.sprint_hold_threshold,
            cursor_lock_pressed: edges.has(InputButton::CursorLock),
        }
    }
}

/// Carries input from the variable-rate pass to the fixed-rate tick.
///
/// Edges accumulate until [`InputLatch::take`]; levels always reflect the latest frame.
/// A fixed tick that runs without a fresh frame sees levels but no repeated edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputLatch {
    latest: InputSnapshot,
    jump_pressed: bool,
    sprint_pressed: bool,
    cursor_lock_pressed: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: InputSnapshot) {
        self.jump_pressed |= snapshot.jump_pressed;
        self.sprint_pressed |= snapshot.sprint_pressed;
        self.cursor_lock_pressed |= snapshot.cursor_lock_pressed;
        self.latest = snapshot;
    }

    /// Snapshot for one fixed tick; pending edges are consumed.
    pub fn take(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            jump_pressed: self.jump_pressed,
            sprint_pressed: self.sprint_pressed,
            cursor_lock_pressed: self.cursor_lock_pressed,
            ..self.latest
        };
        self.jump_pressed = false;
        self.sprint_pressed = false;
        self.cursor_lock_pressed = false;
        snapshot
    }
}
