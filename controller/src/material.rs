//! Traction material selection.
//!
//! A derived, per-tick state: which friction material the character's collider should
//! wear, and how strongly locomotion may accelerate, brake and turn while wearing it.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TractionMaterial {
    Default,
    Slide,
}

/// Locomotion modifiers associated with a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TractionProfile {
    /// Collider friction coefficient.
    pub friction: f32,
    /// Multiplier on the grounded speed cap.
    pub speed_factor: f32,
    /// Multiplier on the braking force.
    pub braking_factor: f32,
    /// Multiplier on the grounded turn sharpness.
    pub turn_factor: f32,
}

impl Default for TractionProfile {
    fn default() -> Self {
        Self {
            friction: crate::constants::DEFAULT_FRICTION,
            speed_factor: 1.0,
            braking_factor: 1.0,
            turn_factor: 1.0,
        }
    }
}

/// Sensed state the selection depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TractionInputs {
    pub is_grounded: bool,
    /// Wall contact or a lateral obstruction this tick.
    pub wall_touching: bool,
    /// Movement intent this tick.
    pub is_moving: bool,
}

/// Pure selection rule.
///
/// - airborne: slide
/// - grounded, touching a wall, moving: slide
/// - grounded, touching a wall, stationary: default
/// - grounded, clear: default
pub fn select_material(inputs: TractionInputs) -> TractionMaterial {
    match inputs {
        TractionInputs {
            is_grounded: false, ..
        } => TractionMaterial::Slide,
        TractionInputs {
            wall_touching: true,
            is_moving: true,
            ..
        } => TractionMaterial::Slide,
        _ => TractionMaterial::Default,
    }
}

/// Remembers the material in effect and suppresses redundant swaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialSelector {
    current: Option<TractionMaterial>,
}

impl MaterialSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material currently applied, if any was applied yet.
    pub fn current(&self) -> Option<TractionMaterial> {
        self.current
    }

    /// Returns `Some(material)` only when it differs from the one in effect.
    pub fn update(&mut self, inputs: TractionInputs) -> Option<TractionMaterial> {
        let next = select_material(inputs);
        if self.current == Some(next) {
            return None;
        }
        self.current = Some(next);
        Some(next)
    }

    /// Forget the applied material so the next update re-applies it.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(is_grounded: bool, wall_touching: bool, is_moving: bool) -> TractionInputs {
        TractionInputs {
            is_grounded,
            wall_touching,
            is_moving,
        }
    }

    #[test]
    fn selection_table() {
        use TractionMaterial::*;
        assert_eq!(select_material(inputs(false, false, false)), Slide);
        assert_eq!(select_material(inputs(false, true, true)), Slide);
        assert_eq!(select_material(inputs(true, true, true)), Slide);
        assert_eq!(select_material(inputs(true, true, false)), Default);
        assert_eq!(select_material(inputs(true, false, true)), Default);
        assert_eq!(select_material(inputs(true, false, false)), Default);
    }

    #[test]
    fn first_update_always_applies() {
        let mut selector = MaterialSelector::new();
        assert_eq!(
            selector.update(inputs(true, false, false)),
            Some(TractionMaterial::Default)
        );
    }

    #[test]
    fn unchanged_state_produces_no_second_swap() {
        let mut selector = MaterialSelector::new();
        let state = inputs(false, false, true);

        assert_eq!(selector.update(state), Some(TractionMaterial::Slide));
        assert_eq!(selector.update(state), None);
        assert_eq!(selector.current(), Some(TractionMaterial::Slide));
    }

    #[test]
    fn change_after_suppression_applies_again() {
        let mut selector = MaterialSelector::new();
        selector.update(inputs(false, false, false));
        selector.update(inputs(false, false, false));

        assert_eq!(
            selector.update(inputs(true, false, false)),
            Some(TractionMaterial::Default)
        );
    }

    #[test]
    fn reset_reapplies_current_material() {
        let mut selector = MaterialSelector::new();
        selector.update(inputs(true, false, false));
        selector.reset();
        assert_eq!(
            selector.update(inputs(true, false, false)),
            Some(TractionMaterial::Default)
        );
    }
}
