//! Animation parameter sink.
//!
//! The controller publishes a handful of named values for an external
//! animation system. Renderers read them; the controller only reads back the
//! `Ground` and `Crouch` flags it wrote itself.

use std::collections::HashMap;

use bevy::prelude::*;

/// Names of the parameters written by the controller.
pub mod params {
    /// `bool`: the character is supported by ground this step.
    pub const GROUND: &str = "Ground";
    /// `bool`: the character is crouching.
    pub const CROUCH: &str = "Crouch";
    /// `f32`: absolute value of the effective horizontal move (0.0-1.0).
    pub const SPEED: &str = "Speed";
    /// `f32`: signed vertical velocity of the body.
    pub const V_SPEED: &str = "vSpeed";
}

/// Write side of an animation system, plus read-back of booleans.
///
/// Implemented by [`AnimationParameters`]; implement it for your own
/// animator to drive it directly from [`crate::resolver::resolve_step`].
pub trait AnimationSink {
    /// Set a boolean parameter.
    fn set_bool(&mut self, name: &str, value: bool);

    /// Set a float parameter.
    fn set_float(&mut self, name: &str, value: f32);

    /// Read a boolean parameter. Unknown names read as `false`.
    fn get_bool(&self, name: &str) -> bool;
}

/// Value stored in an [`AnimationParameters`] bag.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub enum AnimationValue {
    /// Boolean parameter.
    Bool(bool),
    /// Float parameter.
    Float(f32),
}

/// Named bag of animation parameters attached to a character.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
/// use msg_platformer_controller::animation::params;
///
/// let mut anim = AnimationParameters::default();
/// anim.set_bool(params::GROUND, true);
/// anim.set_float(params::SPEED, 0.5);
///
/// assert!(anim.get_bool(params::GROUND));
/// assert_eq!(anim.float(params::SPEED), Some(0.5));
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct AnimationParameters {
    #[reflect(ignore)]
    values: HashMap<String, AnimationValue>,
}

impl AnimationParameters {
    /// Create an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<AnimationValue> {
        self.values.get(name).copied()
    }

    /// Get a float parameter by name, `None` if unset or not a float.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            AnimationValue::Float(value) => Some(value),
            AnimationValue::Bool(_) => None,
        }
    }

    /// Number of parameters set so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over every parameter.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AnimationValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn set(&mut self, name: &str, value: AnimationValue) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            self.values.insert(name.to_owned(), value);
        }
    }
}

impl AnimationSink for AnimationParameters {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, AnimationValue::Bool(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, AnimationValue::Float(value));
    }

    fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(AnimationValue::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bool_reads_false() {
        let anim = AnimationParameters::new();
        assert!(!anim.get_bool(params::CROUCH));
        assert!(anim.is_empty());
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let mut anim = AnimationParameters::new();
        anim.set_bool(params::GROUND, true);
        anim.set_bool(params::GROUND, false);
        assert_eq!(anim.len(), 1);
        assert!(!anim.get_bool(params::GROUND));
    }

    #[test]
    fn float_is_not_a_bool() {
        let mut anim = AnimationParameters::new();
        anim.set_float(params::V_SPEED, -3.5);
        assert!(!anim.get_bool(params::V_SPEED));
        assert_eq!(anim.float(params::V_SPEED), Some(-3.5));
        assert_eq!(anim.get(params::V_SPEED), Some(AnimationValue::Float(-3.5)));
    }

    #[test]
    fn iter_lists_everything() {
        let mut anim = AnimationParameters::new();
        anim.set_bool(params::GROUND, true);
        anim.set_bool(params::CROUCH, false);
        anim.set_float(params::SPEED, 1.0);
        anim.set_float(params::V_SPEED, 0.0);
        let mut names: Vec<_> = anim.iter().map(|(name, _)| name.to_owned()).collect();
        names.sort();
        assert_eq!(names, vec!["Crouch", "Ground", "Speed", "vSpeed"]);
    }
}
