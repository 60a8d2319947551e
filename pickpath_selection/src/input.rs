// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events the preview surface reacts to.

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer or key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
        /// Meta / Command / Super.
        const META  = 0b1000;
    }
}

impl Modifiers {
    /// Modifiers the platform reserves for its own wheel gestures (page zoom).
    pub const PLATFORM: Self = Self::CTRL.union(Self::META);
}

/// A wheel notification over the preview.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelEvent {
    /// Vertical delta. Negative values scroll up, which zooms in.
    pub delta_y: f64,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// A wheel event with no modifiers.
    pub fn new(delta_y: f64) -> Self {
        Self {
            delta_y,
            modifiers: Modifiers::empty(),
        }
    }

    /// Builder-style modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Zoom direction in steps: `+1` to zoom in, `-1` to zoom out, `0` to
    /// leave the event to the platform.
    pub fn zoom_steps(&self) -> i32 {
        if self.modifiers.intersects(Modifiers::PLATFORM) || self.delta_y.is_nan() {
            return 0;
        }
        if self.delta_y < 0.0 {
            1
        } else if self.delta_y > 0.0 {
            -1
        } else {
            0
        }
    }
}

/// Keys the preview surface reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Anything else.
    Other,
}

impl Key {
    /// Returns true for keys that delete the selection.
    pub fn deletes(self) -> bool {
        matches!(self, Self::Delete | Self::Backspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_direction() {
        assert_eq!(WheelEvent::new(-120.0).zoom_steps(), 1);
        assert_eq!(WheelEvent::new(3.0).zoom_steps(), -1);
        assert_eq!(WheelEvent::new(0.0).zoom_steps(), 0);
        assert_eq!(WheelEvent::new(f64::NAN).zoom_steps(), 0);
    }

    #[test]
    fn platform_modifiers_leave_the_wheel_alone() {
        assert_eq!(
            WheelEvent::new(-1.0)
                .with_modifiers(Modifiers::CTRL)
                .zoom_steps(),
            0
        );
        assert_eq!(
            WheelEvent::new(-1.0)
                .with_modifiers(Modifiers::META | Modifiers::SHIFT)
                .zoom_steps(),
            0
        );
        assert_eq!(
            WheelEvent::new(-1.0)
                .with_modifiers(Modifiers::SHIFT)
                .zoom_steps(),
            1
        );
    }

    #[test]
    fn delete_keys() {
        assert!(Key::Delete.deletes());
        assert!(Key::Backspace.deletes());
        assert!(!Key::Other.deletes());
    }
}
