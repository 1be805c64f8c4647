//! Custom cursor overlay
//!
//! A dot that snaps to the pointer and a ring that trails it. While mounted,
//! the native cursor is hidden with an injected stylesheet; unmounting
//! removes it again. Not used on touch devices.

use glam::Vec2;

/// Ring catch-up per frame
pub const RING_LERP: f32 = 0.15;

/// Off-screen start so nothing flashes at the origin
pub const HIDDEN_POS: Vec2 = Vec2::new(-100.0, -100.0);

/// Elements that put the cursor in its hover state
pub const INTERACTIVE_SELECTOR: &str =
    "a, button, [role='button'], input, textarea, select, [data-cursor-hover], canvas";

/// Id of the injected stylesheet
pub const HIDE_STYLE_ID: &str = "custom-cursor-hide";

pub const HIDE_CURSOR_CSS: &str = "*, *::before, *::after { cursor: none !important; }";

pub const DOT_CLASS: &str = "custom-cursor-dot";
pub const RING_CLASS: &str = "custom-cursor-ring";

#[derive(Debug, Clone, PartialEq)]
pub struct CursorFollower {
    pub dot: Vec2,
    pub ring: Vec2,
    pub visible: bool,
    pub clicking: bool,
    pub hovering: bool,
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self {
            dot: HIDDEN_POS,
            ring: HIDDEN_POS,
            visible: false,
            clicking: false,
            hovering: false,
        }
    }
}

impl CursorFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.dot = pos;
        self.visible = true;
    }

    /// Pointer left the window
    pub fn leave(&mut self) {
        self.visible = false;
    }

    pub fn set_clicking(&mut self, clicking: bool) {
        self.clicking = clicking;
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Ease the ring toward the dot
    pub fn step(&mut self) {
        self.ring += (self.dot - self.ring) * RING_LERP;
    }

    pub fn dot_transform(&self) -> String {
        centered_translate(self.dot)
    }

    pub fn ring_transform(&self) -> String {
        centered_translate(self.ring)
    }

    pub fn opacity(&self) -> &'static str {
        if self.visible { "1" } else { "0" }
    }

    /// Class list for an element with base class `base`
    pub fn class_name(&self, base: &str) -> String {
        let mut class = base.to_string();
        if self.clicking {
            class.push_str(" cursor-click");
        }
        if self.hovering {
            class.push_str(" cursor-hover");
        }
        class
    }
}

fn centered_translate(pos: Vec2) -> String {
    format!("translate({}px, {}px) translate(-50%, -50%)", pos.x, pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_trails_dot() {
        let mut cursor = CursorFollower::new();
        assert!(!cursor.visible);

        cursor.move_to(Vec2::new(300.0, 200.0));
        assert!(cursor.visible);
        assert_eq!(cursor.dot, Vec2::new(300.0, 200.0));

        cursor.step();
        let expected = HIDDEN_POS + (Vec2::new(300.0, 200.0) - HIDDEN_POS) * RING_LERP;
        assert!((cursor.ring - expected).length() < 1e-4);

        for _ in 0..120 {
            cursor.step();
        }
        assert!(cursor.ring.distance(cursor.dot) < 0.1);
    }

    #[test]
    fn test_class_and_style_strings() {
        let mut cursor = CursorFollower::new();
        cursor.move_to(Vec2::new(12.0, 34.5));
        assert_eq!(cursor.dot_transform(), "translate(12px, 34.5px) translate(-50%, -50%)");
        assert_eq!(cursor.class_name(DOT_CLASS), "custom-cursor-dot");

        cursor.set_clicking(true);
        cursor.set_hovering(true);
        assert_eq!(
            cursor.class_name(RING_CLASS),
            "custom-cursor-ring cursor-click cursor-hover"
        );

        cursor.leave();
        assert_eq!(cursor.opacity(), "0");
    }
}
