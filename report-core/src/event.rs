//! Pointer input for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Gesture interrupted (capture lost, window blur).
    Cancel,
}

/// A pointer event in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Pointer identifier (for capture).
    pub pointer_id: u32,
    /// X position in client coordinates.
    pub client_x: f32,
    /// Y position in client coordinates.
    pub client_y: f32,
    /// Mouse button (0 = left, 1 = middle, 2 = right).
    pub button: u8,
    /// Phase of this event.
    pub phase: PointerPhase,
}

impl PointerEvent {
    /// Create a primary-button event for pointer 1.
    #[must_use]
    pub fn new(phase: PointerPhase, client_x: f32, client_y: f32) -> Self {
        Self {
            pointer_id: 1,
            client_x,
            client_y,
            button: 0,
            phase,
        }
    }

    /// Pointer-down at a client position.
    #[must_use]
    pub fn down(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Down, client_x, client_y)
    }

    /// Pointer-move to a client position.
    #[must_use]
    pub fn moved(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Move, client_x, client_y)
    }

    /// Pointer-up at a client position.
    #[must_use]
    pub fn up(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Up, client_x, client_y)
    }

    /// Pointer-cancel at a client position.
    #[must_use]
    pub fn cancel(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Cancel, client_x, client_y)
    }

    /// Set the pointer id.
    #[must_use]
    pub fn with_pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Set the button.
    #[must_use]
    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        self
    }

    /// Client position as a point.
    #[must_use]
    pub fn client(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }

    /// Whether the primary (left) button triggered this event.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.button == 0
    }
}
