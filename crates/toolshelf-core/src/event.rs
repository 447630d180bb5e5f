#![forbid(unsafe_code)]

//! Canonical pointer events.
//!
//! Hosts translate their platform input into [`PointerEvent`] values and feed
//! them to the toolbar. Only the primary button participates in press, drag,
//! and drop gestures; other buttons are delivered but ignored.

use crate::geometry::Position;

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed.
    Down(PointerButton),
    /// Button released.
    Up(PointerButton),
    /// Pointer moved (with or without a button held).
    Moved,
}

/// A pointer event in the coordinate space of the collection under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Position,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            position: Position::new(x, y),
        }
    }

    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: u16, y: u16) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    /// Primary-button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: u16, y: u16) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Pointer motion to `(x, y)`.
    #[must_use]
    pub const fn moved(x: u16, y: u16) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    /// Whether this event involves the primary button (or is a move).
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(
            self.kind,
            PointerEventKind::Down(PointerButton::Primary)
                | PointerEventKind::Up(PointerButton::Primary)
                | PointerEventKind::Moved
        )
    }
}
