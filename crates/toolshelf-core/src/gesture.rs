#![forbid(unsafe_code)]

//! Press-versus-drag discrimination.
//!
//! A press becomes a drag once the pointer travels strictly more than
//! [`DragTuning::threshold`] cells (manhattan distance) from where it went
//! down. Anything less resolves as a click on release.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Default manhattan distance (cells) before a press turns into a drag.
pub const DEFAULT_DRAG_THRESHOLD: u16 = 5;

/// Drag activation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTuning {
    /// Manhattan distance the pointer must exceed to start a drag.
    pub threshold: u16,
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl DragTuning {
    /// Create tuning with an explicit threshold.
    #[must_use]
    pub const fn new(threshold: u16) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn should_start_drag(self, origin: Position, current: Position) -> bool {
        crossed_drag_threshold(origin, current, self.threshold)
    }
}

/// Whether the pointer has moved strictly beyond `threshold` from `origin`.
#[must_use]
pub fn crossed_drag_threshold(origin: Position, current: Position, threshold: u16) -> bool {
    origin.manhattan_distance(current) > u32::from(threshold)
}
