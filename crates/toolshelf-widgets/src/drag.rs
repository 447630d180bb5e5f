#![forbid(unsafe_code)]

//! Drag/drop policy, payload, and lifecycle types.
//!
//! ```text
//! Idle -> Pressed -> Dragging -> Idle
//!            \--------------------> Idle (release without drag = click)
//! ```
//!
//! A gesture always ends in one terminal [`GestureOutcome`] and the machine
//! returns to `Idle`. The machine only tracks the phase; the owning
//! [`Collection`](crate::collection::Collection) applies the outcome to its
//! tokens.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use toolshelf_core::geometry::Position;
use toolshelf_core::gesture::DragTuning;

use crate::token::Glyph;

bitflags! {
    /// What a collection lets the pointer do with its tokens.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DragPolicy: u8 {
        /// Tokens can be dragged out.
        const ALLOW_DRAG      = 0b001;
        /// Tokens dropped back onto the same collection are reordered.
        const ALLOW_DROP_MOVE = 0b010;
        /// Tokens dragged from another collection are copied in.
        const ALLOW_DROP_COPY = 0b100;

        const ALLOW_DROP = Self::ALLOW_DROP_MOVE.bits() | Self::ALLOW_DROP_COPY.bits();
        const ALLOW_DRAG_AND_DROP = Self::ALLOW_DRAG.bits() | Self::ALLOW_DROP.bits();
        const ALLOW_DRAG_AND_DROP_COPY = Self::ALLOW_DRAG.bits() | Self::ALLOW_DROP_COPY.bits();
    }
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self::ALLOW_DRAG_AND_DROP
    }
}

impl DragPolicy {
    /// Enforce the policy invariants.
    ///
    /// Sorting strips `ALLOW_DROP_MOVE`; `ALLOW_DROP_MOVE` implies
    /// `ALLOW_DRAG`.
    #[must_use]
    pub fn normalized(mut self, sorting: bool) -> Self {
        if sorting {
            self.remove(Self::ALLOW_DROP_MOVE);
        }
        if self.contains(Self::ALLOW_DROP_MOVE) {
            self.insert(Self::ALLOW_DRAG);
        }
        self
    }

    /// Whether any kind of drop is accepted.
    #[must_use]
    pub fn accepts_drops(self) -> bool {
        self.intersects(Self::ALLOW_DROP)
    }
}

/// What happens to the dragged token when nothing accepts the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnorePolicy {
    #[default]
    RestoreAfterIgnore,
    RemoveAfterIgnore,
}

/// What happens to the dragged token after another collection copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyPolicy {
    #[default]
    RestoreAfterCopy,
    RemoveAfterCopy,
}

/// Scope tag restricting which collections exchange tokens.
///
/// `0` is unscoped and matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeKey(u32);

static NEXT_SCOPE: AtomicU32 = AtomicU32::new(1);

impl ScopeKey {
    pub const UNSCOPED: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// A fresh non-zero key, unique within the process.
    #[must_use]
    pub fn unique() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed).max(1))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether a payload tagged `incoming` may drop into a collection tagged
    /// `self`.
    #[must_use]
    pub const fn admits(self, incoming: Self) -> bool {
        self.0 == 0 || incoming.0 == 0 || self.0 == incoming.0
    }
}

/// Process-unique collection identity, used to tell self-drops apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

static NEXT_COLLECTION: AtomicU64 = AtomicU64::new(1);

impl CollectionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_COLLECTION.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection:{}", self.0)
    }
}

/// Data carried by a drag from its source collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub source: CollectionId,
    pub scope: ScopeKey,
    pub glyph: Glyph,
    pub name: String,
    pub tooltip: String,
}

/// Why a drop was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropRejection {
    /// Released outside every collection.
    Outside,
    /// Scope keys differ.
    ScopeMismatch,
    /// The target's policy (or sorting) does not allow this drop.
    PolicyDisallows,
    /// The target already holds a token with this name.
    DuplicateName,
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Outside => "released outside any collection",
            Self::ScopeMismatch => "scope key mismatch",
            Self::PolicyDisallows => "drop not allowed by policy",
            Self::DuplicateName => "name already present",
        };
        f.write_str(text)
    }
}

/// Terminal state of one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Released without crossing the drag threshold.
    Click { name: String },
    /// Reordered within the source. `from == to` when nothing moved.
    DroppedOnSelf {
        name: String,
        from: usize,
        to: usize,
    },
    /// Copied into another collection at `index`.
    DroppedOnOther {
        name: String,
        index: usize,
        source_removed: bool,
    },
    /// Dropped on the source's trash slot and removed.
    DroppedOnTrash { name: String },
    /// Nobody accepted the drop.
    Ignored {
        name: String,
        reason: DropRejection,
        source_removed: bool,
    },
}

impl GestureOutcome {
    /// Name of the token the gesture acted on.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Click { name }
            | Self::DroppedOnSelf { name, .. }
            | Self::DroppedOnOther { name, .. }
            | Self::DroppedOnTrash { name }
            | Self::Ignored { name, .. } => name,
        }
    }
}

/// Phase of the drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Pressed,
    Dragging,
}

/// Lifecycle state with its data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        name: String,
        origin: Position,
    },
    Dragging {
        payload: DragPayload,
        origin: Position,
        current: Position,
    },
}

impl DragState {
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Pressed { .. } => DragPhase::Pressed,
            Self::Dragging { .. } => DragPhase::Dragging,
        }
    }
}

/// Explicit no-op diagnostics for pointer input that changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutPress,
    GestureAlreadyInProgress,
    NoTokenUnderPointer,
    PressedOnTrash,
    ThresholdNotReached,
    DragNotAllowed,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    Pressed { name: String, origin: Position },
    DragStarted { payload: DragPayload },
    DragUpdated { current: Position, over_trash: bool },
    Resolved(GestureOutcome),
    Noop { reason: DragNoopReason },
}

/// One lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

impl DragTransition {
    /// The outcome, if this transition ended a gesture.
    #[must_use]
    pub fn outcome(&self) -> Option<&GestureOutcome> {
        match &self.effect {
            DragEffect::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.effect, DragEffect::Noop { .. })
    }
}

/// Lifecycle bookkeeping shared by every collection.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
    tuning: DragTuning,
    transition_counter: u64,
}

impl DragMachine {
    #[must_use]
    pub fn new(tuning: DragTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    #[must_use]
    pub const fn tuning(&self) -> DragTuning {
        self.tuning
    }

    pub fn set_tuning(&mut self, tuning: DragTuning) {
        self.tuning = tuning;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Replace the state, returning the previous one.
    pub(crate) fn replace(&mut self, next: DragState) -> DragState {
        std::mem::replace(&mut self.state, next)
    }

    pub(crate) fn state_mut(&mut self) -> &mut DragState {
        &mut self.state
    }

    /// Record a transition from `from` to the current phase.
    pub(crate) fn record(&mut self, from: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}
