#![forbid(unsafe_code)]

//! Ordered, policy-governed token containers.
//!
//! A [`Collection`] owns its tokens, lays them out on a grid
//! ([`crate::grid`]) and runs the press/drag/drop lifecycle
//! ([`crate::drag`]) for gestures that start on it.
//!
//! # Invariants
//!
//! 1. Token names are unique within a collection.
//! 2. With sorting on, tokens are always in name order and
//!    `ALLOW_DROP_MOVE` is never set.
//! 3. `ALLOW_DROP_MOVE` implies `ALLOW_DRAG`.
//! 4. Removal is immediate; there are no placeholder entries.
//! 5. The cached geometry always reflects the current tokens and grid spec.
//!
//! # Notifications
//!
//! Gestures queue [`CollectionEvent`]s which the host drains with
//! [`Collection::drain_events`]. Programmatic edits (`add`, `insert`,
//! `remove`) are silent because the host initiated them.

use toolshelf_core::geometry::{Orientation, Position, Size};
use toolshelf_core::gesture::DragTuning;
use toolshelf_core::{debug, trace};

use crate::drag::{
    CollectionId, CopyPolicy, DragEffect, DragMachine, DragNoopReason, DragPayload, DragPhase,
    DragPolicy, DragState, DragTransition, DropRejection, GestureOutcome, IgnorePolicy, ScopeKey,
};
use crate::grid::{self, GridGeometry, GridSpec};
use crate::token::{Glyph, TEXT_TOKEN_HEIGHT, Token};

/// Width of the trash slot in cells.
pub const TRASH_WIDTH: u16 = 3;

/// Notification emitted by a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A token was pressed and released without dragging.
    Clicked(String),
    /// A token was copied in from another collection.
    Added(String),
    /// A token was removed by the trash slot or a rejected drag.
    Removed(String),
    /// A token was reordered.
    Moved { name: String, from: usize, to: usize },
    /// A token was copied into another collection.
    Copied(String),
}

/// Where a drag was released, from the source collection's point of view.
#[derive(Debug)]
pub enum DropTarget<'a> {
    /// Not over any collection.
    Outside,
    /// Over the source collection itself, in its coordinates.
    OnSelf(Position),
    /// Over another collection, in that collection's coordinates.
    On(&'a mut Collection, Position),
}

#[derive(Debug, Clone, Default)]
struct TrashSlot {
    hovered: bool,
}

/// An ordered container of tokens with layout and drag/drop policy.
#[derive(Debug, Clone)]
pub struct Collection {
    id: CollectionId,
    title: String,
    items: Vec<Token>,
    grid: GridSpec,
    sorting: bool,
    scope: ScopeKey,
    policy: DragPolicy,
    ignore_policy: IgnorePolicy,
    copy_policy: CopyPolicy,
    trash: Option<TrashSlot>,
    machine: DragMachine,
    geometry: GridGeometry,
    events: Vec<CollectionEvent>,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new("")
    }
}

impl Collection {
    /// Create an empty, unscoped, horizontal collection.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: CollectionId::next(),
            title: title.into(),
            items: Vec::new(),
            grid: GridSpec::default(),
            sorting: false,
            scope: ScopeKey::UNSCOPED,
            policy: DragPolicy::default(),
            ignore_policy: IgnorePolicy::default(),
            copy_policy: CopyPolicy::default(),
            trash: None,
            machine: DragMachine::new(DragTuning::default()),
            geometry: GridGeometry::default(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> CollectionId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Name under which this collection's arrangement is stored.
    #[must_use]
    pub fn record_name(&self) -> String {
        self.title.replace(' ', "_")
    }

    // --- Tokens ------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.items
    }

    /// Token names in display order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|t| t.name().to_owned()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.items.iter().find(|t| t.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|t| t.name() == name)
    }

    /// Append a token. Returns `false` if the name is already present.
    pub fn add(&mut self, token: Token) -> bool {
        self.insert("", token)
    }

    /// Insert a token before the token named `before`, or append when
    /// `before` is empty or unknown. Returns `false` if the name is already
    /// present.
    pub fn insert(&mut self, before: &str, token: Token) -> bool {
        let index = if before.is_empty() {
            self.items.len()
        } else {
            self.index_of(before).unwrap_or(self.items.len())
        };
        self.insert_at(index, token)
    }

    /// Insert a token at `index` (clamped). Returns `false` if the name is
    /// already present.
    pub fn insert_at(&mut self, index: usize, token: Token) -> bool {
        if self.contains(token.name()) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, token);
        self.apply_sorting();
        self.relayout();
        true
    }

    /// Remove a token by name.
    pub fn remove(&mut self, name: &str) -> Option<Token> {
        let index = self.index_of(name)?;
        let token = self.items.remove(index);
        self.relayout();
        Some(token)
    }

    /// Update the tooltip of a token. Returns `false` if it is not present.
    pub fn set_tooltip(&mut self, name: &str, tooltip: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|t| t.name() == name) {
            Some(token) => {
                token.set_tooltip(tooltip);
                true
            }
            None => false,
        }
    }

    /// Force the size of every image glyph.
    pub fn resize_glyphs(&mut self, size: Size) {
        for token in &mut self.items {
            token.resize_glyph(size);
        }
        self.relayout();
    }

    /// Resize each image glyph to the size `size_of` reports for its name.
    pub fn resize_glyphs_by(&mut self, mut size_of: impl FnMut(&str) -> Option<Size>) {
        for token in &mut self.items {
            if let Some(size) = size_of(token.name()) {
                token.resize_glyph(size);
            }
        }
        self.relayout();
    }

    /// Set or clear the border on `name`. With `exclusive`, every other
    /// token's border is cleared.
    pub fn set_emphasis(&mut self, name: &str, emphasized: bool, exclusive: bool) {
        for token in &mut self.items {
            if token.name() == name {
                token.set_emphasized(emphasized);
            } else if exclusive {
                token.set_emphasized(false);
            }
        }
    }

    // --- Layout ------------------------------------------------------------

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.grid.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.grid.orientation = orientation;
        self.relayout();
    }

    #[must_use]
    pub const fn max_columns(&self) -> usize {
        self.grid.max_columns
    }

    pub fn set_max_columns(&mut self, max_columns: usize) {
        if self.grid.max_columns == max_columns {
            return;
        }
        self.grid.max_columns = max_columns;
        self.relayout();
    }

    /// Set the grid origin and cell spacing.
    pub fn set_placement(&mut self, origin: Position, spacing: u16) {
        self.grid.origin = origin;
        self.grid.spacing = spacing;
        self.relayout();
    }

    #[must_use]
    pub const fn grid_spec(&self) -> &GridSpec {
        &self.grid
    }

    /// Current slot geometry.
    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn sorting(&self) -> bool {
        self.sorting
    }

    /// Enable or disable name sorting. Enabling drops `ALLOW_DROP_MOVE`.
    pub fn set_sorting(&mut self, sorting: bool) {
        self.sorting = sorting;
        self.policy = self.policy.normalized(sorting);
        if sorting {
            self.apply_sorting();
            self.relayout();
        }
    }

    fn apply_sorting(&mut self) {
        if self.sorting {
            self.items.sort_by(|a, b| a.name().cmp(b.name()));
        }
    }

    fn trash_extent(&self) -> Size {
        let tallest = self
            .items
            .iter()
            .map(|t| t.extent().height)
            .max()
            .unwrap_or(TEXT_TOKEN_HEIGHT);
        Size::new(TRASH_WIDTH, tallest)
    }

    fn relayout(&mut self) {
        let extents: Vec<Size> = self.items.iter().map(Token::extent).collect();
        // The trash slot is only shown while there is something to drop on it.
        let trash = match (&self.trash, self.items.is_empty()) {
            (Some(_), false) => Some(self.trash_extent()),
            _ => None,
        };
        self.geometry = grid::layout(&extents, trash, &self.grid);
        trace!(
            message = "collection.layout",
            title = %self.title,
            slots = self.geometry.slots.len(),
            trash = self.geometry.trash.is_some()
        );
    }

    // --- Policy ------------------------------------------------------------

    #[must_use]
    pub const fn drag_policy(&self) -> DragPolicy {
        self.policy
    }

    /// Set the drag/drop policy, normalized against the sorting flag.
    pub fn set_drag_policy(&mut self, policy: DragPolicy) {
        self.policy = policy.normalized(self.sorting);
    }

    #[must_use]
    pub const fn ignore_policy(&self) -> IgnorePolicy {
        self.ignore_policy
    }

    pub fn set_ignore_policy(&mut self, policy: IgnorePolicy) {
        self.ignore_policy = policy;
    }

    #[must_use]
    pub const fn copy_policy(&self) -> CopyPolicy {
        self.copy_policy
    }

    pub fn set_copy_policy(&mut self, policy: CopyPolicy) {
        self.copy_policy = policy;
    }

    #[must_use]
    pub const fn scope_key(&self) -> ScopeKey {
        self.scope
    }

    pub fn set_scope_key(&mut self, scope: ScopeKey) {
        self.scope = scope;
    }

    #[must_use]
    pub fn drag_tuning(&self) -> DragTuning {
        self.machine.tuning()
    }

    pub fn set_drag_tuning(&mut self, tuning: DragTuning) {
        self.machine.set_tuning(tuning);
    }

    #[must_use]
    pub const fn has_trash(&self) -> bool {
        self.trash.is_some()
    }

    pub fn add_trash(&mut self) {
        if self.trash.is_none() {
            self.trash = Some(TrashSlot::default());
            self.relayout();
        }
    }

    pub fn remove_trash(&mut self) {
        if self.trash.take().is_some() {
            self.relayout();
        }
    }

    /// Whether a drag from this collection is currently over its trash slot.
    #[must_use]
    pub fn is_trash_hovered(&self) -> bool {
        self.trash.as_ref().is_some_and(|t| t.hovered)
    }

    fn set_trash_hovered(&mut self, hovered: bool) {
        if let Some(trash) = &mut self.trash {
            trash.hovered = hovered;
        }
    }

    // --- Events ------------------------------------------------------------

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn pending_events(&self) -> &[CollectionEvent] {
        &self.events
    }

    // --- Gestures ----------------------------------------------------------

    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        self.machine.state()
    }

    #[must_use]
    pub const fn drag_phase(&self) -> DragPhase {
        self.machine.phase()
    }

    /// Pointer pressed at `pos`.
    pub fn pointer_down(&mut self, pos: Position) -> DragTransition {
        let from = self.machine.phase();
        if self.machine.is_active() {
            return self.noop(from, DragNoopReason::GestureAlreadyInProgress);
        }
        if self.geometry.is_on_trash(pos) {
            return self.noop(from, DragNoopReason::PressedOnTrash);
        }
        let Some(index) = self.geometry.slot_at(pos) else {
            return self.noop(from, DragNoopReason::NoTokenUnderPointer);
        };

        let token = &mut self.items[index];
        token.set_pressed(true);
        let name = token.name().to_owned();
        self.machine.replace(DragState::Pressed {
            name: name.clone(),
            origin: pos,
        });
        debug!(message = "collection.press", title = %self.title, name = %name);
        self.machine
            .record(from, DragEffect::Pressed { name, origin: pos })
    }

    /// Pointer moved to `pos` (in this collection's coordinates).
    pub fn pointer_move(&mut self, pos: Position) -> DragTransition {
        let from = self.machine.phase();
        let tuning = self.machine.tuning();
        match self.machine.state() {
            DragState::Idle => self.noop(from, DragNoopReason::IdleWithoutPress),
            DragState::Pressed { name, origin } => {
                if !self.policy.contains(DragPolicy::ALLOW_DRAG) {
                    return self.noop(from, DragNoopReason::DragNotAllowed);
                }
                if !tuning.should_start_drag(*origin, pos) {
                    return self.noop(from, DragNoopReason::ThresholdNotReached);
                }
                let (name, origin) = (name.clone(), *origin);
                self.start_drag(from, name, origin, pos)
            }
            DragState::Dragging { .. } => {
                let over_trash = self.geometry.is_on_trash(pos);
                self.set_trash_hovered(over_trash);
                if let DragState::Dragging { current, .. } = self.machine.state_mut() {
                    *current = pos;
                }
                self.machine.record(
                    from,
                    DragEffect::DragUpdated {
                        current: pos,
                        over_trash,
                    },
                )
            }
        }
    }

    /// The pointer left this collection while dragging from it.
    pub fn pointer_left(&mut self) {
        self.set_trash_hovered(false);
    }

    fn start_drag(
        &mut self,
        from: DragPhase,
        name: String,
        origin: Position,
        current: Position,
    ) -> DragTransition {
        let Some(index) = self.index_of(&name) else {
            // The pressed token was removed programmatically mid-gesture.
            self.machine.replace(DragState::Idle);
            return self.noop(from, DragNoopReason::NoTokenUnderPointer);
        };
        let token = &mut self.items[index];
        let glyph: Glyph = token.snapshot_glyph().clone();
        let payload = DragPayload {
            source: self.id,
            scope: self.scope,
            glyph,
            name: token.name().to_owned(),
            tooltip: token.tooltip().to_owned(),
        };
        self.machine.replace(DragState::Dragging {
            payload: payload.clone(),
            origin,
            current,
        });
        debug!(message = "collection.drag_start", title = %self.title, name = %name);
        self.machine.record(from, DragEffect::DragStarted { payload })
    }

    /// Pointer released over `target`.
    pub fn pointer_up(&mut self, target: DropTarget<'_>) -> DragTransition {
        let from = self.machine.phase();
        match self.machine.replace(DragState::Idle) {
            DragState::Idle => self.noop(from, DragNoopReason::IdleWithoutPress),
            DragState::Pressed { name, .. } => {
                self.restore_presentation(&name);
                self.events.push(CollectionEvent::Clicked(name.clone()));
                debug!(message = "collection.click", title = %self.title, name = %name);
                self.resolve(from, GestureOutcome::Click { name })
            }
            DragState::Dragging { payload, .. } => {
                self.set_trash_hovered(false);
                let outcome = match target {
                    DropTarget::Outside => self.ignore(payload.name, DropRejection::Outside),
                    DropTarget::OnSelf(pos) => self.drop_on_self(payload.name, pos),
                    DropTarget::On(dest, pos) => match dest.accept_drop(&payload, pos) {
                        Ok(index) => self.copied(payload.name, index),
                        Err(reason) => self.ignore(payload.name, reason),
                    },
                };
                self.resolve(from, outcome)
            }
        }
    }

    /// Accept a token dragged from another collection.
    ///
    /// On success the token is inserted at the index under `pos` (then
    /// re-sorted if sorting is on) and its final index is returned.
    pub fn accept_drop(
        &mut self,
        payload: &DragPayload,
        pos: Position,
    ) -> Result<usize, DropRejection> {
        if payload.source == self.id {
            return Err(DropRejection::PolicyDisallows);
        }
        if !self.scope.admits(payload.scope) {
            return Err(DropRejection::ScopeMismatch);
        }
        if !self.policy.contains(DragPolicy::ALLOW_DROP_COPY) {
            return Err(DropRejection::PolicyDisallows);
        }
        if self.contains(&payload.name) {
            return Err(DropRejection::DuplicateName);
        }

        let index = self.drop_index(pos);
        let token = Token::new(payload.name.clone())
            .with_glyph(Some(payload.glyph.clone()))
            .with_tooltip(payload.tooltip.clone());
        self.insert_at(index, token);
        self.events.push(CollectionEvent::Added(payload.name.clone()));
        debug!(
            message = "collection.accept_drop",
            title = %self.title,
            name = %payload.name,
            index
        );
        Ok(self.index_of(&payload.name).unwrap_or(index))
    }

    /// Insertion index for a drop at `pos`.
    #[must_use]
    pub fn drop_index(&self, pos: Position) -> usize {
        grid::drop_index(
            &self.geometry.slots,
            self.grid.orientation,
            self.grid.max_columns,
            pos,
        )
    }

    fn drop_on_self(&mut self, name: String, pos: Position) -> GestureOutcome {
        if self.geometry.is_on_trash(pos) {
            self.remove(&name);
            self.events.push(CollectionEvent::Removed(name.clone()));
            return GestureOutcome::DroppedOnTrash { name };
        }
        if !self.policy.contains(DragPolicy::ALLOW_DROP_MOVE) || self.sorting {
            return self.ignore(name, DropRejection::PolicyDisallows);
        }
        let Some(from) = self.index_of(&name) else {
            return self.ignore(name, DropRejection::PolicyDisallows);
        };

        let mut to = self.drop_index(pos);
        // Moving forward: account for the token's own slot.
        if from < to {
            to -= 1;
        }
        if to != from {
            let token = self.items.remove(from);
            self.items.insert(to, token);
            self.relayout();
            self.events.push(CollectionEvent::Moved {
                name: name.clone(),
                from,
                to,
            });
        }
        self.restore_presentation(&name);
        GestureOutcome::DroppedOnSelf { name, from, to }
    }

    fn copied(&mut self, name: String, index: usize) -> GestureOutcome {
        self.events.push(CollectionEvent::Copied(name.clone()));
        let source_removed = match self.copy_policy {
            CopyPolicy::RemoveAfterCopy => self.remove(&name).is_some(),
            CopyPolicy::RestoreAfterCopy => {
                self.restore_presentation(&name);
                false
            }
        };
        GestureOutcome::DroppedOnOther {
            name,
            index,
            source_removed,
        }
    }

    fn ignore(&mut self, name: String, reason: DropRejection) -> GestureOutcome {
        let source_removed = match self.ignore_policy {
            IgnorePolicy::RemoveAfterIgnore => {
                let removed = self.remove(&name).is_some();
                if removed {
                    self.events.push(CollectionEvent::Removed(name.clone()));
                }
                removed
            }
            IgnorePolicy::RestoreAfterIgnore => {
                self.restore_presentation(&name);
                false
            }
        };
        GestureOutcome::Ignored {
            name,
            reason,
            source_removed,
        }
    }

    fn restore_presentation(&mut self, name: &str) {
        if let Some(token) = self.items.iter_mut().find(|t| t.name() == name) {
            token.set_pressed(false);
        }
    }

    fn resolve(&mut self, from: DragPhase, outcome: GestureOutcome) -> DragTransition {
        debug!(
            message = "collection.resolve",
            title = %self.title,
            outcome = ?outcome
        );
        self.machine.record(from, DragEffect::Resolved(outcome))
    }

    fn noop(&mut self, from: DragPhase, reason: DragNoopReason) -> DragTransition {
        self.machine.record(from, DragEffect::Noop { reason })
    }
}
