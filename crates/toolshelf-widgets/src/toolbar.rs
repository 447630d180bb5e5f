#![forbid(unsafe_code)]

//! Palette/active toolbar pair.
//!
//! A [`DragDropToolbar`] couples two collections sharing one
//! [`ActionRegistry`]:
//!
//! - the **palette** lists the available actions; it accepts copies back
//!   but never reorders (it may sort),
//! - the **active** side is the user's customized toolbar; tokens can be
//!   reordered, copied back, dropped on a trash slot, or dragged out.
//!
//! With `keep_source_action` off, a token lives on exactly one side:
//! activating it takes it out of the palette and deactivating it puts it
//! back. With it on, the palette always lists every action.
//!
//! Both collections share a process-unique scope key so tokens never cross
//! into an unrelated toolbar.

use toolshelf_core::event::{PointerEvent, PointerEventKind};
use toolshelf_core::geometry::{Orientation, Position, Size};
use toolshelf_core::gesture::DragTuning;
use toolshelf_core::{debug, trace};

use crate::action_registry::{ActionInfo, ActionRegistry, Command, RegistryError};
use crate::collection::{Collection, CollectionEvent, DropTarget};
use crate::config::ToolbarConfig;
use crate::drag::{
    CopyPolicy, DragNoopReason, DragPolicy, DragTransition, IgnorePolicy, ScopeKey,
};
use crate::token::{Glyph, Token};

/// One of the two collections of a toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Palette,
    Active,
}

/// Notification for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarEvent {
    /// A token event from one side, forwarded as-is.
    Token { side: Side, event: CollectionEvent },
    /// A click fired a registered command.
    ActionTriggered { name: String, activate: bool },
    PaletteVisibilityChanged { visible: bool },
}

/// Result of handling a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Triggered { activate: bool },
    /// No command is registered under the clicked name.
    Unknown,
}

/// A palette/active collection pair with a shared action registry.
#[derive(Debug)]
pub struct DragDropToolbar {
    title: String,
    palette: Collection,
    active: Collection,
    registry: ActionRegistry,
    config: ToolbarConfig,
    scope: ScopeKey,
    palette_visible: bool,
    gesture: Option<Side>,
    events: Vec<ToolbarEvent>,
}

impl DragDropToolbar {
    /// Create an empty toolbar with `config`.
    #[must_use]
    pub fn new(title: impl Into<String>, config: ToolbarConfig) -> Self {
        let title = title.into();
        let scope = ScopeKey::unique();

        let mut active = Collection::new(title.clone());
        active.set_scope_key(scope);
        active.set_drag_policy(DragPolicy::ALLOW_DRAG_AND_DROP);
        active.set_copy_policy(CopyPolicy::RemoveAfterCopy);

        let mut palette = Collection::new(format!("{title} palette"));
        palette.set_scope_key(scope);
        palette.set_drag_policy(DragPolicy::ALLOW_DRAG_AND_DROP_COPY);

        let mut toolbar = Self {
            title,
            palette,
            active,
            registry: ActionRegistry::new(),
            config: ToolbarConfig::default(),
            scope,
            palette_visible: false,
            gesture: None,
            events: Vec::new(),
        };
        toolbar.apply_config(config);
        toolbar
    }

    /// Apply every option in `config`.
    pub fn apply_config(&mut self, config: ToolbarConfig) {
        self.set_keep_source_action(config.keep_source_action);
        self.set_sort_source_action(config.sort_source_action);
        self.set_trash(config.trash);
        self.set_max_columns(config.max_columns);
        self.set_orientation(config.orientation);
        self.set_drag_threshold(config.drag_threshold);
        match config.glyph_size {
            Some(size) => self.set_glyph_size(size),
            None => self.clear_glyph_size(),
        }
        // Remaining options are plain flags read at use sites.
        self.config = config;
        // The setters above only act on change; make policies match the
        // final config regardless.
        self.sync_policies();
    }

    fn sync_policies(&mut self) {
        self.palette
            .set_copy_policy(if self.config.keep_source_action {
                CopyPolicy::RestoreAfterCopy
            } else {
                CopyPolicy::RemoveAfterCopy
            });
        self.active.set_ignore_policy(if self.config.trash {
            IgnorePolicy::RestoreAfterIgnore
        } else {
            IgnorePolicy::RemoveAfterIgnore
        });
    }

    // --- Accessors ---------------------------------------------------------

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn palette(&self) -> &Collection {
        &self.palette
    }

    #[must_use]
    pub const fn active(&self) -> &Collection {
        &self.active
    }

    #[must_use]
    pub const fn collection(&self, side: Side) -> &Collection {
        match side {
            Side::Palette => &self.palette,
            Side::Active => &self.active,
        }
    }

    /// Direct access to one side, for layout placement and presentation
    /// tweaks. Adding or removing tokens through it bypasses the pair rules.
    pub fn collection_mut(&mut self, side: Side) -> &mut Collection {
        match side {
            Side::Palette => &mut self.palette,
            Side::Active => &mut self.active,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    #[must_use]
    pub const fn scope_key(&self) -> ScopeKey {
        self.scope
    }

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<ToolbarEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Actions -----------------------------------------------------------

    /// Register an action and materialize its token at the end.
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        command: impl Command + 'static,
        info: ActionInfo,
    ) -> Result<(), RegistryError> {
        self.insert_action("", name, command, info)
    }

    /// Register an action and materialize its token before `before`.
    ///
    /// The token goes onto the active side when
    /// `immediately_add_source_action` is on, and into the palette when it
    /// is off or when sources are kept.
    pub fn insert_action(
        &mut self,
        before: &str,
        name: impl Into<String>,
        command: impl Command + 'static,
        info: ActionInfo,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        self.registry
            .register_boxed(name.clone(), Box::new(command), info)?;

        let immediate = self.config.immediately_add_source_action;
        if immediate && let Some(token) = self.fresh_token(&name) {
            self.active.insert(before, token);
        }
        if (!immediate || self.config.keep_source_action)
            && let Some(token) = self.fresh_token(&name)
        {
            self.palette.insert(before, token);
        }
        debug!(
            message = "toolbar.add_action",
            toolbar = %self.title,
            name = %name,
            immediate
        );
        Ok(())
    }

    /// Unregister an action and drop its token from both sides.
    pub fn remove_action(&mut self, name: &str) -> bool {
        let known = self.registry.unregister(name);
        let in_palette = self.palette.remove(name).is_some();
        let in_active = self.active.remove(name).is_some();
        debug!(message = "toolbar.remove_action", toolbar = %self.title, name = %name);
        known || in_palette || in_active
    }

    fn fresh_token(&self, name: &str) -> Option<Token> {
        let mut token = self.registry.token_for(name)?;
        if let Some(size) = self.config.glyph_size {
            token.resize_glyph(size);
        }
        Some(token)
    }

    /// Copy `name` from the palette to the end of the active side.
    pub fn activate(&mut self, name: &str) -> bool {
        self.activate_before(name, "")
    }

    /// Copy `name` from the palette into the active side before `before`.
    ///
    /// Returns `false` (and changes nothing) when `name` is not in the
    /// palette or is already active.
    pub fn activate_before(&mut self, name: &str, before: &str) -> bool {
        if self.active.contains(name) {
            return false;
        }
        let Some(token) = self.palette.get(name).map(Token::recreate) else {
            return false;
        };
        self.active.insert(before, token);
        if !self.config.keep_source_action {
            self.palette.remove(name);
        }
        debug!(message = "toolbar.activate", toolbar = %self.title, name = %name);
        true
    }

    /// Take `name` off the active side, returning it to the palette when
    /// sources are not kept.
    pub fn deactivate(&mut self, name: &str) -> bool {
        let Some(token) = self.active.remove(name) else {
            return false;
        };
        self.return_to_palette(&token);
        debug!(message = "toolbar.deactivate", toolbar = %self.title, name = %name);
        true
    }

    fn return_to_palette(&mut self, token: &Token) {
        if !self.config.keep_source_action && !self.palette.contains(token.name()) {
            self.palette.add(token.recreate());
        }
    }

    /// Make the active side exactly `names` (in order), skipping names no
    /// longer registered. Returns how many tokens are active afterwards.
    pub fn arrange(&mut self, names: &[String]) -> usize {
        let mut wanted: Vec<&str> = Vec::with_capacity(names.len());
        for name in names {
            if self.registry.contains(name) && !wanted.contains(&name.as_str()) {
                wanted.push(name);
            } else {
                trace!(message = "toolbar.arrange_skip", toolbar = %self.title, name = %name);
            }
        }

        for name in self.active.names() {
            if !wanted.contains(&name.as_str())
                && let Some(token) = self.active.remove(&name)
            {
                self.return_to_palette(&token);
            }
        }

        let mut ordered = Vec::with_capacity(wanted.len());
        for name in &wanted {
            let token = match self.active.remove(name) {
                Some(token) => Some(token),
                None => self.fresh_token(name),
            };
            ordered.extend(token);
        }
        for token in ordered {
            if !self.config.keep_source_action {
                self.palette.remove(token.name());
            }
            self.active.add(token);
        }

        debug!(
            message = "toolbar.arrange",
            toolbar = %self.title,
            active = self.active.len()
        );
        self.active.len()
    }

    // --- Options -----------------------------------------------------------

    pub fn set_keep_source_action(&mut self, keep: bool) {
        if self.config.keep_source_action == keep {
            return;
        }
        self.config.keep_source_action = keep;
        for token in self.active.tokens().to_vec() {
            if keep {
                if !self.palette.contains(token.name()) {
                    self.palette.add(token.recreate());
                }
            } else {
                self.palette.remove(token.name());
            }
        }
        self.sync_policies();
    }

    pub fn set_immediately_add_source_action(&mut self, immediate: bool) {
        self.config.immediately_add_source_action = immediate;
    }

    pub fn set_sort_source_action(&mut self, sort: bool) {
        self.config.sort_source_action = sort;
        self.palette.set_sorting(sort);
    }

    pub fn set_toggle_checkable_actions(&mut self, toggle: bool) {
        self.config.toggle_checkable_actions = toggle;
    }

    pub fn set_border_checkable_actions(&mut self, border: bool) {
        self.config.border_checkable_actions = border;
    }

    pub fn set_exclusive_checkable_actions(&mut self, exclusive: bool) {
        self.config.exclusive_checkable_actions = exclusive;
    }

    /// Show or hide the trash slot on the active side.
    pub fn set_trash(&mut self, trash: bool) {
        self.config.trash = trash;
        if trash {
            self.active.add_trash();
        } else {
            self.active.remove_trash();
        }
        self.sync_policies();
    }

    pub fn set_max_columns(&mut self, max_columns: usize) {
        self.config.max_columns = max_columns;
        self.palette.set_max_columns(max_columns);
        self.active.set_max_columns(max_columns);
    }

    /// The active side follows the toolbar orientation; the palette keeps
    /// its own.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.active.set_orientation(orientation);
    }

    pub fn set_drag_threshold(&mut self, threshold: u16) {
        self.config.drag_threshold = threshold;
        let tuning = DragTuning::new(threshold);
        self.palette.set_drag_tuning(tuning);
        self.active.set_drag_tuning(tuning);
    }

    /// Force every image glyph on both sides to `size`.
    pub fn set_glyph_size(&mut self, size: Size) {
        self.config.glyph_size = Some(size);
        self.palette.resize_glyphs(size);
        self.active.resize_glyphs(size);
    }

    /// Drop the forced glyph size; image glyphs go back to the size they
    /// were registered with.
    pub fn clear_glyph_size(&mut self) {
        if self.config.glyph_size.take().is_none() {
            return;
        }
        let registry = &self.registry;
        let registered = |name: &str| -> Option<Size> {
            match registry.info(name)?.glyph.as_ref()? {
                Glyph::Image { size, .. } => Some(*size),
                Glyph::TextSnapshot { .. } => None,
            }
        };
        self.palette.resize_glyphs_by(registered);
        self.active.resize_glyphs_by(registered);
    }

    #[must_use]
    pub const fn is_palette_visible(&self) -> bool {
        self.palette_visible
    }

    /// Show the palette if `force_show` or if it is hidden; hide it
    /// otherwise.
    pub fn toggle_palette(&mut self, force_show: bool) -> bool {
        let visible = force_show || !self.palette_visible;
        if visible != self.palette_visible {
            self.palette_visible = visible;
            self.events
                .push(ToolbarEvent::PaletteVisibilityChanged { visible });
        }
        visible
    }

    // --- Pointer routing ---------------------------------------------------

    /// Pointer pressed on `side` at `pos` (in that side's coordinates).
    pub fn pointer_down(&mut self, side: Side, pos: Position) -> DragTransition {
        if let Some(source) = self.gesture {
            // Routed to the owner so the machine reports the conflict.
            return self.collection_mut(source).pointer_down(pos);
        }
        let transition = self.collection_mut(side).pointer_down(pos);
        if !transition.is_noop() {
            self.gesture = Some(side);
        }
        transition
    }

    /// Pointer moved, in the coordinates of the side the gesture started
    /// on. Returns `None` when no gesture is in progress.
    pub fn pointer_move(&mut self, pos: Position) -> Option<DragTransition> {
        let source = self.gesture?;
        Some(self.collection_mut(source).pointer_move(pos))
    }

    /// The pointer left the side the gesture started on. Clears that
    /// side's trash highlight; the gesture itself continues.
    pub fn pointer_left(&mut self) {
        if let Some(source) = self.gesture {
            self.collection_mut(source).pointer_left();
        }
    }

    /// Pointer released over `target` (a side and a position in its
    /// coordinates), or outside both sides.
    pub fn pointer_up(&mut self, target: Option<(Side, Position)>) -> Option<DragTransition> {
        let source = self.gesture.take()?;
        let (from, other) = match source {
            Side::Palette => (&mut self.palette, &mut self.active),
            Side::Active => (&mut self.active, &mut self.palette),
        };
        let drop_target = match target {
            None => DropTarget::Outside,
            Some((side, pos)) if side == source => DropTarget::OnSelf(pos),
            Some((_, pos)) => DropTarget::On(other, pos),
        };
        let transition = from.pointer_up(drop_target);
        self.process_events();
        Some(transition)
    }

    /// Feed one host pointer event.
    ///
    /// `over` is the side under the pointer. Press and release positions are
    /// in that side's coordinates; motion is in the coordinates of the side
    /// the gesture started on, as the pointer is grabbed while held. Motion
    /// over anything but the source side clears its trash highlight.
    /// Non-primary buttons are ignored.
    pub fn handle_pointer(
        &mut self,
        over: Option<Side>,
        event: PointerEvent,
    ) -> Option<DragTransition> {
        if !event.is_primary() {
            return None;
        }
        match event.kind {
            PointerEventKind::Down(_) => {
                over.map(|side| self.pointer_down(side, event.position))
            }
            PointerEventKind::Moved => {
                let transition = self.pointer_move(event.position);
                if over != self.gesture {
                    self.pointer_left();
                }
                transition
            }
            PointerEventKind::Up(_) => {
                self.pointer_up(over.map(|side| (side, event.position)))
            }
        }
    }

    /// Whether a gesture is in progress, and on which side.
    #[must_use]
    pub const fn gesture_source(&self) -> Option<Side> {
        self.gesture
    }

    fn process_events(&mut self) {
        for side in [Side::Active, Side::Palette] {
            for event in self.collection_mut(side).drain_events() {
                match (&event, side) {
                    (CollectionEvent::Clicked(name), _) => {
                        self.click(name);
                    }
                    (CollectionEvent::Removed(name), Side::Active) => {
                        if let Some(token) = self.fresh_token(name) {
                            self.return_to_palette(&token);
                        }
                    }
                    _ => {}
                }
                self.events.push(ToolbarEvent::Token { side, event });
            }
        }
    }

    /// Run the command registered under `name` as if its token was clicked.
    pub fn click(&mut self, name: &str) -> ClickOutcome {
        let Some(command) = self.registry.lookup_mut(name) else {
            trace!(message = "toolbar.click_unknown", toolbar = %self.title, name = %name);
            return ClickOutcome::Unknown;
        };

        let checkable = command.is_checkable();
        let activate = if self.config.toggle_checkable_actions && checkable {
            let next = !command.is_checked();
            command.set_checked(next);
            next
        } else {
            true
        };
        command.trigger(activate);
        let checked = command.is_checked();

        if self.config.border_checkable_actions && checkable {
            let exclusive = self.config.exclusive_checkable_actions;
            self.palette.set_emphasis(name, checked, exclusive);
            self.active.set_emphasis(name, checked, exclusive);
        }

        self.events.push(ToolbarEvent::ActionTriggered {
            name: name.to_owned(),
            activate,
        });
        debug!(message = "toolbar.click", toolbar = %self.title, name = %name, activate);
        ClickOutcome::Triggered { activate }
    }
}

/// Whether `transition` was dropped because another gesture owns the
/// pointer.
#[must_use]
pub fn is_conflict(transition: &DragTransition) -> bool {
    matches!(
        transition.effect,
        crate::drag::DragEffect::Noop {
            reason: DragNoopReason::GestureAlreadyInProgress
        }
    )
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::action_registry::{CheckableCommand, FnCommand};
    use crate::drag::{DragPhase, GestureOutcome};

    fn toolbar_with(config: ToolbarConfig, names: &[&str]) -> DragDropToolbar {
        let mut tb = DragDropToolbar::new("Render toolbar", config);
        for name in names {
            tb.add_action(*name, FnCommand::new(|_| {}), ActionInfo::default())
                .unwrap();
        }
        tb
    }

    fn center(c: &Collection, name: &str) -> Position {
        let rect = c.geometry().slots[c.index_of(name).unwrap()];
        Position::new(rect.x + 1, rect.y + 1)
    }

    fn drag(tb: &mut DragDropToolbar, side: Side, name: &str) {
        let at = center(tb.collection(side), name);
        tb.pointer_down(side, at);
        tb.pointer_move(Position::new(at.x, at.y + 20));
    }

    #[test]
    fn pair_shares_a_unique_scope() {
        let a = toolbar_with(ToolbarConfig::default(), &[]);
        let b = toolbar_with(ToolbarConfig::default(), &[]);
        assert_ne!(a.scope_key(), ScopeKey::UNSCOPED);
        assert_eq!(a.palette().scope_key(), a.active().scope_key());
        assert_ne!(a.scope_key(), b.scope_key());
    }

    #[test]
    fn default_policies() {
        let tb = toolbar_with(ToolbarConfig::default(), &[]);
        assert_eq!(tb.active().drag_policy(), DragPolicy::ALLOW_DRAG_AND_DROP);
        assert_eq!(
            tb.palette().drag_policy(),
            DragPolicy::ALLOW_DRAG_AND_DROP_COPY
        );
        assert_eq!(tb.active().copy_policy(), CopyPolicy::RemoveAfterCopy);
        assert_eq!(tb.active().ignore_policy(), IgnorePolicy::RemoveAfterIgnore);
        assert_eq!(tb.palette().copy_policy(), CopyPolicy::RemoveAfterCopy);
    }

    #[test]
    fn leaving_the_source_side_clears_trash_highlight() {
        let config = ToolbarConfig {
            immediately_add_source_action: true,
            trash: true,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &["a", "b"]);
        // Slots: "a" at x 0..3, "b" at x 4..7, trash at x 8..11.
        tb.handle_pointer(Some(Side::Active), PointerEvent::down(1, 1));
        tb.handle_pointer(Some(Side::Active), PointerEvent::moved(1, 12));
        tb.handle_pointer(Some(Side::Active), PointerEvent::moved(9, 1));
        assert!(tb.active().is_trash_hovered());

        tb.handle_pointer(Some(Side::Palette), PointerEvent::moved(9, 1));
        assert!(!tb.active().is_trash_hovered());
        assert_eq!(tb.gesture_source(), Some(Side::Active));

        tb.handle_pointer(Some(Side::Active), PointerEvent::moved(9, 1));
        assert!(tb.active().is_trash_hovered());
        tb.pointer_left();
        assert!(!tb.active().is_trash_hovered());

        tb.handle_pointer(None, PointerEvent::up(0, 0));
        assert_eq!(tb.active().names(), ["a", "b"]);
        assert_eq!(tb.gesture_source(), None);
    }

    #[test]
    fn clearing_glyph_size_restores_registered_sizes() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["text"]);
        tb.add_action(
            "clip",
            FnCommand::new(|_| {}),
            ActionInfo::new("Clip").with_glyph(Glyph::image("clip", Size::new(4, 3))),
        )
        .unwrap();
        tb.activate("clip");

        tb.apply_config(ToolbarConfig {
            glyph_size: Some(Size::new(6, 6)),
            ..ToolbarConfig::default()
        });
        assert_eq!(tb.active().get("clip").unwrap().extent(), Size::new(6, 6));

        tb.apply_config(ToolbarConfig::default());
        assert_eq!(tb.config().glyph_size, None);
        assert_eq!(tb.active().get("clip").unwrap().extent(), Size::new(4, 3));
        assert_eq!(tb.palette().get("text").unwrap().extent(), Size::new(6, 3));

        // A token recreated later uses the registered size too.
        tb.deactivate("clip");
        assert_eq!(tb.palette().get("clip").unwrap().extent(), Size::new(4, 3));
    }

    #[test]
    fn trash_switches_ignore_policy() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &[]);
        tb.set_trash(true);
        assert!(tb.active().has_trash());
        assert_eq!(tb.active().ignore_policy(), IgnorePolicy::RestoreAfterIgnore);
        tb.set_trash(false);
        assert_eq!(tb.active().ignore_policy(), IgnorePolicy::RemoveAfterIgnore);
    }

    #[test]
    fn add_action_materializes_per_mode() {
        let tb = toolbar_with(ToolbarConfig::default(), &["open"]);
        assert_eq!(tb.palette().names(), ["open"]);
        assert!(tb.active().is_empty());

        let immediate = ToolbarConfig {
            immediately_add_source_action: true,
            ..ToolbarConfig::default()
        };
        let tb = toolbar_with(immediate.clone(), &["open"]);
        assert!(tb.palette().is_empty());
        assert_eq!(tb.active().names(), ["open"]);

        let both = ToolbarConfig {
            keep_source_action: true,
            ..immediate
        };
        let tb = toolbar_with(both, &["open"]);
        assert_eq!(tb.palette().names(), ["open"]);
        assert_eq!(tb.active().names(), ["open"]);
    }

    #[test]
    fn duplicate_action_is_rejected() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open"]);
        let err = tb
            .add_action("open", FnCommand::new(|_| {}), ActionInfo::default())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAction { .. }));
        assert_eq!(tb.palette().len(), 1);
    }

    #[test]
    fn activate_then_deactivate() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save", "reset"]);
        assert!(tb.activate("save"));
        assert_eq!(tb.palette().names(), ["open", "reset"]);
        assert_eq!(tb.active().names(), ["save"]);
        assert!(!tb.activate("save"));

        assert!(tb.deactivate("save"));
        assert_eq!(tb.palette().names(), ["open", "reset", "save"]);
        assert!(tb.active().is_empty());
        assert!(!tb.deactivate("save"));
    }

    #[test]
    fn keep_source_leaves_palette_intact() {
        let config = ToolbarConfig {
            keep_source_action: true,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &["open", "save"]);
        tb.activate("save");
        assert_eq!(tb.palette().names(), ["open", "save"]);
        tb.deactivate("save");
        assert_eq!(tb.palette().names(), ["open", "save"]);
    }

    #[test]
    fn keep_source_toggle_resyncs_palette() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save"]);
        tb.activate("save");
        tb.set_keep_source_action(true);
        assert!(tb.palette().contains("save"));
        assert_eq!(tb.palette().copy_policy(), CopyPolicy::RestoreAfterCopy);
        tb.set_keep_source_action(false);
        assert!(!tb.palette().contains("save"));
        assert_eq!(tb.palette().copy_policy(), CopyPolicy::RemoveAfterCopy);
    }

    #[test]
    fn remove_action_clears_both_sides() {
        let config = ToolbarConfig {
            keep_source_action: true,
            immediately_add_source_action: true,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &["open"]);
        assert!(tb.remove_action("open"));
        assert!(tb.palette().is_empty());
        assert!(tb.active().is_empty());
        assert!(!tb.registry().contains("open"));
        assert!(!tb.remove_action("open"));
    }

    #[test]
    fn drag_palette_to_active_moves_token() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save"]);
        drag(&mut tb, Side::Palette, "save");
        let t = tb
            .pointer_up(Some((Side::Active, Position::new(0, 0))))
            .unwrap();
        assert!(matches!(
            t.outcome(),
            Some(GestureOutcome::DroppedOnOther {
                source_removed: true,
                ..
            })
        ));
        assert_eq!(tb.palette().names(), ["open"]);
        assert_eq!(tb.active().names(), ["save"]);
        let events = tb.drain_events();
        assert!(events.contains(&ToolbarEvent::Token {
            side: Side::Active,
            event: CollectionEvent::Added("save".into())
        }));
        assert!(events.contains(&ToolbarEvent::Token {
            side: Side::Palette,
            event: CollectionEvent::Copied("save".into())
        }));
        assert_eq!(tb.gesture_source(), None);
    }

    #[test]
    fn dragging_out_of_active_returns_to_palette() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save"]);
        tb.activate("save");
        drag(&mut tb, Side::Active, "save");
        let t = tb.pointer_up(None).unwrap();
        assert!(matches!(
            t.outcome(),
            Some(GestureOutcome::Ignored {
                source_removed: true,
                ..
            })
        ));
        assert!(tb.active().is_empty());
        assert_eq!(tb.palette().names(), ["open", "save"]);
    }

    #[test]
    fn trash_on_active_returns_to_palette() {
        let config = ToolbarConfig {
            trash: true,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &["open", "save"]);
        tb.activate("save");
        let trash = tb.active().geometry().trash.unwrap();
        drag(&mut tb, Side::Active, "save");
        let over = Position::new(trash.x, trash.y);
        tb.pointer_move(over);
        let t = tb.pointer_up(Some((Side::Active, over))).unwrap();
        assert!(matches!(
            t.outcome(),
            Some(GestureOutcome::DroppedOnTrash { .. })
        ));
        assert!(tb.active().is_empty());
        assert!(tb.palette().contains("save"));
    }

    #[test]
    fn second_press_is_reported_as_conflict() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save"]);
        tb.activate("save");
        let at = center(tb.palette(), "open");
        tb.pointer_down(Side::Palette, at);
        let t = tb.pointer_down(Side::Active, center(tb.active(), "save"));
        assert!(is_conflict(&t));
        assert_eq!(tb.gesture_source(), Some(Side::Palette));
        assert_eq!(tb.active().drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn host_events_route_like_direct_calls() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open", "save"]);
        let secondary = PointerEvent::new(
            PointerEventKind::Down(toolshelf_core::event::PointerButton::Secondary),
            1,
            1,
        );
        assert!(tb.handle_pointer(Some(Side::Palette), secondary).is_none());
        assert!(tb.handle_pointer(None, PointerEvent::down(1, 1)).is_none());

        tb.handle_pointer(Some(Side::Palette), PointerEvent::down(1, 1));
        tb.handle_pointer(Some(Side::Active), PointerEvent::moved(1, 15));
        let t = tb
            .handle_pointer(Some(Side::Active), PointerEvent::up(0, 0))
            .unwrap();
        assert!(matches!(
            t.outcome(),
            Some(GestureOutcome::DroppedOnOther { .. })
        ));
        assert_eq!(tb.active().names(), ["open"]);
    }

    #[test]
    fn move_without_gesture_is_none() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open"]);
        assert!(tb.pointer_move(Position::new(1, 1)).is_none());
        assert!(tb.pointer_up(None).is_none());
    }

    #[test]
    fn click_triggers_plain_command_with_true() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut tb = toolbar_with(ToolbarConfig::default(), &[]);
        tb.add_action(
            "open",
            FnCommand::new(move |v| log.borrow_mut().push(v)),
            ActionInfo::default(),
        )
        .unwrap();

        let at = center(tb.palette(), "open");
        tb.pointer_down(Side::Palette, at);
        tb.pointer_up(Some((Side::Palette, at)));
        assert_eq!(*seen.borrow(), [true]);
        assert!(tb.drain_events().contains(&ToolbarEvent::ActionTriggered {
            name: "open".into(),
            activate: true
        }));
    }

    #[test]
    fn checkable_toggles_and_borders_exclusively() {
        let config = ToolbarConfig {
            exclusive_checkable_actions: true,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &[]);
        let last = Rc::new(Cell::new(None));
        for name in ["paint", "erase"] {
            let last = Rc::clone(&last);
            tb.add_action(
                name,
                CheckableCommand::new(false, move |v| last.set(Some(v))),
                ActionInfo::default(),
            )
            .unwrap();
        }

        assert_eq!(tb.click("paint"), ClickOutcome::Triggered { activate: true });
        assert_eq!(last.get(), Some(true));
        assert!(tb.palette().get("paint").unwrap().is_emphasized());

        tb.click("erase");
        assert!(!tb.palette().get("paint").unwrap().is_emphasized());
        assert!(tb.palette().get("erase").unwrap().is_emphasized());

        assert_eq!(tb.click("erase"), ClickOutcome::Triggered { activate: false });
        assert!(!tb.palette().get("erase").unwrap().is_emphasized());
    }

    #[test]
    fn checkable_without_toggle_always_activates() {
        let config = ToolbarConfig {
            toggle_checkable_actions: false,
            ..ToolbarConfig::default()
        };
        let mut tb = toolbar_with(config, &[]);
        tb.add_action(
            "paint",
            CheckableCommand::new(true, |_| {}),
            ActionInfo::default(),
        )
        .unwrap();
        assert_eq!(tb.click("paint"), ClickOutcome::Triggered { activate: true });
        assert_eq!(tb.click("paint"), ClickOutcome::Triggered { activate: true });
        assert!(tb.registry().lookup("paint").unwrap().is_checked());
    }

    #[test]
    fn unknown_click_is_silent() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &[]);
        assert_eq!(tb.click("ghost"), ClickOutcome::Unknown);
        assert!(tb.drain_events().is_empty());
    }

    #[test]
    fn palette_toggle() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &[]);
        assert!(tb.toggle_palette(false));
        assert!(tb.toggle_palette(true));
        assert!(!tb.toggle_palette(false));
        assert_eq!(
            tb.drain_events(),
            [
                ToolbarEvent::PaletteVisibilityChanged { visible: true },
                ToolbarEvent::PaletteVisibilityChanged { visible: false },
            ]
        );
    }

    #[test]
    fn arrange_replaces_active_in_record_order() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["a", "b", "c", "d"]);
        tb.activate("d");
        let names: Vec<String> = ["c", "ghost", "a", "c"].map(String::from).to_vec();
        assert_eq!(tb.arrange(&names), 2);
        assert_eq!(tb.active().names(), ["c", "a"]);
        assert_eq!(tb.palette().names(), ["b", "d"]);
    }

    #[test]
    fn options_reach_both_sides() {
        let mut tb = toolbar_with(ToolbarConfig::default(), &["open"]);
        tb.set_max_columns(3);
        tb.set_drag_threshold(9);
        tb.set_orientation(Orientation::Vertical);
        assert_eq!(tb.palette().max_columns(), 3);
        assert_eq!(tb.active().max_columns(), 3);
        assert_eq!(tb.palette().drag_tuning().threshold, 9);
        assert_eq!(tb.active().orientation(), Orientation::Vertical);
        assert_eq!(tb.palette().orientation(), Orientation::Horizontal);

        tb.set_sort_source_action(true);
        assert!(tb.palette().sorting());
        assert_eq!(tb.config().max_columns, 3);
    }
}
