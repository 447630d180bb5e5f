#![forbid(unsafe_code)]

//! Name → command mapping shared by both collections of a toolbar pair.
//!
//! Registration happens during setup; lookups happen on every click. A name
//! can be registered once. Re-registering is rejected rather than silently
//! overwriting the earlier command.

use std::collections::HashMap;
use std::fmt;

use crate::token::{Glyph, Token};

/// An externally supplied action.
pub trait Command {
    /// Run the action. `activate` is the new checked state for checkable
    /// commands toggled by a click, and `true` otherwise.
    fn trigger(&mut self, activate: bool);

    fn is_checkable(&self) -> bool {
        false
    }

    fn is_checked(&self) -> bool {
        false
    }

    fn set_checked(&mut self, _checked: bool) {}
}

/// A plain command backed by a closure.
pub struct FnCommand<F> {
    callback: F,
}

impl<F: FnMut(bool)> FnCommand<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(bool)> Command for FnCommand<F> {
    fn trigger(&mut self, activate: bool) {
        (self.callback)(activate);
    }
}

impl<F> fmt::Debug for FnCommand<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand").finish_non_exhaustive()
    }
}

/// A checkable command backed by a closure and its own checked flag.
pub struct CheckableCommand<F> {
    callback: F,
    checked: bool,
}

impl<F: FnMut(bool)> CheckableCommand<F> {
    pub fn new(checked: bool, callback: F) -> Self {
        Self { callback, checked }
    }
}

impl<F: FnMut(bool)> Command for CheckableCommand<F> {
    fn trigger(&mut self, activate: bool) {
        (self.callback)(activate);
    }

    fn is_checkable(&self) -> bool {
        true
    }

    fn is_checked(&self) -> bool {
        self.checked
    }

    fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

impl<F> fmt::Debug for CheckableCommand<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckableCommand")
            .field("checked", &self.checked)
            .finish_non_exhaustive()
    }
}

/// Resolves glyphs for action names.
pub trait GlyphProvider {
    fn glyph_for(&self, name: &str) -> Option<Glyph>;
}

impl<F: Fn(&str) -> Option<Glyph>> GlyphProvider for F {
    fn glyph_for(&self, name: &str) -> Option<Glyph> {
        self(name)
    }
}

/// Presentation kept alongside a registered command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionInfo {
    pub tooltip: String,
    pub glyph: Option<Glyph>,
}

impl ActionInfo {
    #[must_use]
    pub fn new(tooltip: impl Into<String>) -> Self {
        Self {
            tooltip: tooltip.into(),
            glyph: None,
        }
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: Glyph) -> Self {
        self.glyph = Some(glyph);
        self
    }
}

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateAction { name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAction { name } => write!(f, "action `{name}` is already registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

struct Entry {
    command: Box<dyn Command>,
    info: ActionInfo,
}

/// Registry of named commands.
#[derive(Default)]
pub struct ActionRegistry {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
    glyphs: Option<Box<dyn GlyphProvider>>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("names", &self.order)
            .field("glyph_provider", &self.glyphs.is_some())
            .finish()
    }
}

impl ActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `provider` to fill in glyphs for actions registered without one.
    pub fn set_glyph_provider(&mut self, provider: impl GlyphProvider + 'static) {
        self.glyphs = Some(Box::new(provider));
    }

    /// Register `command` under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        command: impl Command + 'static,
        info: ActionInfo,
    ) -> Result<(), RegistryError> {
        self.register_boxed(name.into(), Box::new(command), info)
    }

    pub fn register_boxed(
        &mut self,
        name: String,
        command: Box<dyn Command>,
        mut info: ActionInfo,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateAction { name });
        }
        if info.glyph.is_none() {
            info.glyph = self.glyphs.as_ref().and_then(|p| p.glyph_for(&name));
        }
        self.order.push(name.clone());
        self.entries.insert(name, Entry { command, info });
        Ok(())
    }

    /// Remove a registration. Returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        if self.entries.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.entries.get(name).map(|e| e.command.as_ref())
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut (dyn Command + 'static)> {
        self.entries.get_mut(name).map(|e| e.command.as_mut())
    }

    #[must_use]
    pub fn info(&self, name: &str) -> Option<&ActionInfo> {
        self.entries.get(name).map(|e| &e.info)
    }

    /// A fresh token presenting the action `name`.
    #[must_use]
    pub fn token_for(&self, name: &str) -> Option<Token> {
        let info = self.info(name)?;
        Some(
            Token::new(name)
                .with_glyph(info.glyph.clone())
                .with_tooltip(info.tooltip.clone()),
        )
    }
}
