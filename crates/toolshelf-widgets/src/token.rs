#![forbid(unsafe_code)]

//! Tokens: the named, draggable units held by a collection.
//!
//! A token's identity is its name. Everything else (glyph, tooltip, the
//! pressed and emphasized markers) is presentation and may change freely.
//! Equality and hashing look at the name only.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use toolshelf_core::geometry::Size;
use unicode_width::UnicodeWidthStr;

/// Height of a text-only token: one text row plus a frame row above and below.
pub const TEXT_TOKEN_HEIGHT: u16 = 3;

/// Cells added on each side of a text label for its raised frame.
const FRAME_CELLS: u16 = 1;

/// The image shown for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Glyph {
    /// An image resolved by the host's glyph provider, referenced by key.
    Image { key: String, size: Size },
    /// A snapshot of the token's label, taken when a text-only token is first
    /// dragged.
    TextSnapshot { text: String, size: Size },
}

impl Glyph {
    /// Create an image glyph.
    #[must_use]
    pub fn image(key: impl Into<String>, size: Size) -> Self {
        Self::Image {
            key: key.into(),
            size,
        }
    }

    /// Rendered size of the glyph.
    #[must_use]
    pub const fn size(&self) -> Size {
        match self {
            Self::Image { size, .. } | Self::TextSnapshot { size, .. } => *size,
        }
    }

    #[must_use]
    pub const fn is_snapshot(&self) -> bool {
        matches!(self, Self::TextSnapshot { .. })
    }
}

/// A named, iconified action representation.
#[derive(Debug, Clone)]
pub struct Token {
    name: String,
    glyph: Option<Glyph>,
    tooltip: String,
    emphasized: bool,
    pressed: bool,
}

impl Token {
    /// Create a text-only token.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyph: None,
            tooltip: String::new(),
            emphasized: false,
            pressed: false,
        }
    }

    /// Set the glyph (builder).
    #[must_use]
    pub fn with_glyph(mut self, glyph: Option<Glyph>) -> Self {
        self.glyph = glyph;
        self
    }

    /// Set the tooltip (builder).
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn glyph(&self) -> Option<&Glyph> {
        self.glyph.as_ref()
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    /// Whether the token carries the "checked" border.
    #[must_use]
    pub const fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    pub fn set_emphasized(&mut self, emphasized: bool) {
        self.emphasized = emphasized;
    }

    /// Whether the token is drawn dimmed because the pointer is held on it.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Force the size of an image glyph. Text tokens and snapshots keep
    /// their measured size.
    pub fn resize_glyph(&mut self, size: Size) {
        if let Some(Glyph::Image { size: current, .. }) = &mut self.glyph {
            *current = size;
        }
    }

    /// Rendered size: the glyph's size, or the framed label for text tokens.
    #[must_use]
    pub fn extent(&self) -> Size {
        match &self.glyph {
            Some(glyph) => glyph.size(),
            None => text_extent(&self.name),
        }
    }

    /// Return the glyph, substituting a snapshot of the label if there is
    /// none yet.
    pub fn snapshot_glyph(&mut self) -> &Glyph {
        let name = &self.name;
        self.glyph.get_or_insert_with(|| Glyph::TextSnapshot {
            text: name.clone(),
            size: text_extent(name),
        })
    }

    /// A fresh token with the same name, glyph and tooltip, in its normal
    /// presentation.
    #[must_use]
    pub fn recreate(&self) -> Self {
        Self::new(self.name.clone())
            .with_glyph(self.glyph.clone())
            .with_tooltip(self.tooltip.clone())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Size of a framed text label.
#[must_use]
pub fn text_extent(text: &str) -> Size {
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    Size::new(
        width.saturating_add(2 * FRAME_CELLS).max(2 * FRAME_CELLS + 1),
        TEXT_TOKEN_HEIGHT,
    )
}
