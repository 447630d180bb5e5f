#![forbid(unsafe_code)]

//! toolshelf public facade crate.
//!
//! Re-exports the types a host needs to run a customizable palette/toolbar
//! pair, plus a top-level [`Error`] and a prelude.
//!
//! ```rust,ignore
//! use toolshelf::prelude::*;
//!
//! let config = ToolbarConfig::from_toml_file("toolbar.toml")?.validated()?;
//! let mut toolbar = DragDropToolbar::new("Render toolbar", config);
//! toolbar.add_action("clip", FnCommand::new(|_| clip()), ActionInfo::new("Clip"))?;
//!
//! let mut store = ArrangementStore::new(FileStorage::new(settings_dir)?);
//! store.restore(&mut toolbar, 1)?;
//! ```

pub mod error;

// --- Core re-exports -------------------------------------------------------

pub use toolshelf_core::event::{PointerButton, PointerEvent, PointerEventKind};
pub use toolshelf_core::geometry::{Orientation, Position, Rect, Size};
pub use toolshelf_core::gesture::{DEFAULT_DRAG_THRESHOLD, DragTuning};

// --- Widget re-exports -----------------------------------------------------

pub use toolshelf_widgets::{
    ActionInfo, ActionRegistry, ArrangementError, ArrangementRecord, ArrangementStore,
    CheckableCommand, ClickOutcome, Collection, CollectionEvent, Command, ConfigError, CopyPolicy,
    DragDropToolbar, DragEffect, DragPayload, DragPhase, DragPolicy, DragTransition, DropRejection,
    DropTarget, FORMAT_VERSION, FileStorage, FnCommand, GestureOutcome, Glyph, GlyphProvider,
    IgnorePolicy, MemoryStorage, RegistryError, ScopeKey, Side, StorageBackend, StorageError,
    Token, ToolbarConfig, ToolbarEvent,
};

// --- Errors ----------------------------------------------------------------

pub use error::{Error, Result};

// --- Logging ---------------------------------------------------------------

/// Subscriber setup for binaries that do not install their own.
#[cfg(feature = "tracing-json")]
pub mod logging {
    pub use toolshelf_core::logging::{LogFormat, init};
}

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionInfo, ArrangementStore, CheckableCommand, ClickOutcome, Command, DragDropToolbar,
        Error, FileStorage, FnCommand, MemoryStorage, Orientation, PointerEvent, Position, Result,
        Side, Token, ToolbarConfig, ToolbarEvent,
    };
    pub use crate::{core, widgets};
}

pub use toolshelf_core as core;
pub use toolshelf_widgets as widgets;
