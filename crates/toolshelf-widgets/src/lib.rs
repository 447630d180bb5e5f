#![forbid(unsafe_code)]

//! Draggable token collections and palette/toolbar pairs.
//!
//! # Layers
//!
//! - [`token`]: named units with a glyph, tooltip and presentation flags.
//! - [`grid`]: placement of tokens on a grid and the pointer → insertion
//!   index inverse.
//! - [`drag`]: drag policies, payloads and the press/drag/drop lifecycle.
//! - [`collection`]: an ordered container running that lifecycle.
//! - [`action_registry`]: commands behind token names.
//! - [`toolbar`]: the palette/active pair built from two collections.
//! - [`arrangement`]: persisting the active side's order.
//! - [`config`]: toolbar options as data.
//!
//! Everything is single-threaded and synchronous: each pointer call runs a
//! transition to completion before returning.

pub mod action_registry;
pub mod arrangement;
pub mod collection;
pub mod config;
pub mod drag;
pub mod grid;
pub mod token;
pub mod toolbar;

pub use action_registry::{
    ActionInfo, ActionRegistry, CheckableCommand, Command, FnCommand, GlyphProvider,
    RegistryError,
};
pub use arrangement::{
    ArrangementError, ArrangementRecord, ArrangementStore, FORMAT_VERSION, FileStorage,
    MemoryStorage, StorageBackend, StorageError,
};
pub use collection::{Collection, CollectionEvent, DropTarget};
pub use config::{ConfigError, ToolbarConfig};
pub use drag::{
    CopyPolicy, DragEffect, DragPayload, DragPhase, DragPolicy, DragTransition, DropRejection,
    GestureOutcome, IgnorePolicy, ScopeKey,
};
pub use token::{Glyph, Token};
pub use toolbar::{ClickOutcome, DragDropToolbar, Side, ToolbarEvent};
