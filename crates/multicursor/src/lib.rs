//! Multicursor: a multi-range text editing engine.
//!
//! The engine keeps a set of selection ranges over one text buffer and runs
//! every editing command across all of them at once. After each replacement
//! the untouched ranges are resynchronised so they keep denoting the same
//! text, and overlapping or abutting ranges merge.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`CursorEngine`] - The range set and the commands that act on it
//! - [`Host`] - The buffer, layout and undo collaborators for one call
//! - [`Command`] - Editing verbs for dispatch through [`CursorEngine::perform`]
//!
//! # Collaborators
//!
//! - [`TextBuffer`] with the rope-backed [`RopeBuffer`]
//! - [`LayoutProvider`] with the cell-grid [`GridLayout`]
//! - [`UndoHost`] with the in-memory [`UndoStack`]
//!
//! Offsets count Unicode scalar values.

/// Text storage.
mod buffer;
/// Clipboard payloads.
mod clipboard;
/// Command vocabulary.
mod command;
/// Engine settings.
mod config;
/// The range set.
pub mod cursors;
/// The engine.
mod engine;
/// Error types.
pub mod error;
/// Pointer and keyboard gestures.
pub mod gesture;
/// The collaborator bundle.
mod host;
/// Geometry and segmentation.
mod layout;
/// Selection ranges.
mod range;
/// Grapheme and word segmentation helpers.
mod segment;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Undo registration.
mod undo;

pub use buffer::{ChangeFilter, RopeBuffer, TextBuffer};
pub use clipboard::ClipboardContents;
pub use command::{CaseTransform, Command, Granularity, Outcome};
pub use config::EngineConfig;
pub use cursors::CursorSet;
pub use engine::CursorEngine;
pub use error::{Error, Result};
pub use geom::{Direction, Point, Rect};
pub use host::Host;
pub use layout::{GridLayout, LayoutProvider, Towards, WrapMode};
pub use range::TextRange;
pub use undo::{Inverse, Transaction, UndoHost, UndoStack};
