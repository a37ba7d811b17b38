//! # Trellis Core
//!
//! State model and reordering engine for Trellis kanban boards.
//!
//! Boards hold ordered lists and lists hold ordered cards. Records live in a
//! flat [`EntityStore`] keyed by ID while display order lives in separate
//! [`OrderIndex`]es, so moving things around never touches record payloads.
//! All writes go through [`Kanban`]; drag gestures from a UI are turned into
//! move commands by a [`DragAdapter`].

pub mod config;
pub mod domain;
pub mod drag;
pub mod engine;
pub mod error;
pub mod selectors;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use config::TrellisConfig;
pub use domain::{Board, BoardId, Card, CardId, List, ListId};
pub use drag::{DragAdapter, DragKind, DragOutcome, DragResult, DragStart, MoveTarget};
pub use engine::{Kanban, Outcome};
pub use error::{Result, TrellisError};
pub use selectors::{BoardDetail, BoardView, CardView, ListDetail, ListView};
pub use state::{EntityStore, KanbanState, OrderIndex};
pub use storage::Storage;
