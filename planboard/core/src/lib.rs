//! Ordering engine for the Planboard Kanban board.
//!
//! Everything here is pure, in-memory state: drop-indicator geometry, the
//! owned board structure, and the drag gesture that ties them together. No
//! rendering system or network call is involved.
pub mod board;
pub mod drag;
pub mod drop_indicator;

pub use board::{
    Board, BoardCard, BoardColumn, BoardError, CardId, ColumnKey, DiscardOutcome, MAX_COLUMNS,
    MoveOutcome, NoMoveReason, PersistedCard, PersistedColumn, column_key_from_title,
};
pub use drag::{CARD_ID_KEY, COLUMN_KEY, DragPayload, DragSession};
pub use drop_indicator::{
    DISTANCE_OFFSET, Indicator, InsertionPoint, nearest_indicator, nearest_indicator_with_offset,
    nearest_insertion_point,
};
