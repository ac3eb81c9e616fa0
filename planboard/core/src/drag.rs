//! A single drag gesture, from drag start to drop.
//!
//! The payload travels in the data transfer under one of two keys: `cardId`
//! when a card is dragged, `column` when a whole column is. While the pointer
//! is over a column the nearest drop indicator of that column is highlighted;
//! leaving the column or dropping clears the highlight.

use crate::board::{Board, CardId, ColumnKey, DiscardOutcome, MoveOutcome, NoMoveReason};
use crate::drop_indicator::{Indicator, nearest_indicator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Data-transfer key carrying a dragged card id.
pub const CARD_ID_KEY: &str = "cardId";
/// Data-transfer key carrying a dragged column key.
pub const COLUMN_KEY: &str = "column";

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DragPayload {
    Card(CardId),
    Column(ColumnKey),
}

impl DragPayload {
    /// Reads the payload from data-transfer entries.
    ///
    /// A non-empty `cardId` wins over a non-empty `column`; anything else
    /// carries no payload.
    pub fn from_data_transfer<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<Self> {
        let mut column = None;
        for (key, value) in entries {
            if value.is_empty() {
                continue;
            }
            match key {
                CARD_ID_KEY => return Some(DragPayload::Card(value.to_string())),
                COLUMN_KEY => column = Some(DragPayload::Column(value.to_string())),
                _ => {}
            }
        }
        column
    }

    /// The key and value to store in the data transfer on drag start.
    pub fn data_transfer_entry(&self) -> (&'static str, &str) {
        match self {
            DragPayload::Card(id) => (CARD_ID_KEY, id),
            DragPayload::Column(key) => (COLUMN_KEY, key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Highlight {
    column: ColumnKey,
    indicator: usize,
}

/// State of the one drag in progress.
///
/// Dropping consumes the session. Dropping the value without calling either
/// drop method is a cancelled drag and leaves the board alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    payload: DragPayload,
    highlight: Option<Highlight>,
}

impl DragSession {
    pub fn start(payload: DragPayload) -> Self {
        Self {
            payload,
            highlight: None,
        }
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    /// Highlights the indicator of `column` nearest to the pointer, clearing
    /// any highlight elsewhere. Returns the highlighted index.
    pub fn drag_over(&mut self, column: &str, pointer_y: f64, indicators: &[Indicator]) -> Option<usize> {
        self.highlight = nearest_indicator(pointer_y, indicators).map(|indicator| Highlight {
            column: column.to_string(),
            indicator,
        });
        self.highlight.as_ref().map(|highlight| highlight.indicator)
    }

    /// Clears the highlight if it belongs to `column`.
    pub fn drag_leave(&mut self, column: &str) {
        if self
            .highlight
            .as_ref()
            .is_some_and(|highlight| highlight.column == column)
        {
            self.highlight = None;
        }
    }

    /// The column and indicator index currently highlighted.
    pub fn highlighted(&self) -> Option<(&str, usize)> {
        self.highlight
            .as_ref()
            .map(|highlight| (highlight.column.as_str(), highlight.indicator))
    }

    /// Ends the drag over a card column.
    ///
    /// Only card payloads move; a column dropped on a column is a no-op.
    pub fn drop_on_column(
        self,
        board: &mut Board,
        column: &str,
        pointer_y: f64,
        indicators: &[Indicator],
    ) -> MoveOutcome {
        match self.payload {
            DragPayload::Card(card_id) => board.drop_card(&card_id, column, pointer_y, indicators),
            DragPayload::Column(_) => MoveOutcome::Unchanged(NoMoveReason::NotACard),
        }
    }

    /// Ends the drag over the discard target.
    pub fn drop_on_discard(self, board: &mut Board) -> DiscardOutcome {
        board.discard(&self.payload)
    }
}
