use crate::drag::DragPayload;
use crate::drop_indicator::{Indicator, InsertionPoint, nearest_insertion_point};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a card on the board.
pub type CardId = String;

/// Key identifying a column on the board.
pub type ColumnKey = String;

/// Largest number of columns a board holds.
pub const MAX_COLUMNS: usize = 9;

/// A card as the board sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardCard {
    pub id: CardId,
    pub title: String,
    /// Key of the column currently holding the card.
    pub column: ColumnKey,
}

/// A column and the cards it holds, in display order.
///
/// Serializes one way only; a board is rebuilt from storage through
/// [`Board::from_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BoardColumn {
    pub key: ColumnKey,
    pub title: String,
    pub heading_color: String,
    cards: Vec<BoardCard>,
}

impl BoardColumn {
    pub fn new(key: impl Into<ColumnKey>, title: impl Into<String>, heading_color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            heading_color: heading_color.into(),
            cards: Vec::new(),
        }
    }

    /// Cards of the column in display order.
    pub fn cards(&self) -> &[BoardCard] {
        &self.cards
    }

    /// Ids of the cards in display order.
    pub fn card_ids(&self) -> Vec<&str> {
        self.cards.iter().map(|card| card.id.as_str()).collect()
    }

    fn position(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }
}

/// A card read back from storage together with its persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCard {
    pub id: CardId,
    pub title: String,
    pub order: i64,
}

/// A column read back from storage together with its persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumn {
    pub key: ColumnKey,
    pub title: String,
    pub heading_color: String,
    pub order: i64,
    pub cards: Vec<PersistedCard>,
}

/// Why a move left the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NoMoveReason {
    /// The card was dropped on the indicator right before itself.
    DroppedOnSelf,
    /// The dragged card is not on the board.
    UnknownCard,
    /// The target column is not on the board.
    UnknownColumn,
    /// The anchor card is not in the target column.
    UnknownAnchor,
    /// The target column rendered no indicators.
    NoIndicators,
    /// The drag payload was not a card.
    NotACard,
}

/// Result of moving a card.
///
/// `Moved` carries everything a caller needs to persist the move elsewhere;
/// the board itself never does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveOutcome {
    Moved {
        card_id: CardId,
        from_column: ColumnKey,
        to_column: ColumnKey,
        /// Position of the card inside `to_column` after the move.
        index: usize,
    },
    Unchanged(NoMoveReason),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Result of dropping a payload on the discard target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardOutcome {
    CardRemoved(BoardCard),
    /// The column was removed along with every card it held.
    ColumnRemoved(BoardColumn),
    Unchanged,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Title cannot be empty")]
    BlankTitle,
    #[error("Board already has the maximum of {0} columns")]
    ColumnLimitReached(usize),
    #[error("Column '{0}' already exists")]
    DuplicateColumn(ColumnKey),
    #[error("Column '{0}' not found")]
    UnknownColumn(ColumnKey),
    #[error("Card '{0}' already exists")]
    DuplicateCard(CardId),
}

/// The columns of one project and the cards inside them.
///
/// Every card listed under a column has `card.column == column.key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Board {
    columns: Vec<BoardColumn>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from stored columns, sorting columns and cards by their
    /// persisted order. Equal orders keep their input order.
    pub fn from_columns(columns: impl IntoIterator<Item = PersistedColumn>) -> Self {
        let mut columns: Vec<PersistedColumn> = columns.into_iter().collect();
        columns.sort_by_key(|column| column.order);

        let columns = columns
            .into_iter()
            .map(|mut persisted| {
                persisted.cards.sort_by_key(|card| card.order);
                let cards = persisted
                    .cards
                    .into_iter()
                    .map(|card| BoardCard {
                        id: card.id,
                        title: card.title,
                        column: persisted.key.clone(),
                    })
                    .collect();
                BoardColumn {
                    key: persisted.key,
                    title: persisted.title,
                    heading_color: persisted.heading_color,
                    cards,
                }
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// Cards of a column in display order; empty for an unknown column.
    pub fn cards_in(&self, key: &str) -> &[BoardCard] {
        self.column(key).map(BoardColumn::cards).unwrap_or(&[])
    }

    pub fn find_card(&self, card_id: &str) -> Option<&BoardCard> {
        self.locate(card_id)
            .map(|(column, index)| &self.columns[column].cards[index])
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Appends a column whose key is derived from its title.
    pub fn add_column(&mut self, title: &str, heading_color: &str) -> Result<&BoardColumn, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::BlankTitle);
        }
        if self.columns.len() >= MAX_COLUMNS {
            return Err(BoardError::ColumnLimitReached(MAX_COLUMNS));
        }

        let key = column_key_from_title(title);
        if self.column_index(&key).is_some() {
            return Err(BoardError::DuplicateColumn(key));
        }

        self.columns.push(BoardColumn::new(key, title, heading_color));
        Ok(&self.columns[self.columns.len() - 1])
    }

    /// Appends a card to the end of `column`.
    pub fn add_card(
        &mut self,
        column: &str,
        id: impl Into<CardId>,
        title: &str,
    ) -> Result<&BoardCard, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::BlankTitle);
        }

        let id = id.into();
        if self.locate(&id).is_some() {
            return Err(BoardError::DuplicateCard(id));
        }

        let index = self
            .column_index(column)
            .ok_or_else(|| BoardError::UnknownColumn(column.to_string()))?;
        let target = &mut self.columns[index];
        target.cards.push(BoardCard {
            id,
            title: title.to_string(),
            column: target.key.clone(),
        });
        Ok(&target.cards[target.cards.len() - 1])
    }

    /// Moves a card into `target_column` at `before`.
    ///
    /// Stale ids leave the board untouched and report why.
    pub fn move_card(
        &mut self,
        card_id: &str,
        target_column: &str,
        before: &InsertionPoint,
    ) -> MoveOutcome {
        if before.anchor() == Some(card_id) {
            return MoveOutcome::Unchanged(NoMoveReason::DroppedOnSelf);
        }

        let Some((from, from_index)) = self.locate(card_id) else {
            return MoveOutcome::Unchanged(NoMoveReason::UnknownCard);
        };
        let Some(to) = self.column_index(target_column) else {
            return MoveOutcome::Unchanged(NoMoveReason::UnknownColumn);
        };
        if let Some(anchor) = before.anchor() {
            if self.columns[to].position(anchor).is_none() {
                return MoveOutcome::Unchanged(NoMoveReason::UnknownAnchor);
            }
        }

        let mut card = self.columns[from].cards.remove(from_index);
        let to_column = self.columns[to].key.clone();
        let from_column = std::mem::replace(&mut card.column, to_column.clone());

        let target = &mut self.columns[to];
        let index = before
            .anchor()
            .and_then(|anchor| target.position(anchor))
            .unwrap_or(target.cards.len());
        target.cards.insert(index, card);

        MoveOutcome::Moved {
            card_id: card_id.to_string(),
            from_column,
            to_column,
            index,
        }
    }

    /// Moves a card to wherever a drop at `pointer_y` over `target_column`
    /// resolves among that column's indicators.
    pub fn drop_card(
        &mut self,
        card_id: &str,
        target_column: &str,
        pointer_y: f64,
        indicators: &[Indicator],
    ) -> MoveOutcome {
        match nearest_insertion_point(pointer_y, indicators) {
            Some(before) => self.move_card(card_id, target_column, &before),
            None => MoveOutcome::Unchanged(NoMoveReason::NoIndicators),
        }
    }

    /// Removes whatever `payload` refers to.
    pub fn discard(&mut self, payload: &DragPayload) -> DiscardOutcome {
        match payload {
            DragPayload::Card(card_id) => match self.locate(card_id) {
                Some((column, index)) => {
                    DiscardOutcome::CardRemoved(self.columns[column].cards.remove(index))
                }
                None => DiscardOutcome::Unchanged,
            },
            DragPayload::Column(key) => match self.column_index(key) {
                Some(index) => DiscardOutcome::ColumnRemoved(self.columns.remove(index)),
                None => DiscardOutcome::Unchanged,
            },
        }
    }

    fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }

    fn locate(&self, card_id: &str) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(column, entry)| entry.position(card_id).map(|index| (column, index)))
    }
}

/// Lower-cases the title and joins its words with `-`.
pub fn column_key_from_title(title: &str) -> ColumnKey {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
