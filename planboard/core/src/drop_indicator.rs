use crate::board::CardId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertical distance, in pixels, an indicator's top must sit above the
/// pointer before it becomes a drop candidate.
pub const DISTANCE_OFFSET: f64 = 50.0;

/// Where a dropped card lands relative to the cards already in a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InsertionPoint {
    /// Insert immediately before the card with this id.
    Before(CardId),
    /// Append after the last card of the column.
    End,
}

impl InsertionPoint {
    /// Returns the anchor card id, or `None` for the end of the column.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            InsertionPoint::Before(id) => Some(id),
            InsertionPoint::End => None,
        }
    }
}

/// A drop marker rendered at an item boundary inside a column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Indicator {
    pub before: InsertionPoint,
    pub top: f64,
}

impl Indicator {
    /// Indicator placed before the card `id`.
    pub fn before(id: impl Into<CardId>, top: f64) -> Self {
        Self {
            before: InsertionPoint::Before(id.into()),
            top,
        }
    }

    /// Indicator placed after the last card of a column.
    pub fn end(top: f64) -> Self {
        Self {
            before: InsertionPoint::End,
            top,
        }
    }
}

/// Returns the index of the indicator a drop at `pointer_y` resolves to.
///
/// Uses [`DISTANCE_OFFSET`]. See [`nearest_indicator_with_offset`].
pub fn nearest_indicator(pointer_y: f64, indicators: &[Indicator]) -> Option<usize> {
    nearest_indicator_with_offset(pointer_y, indicators, DISTANCE_OFFSET)
}

/// Returns the index of the indicator a drop at `pointer_y` resolves to.
///
/// Every indicator gets `offset = pointer_y - (top + distance_offset)`. The
/// indicator with the largest negative offset wins; on equal offsets the
/// first one encountered is kept. When no offset is negative the last
/// indicator is chosen. Returns `None` only for an empty slice.
pub fn nearest_indicator_with_offset(
    pointer_y: f64,
    indicators: &[Indicator],
    distance_offset: f64,
) -> Option<usize> {
    let fallback = indicators.len().checked_sub(1)?;
    Some(closest_above(pointer_y, indicators, distance_offset).unwrap_or(fallback))
}

/// Resolves the insertion point for a drop at `pointer_y`.
///
/// A pointer below every threshold appends to the end of the column, whether
/// or not the caller rendered a trailing [`InsertionPoint::End`] indicator.
pub fn nearest_insertion_point(pointer_y: f64, indicators: &[Indicator]) -> Option<InsertionPoint> {
    if indicators.is_empty() {
        return None;
    }
    let point = closest_above(pointer_y, indicators, DISTANCE_OFFSET)
        .map_or(InsertionPoint::End, |index| indicators[index].before.clone());
    Some(point)
}

fn closest_above(pointer_y: f64, indicators: &[Indicator], distance_offset: f64) -> Option<usize> {
    indicators
        .iter()
        .enumerate()
        .fold(None, |closest: Option<(usize, f64)>, (index, indicator)| {
            let offset = pointer_y - (indicator.top + distance_offset);
            match closest {
                Some((_, closest_offset)) if offset <= closest_offset => closest,
                _ if offset < 0.0 => Some((index, offset)),
                _ => closest,
            }
        })
        .map(|(index, _)| index)
}
