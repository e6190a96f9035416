//! In-memory projection of the card list onto three ordered columns.
//!
//! Cards live once, keyed by id. Each column holds only ids, in render
//! order, so a move never copies card data and the two can never diverge.
//!
//! # Invariants
//!
//! 1. Every card id appears in exactly one column list.
//! 2. The column lists together hold exactly the keys of the card map.
//! 3. Outside an in-flight preview, a card's status maps to the column it
//!    sits in (`mapper::to_column`).

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::mapper::to_column;
use super::models::{BoardView, Card, Column, ColumnView, DetailedStatus};
use crate::errors::BoardError;

/// Where a card sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: Column,
    pub index: usize,
}

/// Result of a successful `BoardState::move_card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub card_id: String,
    pub from: Placement,
    pub to: Placement,
}

impl MoveOutcome {
    pub fn is_cross_column(&self) -> bool {
        self.from.column != self.to.column
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    cards: HashMap<String, Card>,
    columns: [Vec<String>; 3],
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every card into its column, keeping input order within each
    /// column.
    ///
    /// Duplicate ids keep their first occurrence; progress above 100 is
    /// clamped. Both are logged.
    pub fn build_from_cards(cards: &[Card]) -> Self {
        let mut state = Self::default();
        for card in cards {
            if state.cards.contains_key(&card.id) {
                warn!(card_id = %card.id, "Duplicate card id in board input, keeping first");
                continue;
            }
            let mut card = card.clone();
            if let Err(e) = card.validate() {
                warn!(card_id = %card.id, error = %e, "Clamping card progress");
                card.progress = Card::MAX_PROGRESS;
            }
            let column = to_column(card.display_status);
            state.columns[column.index()].push(card.id.clone());
            state.cards.insert(card.id.clone(), card);
        }
        state
    }

    /// Replace the whole board with a fresh classification of `cards`.
    pub fn rebuild(&mut self, cards: &[Card]) {
        *self = Self::build_from_cards(cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.cards.contains_key(card_id)
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.get(card_id)
    }

    /// Ids of one column, in render order.
    pub fn column(&self, column: Column) -> &[String] {
        &self.columns[column.index()]
    }

    pub fn ids(&self, column: Column) -> Vec<&str> {
        self.column(column).iter().map(String::as_str).collect()
    }

    pub fn placement_of(&self, card_id: &str) -> Option<Placement> {
        Column::ALL.into_iter().find_map(|column| {
            self.columns[column.index()]
                .iter()
                .position(|id| id == card_id)
                .map(|index| Placement { column, index })
        })
    }

    pub fn column_of(&self, card_id: &str) -> Option<Column> {
        self.placement_of(card_id).map(|p| p.column)
    }

    /// Move a card to `target` at `target_index`, clamped to the target's
    /// length after the card has been taken out of its current list.
    ///
    /// Status and progress are left untouched, so hover previews stay cheap
    /// and reversible.
    pub fn move_card(
        &mut self,
        card_id: &str,
        target: Column,
        target_index: usize,
    ) -> Result<MoveOutcome, BoardError> {
        let from = self
            .placement_of(card_id)
            .ok_or_else(|| BoardError::UnknownCard {
                card_id: card_id.to_string(),
            })?;

        let id = self.columns[from.column.index()].remove(from.index);
        let list = &mut self.columns[target.index()];
        let index = target_index.min(list.len());
        list.insert(index, id);

        Ok(MoveOutcome {
            card_id: card_id.to_string(),
            from,
            to: Placement {
                column: target,
                index,
            },
        })
    }

    /// Array move within one column. `to_index` is clamped to the last slot.
    pub fn reorder_within_column(
        &mut self,
        column: Column,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), BoardError> {
        let list = &mut self.columns[column.index()];
        if from_index >= list.len() {
            return Err(BoardError::IndexOutOfRange {
                column,
                index: from_index,
                len: list.len(),
            });
        }
        let to_index = to_index.min(list.len() - 1);
        if from_index != to_index {
            let id = list.remove(from_index);
            list.insert(to_index, id);
        }
        Ok(())
    }

    /// Overwrite a card's status and progress, returning the previous pair.
    pub fn set_status(
        &mut self,
        card_id: &str,
        status: DetailedStatus,
        progress: u8,
    ) -> Result<(DetailedStatus, u8), BoardError> {
        let card = self
            .cards
            .get_mut(card_id)
            .ok_or_else(|| BoardError::UnknownCard {
                card_id: card_id.to_string(),
            })?;
        let previous = (card.display_status, card.progress);
        card.display_status = status;
        card.progress = progress.min(Card::MAX_PROGRESS);
        Ok(previous)
    }

    /// Verify that the columns hold every card exactly once.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        let mut seen = HashSet::with_capacity(self.cards.len());
        for id in self.columns.iter().flatten() {
            if !self.cards.contains_key(id) {
                return Err(BoardError::UnknownCard {
                    card_id: id.clone(),
                });
            }
            if !seen.insert(id.as_str()) {
                return Err(BoardError::DuplicateCard {
                    card_id: id.clone(),
                });
            }
        }
        if let Some(missing) = self.cards.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(BoardError::UnknownCard {
                card_id: missing.clone(),
            });
        }
        Ok(())
    }

    /// Cards whose status maps to a different column than the one they sit
    /// in. Empty whenever no preview is in flight.
    pub fn misaligned_cards(&self) -> Vec<&str> {
        let mut misaligned = Vec::new();
        for column in Column::ALL {
            for id in &self.columns[column.index()] {
                let aligned = self
                    .cards
                    .get(id)
                    .is_some_and(|c| to_column(c.display_status) == column);
                if !aligned {
                    misaligned.push(id.as_str());
                }
            }
        }
        misaligned
    }

    pub fn snapshot(&self) -> BoardView {
        let columns = Column::ALL
            .into_iter()
            .map(|column| ColumnView {
                name: column,
                cards: self.columns[column.index()]
                    .iter()
                    .filter_map(|id| self.cards.get(id).cloned())
                    .collect(),
            })
            .collect();
        BoardView { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, status: DetailedStatus) -> Card {
        Card::new(id, status, 0)
    }

    fn sample_board() -> BoardState {
        BoardState::build_from_cards(&[
            card("A", DetailedStatus::Pending),
            card("C", DetailedStatus::Review),
            card("B", DetailedStatus::OnHold),
            card("D", DetailedStatus::Completed),
            card("E", DetailedStatus::Approved),
        ])
    }

    #[test]
    fn test_build_classifies_and_preserves_order() {
        let board = sample_board();
        assert_eq!(board.ids(Column::Pending), vec!["A", "B"]);
        assert_eq!(board.ids(Column::InProgress), vec!["C", "E"]);
        assert_eq!(board.ids(Column::Completed), vec!["D"]);
        assert_eq!(board.len(), 5);
        board.check_invariants().unwrap();
        assert!(board.misaligned_cards().is_empty());
    }

    #[test]
    fn test_build_is_idempotent_and_leaves_input_alone() {
        let cards = vec![
            card("A", DetailedStatus::Cancelled),
            card("B", DetailedStatus::InProgress),
        ];
        let before = cards.clone();
        let first = BoardState::build_from_cards(&cards);
        let second = BoardState::build_from_cards(&cards);
        assert_eq!(first, second);
        assert_eq!(cards, before);
    }

    #[test]
    fn test_build_drops_duplicate_ids() {
        let board = BoardState::build_from_cards(&[
            card("A", DetailedStatus::Pending),
            card("A", DetailedStatus::Completed),
        ]);
        assert_eq!(board.len(), 1);
        assert_eq!(board.ids(Column::Pending), vec!["A"]);
        assert!(board.ids(Column::Completed).is_empty());
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_build_clamps_progress() {
        let board = BoardState::build_from_cards(&[Card::new("A", DetailedStatus::Review, 180)]);
        assert_eq!(board.card("A").unwrap().progress, 100);
    }

    #[test]
    fn test_move_card_across_columns() {
        let mut board = sample_board();
        let outcome = board.move_card("B", Column::Completed, 0).unwrap();
        assert!(outcome.is_cross_column());
        assert_eq!(
            outcome.from,
            Placement {
                column: Column::Pending,
                index: 1
            }
        );
        assert_eq!(board.ids(Column::Pending), vec!["A"]);
        assert_eq!(board.ids(Column::Completed), vec!["B", "D"]);
        // Status is untouched by a move
        assert_eq!(board.card("B").unwrap().display_status, DetailedStatus::OnHold);
        assert_eq!(board.misaligned_cards(), vec!["B"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_card_clamps_index() {
        let mut board = sample_board();
        let outcome = board.move_card("A", Column::InProgress, 99).unwrap();
        assert_eq!(outcome.to.index, 2);
        assert_eq!(board.ids(Column::InProgress), vec!["C", "E", "A"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_card_into_empty_column() {
        let mut board = BoardState::build_from_cards(&[card("A", DetailedStatus::Pending)]);
        board.move_card("A", Column::Completed, 0).unwrap();
        assert_eq!(board.ids(Column::Completed), vec!["A"]);
        assert!(board.ids(Column::Pending).is_empty());
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_unknown_card_is_error_and_no_op() {
        let mut board = sample_board();
        let before = board.clone();
        let err = board.move_card("ghost", Column::Pending, 0).unwrap_err();
        assert!(matches!(err, BoardError::UnknownCard { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut board = BoardState::build_from_cards(&[
            card("A", DetailedStatus::Pending),
            card("B", DetailedStatus::Pending),
            card("C", DetailedStatus::Pending),
        ]);
        board.reorder_within_column(Column::Pending, 0, 2).unwrap();
        assert_eq!(board.ids(Column::Pending), vec!["B", "C", "A"]);
        board.check_invariants().unwrap();

        board.reorder_within_column(Column::Pending, 2, 0).unwrap();
        assert_eq!(board.ids(Column::Pending), vec!["A", "B", "C"]);

        board.reorder_within_column(Column::Pending, 1, 1).unwrap();
        assert_eq!(board.ids(Column::Pending), vec!["A", "B", "C"]);

        board.reorder_within_column(Column::Pending, 0, 50).unwrap();
        assert_eq!(board.ids(Column::Pending), vec!["B", "C", "A"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_reorder_out_of_range_is_error() {
        let mut board = sample_board();
        let err = board
            .reorder_within_column(Column::Completed, 3, 0)
            .unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { len: 1, .. }));

        let mut empty = BoardState::new();
        assert!(empty.reorder_within_column(Column::Pending, 0, 0).is_err());
    }

    #[test]
    fn test_set_status_returns_previous_pair() {
        let mut board = BoardState::build_from_cards(&[Card::new("A", DetailedStatus::Review, 70)]);
        let previous = board
            .set_status("A", DetailedStatus::Completed, 100)
            .unwrap();
        assert_eq!(previous, (DetailedStatus::Review, 70));
        assert_eq!(board.card("A").unwrap().display_status, DetailedStatus::Completed);
        assert!(board.set_status("B", DetailedStatus::Pending, 0).is_err());
    }

    #[test]
    fn test_check_invariants_detects_corruption() {
        let mut board = sample_board();
        board.columns[Column::Completed.index()].push("A".to_string());
        assert!(matches!(
            board.check_invariants(),
            Err(BoardError::DuplicateCard { .. })
        ));

        let mut board = sample_board();
        board.columns[Column::Pending.index()].clear();
        assert!(matches!(
            board.check_invariants(),
            Err(BoardError::UnknownCard { .. })
        ));
    }

    #[test]
    fn test_snapshot_carries_full_cards_in_order() {
        let board = BoardState::build_from_cards(&[
            Card::new("A", DetailedStatus::Review, 70).with_metadata("name", "Site".into()),
            card("B", DetailedStatus::Approved),
        ]);
        let view = board.snapshot();
        assert_eq!(view.columns.len(), 3);
        assert_eq!(view.columns[1].name, Column::InProgress);
        assert_eq!(view.ids(Column::InProgress), vec!["A", "B"]);
        assert_eq!(view.column(Column::InProgress).cards[0].name(), "Site");
        assert!(view.column(Column::Pending).cards.is_empty());
    }
}
