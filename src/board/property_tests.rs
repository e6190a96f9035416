//! Property-based tests for the board engine
//!
//! These tests use proptest to check the board invariants across random
//! card sets and random gesture sequences.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::board::controller::KanbanBoard;
    use crate::board::emitter::RecordingSink;
    use crate::board::mapper::{is_canonical, to_canonical, to_column};
    use crate::board::models::{Card, Column, DetailedStatus};
    use crate::board::session::DragOutcome;
    use crate::board::state::BoardState;

    // ===== STRATEGY HELPERS =====

    fn any_status() -> impl Strategy<Value = DetailedStatus> {
        prop::sample::select(DetailedStatus::ALL.to_vec())
    }

    fn any_column() -> impl Strategy<Value = Column> {
        prop::sample::select(Column::ALL.to_vec())
    }

    /// Cards with unique ids c0, c1, ...
    fn any_cards() -> impl Strategy<Value = Vec<Card>> {
        prop::collection::vec((any_status(), 0u8..=100), 0..12).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (status, progress))| Card::new(format!("c{}", i), status, progress))
                .collect()
        })
    }

    #[derive(Debug, Clone)]
    enum Op {
        Move { card: usize, column: Column, index: usize },
        Reorder { column: Column, from: usize, to: usize },
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..16, any_column(), 0usize..16)
                .prop_map(|(card, column, index)| Op::Move { card, column, index }),
            (any_column(), 0usize..16, 0usize..16)
                .prop_map(|(column, from, to)| Op::Reorder { column, from, to }),
        ]
    }

    #[derive(Debug, Clone)]
    enum Gesture {
        Start(usize),
        Over(Target),
        End(Option<Target>),
    }

    #[derive(Debug, Clone)]
    enum Target {
        Column(Column),
        Card(usize),
        Junk,
    }

    fn any_target() -> impl Strategy<Value = Target> {
        prop_oneof![
            any_column().prop_map(Target::Column),
            (0usize..16).prop_map(Target::Card),
            Just(Target::Junk),
        ]
    }

    fn any_gesture() -> impl Strategy<Value = Gesture> {
        prop_oneof![
            (0usize..16).prop_map(Gesture::Start),
            any_target().prop_map(Gesture::Over),
            prop::option::of(any_target()).prop_map(Gesture::End),
        ]
    }

    fn target_id(target: &Target) -> String {
        match target {
            Target::Column(column) => column.as_str().to_string(),
            Target::Card(i) => format!("c{}", i),
            Target::Junk => "not-a-target".to_string(),
        }
    }

    fn id_set(board: &BoardState) -> BTreeSet<String> {
        Column::ALL
            .into_iter()
            .flat_map(|c| board.column(c).to_vec())
            .collect()
    }

    // ===== MAPPING =====

    proptest! {
        /// Property: every status maps to a column whose canonical status maps back
        #[test]
        fn test_mapping_is_total_and_stable(status in any_status()) {
            let column = to_column(status);
            prop_assert!(Column::ALL.contains(&column));
            let canonical = to_canonical(column);
            prop_assert_eq!(to_column(canonical.status), column);
            if is_canonical(status) {
                prop_assert_eq!(canonical.status, status);
            }
        }
    }

    // ===== COVERAGE =====

    proptest! {
        /// Property: no sequence of moves or reorders creates, drops, or duplicates a card
        #[test]
        fn test_operations_preserve_card_set(cards in any_cards(), ops in prop::collection::vec(any_op(), 0..40)) {
            let mut board = BoardState::build_from_cards(&cards);
            let expected: BTreeSet<String> = cards.iter().map(|c| c.id.clone()).collect();
            prop_assert_eq!(id_set(&board), expected.clone());

            for op in ops {
                match op {
                    Op::Move { card, column, index } => {
                        let _ = board.move_card(&format!("c{}", card), column, index);
                    }
                    Op::Reorder { column, from, to } => {
                        let _ = board.reorder_within_column(column, from, to);
                    }
                }
                prop_assert!(board.check_invariants().is_ok());
                prop_assert_eq!(id_set(&board), expected.clone());
            }
        }

        /// Property: building twice from the same input gives the same board
        #[test]
        fn test_build_is_idempotent(cards in any_cards()) {
            let first = BoardState::build_from_cards(&cards);
            let second = BoardState::build_from_cards(&cards);
            prop_assert_eq!(first, second);
        }
    }

    // ===== GESTURES =====

    proptest! {
        /// Property: random gestures keep invariants and emit at most once per commit
        #[test]
        fn test_gestures_emit_once_per_commit(cards in any_cards(), gestures in prop::collection::vec(any_gesture(), 0..40)) {
            let sink = Arc::new(RecordingSink::new());
            let mut board = KanbanBoard::new(&cards, sink.clone());
            let expected: BTreeSet<String> = cards.iter().map(|c| c.id.clone()).collect();
            let mut commits = 0usize;

            for gesture in gestures {
                let outcome = match gesture {
                    Gesture::Start(i) => board.drag_start(&format!("c{}", i)),
                    Gesture::Over(target) => board.drag_over(&target_id(&target)),
                    Gesture::End(target) => {
                        let id = target.as_ref().map(target_id);
                        board.drag_end(id.as_deref())
                    }
                };
                if matches!(outcome, DragOutcome::Committed(_)) {
                    commits += 1;
                }
                prop_assert!(board.state().check_invariants().is_ok());
                prop_assert_eq!(id_set(board.state()), expected.clone());
                prop_assert_eq!(sink.status_changes().len(), commits);
                if !board.session().is_dragging() {
                    prop_assert!(board.state().misaligned_cards().is_empty());
                }
            }
        }

        /// Property: dropping on the last hovered target outside the origin
        /// column leaves the card exactly where the preview put it
        #[test]
        fn test_cross_column_drop_keeps_preview_position(
            cards in any_cards(),
            start in 0usize..12,
            hovers in prop::collection::vec(any_target(), 1..8),
        ) {
            let sink = Arc::new(RecordingSink::new());
            let mut board = KanbanBoard::new(&cards, sink.clone());
            let card_id = format!("c{}", start);

            board.drag_start(&card_id);
            prop_assume!(board.session().is_dragging());
            let origin = board.state().column_of(&card_id);
            for target in &hovers {
                board.drag_over(&target_id(target));
            }
            let previewed = board.state().placement_of(&card_id);
            prop_assume!(previewed.map(|p| p.column) != origin);

            let last = target_id(&hovers[hovers.len() - 1]);
            let outcome = board.drag_end(Some(last.as_str()));

            prop_assert!(matches!(outcome, DragOutcome::Committed(_)));
            prop_assert_eq!(board.state().placement_of(&card_id), previewed);
            prop_assert_eq!(sink.status_changes().len(), 1);
        }

        /// Property: cancelling any previewed drag restores the board exactly
        #[test]
        fn test_cancel_restores_board(
            cards in any_cards(),
            start in 0usize..12,
            hovers in prop::collection::vec(any_target(), 0..8),
        ) {
            let sink = Arc::new(RecordingSink::new());
            let mut board = KanbanBoard::new(&cards, sink.clone());
            let before = board.state().clone();

            board.drag_start(&format!("c{}", start));
            for target in &hovers {
                board.drag_over(&target_id(target));
            }
            board.drag_end(None);

            prop_assert_eq!(board.state(), &before);
            prop_assert!(sink.events().is_empty());
        }
    }
}
