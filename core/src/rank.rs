use crate::score::ScoreBoard;
use crate::DocId;
use std::cmp::Ordering;

/// Order the board by descending score and put `prepend` in front.
///
/// The sort is stable, so equal scores keep the board's first-credit order.
/// Prepended documents are not removed from the scored tail and may appear
/// twice in the output.
pub fn rank(board: &ScoreBoard, prepend: Vec<DocId>, top_n: usize) -> Vec<DocId> {
    let mut scored: Vec<(DocId, f64)> = board.entries().collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut results = prepend;
    results.extend(scored.into_iter().map(|(doc_id, _)| doc_id));
    results.truncate(top_n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_insertion_order() {
        let mut board = ScoreBoard::new();
        board.add_name_scores(&[[7, 3, 9]], 5.0);
        board.add_name_scores(&[[9]], 5.0);
        assert_eq!(rank(&board, vec![], 10), vec![9, 7, 3]);
    }

    #[test]
    fn prepended_results_are_not_deduplicated() {
        let mut board = ScoreBoard::new();
        board.add_name_scores(&[[4, 5]], 5.0);
        assert_eq!(rank(&board, vec![5], 3), vec![5, 4, 5]);
    }

    #[test]
    fn truncates_to_top_n() {
        let mut board = ScoreBoard::new();
        board.add_name_scores(&[[0, 1, 2, 3]], 1.0);
        assert_eq!(rank(&board, vec![8, 9], 3), vec![8, 9, 0]);
        assert!(rank(&board, vec![], 0).is_empty());
    }
}
