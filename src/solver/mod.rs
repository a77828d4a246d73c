mod board;
mod propagate;
mod risk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use board::SolverBoard;

use crate::Position;

/// Per-cell verdict produced by [`Solver::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellAssessment {
    /// Proven free of a mine by the deduction rules.
    DeducedSafe,
    /// Proven to hold a mine by the deduction rules.
    DeducedMine,
    /// No revealed clue touches this cell; distinct from a genuine zero risk.
    NoData,
    /// Heuristic mine likelihood pooled from the adjacent clues.
    Probability(f64),
}

/// Solver output: one assessment per board cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    rows: u32,
    cols: u32,
    cells: Vec<CellAssessment>,
}

impl Analysis {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn get(&self, pos: Position) -> Option<CellAssessment> {
        let in_bounds = pos.row >= 0
            && pos.row < self.rows as i32
            && pos.col >= 0
            && pos.col < self.cols as i32;
        in_bounds.then(|| self.cells[pos.row as usize * self.cols as usize + pos.col as usize])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, CellAssessment)> + '_ {
        self.cells.iter().enumerate().map(|(index, &assessment)| {
            let pos = Position::new(
                (index / self.cols as usize) as i32,
                (index % self.cols as usize) as i32,
            );
            (pos, assessment)
        })
    }
}

/// Bounded local-constraint solver over a board snapshot.
///
/// Every run rebuilds its working state from scratch, so the solver is a
/// pure function of the snapshot: two runs without an intervening board
/// mutation return identical results. Genuinely ambiguous cells stay
/// unresolved; this is not a full constraint solver.
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Upper bound on deduction sweeps. Convergence usually happens far
    /// earlier; at least 15 is recommended so chained deductions can
    /// propagate across the board.
    pub pass_limit: usize,
}

impl Solver {
    pub const DEFAULT_PASS_LIMIT: usize = 50;

    pub fn new(pass_limit: usize) -> Self {
        Self { pass_limit }
    }

    pub fn run(&self, board: &SolverBoard) -> Analysis {
        let deductions = propagate::propagate(board, self.pass_limit);
        risk::assess(board, &deductions)
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PASS_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Position};

    fn analyze(board: &Board) -> Analysis {
        Solver::default().run(&SolverBoard::new(board))
    }

    #[test]
    fn test_starved_clue_pins_the_mine() {
        // 1x4, mine at the end: revealing the blank run leaves the 1 at
        // (0,1) with a single covered neighbor.
        let mut board = Board::with_layout(1, 4, &[Position::new(0, 0)]).unwrap();
        board.reveal(Position::new(0, 2)).unwrap();

        let analysis = analyze(&board);
        assert_eq!(
            analysis.get(Position::new(0, 0)),
            Some(CellAssessment::DeducedMine)
        );
        assert_eq!(
            analysis.get(Position::new(0, 1)),
            Some(CellAssessment::NoData)
        );
    }

    #[test]
    fn test_saturated_clue_clears_its_neighbors() {
        // Mine at (0,1). The 1 at (0,0) pins it; the 1 at (0,2) is then
        // saturated and must clear (0,3).
        let mut board = Board::with_layout(1, 5, &[Position::new(0, 1)]).unwrap();
        board.reveal(Position::new(0, 0)).unwrap();
        board.reveal(Position::new(0, 2)).unwrap();

        let analysis = analyze(&board);
        assert_eq!(
            analysis.get(Position::new(0, 1)),
            Some(CellAssessment::DeducedMine)
        );
        assert_eq!(
            analysis.get(Position::new(0, 3)),
            Some(CellAssessment::DeducedSafe)
        );
        assert_eq!(
            analysis.get(Position::new(0, 4)),
            Some(CellAssessment::NoData)
        );
    }

    #[test]
    fn test_effective_starvation_sees_through_safe_cells() {
        // Mine at (0,3). The flag on (0,1) keeps it covered, but the
        // revealed 0 at (0,0) proves it safe; the 1 at (0,2) must then put
        // its mine on (0,3).
        let mut board = Board::with_layout(1, 5, &[Position::new(0, 3)]).unwrap();
        board.toggle_flag(Position::new(0, 1)).unwrap();
        board.reveal(Position::new(0, 0)).unwrap();
        board.reveal(Position::new(0, 2)).unwrap();

        let analysis = analyze(&board);
        assert_eq!(
            analysis.get(Position::new(0, 1)),
            Some(CellAssessment::DeducedSafe)
        );
        assert_eq!(
            analysis.get(Position::new(0, 3)),
            Some(CellAssessment::DeducedMine)
        );
        assert_eq!(
            analysis.get(Position::new(0, 4)),
            Some(CellAssessment::NoData)
        );
    }

    #[test]
    fn test_probabilities_pool_across_clues() {
        // Mines at (0,0) and (2,0); revealing the right edge opens the
        // whole zero region plus the 1/2/1 clue column at col 1, leaving
        // the left column ambiguous.
        let mut board =
            Board::with_layout(3, 3, &[Position::new(0, 0), Position::new(2, 0)]).unwrap();
        board.reveal(Position::new(0, 2)).unwrap();

        let analysis = analyze(&board);
        assert_eq!(
            analysis.get(Position::new(0, 0)),
            Some(CellAssessment::Probability(3.0 / 5.0))
        );
        assert_eq!(
            analysis.get(Position::new(1, 0)),
            Some(CellAssessment::Probability(4.0 / 7.0))
        );
        assert_eq!(
            analysis.get(Position::new(2, 0)),
            Some(CellAssessment::Probability(3.0 / 5.0))
        );
    }

    #[test]
    fn test_fully_determined_board_matches_ground_truth() {
        let mut board = Board::with_layout(2, 2, &[Position::new(0, 0)]).unwrap();
        board.reveal(Position::new(0, 1)).unwrap();
        board.reveal(Position::new(1, 0)).unwrap();
        board.reveal(Position::new(1, 1)).unwrap();

        let analysis = analyze(&board);
        assert_eq!(
            analysis.get(Position::new(0, 0)),
            Some(CellAssessment::DeducedMine)
        );
        for pos in [Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)] {
            assert_eq!(analysis.get(pos), Some(CellAssessment::NoData));
        }
    }

    #[test]
    fn test_untouched_board_is_all_nodata() {
        let board = Board::with_seed(9, 9, 10, 21).unwrap();
        let analysis = analyze(&board);
        assert!(analysis
            .iter()
            .all(|(_, assessment)| assessment == CellAssessment::NoData));
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let mut board = Board::with_seed(9, 9, 10, 23).unwrap();
        board.reveal(Position::new(4, 4)).unwrap();

        let snapshot = SolverBoard::new(&board);
        let solver = Solver::default();
        assert_eq!(solver.run(&snapshot), solver.run(&snapshot));
    }

    #[test]
    fn test_pass_limit_zero_deduces_nothing() {
        let mut board = Board::with_layout(1, 4, &[Position::new(0, 0)]).unwrap();
        board.reveal(Position::new(0, 2)).unwrap();

        let analysis = Solver::new(0).run(&SolverBoard::new(&board));
        assert_eq!(
            analysis.get(Position::new(0, 0)),
            Some(CellAssessment::Probability(1.0))
        );
    }

    #[test]
    fn test_out_of_bounds_lookup_is_none() {
        let board = Board::with_seed(9, 9, 10, 29).unwrap();
        let analysis = analyze(&board);
        assert_eq!(analysis.get(Position::new(9, 0)), None);
        assert_eq!(analysis.get(Position::new(0, -1)), None);
    }
}
