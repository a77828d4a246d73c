use super::board::SolverBoard;
use crate::Position;

/// Certainty classification for a cell. A cell is classified at most once;
/// later rules never overwrite an earlier deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Deduction {
    Unknown,
    Safe,
    Mine,
}

pub(super) struct DeductionGrid {
    cols: i32,
    cells: Vec<Deduction>,
}

impl DeductionGrid {
    fn new(rows: u32, cols: u32) -> Self {
        Self {
            cols: cols as i32,
            cells: vec![Deduction::Unknown; rows as usize * cols as usize],
        }
    }

    pub(super) fn get(&self, pos: Position) -> Deduction {
        self.cells[(pos.row * self.cols + pos.col) as usize]
    }

    fn classify(&mut self, pos: Position, deduction: Deduction) -> bool {
        let slot = &mut self.cells[(pos.row * self.cols + pos.col) as usize];
        if *slot == Deduction::Unknown {
            *slot = deduction;
            true
        } else {
            false
        }
    }
}

/// Applies the local deduction rules to every revealed clue, sweeping until
/// a pass produces no change or the pass limit is reached:
/// - saturated: a clue whose deduced-mine neighbors already account for its
///   value marks its remaining covered neighbors safe
/// - starved: a clue equal to its covered-neighbor count marks them all
///   mines
/// - effectively starved: a clue equal to its covered-neighbor count minus
///   the deduced-safe ones marks the rest mines
///
/// One clue's deduction can unlock another's, hence the repeated sweeps.
/// The pass limit is a practical cutoff, not a correctness requirement.
pub(super) fn propagate(board: &SolverBoard, pass_limit: usize) -> DeductionGrid {
    let (rows, cols) = board.dimensions();
    let mut grid = DeductionGrid::new(rows, cols);

    let clues: Vec<(Position, u8)> = board
        .positions()
        .filter_map(|pos| board.clue_number(pos).map(|n| (pos, n)))
        .collect();

    for _ in 0..pass_limit {
        let mut changed = false;
        for &(pos, n) in &clues {
            changed |= apply_rules(board, &mut grid, pos, n);
        }
        if !changed {
            break;
        }
    }
    grid
}

fn apply_rules(board: &SolverBoard, grid: &mut DeductionGrid, pos: Position, n: u8) -> bool {
    let covered: Vec<Position> = board
        .neighbors(pos)
        .into_iter()
        .filter(|&npos| board.is_covered(npos))
        .collect();
    let mut changed = false;

    let mines_found = covered
        .iter()
        .filter(|&&npos| grid.get(npos) == Deduction::Mine)
        .count();
    if mines_found == n as usize {
        for &npos in &covered {
            if grid.get(npos) != Deduction::Mine {
                changed |= grid.classify(npos, Deduction::Safe);
            }
        }
    }

    // Recounted after the rule above so freshly cleared cells are excluded.
    let not_safe = covered
        .iter()
        .filter(|&&npos| grid.get(npos) != Deduction::Safe)
        .count();
    if n as usize == covered.len() || n as usize == not_safe {
        for &npos in &covered {
            if grid.get(npos) != Deduction::Safe {
                changed |= grid.classify(npos, Deduction::Mine);
            }
        }
    }

    changed
}
