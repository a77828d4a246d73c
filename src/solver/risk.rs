use super::board::SolverBoard;
use super::propagate::{Deduction, DeductionGrid};
use super::{Analysis, CellAssessment};
use crate::Position;

/// Pools local clue ratios into a per-cell mine likelihood.
///
/// A clue of value `n` with `d` deduced-mine neighbors spreads its remaining
/// demand `n - d` evenly over its `m` unclassified covered neighbors, so
/// each accrues `n - d` evidence against `m` weight; the final likelihood is
/// summed evidence over summed weight. Ratios from different clues pool
/// additively rather than forming a joint posterior, which is a deliberate
/// approximation: rule propagation already resolves most dependencies, and
/// the pooled ratio only ranks the remaining ambiguous cells.
pub(super) fn assess(board: &SolverBoard, grid: &DeductionGrid) -> Analysis {
    let (rows, cols) = board.dimensions();
    let total = rows as usize * cols as usize;
    let flat = |pos: Position| pos.row as usize * cols as usize + pos.col as usize;

    let mut evidence = vec![0u32; total];
    let mut weight = vec![0u32; total];

    for pos in board.positions() {
        let Some(n) = board.clue_number(pos) else {
            continue;
        };

        let mut mines_found = 0u32;
        let mut pending: Vec<usize> = Vec::new();
        for npos in board.neighbors(pos) {
            if !board.is_covered(npos) {
                continue;
            }
            match grid.get(npos) {
                Deduction::Mine => mines_found += 1,
                Deduction::Safe => {}
                Deduction::Unknown => pending.push(flat(npos)),
            }
        }
        if pending.is_empty() {
            continue;
        }

        let demand = u32::from(n).saturating_sub(mines_found);
        for &index in &pending {
            evidence[index] += demand;
            weight[index] += pending.len() as u32;
        }
    }

    let cells = (0..total)
        .map(|index| {
            let pos = Position::new(
                (index / cols as usize) as i32,
                (index % cols as usize) as i32,
            );
            match grid.get(pos) {
                Deduction::Mine => CellAssessment::DeducedMine,
                Deduction::Safe => CellAssessment::DeducedSafe,
                Deduction::Unknown => {
                    if weight[index] == 0 {
                        CellAssessment::NoData
                    } else {
                        CellAssessment::Probability(
                            f64::from(evidence[index]) / f64::from(weight[index]),
                        )
                    }
                }
            }
        })
        .collect();

    Analysis { rows, cols, cells }
}
