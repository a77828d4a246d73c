use crate::{Board, Outcome, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Configuration for randomized solver-validation boards.
#[derive(Debug, Clone)]
pub struct TestBoardConfig {
    pub rows: u32,
    pub cols: u32,
    pub mines: u32,
    /// Safe cells to reveal after the opening move.
    pub reveals: u32,
}

impl Default for TestBoardConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            mines: 10,
            reveals: 12,
        }
    }
}

/// Generates boards with a known mine layout and a handful of safe cells
/// revealed, for validating solver output against ground truth.
pub struct TestBoardGenerator {
    config: TestBoardConfig,
    rng: StdRng,
}

impl TestBoardGenerator {
    pub fn new(config: TestBoardConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(config: TestBoardConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self) -> (Board, HashSet<Position>) {
        let mut board = Board::with_seed(
            self.config.rows,
            self.config.cols,
            self.config.mines,
            self.rng.gen(),
        )
        .expect("test configuration must be feasible");
        let mines: HashSet<Position> = board.mine_positions().into_iter().collect();

        let mut revealed = 0;
        let mut attempts = 0;
        while revealed < self.config.reveals && attempts < self.config.reveals * 20 {
            attempts += 1;
            if board.outcome() != Outcome::InProgress {
                break;
            }
            let pos = Position::new(
                self.rng.gen_range(0..self.config.rows) as i32,
                self.rng.gen_range(0..self.config.cols) as i32,
            );
            if mines.contains(&pos) {
                continue;
            }
            board.reveal(pos).expect("revealing a safe cell in progress");
            revealed += 1;
        }

        (board, mines)
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<(Board, HashSet<Position>)> {
        (0..count).map(|_| self.generate()).collect()
    }
}
