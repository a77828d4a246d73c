pub mod board;
pub mod error;
pub mod game;
pub mod position;
pub mod solver;

pub use board::{Board, CellView, Clue, Outcome, Visibility};
pub use error::GameError;
pub use game::{Command, Difficulty, Game, CHEAT_ALLOWANCE};
pub use position::Position;
pub use solver::{Analysis, CellAssessment, Solver, SolverBoard};
