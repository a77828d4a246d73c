use crate::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Position {0:?} is out of bounds")]
    OutOfBounds(Position),
    #[error("Game is already finished")]
    GameFinished,
    #[error("Cell at {0:?} is not revealed")]
    NotRevealed(Position),
    #[error("{mines} mines cannot satisfy the spread caps on a {rows}x{cols} board")]
    InfeasibleConfiguration { rows: u32, cols: u32, mines: u32 },
}
