use crate::{Board, CellView, GameError, Outcome, Position};
use rand::Rng;

/// Assist uses granted per game; tracked here, not by the board.
pub const CHEAT_ALLOWANCE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal(Position),
    Chord(Position),
    ToggleFlag(Position),
    Cheat,
    Restart,
    NewGame { rows: u32, cols: u32, mines: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Board configuration (rows, cols, mines). Easy and medium jitter the
    /// dimensions slightly between games.
    pub fn config<R: Rng>(self, rng: &mut R) -> (u32, u32, u32) {
        match self {
            Difficulty::Easy => {
                let n = rng.gen_range(8..=10);
                (n, n, 10)
            }
            Difficulty::Medium => (rng.gen_range(13..=16), rng.gen_range(15..=16), 40),
            Difficulty::Hard => (16, 30, 100),
        }
    }
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    cheats_used: u32,
}

impl Game {
    pub fn new(rows: u32, cols: u32, mines: u32) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::new(rows, cols, mines)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            cheats_used: 0,
        }
    }

    /// Dispatches a command to the board and reports the resulting outcome.
    /// An exhausted cheat allowance makes `Cheat` a no-op rather than an
    /// error; `Restart` and `NewGame` are always accepted.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, GameError> {
        match command {
            Command::Reveal(pos) => self.board.reveal(pos),
            Command::Chord(pos) => self.board.chord(pos),
            Command::ToggleFlag(pos) => self.board.toggle_flag(pos),
            Command::Cheat => {
                if self.cheats_used == CHEAT_ALLOWANCE {
                    return Ok(self.board.outcome());
                }
                self.cheats_used += 1;
                self.board.use_cheat()
            }
            Command::Restart => {
                self.board.restart();
                self.cheats_used = 0;
                Ok(Outcome::InProgress)
            }
            Command::NewGame { rows, cols, mines } => {
                self.board = Board::new(rows, cols, mines)?;
                self.cheats_used = 0;
                Ok(Outcome::InProgress)
            }
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.board.dimensions()
    }

    pub fn cell_view(&self, pos: Position) -> Result<CellView, GameError> {
        self.board.cell_view(pos)
    }

    pub fn cheats_remaining(&self) -> u32 {
        CHEAT_ALLOWANCE - self.cheats_used
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_dispatch() {
        let board = Board::with_layout(2, 2, &[Position::new(0, 0)]).unwrap();
        let mut game = Game::from_board(board);

        game.apply(Command::ToggleFlag(Position::new(0, 0))).unwrap();
        game.apply(Command::Reveal(Position::new(1, 1))).unwrap();
        let outcome = game.apply(Command::Chord(Position::new(1, 1))).unwrap();
        assert_eq!(outcome, Outcome::Won);
    }

    #[test]
    fn test_cheat_allowance_is_enforced() {
        let board = Board::with_seed(9, 9, 10, 11).unwrap();
        let mut game = Game::from_board(board);
        assert_eq!(game.cheats_remaining(), CHEAT_ALLOWANCE);

        for _ in 0..CHEAT_ALLOWANCE {
            if game.outcome() != Outcome::InProgress {
                return; // cheats alone finished this layout
            }
            game.apply(Command::Cheat).unwrap();
        }
        assert_eq!(game.cheats_remaining(), 0);

        if game.outcome() == Outcome::InProgress {
            let revealed = game.board().revealed_count();
            game.apply(Command::Cheat).unwrap();
            assert_eq!(game.board().revealed_count(), revealed);
        }
    }

    #[test]
    fn test_restart_resets_the_allowance() {
        let board = Board::with_seed(9, 9, 10, 13).unwrap();
        let mut game = Game::from_board(board);
        game.apply(Command::Cheat).unwrap();
        assert_eq!(game.cheats_remaining(), CHEAT_ALLOWANCE - 1);

        game.apply(Command::Restart).unwrap();
        assert_eq!(game.cheats_remaining(), CHEAT_ALLOWANCE);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.board().revealed_count(), 0);
    }

    #[test]
    fn test_new_game_swaps_the_layout_size() {
        let mut game = Game::new(9, 9, 10).unwrap();
        game.apply(Command::NewGame {
            rows: 16,
            cols: 30,
            mines: 100,
        })
        .unwrap();
        assert_eq!(game.dimensions(), (16, 30));

        assert!(matches!(
            game.apply(Command::NewGame {
                rows: 4,
                cols: 4,
                mines: 17,
            }),
            Err(GameError::InfeasibleConfiguration { .. })
        ));
    }

    #[test]
    fn test_difficulty_presets_are_creatable() {
        let mut rng = rand::thread_rng();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let (rows, cols, mines) = difficulty.config(&mut rng);
            assert!(Game::new(rows, cols, mines).is_ok());
        }
    }
}
