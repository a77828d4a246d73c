use crate::{GameError, Position};
use itertools::iproduct;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clue {
    Mine,
    Count(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub visibility: Visibility,
    /// Present for revealed cells, and for every cell once the game is over.
    pub clue: Option<Clue>,
}

/// Maximum number of full reshuffles before a mine layout request is
/// rejected. The feasibility check runs first, so only pathological
/// near-saturation configurations ever get close to this.
const PLACEMENT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone)]
pub struct Board {
    rows: u32,
    cols: u32,
    mines: u32,
    clues: Vec<Clue>,
    visibility: Vec<Visibility>,
    outcome: Outcome,
    opened: bool,
    rng: StdRng,
}

impl Board {
    pub fn new(rows: u32, cols: u32, mines: u32) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, mines, StdRng::from_entropy())
    }

    pub fn with_seed(rows: u32, cols: u32, mines: u32, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, mines, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: u32, cols: u32, mines: u32, mut rng: StdRng) -> Result<Self, GameError> {
        let infeasible = GameError::InfeasibleConfiguration { rows, cols, mines };
        let cells = u64::from(rows) * u64::from(cols);
        if mines == 0 || u64::from(mines) > cells {
            return Err(infeasible);
        }

        // A layout only exists if the per-row and per-column caps can jointly
        // absorb every mine; checked analytically before any sampling.
        let row_cap = (2 * rows / 3).saturating_sub(1);
        let col_cap = (2 * cols / 3).saturating_sub(1);
        if u64::from(row_cap) * u64::from(rows) < u64::from(mines)
            || u64::from(col_cap) * u64::from(cols) < u64::from(mines)
        {
            return Err(infeasible);
        }

        let layout = place_mines(rows, cols, mines, row_cap, col_cap, &mut rng)
            .ok_or(infeasible)?;

        Ok(Self {
            rows,
            cols,
            mines,
            clues: compute_clues(rows, cols, &layout),
            visibility: vec![Visibility::Hidden; cells as usize],
            outcome: Outcome::InProgress,
            opened: false,
            rng,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn mines(&self) -> u32 {
        self.mines
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows as i32 && pos.col >= 0 && pos.col < self.cols as i32
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        iproduct!(0..self.rows as i32, 0..self.cols as i32).map(|(row, col)| Position::new(row, col))
    }

    /// Reveals a cell and runs the zero-clue flood fill. The first reveal of
    /// a game ignores the requested coordinate and opens a blank region
    /// instead, scanning from a random origin in a random direction; the
    /// literal coordinate is honored once at least one reveal has happened.
    pub fn reveal(&mut self, pos: Position) -> Result<Outcome, GameError> {
        let index = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        if self.outcome != Outcome::InProgress {
            return Err(GameError::GameFinished);
        }

        if !self.opened {
            self.opened = true;
            if let Some(start) = self.scan_for(is_hidden_blank) {
                self.reveal_cascade(start);
                return Ok(self.evaluate_outcome());
            }
            // No blank cell left anywhere; honor the coordinate as asked.
        }

        if self.visibility[index] == Visibility::Hidden {
            self.reveal_cascade(index);
        }
        Ok(self.evaluate_outcome())
    }

    /// Reveals every unflagged neighbor of a revealed numbered cell, but only
    /// when the flagged-neighbor count matches the clue. Anything else is a
    /// no-op. Wrong flags make this lose the game.
    pub fn chord(&mut self, pos: Position) -> Result<Outcome, GameError> {
        let index = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        if self.outcome != Outcome::InProgress {
            return Err(GameError::GameFinished);
        }

        let clue = match (self.visibility[index], self.clues[index]) {
            (Visibility::Revealed, Clue::Count(n)) if n > 0 => n,
            _ => return Ok(self.outcome),
        };
        let flagged = pos
            .neighbors()
            .filter_map(|npos| self.index(npos))
            .filter(|&nidx| self.visibility[nidx] == Visibility::Flagged)
            .count();
        if flagged != clue as usize {
            return Ok(self.outcome);
        }

        for npos in pos.neighbors() {
            if let Some(nidx) = self.index(npos) {
                if self.visibility[nidx] == Visibility::Hidden {
                    self.reveal_cascade(nidx);
                }
            }
        }
        Ok(self.evaluate_outcome())
    }

    pub fn toggle_flag(&mut self, pos: Position) -> Result<Outcome, GameError> {
        let index = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        if self.outcome != Outcome::InProgress {
            return Err(GameError::GameFinished);
        }

        match self.visibility[index] {
            Visibility::Hidden => self.visibility[index] = Visibility::Flagged,
            Visibility::Flagged => self.visibility[index] = Visibility::Hidden,
            Visibility::Revealed => {}
        }
        Ok(self.evaluate_outcome())
    }

    /// Assist move: opens a blank region if any hidden one remains, otherwise
    /// reveals up to three hidden numbered cells. Each scan starts from a
    /// fresh random origin and direction.
    pub fn use_cheat(&mut self) -> Result<Outcome, GameError> {
        if self.outcome != Outcome::InProgress {
            return Err(GameError::GameFinished);
        }

        self.opened = true;
        if let Some(start) = self.scan_for(is_hidden_blank) {
            self.reveal_cascade(start);
        } else {
            for _ in 0..3 {
                match self.scan_for(is_hidden_numbered) {
                    Some(start) => self.reveal_cascade(start),
                    None => break,
                }
            }
        }
        Ok(self.evaluate_outcome())
    }

    /// Hides every cell again, keeping the mine layout. The next reveal goes
    /// back through the blank-region opener.
    pub fn restart(&mut self) {
        for visibility in &mut self.visibility {
            *visibility = Visibility::Hidden;
        }
        self.outcome = Outcome::InProgress;
        self.opened = false;
    }

    pub fn is_hidden(&self, pos: Position) -> bool {
        self.index(pos)
            .is_some_and(|index| self.visibility[index] == Visibility::Hidden)
    }

    pub fn is_revealed_numbered(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|index| {
            self.visibility[index] == Visibility::Revealed
                && matches!(self.clues[index], Clue::Count(_))
        })
    }

    /// Clue of a revealed cell; the whole layout becomes readable once the
    /// game is over. Callers are expected to check `is_revealed_numbered`
    /// first during play.
    pub fn clue(&self, pos: Position) -> Result<Clue, GameError> {
        let index = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        if self.visibility[index] == Visibility::Revealed || self.outcome != Outcome::InProgress {
            Ok(self.clues[index])
        } else {
            Err(GameError::NotRevealed(pos))
        }
    }

    pub fn cell_view(&self, pos: Position) -> Result<CellView, GameError> {
        let index = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        let visibility = self.visibility[index];
        let exposed =
            visibility == Visibility::Revealed || self.outcome != Outcome::InProgress;
        Ok(CellView {
            visibility,
            clue: exposed.then_some(self.clues[index]),
        })
    }

    pub fn flags_placed(&self) -> u32 {
        self.visibility
            .iter()
            .filter(|&&v| v == Visibility::Flagged)
            .count() as u32
    }

    pub fn revealed_count(&self) -> u32 {
        self.visibility
            .iter()
            .filter(|&&v| v == Visibility::Revealed)
            .count() as u32
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.cols as usize + pos.col as usize)
    }

    fn position(&self, index: usize) -> Position {
        Position::new(
            (index / self.cols as usize) as i32,
            (index % self.cols as usize) as i32,
        )
    }

    /// Full-grid scan from a random origin, wrapping around, with a random
    /// per-axis direction; returns the first cell matching the predicate.
    fn scan_for(&mut self, predicate: fn(&Board, usize) -> bool) -> Option<usize> {
        let rows = self.rows as i32;
        let cols = self.cols as i32;
        let origin_row = self.rng.gen_range(0..rows);
        let origin_col = self.rng.gen_range(0..cols);
        let row_step: i32 = if self.rng.gen::<bool>() { 1 } else { -1 };
        let col_step: i32 = if self.rng.gen::<bool>() { 1 } else { -1 };

        for i in 0..rows {
            for j in 0..cols {
                let row = (origin_row + row_step * i).rem_euclid(rows);
                let col = (origin_col + col_step * j).rem_euclid(cols);
                let index = (row * cols + col) as usize;
                if predicate(self, index) {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Reveals `start`, then flood-fills outward through zero-clue cells
    /// using an explicit work-list. Cells are marked revealed as they are
    /// enqueued, so each is visited at most once.
    fn reveal_cascade(&mut self, start: usize) {
        self.visibility[start] = Visibility::Revealed;
        let mut work = vec![start];

        while let Some(index) = work.pop() {
            if self.clues[index] != Clue::Count(0) {
                continue;
            }
            let pos = self.position(index);
            for npos in pos.neighbors() {
                if let Some(nidx) = self.index(npos) {
                    if self.visibility[nidx] == Visibility::Hidden && self.clues[nidx] != Clue::Mine
                    {
                        self.visibility[nidx] = Visibility::Revealed;
                        work.push(nidx);
                    }
                }
            }
        }
    }

    fn evaluate_outcome(&mut self) -> Outcome {
        if self.outcome != Outcome::InProgress {
            return self.outcome;
        }

        let mut flags_match_mines = true;
        let mut all_safe_revealed = true;
        for (clue, visibility) in self.clues.iter().zip(&self.visibility) {
            let mine = *clue == Clue::Mine;
            if mine && *visibility == Visibility::Revealed {
                self.outcome = Outcome::Lost;
                return self.outcome;
            }
            if mine != (*visibility == Visibility::Flagged) {
                flags_match_mines = false;
            }
            if !mine && *visibility != Visibility::Revealed {
                all_safe_revealed = false;
            }
        }
        if flags_match_mines || all_safe_revealed {
            self.outcome = Outcome::Won;
        }
        self.outcome
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Board {
    /// Builds a board with an explicit mine layout. Spread caps are not
    /// applied, and the blank-region opener is disarmed so reveals hit the
    /// requested coordinates; `restart` re-arms it.
    pub fn with_layout(rows: u32, cols: u32, mines: &[Position]) -> Result<Self, GameError> {
        let cells = u64::from(rows) * u64::from(cols);
        let mut layout = vec![false; cells as usize];
        let mut placed = 0u32;
        for &pos in mines {
            let in_bounds =
                pos.row >= 0 && pos.row < rows as i32 && pos.col >= 0 && pos.col < cols as i32;
            if !in_bounds {
                return Err(GameError::OutOfBounds(pos));
            }
            let index = pos.row as usize * cols as usize + pos.col as usize;
            if !layout[index] {
                layout[index] = true;
                placed += 1;
            }
        }
        if placed == 0 {
            return Err(GameError::InfeasibleConfiguration {
                rows,
                cols,
                mines: 0,
            });
        }

        Ok(Self {
            rows,
            cols,
            mines: placed,
            clues: compute_clues(rows, cols, &layout),
            visibility: vec![Visibility::Hidden; cells as usize],
            outcome: Outcome::InProgress,
            opened: true,
            rng: StdRng::seed_from_u64(0),
        })
    }

    pub fn mine_positions(&self) -> Vec<Position> {
        (0..self.clues.len())
            .filter(|&index| self.clues[index] == Clue::Mine)
            .map(|index| self.position(index))
            .collect()
    }

    pub fn clue_at(&self, pos: Position) -> Option<Clue> {
        self.index(pos).map(|index| self.clues[index])
    }
}

fn is_hidden_blank(board: &Board, index: usize) -> bool {
    board.visibility[index] == Visibility::Hidden && board.clues[index] == Clue::Count(0)
}

fn is_hidden_numbered(board: &Board, index: usize) -> bool {
    board.visibility[index] == Visibility::Hidden
        && matches!(board.clues[index], Clue::Count(n) if n > 0)
}

fn place_mines(
    rows: u32,
    cols: u32,
    mines: u32,
    row_cap: u32,
    col_cap: u32,
    rng: &mut StdRng,
) -> Option<Vec<bool>> {
    let cells = rows as usize * cols as usize;
    let mut candidates: Vec<usize> = (0..cells).collect();

    for _ in 0..PLACEMENT_ATTEMPTS {
        candidates.shuffle(rng);
        let mut layout = vec![false; cells];
        let mut per_row = vec![0u32; rows as usize];
        let mut per_col = vec![0u32; cols as usize];
        let mut placed = 0u32;

        for &index in &candidates {
            if placed == mines {
                break;
            }
            let row = index / cols as usize;
            let col = index % cols as usize;
            if per_row[row] < row_cap && per_col[col] < col_cap {
                layout[index] = true;
                per_row[row] += 1;
                per_col[col] += 1;
                placed += 1;
            }
        }
        if placed == mines {
            return Some(layout);
        }
    }
    None
}

fn compute_clues(rows: u32, cols: u32, layout: &[bool]) -> Vec<Clue> {
    iproduct!(0..rows as i32, 0..cols as i32)
        .map(|(row, col)| {
            let index = row as usize * cols as usize + col as usize;
            if layout[index] {
                Clue::Mine
            } else {
                let count = Position::new(row, col)
                    .neighbors()
                    .filter(|npos| {
                        npos.row >= 0
                            && npos.row < rows as i32
                            && npos.col >= 0
                            && npos.col < cols as i32
                            && layout[npos.row as usize * cols as usize + npos.col as usize]
                    })
                    .count();
                Clue::Count(count as u8)
            }
        })
        .collect()
}
