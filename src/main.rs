use minegrid::{
    CellAssessment, Clue, Command, Difficulty, Game, GameError, Outcome, Position, Solver,
    SolverBoard, Visibility,
};
use std::env;
use std::io::{self, Write};

enum Input {
    Play(Command),
    Hint,
    Quit,
}

fn main() {
    match run_game() {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => eprintln!("Game error: {}", e),
    }
}

fn run_game() -> Result<(), GameError> {
    let difficulty = match env::args().nth(1).as_deref() {
        Some("medium") => Difficulty::Medium,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Easy,
    };
    let (rows, cols, mines) = difficulty.config(&mut rand::thread_rng());
    let mut game = Game::new(rows, cols, mines)?;
    println!("{}x{} board with {} mines", rows, cols, mines);

    while game.outcome() == Outcome::InProgress {
        print_board(&game);

        let Some(input) = read_input(&game) else {
            continue;
        };
        match input {
            Input::Quit => return Ok(()),
            Input::Hint => print_hints(&game),
            Input::Play(command) => {
                if let Err(e) = game.apply(command) {
                    println!("Error: {}", e);
                }
            }
        }
    }

    print_board(&game);
    match game.outcome() {
        Outcome::Won => println!("Congratulations! You won!"),
        Outcome::Lost => println!("Game Over!"),
        Outcome::InProgress => unreachable!(),
    }

    Ok(())
}

fn print_board(game: &Game) {
    let (rows, cols) = game.dimensions();
    let board = game.board();
    println!(
        "{} mines, {} flagged",
        board.mines(),
        board.flags_placed()
    );

    print!("   ");
    for col in 0..cols {
        print!("{:2} ", col);
    }
    println!();

    for row in 0..rows {
        print!("{:2} ", row);
        for col in 0..cols {
            let view = game.cell_view(Position::new(row as i32, col as i32)).unwrap();
            let glyph = match (view.visibility, view.clue) {
                (Visibility::Flagged, _) => '⚑',
                (_, Some(Clue::Mine)) => '*',
                (_, Some(Clue::Count(0))) => ' ',
                (_, Some(Clue::Count(n))) => char::from(b'0' + n),
                (Visibility::Hidden, None) => '□',
                (Visibility::Revealed, None) => unreachable!(),
            };
            print!(" {} ", glyph);
        }
        println!();
    }
}

fn print_hints(game: &Game) {
    let analysis = Solver::default().run(&SolverBoard::new(game.board()));
    let (rows, cols) = game.dimensions();

    println!("safe '=', mine '!', risk 0-9, no data '.'");
    for row in 0..rows {
        print!("{:2} ", row);
        for col in 0..cols {
            let glyph = match analysis.get(Position::new(row as i32, col as i32)).unwrap() {
                CellAssessment::DeducedSafe => '=',
                CellAssessment::DeducedMine => '!',
                CellAssessment::NoData => '.',
                CellAssessment::Probability(p) => {
                    let decile = ((p * 10.0) as u8).min(9);
                    char::from(b'0' + decile)
                }
            };
            print!(" {} ", glyph);
        }
        println!();
    }
}

fn read_input(game: &Game) -> Option<Input> {
    print!(
        "Command (r/f/c row col, x = cheat [{} left], s = hint, q = quit): ",
        game.cheats_remaining()
    );
    io::stdout().flush().ok()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();

    let action = parts.next()?;
    match action {
        "x" => return Some(Input::Play(Command::Cheat)),
        "s" => return Some(Input::Hint),
        "q" => return Some(Input::Quit),
        _ => {}
    }

    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let pos = Position::new(row, col);

    match action {
        "r" => Some(Input::Play(Command::Reveal(pos))),
        "f" => Some(Input::Play(Command::ToggleFlag(pos))),
        "c" => Some(Input::Play(Command::Chord(pos))),
        _ => {
            println!("Unknown action. Use r to reveal, f to flag, c to chord");
            None
        }
    }
}
