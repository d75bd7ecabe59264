//! Tic-tac-toe side widget
//!
//! Pure board logic; `main.rs` binds it to the `#game-board` cells when the
//! page has them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The eight lines that win
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Background and text of the three cells of a finished line
pub const WINNING_CELL_COLOR: &str = "#4CAF50";
pub const WINNING_TEXT_COLOR: &str = "white";

/// Cell classes cleared on every redraw
pub const CELL_CLASSES: [&str; 3] = ["taken", "x", "o"];
/// Status classes cleared on every redraw
pub const STATUS_CLASSES: [&str; 2] = ["winner", "draw"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    /// CSS class added to cells holding this mark
    pub fn css_class(self) -> &'static str {
        match self {
            Mark::X => "x",
            Mark::O => "o",
        }
    }

    /// Text color of the current-player label
    pub fn color(self) -> &'static str {
        match self {
            Mark::X => "#e74c3c",
            Mark::O => "#3498db",
        }
    }
}

/// How a board stands after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Game continues; the mark is whose turn it is
    InProgress(Mark),
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

/// Why a move was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("cell index out of range")]
    OutOfRange,
    #[error("cell already taken")]
    Taken,
    #[error("game is over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; 9],
    current: Mark,
    outcome: Outcome,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board, X to move
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            current: Mark::X,
            outcome: Outcome::InProgress(Mark::X),
        }
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn current_player(&self) -> Mark {
        self.current
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_active(&self) -> bool {
        matches!(self.outcome, Outcome::InProgress(_))
    }

    /// Place the current player's mark at `index` (0..9, row-major)
    pub fn make_move(&mut self, index: usize) -> Result<Outcome, MoveError> {
        if !self.is_active() {
            return Err(MoveError::GameOver);
        }
        let slot = self.cells.get_mut(index).ok_or(MoveError::OutOfRange)?;
        if slot.is_some() {
            return Err(MoveError::Taken);
        }
        *slot = Some(self.current);

        self.outcome = if let Some(line) = self.winning_line() {
            Outcome::Won {
                mark: self.current,
                line,
            }
        } else if self.is_full() {
            Outcome::Draw
        } else {
            self.current = self.current.other();
            Outcome::InProgress(self.current)
        };
        Ok(self.outcome)
    }

    /// First completed line, if any
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        WINNING_LINES.into_iter().find(|[a, b, c]| {
            self.cells[*a].is_some()
                && self.cells[*a] == self.cells[*b]
                && self.cells[*a] == self.cells[*c]
        })
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winning_line().and_then(|[a, _, _]| self.cells[a])
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Draw
    }

    /// True for the cells of the line that won
    pub fn is_winning_cell(&self, index: usize) -> bool {
        matches!(self.outcome, Outcome::Won { line, .. } if line.contains(&index))
    }

    /// Class for the status element once the game ends
    pub fn status_class(&self) -> Option<&'static str> {
        match self.outcome {
            Outcome::InProgress(_) => None,
            Outcome::Won { .. } => Some("winner"),
            Outcome::Draw => Some("draw"),
        }
    }

    /// Status line shown under the board
    pub fn status_text(&self) -> String {
        match self.outcome {
            Outcome::InProgress(_) => String::new(),
            Outcome::Won { mark, .. } => format!("Player {} wins!", mark.as_str()),
            Outcome::Draw => "It's a draw!".to_string(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut Board, moves: &[usize]) -> Outcome {
        let mut outcome = board.outcome();
        for index in moves {
            outcome = board.make_move(*index).expect("legal move");
        }
        outcome
    }

    #[test]
    fn test_players_alternate_from_x() {
        let mut board = Board::new();
        assert_eq!(board.current_player(), Mark::X);
        assert_eq!(board.make_move(4), Ok(Outcome::InProgress(Mark::O)));
        assert_eq!(board.cell(4), Some(Mark::X));
        assert_eq!(board.make_move(0), Ok(Outcome::InProgress(Mark::X)));
        assert_eq!(board.cell(0), Some(Mark::O));
    }

    #[test]
    fn test_rejects_taken_and_out_of_range() {
        let mut board = Board::new();
        board.make_move(0).expect("legal");
        assert_eq!(board.make_move(0), Err(MoveError::Taken));
        assert_eq!(board.make_move(9), Err(MoveError::OutOfRange));
        assert_eq!(board.current_player(), Mark::O);
    }

    #[test]
    fn test_diagonal_win_stops_game() {
        let mut board = Board::new();
        let outcome = play(&mut board, &[0, 1, 4, 2, 8]);
        assert_eq!(
            outcome,
            Outcome::Won {
                mark: Mark::X,
                line: [0, 4, 8]
            }
        );
        assert_eq!(board.winner(), Some(Mark::X));
        assert_eq!(board.status_text(), "Player X wins!");
        assert_eq!(board.make_move(3), Err(MoveError::GameOver));
    }

    #[test]
    fn test_o_can_win() {
        let mut board = Board::new();
        let outcome = play(&mut board, &[0, 2, 1, 4, 3, 6]);
        assert!(matches!(outcome, Outcome::Won { mark: Mark::O, line: [2, 4, 6] }));
    }

    #[test]
    fn test_draw() {
        let mut board = Board::new();
        // X O X / X O O / O X X
        let outcome = play(&mut board, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(outcome, Outcome::Draw);
        assert!(board.is_draw());
        assert!(board.winner().is_none());
        assert_eq!(board.status_text(), "It's a draw!");
    }

    #[test]
    fn test_win_on_last_move_is_not_draw() {
        let mut board = Board::new();
        // X O X / O X O / O X X, the ninth move completes the 0-4-8 diagonal
        let outcome = play(&mut board, &[0, 1, 2, 3, 4, 5, 7, 6, 8]);
        assert_eq!(
            outcome,
            Outcome::Won {
                mark: Mark::X,
                line: [0, 4, 8]
            }
        );
        assert!(!board.is_draw());
    }

    #[test]
    fn test_reset() {
        let mut board = Board::new();
        play(&mut board, &[0, 1, 4, 2, 8]);
        board.reset();
        assert_eq!(board, Board::new());
        assert!(board.is_active());
        assert_eq!(board.status_class(), None);
        assert!((0..9).all(|i| !board.is_winning_cell(i)));
    }

    #[test]
    fn test_styling_hooks() {
        assert_eq!(Mark::X.css_class(), "x");
        assert_eq!(Mark::O.css_class(), "o");
        assert_eq!(Mark::X.color(), "#e74c3c");
        assert_eq!(Mark::O.color(), "#3498db");
        assert!(CELL_CLASSES.contains(&Mark::X.css_class()));
        assert!(CELL_CLASSES.contains(&Mark::O.css_class()));

        let mut board = Board::new();
        assert_eq!(board.status_class(), None);
        play(&mut board, &[0, 1, 4, 2, 8]);
        assert_eq!(board.status_class(), Some("winner"));
        assert!(board.is_winning_cell(0) && board.is_winning_cell(4) && board.is_winning_cell(8));
        assert!(!board.is_winning_cell(1));

        let mut drawn = Board::new();
        play(&mut drawn, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(drawn.status_class(), Some("draw"));
        assert!((0..9).all(|i| !drawn.is_winning_cell(i)));
        assert!(STATUS_CLASSES.contains(&"winner") && STATUS_CLASSES.contains(&"draw"));
    }

    #[test]
    fn test_move_error_messages() {
        assert_eq!(MoveError::OutOfRange.to_string(), "cell index out of range");
        assert_eq!(MoveError::Taken.to_string(), "cell already taken");
        assert_eq!(MoveError::GameOver.to_string(), "game is over");

        let err: Box<dyn std::error::Error> = Box::new(MoveError::Taken);
        assert_eq!(err.to_string(), "cell already taken");
    }
}
