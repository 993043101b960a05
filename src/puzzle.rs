use rand::Rng;
use std::{fmt, str::FromStr};

use crate::board::BoardState;
use crate::error::PuzzleError;

/// A move names the direction the tile next to the blank slides.
///
/// `Up` slides the tile below the blank upwards, so the blank itself moves
/// down a row. It is therefore impossible while the blank sits in the bottom
/// row; the other three directions mirror this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Every direction, in the order the search expands them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Where the blank goes, as (row, column) deltas.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "UP",
            Move::Left => "LEFT",
            Move::Down => "DOWN",
            Move::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UP" | "U" => Ok(Move::Up),
            "LEFT" | "L" => Ok(Move::Left),
            "DOWN" | "D" => Ok(Move::Down),
            "RIGHT" | "R" => Ok(Move::Right),
            _ => Err(PuzzleError::InvalidDirection(s.to_string())),
        }
    }
}

/// A board being played, with the blank's cell cached so move checks are O(1).
#[derive(Clone)]
pub struct Puzzle {
    board: BoardState,
    blank: usize,
}

impl Puzzle {
    pub fn new(board: BoardState) -> Self {
        let blank = board.blank_index();
        Self { board, blank }
    }

    /// A puzzle already in the conventional goal arrangement.
    pub fn solved(size: usize) -> Result<Self, PuzzleError> {
        BoardState::goal(size).map(Self::new)
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn into_board(self) -> BoardState {
        self.board
    }

    /// (row, column) of the blank.
    pub fn blank(&self) -> (usize, usize) {
        let size = self.board.size();
        (self.blank / size, self.blank % size)
    }

    fn target(&self, movement: Move) -> Option<usize> {
        let size = self.board.size() as isize;
        let (dx, dy) = movement.as_offset();
        let (x, y) = self.blank();

        let new_x = x as isize + dx;
        let new_y = y as isize + dy;

        if new_x >= 0 && new_x < size && new_y >= 0 && new_y < size {
            Some((new_x * size + new_y) as usize)
        } else {
            None
        }
    }

    pub fn is_valid_move(&self, movement: Move) -> bool {
        self.target(movement).is_some()
    }

    /// Slides a tile into the blank. Returns false, leaving the board
    /// untouched, when there is no tile on that side of the blank.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        match self.target(movement) {
            Some(target) => {
                self.board.swap(self.blank, target);
                self.blank = target;
                debug_assert_eq!(self.board.cells()[self.blank], crate::board::BLANK);
                true
            }
            None => false,
        }
    }

    /// Replays a sequence of moves, stopping at the first impossible one.
    pub fn apply_moves(&mut self, moves: &[Move]) -> bool {
        moves.iter().all(|&movement| self.apply_move(movement))
    }

    pub fn is_solved(&self, goal: &BoardState) -> bool {
        self.board == *goal
    }

    /// Attempts `moves` random directions. Directions are drawn without
    /// looking at the board, so impossible ones are skipped and the realized
    /// count (returned) can be lower.
    pub fn scramble<R: Rng + ?Sized>(&mut self, moves: usize, rng: &mut R) -> usize {
        (0..moves)
            .filter(|_| {
                let movement = Move::ALL[rng.gen_range(0..Move::ALL.len())];
                self.apply_move(movement)
            })
            .count()
    }

    /// Replaces the board with a random permutation, solvable or not.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), PuzzleError> {
        *self = Self::new(BoardState::random(self.board.size(), rng)?);
        Ok(())
    }

    pub fn has_solution(&self, goal: &BoardState) -> bool {
        self.board.has_solution(goal)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
