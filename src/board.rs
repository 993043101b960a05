use rand::{seq::SliceRandom, Rng};
use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Index,
    str::FromStr,
};

use crate::error::PuzzleError;

/// The empty cell every move slides a tile into.
pub const BLANK: u8 = 0;

/// Largest supported width; every tile value must fit in a `u8`.
pub const MAX_SIZE: usize = 16;

/// An N×N arrangement of the tiles `0..N²`, stored row-major.
///
/// Boards are only built through validating constructors, so the cells are
/// always a permutation. That is what lets equality and hashing skip the
/// last cell: once the first N²-1 values agree the last one is implied.
#[derive(Debug, Clone)]
pub struct BoardState {
    size: usize,
    cells: Vec<u8>,
}

impl BoardState {
    /// Builds a board from row-major cells, checking they form a permutation.
    pub fn new(size: usize, cells: Vec<u8>) -> Result<Self, PuzzleError> {
        if size > MAX_SIZE {
            return Err(PuzzleError::TooLarge(size));
        }
        if size < 2 {
            return Err(PuzzleError::NotSquare(cells.len()));
        }
        if cells.len() != size * size {
            return Err(match square_root(cells.len()) {
                Some(found) => PuzzleError::SizeMismatch { expected: size, found },
                None => PuzzleError::NotSquare(cells.len()),
            });
        }

        let mut seen = vec![false; cells.len()];
        for &value in &cells {
            if value as usize >= cells.len() {
                return Err(PuzzleError::TileOutOfRange { value, size });
            }
        }
        if !cells.contains(&BLANK) {
            return Err(PuzzleError::MissingBlank);
        }
        for &value in &cells {
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(PuzzleError::DuplicateTile(value));
            }
        }

        Ok(Self { size, cells })
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, PuzzleError> {
        let size = rows.len();
        let total = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != size) {
            return Err(PuzzleError::NotSquare(total));
        }

        Self::new(size, rows.into_iter().flatten().collect())
    }

    /// The conventional goal: tiles in ascending order, blank in the last cell.
    pub fn goal(size: usize) -> Result<Self, PuzzleError> {
        if size > MAX_SIZE {
            return Err(PuzzleError::TooLarge(size));
        }
        let tiles = size * size;
        let cells = (1..tiles).map(|v| v as u8).chain([BLANK]).collect();
        Self::new(size, cells)
    }

    /// A uniformly random permutation. Half of these have no solution.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut board = Self::goal(size)?;
        board.cells.shuffle(rng);
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }

    pub fn blank_index(&self) -> usize {
        self.cells
            .iter()
            .position(|&v| v == BLANK)
            .expect("validated boards always hold a blank")
    }

    /// Row and column of `value`, if it is a tile of this board.
    pub fn position_of(&self, value: u8) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&v| v == value)
            .map(|ix| (ix / self.size, ix % self.size))
    }

    /// Cell index of every tile, indexed by tile value.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.cells.len()];
        for (ix, &value) in self.cells.iter().enumerate() {
            positions[value as usize] = ix;
        }
        positions
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    /// Number of tile pairs whose relative order differs from their order in
    /// `goal`. The blank takes no part.
    pub fn inversions(&self, goal: &BoardState) -> usize {
        let goal_positions = goal.positions();
        let ranks: Vec<usize> = self
            .cells
            .iter()
            .filter(|&&v| v != BLANK)
            .map(|&v| goal_positions[v as usize])
            .collect();

        ranks
            .iter()
            .enumerate()
            .map(|(i, &rank)| ranks[i + 1..].iter().filter(|&&next| next < rank).count())
            .sum()
    }

    /// Whether `goal` is reachable from this board by blank moves.
    ///
    /// On odd widths every move preserves the inversion parity. On even
    /// widths a vertical move flips it, so the blank's row distance to its
    /// goal row has to be added in.
    pub fn has_solution(&self, goal: &BoardState) -> bool {
        if self.size != goal.size {
            return false;
        }

        let inversions = self.inversions(goal);
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row = self.blank_index() / self.size;
            let goal_row = goal.blank_index() / goal.size;
            (inversions + blank_row.abs_diff(goal_row)) % 2 == 0
        }
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        // the last cell is implied by the others
        let n = self.cells.len() - 1;
        self.size == other.size && self.cells[..n] == other.cells[..n]
    }
}

impl Eq for BoardState {}

impl Hash for BoardState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.cells[..self.cells.len() - 1].hash(state);
    }
}

impl Index<usize> for BoardState {
    type Output = [u8];

    fn index(&self, row: usize) -> &Self::Output {
        &self.cells[row * self.size..(row + 1) * self.size]
    }
}

impl Index<(usize, usize)> for BoardState {
    type Output = u8;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.cells[index.0 * self.size + index.1]
    }
}

fn parse_token(token: &str) -> Result<u8, PuzzleError> {
    match token {
        "_" => Ok(BLANK),
        _ => token
            .parse()
            .map_err(|_| PuzzleError::InvalidToken(token.to_string())),
    }
}

fn square_root(n: usize) -> Option<usize> {
    (2..=MAX_SIZE).find(|size| size * size == n)
}

impl FromStr for BoardState {
    type Err = PuzzleError;

    /// Reads tiles in row-major order, `_` (or `0`) for the blank.
    ///
    /// Tiles may be separated by whitespace, which allows multi-digit values,
    /// or packed one character per tile as in `_13\n826\n457`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();

        let tokens: Vec<String> = if square_root(words.len()).is_some() {
            words.iter().map(|w| w.to_string()).collect()
        } else {
            s.chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect()
        };

        let size = square_root(tokens.len()).ok_or(PuzzleError::NotSquare(tokens.len()))?;
        let cells = tokens
            .iter()
            .map(|t| parse_token(t))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(size, cells)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in self.rows() {
            for (col, &value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if value == BLANK {
                    write!(f, "{:>width$}", "_")?;
                } else {
                    write!(f, "{:>width$}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn board(s: &str) -> BoardState {
        s.parse().unwrap()
    }

    #[test]
    fn parses_packed_and_spaced_forms() {
        let packed = board("_13\n826\n457");
        let spaced = board("_ 1 3\n8 2 6\n4 5 7");
        assert_eq!(packed.cells(), spaced.cells());
        assert_eq!(packed.cells(), &[0, 1, 3, 8, 2, 6, 4, 5, 7]);
        assert_eq!(packed.size(), 3);
    }

    #[test]
    fn parses_multi_digit_tiles() {
        let b = board("1 2 3 4\n5 6 7 8\n9 10 11 12\n13 14 15 _");
        assert_eq!(b, BoardState::goal(4).unwrap());
        assert_eq!(b[(2, 1)], 10);
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!("12345678".parse::<BoardState>(), Err(PuzzleError::NotSquare(8)));
        assert_eq!(
            "12x\n456\n78_".parse::<BoardState>(),
            Err(PuzzleError::InvalidToken("x".into()))
        );
        assert_eq!(
            "123\n456\n789".parse::<BoardState>(),
            Err(PuzzleError::TileOutOfRange { value: 9, size: 3 })
        );
        assert_eq!(
            "123\n456\n781".parse::<BoardState>(),
            Err(PuzzleError::MissingBlank)
        );
        assert_eq!(
            "113\n456\n78_".parse::<BoardState>(),
            Err(PuzzleError::DuplicateTile(1))
        );
        assert_eq!(
            BoardState::from_rows(vec![vec![1, 2], vec![0]]),
            Err(PuzzleError::NotSquare(3))
        );
    }

    #[test]
    fn rejects_bad_sizes() {
        assert_eq!(
            BoardState::new(3, (0..16).collect()),
            Err(PuzzleError::SizeMismatch { expected: 3, found: 4 })
        );
        assert_eq!(BoardState::new(3, (0..10).collect()), Err(PuzzleError::NotSquare(10)));
        assert_eq!(BoardState::new(1, vec![0]), Err(PuzzleError::NotSquare(1)));
        assert_eq!(BoardState::goal(17), Err(PuzzleError::TooLarge(17)));
        assert_eq!(BoardState::goal(usize::MAX / 2), Err(PuzzleError::TooLarge(usize::MAX / 2)));
        assert_eq!(
            BoardState::new(usize::MAX, vec![0]),
            Err(PuzzleError::TooLarge(usize::MAX))
        );
    }

    #[test]
    fn indexes_rows() {
        let b = board("_13\n826\n457");
        assert_eq!(&b[1], &[8, 2, 6]);
        assert_eq!(b.rows().count(), 3);
        assert_eq!(b.position_of(6), Some((1, 2)));
        assert_eq!(b.blank_index(), 0);
    }

    #[test]
    fn equality_ignores_last_cell() {
        let a = board("123\n456\n78_");
        let b = BoardState::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        let c = board("123\n456\n7_8");
        assert_ne!(a, c);
        assert!(!set.contains(&c));
    }

    #[test]
    fn boards_of_different_sizes_differ() {
        assert_ne!(BoardState::goal(2).unwrap(), BoardState::goal(3).unwrap());
    }

    #[test]
    fn counts_inversions_against_goal() {
        let goal = BoardState::goal(3).unwrap();
        assert_eq!(goal.inversions(&goal), 0);
        assert_eq!(board("_13\n826\n457").inversions(&goal), 8);
        assert_eq!(board("213\n456\n78_").inversions(&goal), 1);

        // relative to itself any board has no inversions
        let other = board("_13\n826\n457");
        assert_eq!(other.inversions(&other), 0);
    }

    #[test]
    fn solvability_on_odd_width() {
        let goal = BoardState::goal(3).unwrap();
        assert!(board("_13\n826\n457").has_solution(&goal));
        assert!(!board("213\n456\n78_").has_solution(&goal));
    }

    #[test]
    fn solvability_on_even_width() {
        let goal = BoardState::goal(2).unwrap();
        assert!(board("1_\n32").has_solution(&goal));
        assert!(board("_1\n32").has_solution(&goal));
        assert!(!board("21\n3_").has_solution(&goal));
        // against a goal with the blank in the top row
        assert!(board("12\n_3").has_solution(&board("_2\n13")));
    }

    #[test]
    fn displays_grid_with_blank_marker() {
        assert_eq!(board("_13\n826\n457").to_string(), "_ 1 3\n8 2 6\n4 5 7\n");
        let wide = BoardState::goal(4).unwrap().to_string();
        assert!(wide.ends_with("13 14 15  _\n"));
    }
}
