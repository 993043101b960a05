//! Cost calculators used to order the frontier.
//!
//! Each calculator maps `(state, goal, cumulative cost)` to an estimated
//! total cost. The cumulative cost is the length of the path that reached
//! `state`. The blank never contributes to an estimate.

use crate::board::{BoardState, BLANK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCalculator {
    /// Moves made so far, no estimate. The rule for uninformed search.
    PathLength,
    /// Moves made so far plus the Manhattan distance. Admissible.
    Manhattan,
    /// [`CostCalculator::Manhattan`] plus half the inversion count.
    /// Not admissible.
    ManhattanInversions,
    /// The Manhattan distance alone, ignoring moves made so far.
    GreedyManhattan,
    /// Moves made so far plus the number of misplaced tiles.
    MisplacedTiles,
}

impl CostCalculator {
    pub fn cost(self, state: &BoardState, goal: &BoardState, cumulative: u32) -> u32 {
        match self {
            CostCalculator::PathLength => cumulative,
            CostCalculator::Manhattan => manhattan_distance(state, goal) + cumulative,
            CostCalculator::ManhattanInversions => {
                manhattan_distance(state, goal) + cumulative + state.inversions(goal) as u32 / 2
            }
            CostCalculator::GreedyManhattan => manhattan_distance(state, goal),
            CostCalculator::MisplacedTiles => misplaced_tiles(state, goal) + cumulative,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CostCalculator::PathLength => "PathLength",
            CostCalculator::Manhattan => "ManhattanDistance",
            CostCalculator::ManhattanInversions => "ManhattanDistanceInversions",
            CostCalculator::GreedyManhattan => "GreedyManhattanDistance",
            CostCalculator::MisplacedTiles => "MisplacedTiles",
        }
    }
}

/// Sum over all tiles of the row and column distance to their goal cell.
pub fn manhattan_distance(state: &BoardState, goal: &BoardState) -> u32 {
    let size = state.size();
    let goal_positions = goal.positions();

    state
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != BLANK)
        .map(|(ix, &value)| {
            let target = goal_positions[value as usize];
            (ix / size).abs_diff(target / size) + (ix % size).abs_diff(target % size)
        })
        .sum::<usize>() as u32
}

pub fn misplaced_tiles(state: &BoardState, goal: &BoardState) -> u32 {
    state
        .cells()
        .iter()
        .zip(goal.cells())
        .filter(|&(&value, &wanted)| value != BLANK && value != wanted)
        .count() as u32
}
