//! The search driver: expands a strategy's frontier until the goal is found
//! or nothing is left to expand.

use log::{debug, info, trace};
use std::{collections::HashMap, fmt};

use crate::board::BoardState;
use crate::error::PuzzleError;
use crate::heuristic::CostCalculator;
use crate::node::{NodeArena, NodeId, SearchNode, Trace};
use crate::puzzle::{Move, Puzzle};
use crate::strategy::{Frontier, Strategy, StrategyKind};

/// How many solution steps a trace keeps by default.
pub const DEFAULT_TRACE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded, in the last pass.
    pub expanded: usize,
    /// Nodes accepted into the frontier (the root included), in the last pass.
    pub created: usize,
    /// Depth of the node the last pass stopped at.
    pub depth: u32,
    /// Passes run; above one only for iterative deepening.
    pub passes: u32,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes expanded: {}", self.expanded)?;
        writeln!(f, "Nodes created: {}", self.created)?;
        writeln!(f, "Depth of terminated search: {}", self.depth)?;
        write!(f, "Passes: {}", self.passes)
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub trace: Trace,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    /// `None` when the frontier ran dry.
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }
}

pub struct Search<'a> {
    goal: &'a BoardState,
    calculator: CostCalculator,
    trace_limit: usize,
}

impl<'a> Search<'a> {
    pub fn new(goal: &'a BoardState, calculator: CostCalculator) -> Self {
        Self {
            goal,
            calculator,
            trace_limit: DEFAULT_TRACE_LIMIT,
        }
    }

    pub fn with_trace_limit(mut self, trace_limit: usize) -> Self {
        self.trace_limit = trace_limit;
        self
    }

    /// Searches until solved, re-running from the root for as long as the
    /// strategy asks to widen its bound.
    ///
    /// Fails with [`PuzzleError::SizeMismatch`] when the puzzle and the goal
    /// differ in width.
    pub fn solve(&self, puzzle: &Puzzle, strategy: &mut Strategy) -> Result<SearchReport, PuzzleError> {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut report = self.run(puzzle, strategy)?;
            report.stats.passes = passes;
            if report.is_solved() || !strategy.expand_search() {
                return Ok(report);
            }
        }
    }

    /// A single pass with a fresh frontier and explored set.
    pub fn run(&self, puzzle: &Puzzle, strategy: &mut Strategy) -> Result<SearchReport, PuzzleError> {
        let found = puzzle.board().size();
        if found != self.goal.size() {
            return Err(PuzzleError::SizeMismatch {
                expected: self.goal.size(),
                found,
            });
        }

        debug!(
            "Starting {} pass with {} (limit {:?})",
            strategy.name(),
            self.calculator.name(),
            strategy.limit()
        );

        let report = match strategy.kind() {
            StrategyKind::Bidirectional => self.run_bidirectional(puzzle, strategy),
            _ => self.run_single(puzzle, strategy),
        };

        info!(
            "Search complete: {}, {} expanded, {} created, depth {}",
            if report.is_solved() { "SUCCESS" } else { "FAILURE" },
            report.stats.expanded,
            report.stats.created,
            report.stats.depth
        );
        Ok(report)
    }

    fn run_single(&self, puzzle: &Puzzle, strategy: &mut Strategy) -> SearchReport {
        strategy.reset();

        let mut arena = NodeArena::default();
        let mut explored: HashMap<BoardState, NodeId> = HashMap::new();
        let mut stats = SearchStats::default();

        let root = SearchNode::root(puzzle.board().clone(), self.goal, self.calculator);
        let root_cost = root.cost();
        let root_state = root.state().clone();
        let root = arena.push(root);
        explored.insert(root_state, root);
        strategy.enqueue(root, root_cost);
        stats.created = 1;

        let mut solved = None;
        while let Some(current) = strategy.dequeue() {
            stats.depth = arena[current].depth();
            if arena[current].state() == self.goal {
                solved = Some(current);
                break;
            }

            stats.expanded += 1;
            for movement in Move::ALL {
                let Some(child) =
                    SearchNode::child(current, &arena[current], movement, self.goal, self.calculator)
                else {
                    continue;
                };

                let existing = explored.get(child.state()).map(|&id| &arena[id]);
                if !strategy.accept_node(&child, existing) {
                    continue;
                }

                trace!("Accepted {} at depth {} cost {}", movement, child.depth(), child.cost());
                let cost = child.cost();
                let state = child.state().clone();
                let id = arena.push(child);
                explored.insert(state, id);
                strategy.enqueue(id, cost);
                stats.created += 1;
            }
        }

        let solution = solved.map(|id| Solution {
            moves: arena.path(id),
            trace: arena.trace(id, self.trace_limit),
        });
        SearchReport { solution, stats }
    }

    /// Breadth-first from both ends. The strategy's own frontier serves the
    /// start side; the goal side gets a second FIFO frontier here.
    fn run_bidirectional(&self, puzzle: &Puzzle, strategy: &mut Strategy) -> SearchReport {
        strategy.reset();
        let start = puzzle.board();
        let mut stats = SearchStats {
            created: 2,
            ..SearchStats::default()
        };

        if start == self.goal {
            stats.created = 1;
            return SearchReport {
                solution: Some(Solution {
                    moves: Vec::new(),
                    trace: Trace::default(),
                }),
                stats,
            };
        }

        let mut forward = Side::new(start.clone(), self.goal);
        let mut backward = Side::new(self.goal.clone(), start);
        strategy.enqueue(forward.root, 0);
        let mut backward_frontier = Frontier::fifo();
        backward_frontier.push(backward.root, 0);

        let meeting = loop {
            let Some(current) = strategy.dequeue() else {
                break None;
            };
            stats.expanded += 1;
            if let Some((f, b)) = forward.expand(current, &backward, strategy, &mut stats) {
                break Some((f, b));
            }

            let Some(current) = backward_frontier.pop() else {
                break None;
            };
            stats.expanded += 1;
            if let Some((b, f)) = backward.expand(current, &forward, &mut backward_frontier, &mut stats) {
                break Some((f, b));
            }
        };

        let solution = meeting.map(|(f, b)| {
            let mut moves = forward.arena.path(f);
            // walking the goal side back to its root undoes each of its moves
            moves.extend(backward.arena.ancestors(b).filter_map(|(_, n)| n.action()).map(|m| m.opposite()));
            stats.depth = moves.len() as u32;
            Solution {
                trace: Trace::replay(start, &moves, self.trace_limit),
                moves,
            }
        });
        SearchReport { solution, stats }
    }
}

/// Anything a bidirectional side can queue nodes on.
trait Queue {
    fn push_node(&mut self, id: NodeId);
}

impl Queue for Strategy {
    fn push_node(&mut self, id: NodeId) {
        self.enqueue(id, 0);
    }
}

impl Queue for Frontier {
    fn push_node(&mut self, id: NodeId) {
        self.push(id, 0);
    }
}

/// One half of a bidirectional search.
struct Side<'a> {
    target: &'a BoardState,
    arena: NodeArena,
    explored: HashMap<BoardState, NodeId>,
    root: NodeId,
}

impl<'a> Side<'a> {
    fn new(root: BoardState, target: &'a BoardState) -> Self {
        let mut arena = NodeArena::default();
        let id = arena.push(SearchNode::root(root.clone(), target, CostCalculator::PathLength));
        let mut explored = HashMap::new();
        explored.insert(root, id);
        Self {
            target,
            arena,
            explored,
            root: id,
        }
    }

    /// Expands `current`, returning the first child whose board the other
    /// side has already seen, paired with the other side's node for it.
    fn expand(
        &mut self,
        current: NodeId,
        other: &Side<'_>,
        queue: &mut impl Queue,
        stats: &mut SearchStats,
    ) -> Option<(NodeId, NodeId)> {
        stats.depth = self.arena[current].depth();
        for movement in Move::ALL {
            let Some(child) = SearchNode::child(
                current,
                &self.arena[current],
                movement,
                self.target,
                CostCalculator::PathLength,
            ) else {
                continue;
            };

            if self.explored.contains_key(child.state()) {
                continue;
            }

            let state = child.state().clone();
            let id = self.arena.push(child);
            stats.created += 1;
            if let Some(&meet) = other.explored.get(&state) {
                debug!("Frontiers met at depth {}", self.arena[id].depth());
                return Some((id, meet));
            }
            self.explored.insert(state, id);
            queue.push_node(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(s: &str) -> Puzzle {
        Puzzle::new(s.parse().unwrap())
    }

    fn replays_to_goal(start: &Puzzle, moves: &[Move], goal: &BoardState) -> bool {
        let mut p = start.clone();
        p.apply_moves(moves) && p.is_solved(goal)
    }

    #[test]
    fn solved_board_needs_no_moves() {
        let goal = BoardState::goal(3).unwrap();
        let p = Puzzle::new(goal.clone());
        for mut s in [Strategy::breadth_first(), Strategy::bidirectional(), Strategy::cost_guided()] {
            let report = Search::new(&goal, CostCalculator::Manhattan).solve(&p, &mut s).unwrap();
            let solution = report.solution.expect("already solved");
            assert!(solution.moves.is_empty());
            assert_eq!(report.stats.expanded, 0);
            assert_eq!(report.stats.created, 1);
        }
    }

    #[test]
    fn breadth_first_finds_one_move() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("123\n456\n7_8");
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut Strategy::breadth_first())
            .unwrap();
        assert_eq!(report.solution.unwrap().moves, [Move::Left]);
        assert_eq!(report.stats.expanded, 1);
        assert_eq!(report.stats.depth, 1);
        assert_eq!(report.stats.passes, 1);
    }

    #[test]
    fn breadth_first_finds_shortest_path() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut Strategy::breadth_first())
            .unwrap();
        let solution = report.solution.unwrap();
        assert_eq!(solution.moves.len(), 12);
        assert!(replays_to_goal(&p, &solution.moves, &goal));
        assert_eq!(solution.trace.steps.len(), 12);
        assert!(!solution.trace.truncated);
    }

    #[test]
    fn trace_limit_truncates() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let report = Search::new(&goal, CostCalculator::Manhattan)
            .with_trace_limit(5)
            .solve(&p, &mut Strategy::cost_guided())
            .unwrap();
        let solution = report.solution.unwrap();
        assert!(solution.trace.truncated);
        assert_eq!(solution.trace.steps.len(), 5);
        assert_eq!(solution.trace.steps[4].state, goal);
    }

    #[test]
    fn bidirectional_joins_both_halves() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut Strategy::bidirectional())
            .unwrap();
        let solution = report.solution.unwrap();
        assert!(replays_to_goal(&p, &solution.moves, &goal));
        assert!(solution.moves.len() >= 12);
        assert_eq!(solution.trace.steps.last().unwrap().state, goal);
    }

    #[test]
    fn bidirectional_one_move() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("123\n456\n7_8");
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut Strategy::bidirectional())
            .unwrap();
        assert_eq!(report.solution.unwrap().moves, [Move::Left]);
    }

    #[test]
    fn depth_limited_fails_below_solution_depth() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let search = Search::new(&goal, CostCalculator::PathLength);

        let report = search.solve(&p, &mut Strategy::depth_limited(11)).unwrap();
        assert!(!report.is_solved());
        assert_eq!(report.stats.passes, 1);

        let report = search.solve(&p, &mut Strategy::depth_limited(12)).unwrap();
        let solution = report.solution.unwrap();
        assert!(solution.moves.len() <= 12);
        assert!(replays_to_goal(&p, &solution.moves, &goal));
    }

    #[test]
    fn iterative_deepening_reruns_until_solved() {
        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let mut strategy = Strategy::iterative_deepening_with(4, 4, 40);
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut strategy)
            .unwrap();
        assert!(report.is_solved());
        // limits 4 and 8 fail, 12 succeeds
        assert_eq!(report.stats.passes, 3);
        assert_eq!(strategy.limit(), Some(12));
    }

    #[test]
    fn unsolvable_small_board_exhausts() {
        let goal = BoardState::goal(2).unwrap();
        let p = puzzle("21\n3_");
        assert!(!p.has_solution(&goal));
        for mut s in [Strategy::breadth_first(), Strategy::depth_first(), Strategy::bidirectional()] {
            let report = Search::new(&goal, CostCalculator::PathLength).solve(&p, &mut s).unwrap();
            assert!(!report.is_solved(), "{}", s.name());
        }
        let report = Search::new(&goal, CostCalculator::PathLength)
            .solve(&p, &mut Strategy::breadth_first())
            .unwrap();
        // a 2x2 component has 12 boards
        assert_eq!(report.stats.created, 12);
    }

    #[test]
    fn mismatched_goal_is_an_error() {
        let goal = BoardState::goal(3).unwrap();
        let p = Puzzle::new(BoardState::goal(4).unwrap());
        for mut s in [Strategy::breadth_first(), Strategy::bidirectional(), Strategy::cost_guided()] {
            let result = Search::new(&goal, CostCalculator::Manhattan).solve(&p, &mut s);
            assert_eq!(
                result.map(|r| r.is_solved()),
                Err(PuzzleError::SizeMismatch { expected: 3, found: 4 })
            );
        }
    }

    #[test]
    fn greedy_search_ends_on_cost_ties() {
        // every move and its undo lead back to a board of equal greedy cost
        let goal = BoardState::goal(2).unwrap();
        let p = puzzle("21\n3_");
        let report = Search::new(&goal, CostCalculator::GreedyManhattan)
            .solve(&p, &mut Strategy::cost_guided())
            .unwrap();
        assert!(!report.is_solved());

        let goal = BoardState::goal(3).unwrap();
        let p = puzzle("_13\n826\n457");
        let report = Search::new(&goal, CostCalculator::GreedyManhattan)
            .solve(&p, &mut Strategy::cost_guided())
            .unwrap();
        assert!(replays_to_goal(&p, &report.solution.unwrap().moves, &goal));
    }
}
