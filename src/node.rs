//! Search nodes and the arena that owns them.
//!
//! A node never outlives the search that created it, so nodes live in a
//! plain vector and refer to their parent by index. A child is always pushed
//! after its parent, so parent links cannot form a cycle.

use std::{fmt, ops::Index};

use crate::board::BoardState;
use crate::heuristic::CostCalculator;
use crate::puzzle::{Move, Puzzle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct SearchNode {
    state: BoardState,
    parent: Option<NodeId>,
    action: Option<Move>,
    cost: u32,
    depth: u32,
}

impl SearchNode {
    pub fn root(state: BoardState, goal: &BoardState, calculator: CostCalculator) -> Self {
        let cost = calculator.cost(&state, goal, 0);
        Self {
            state,
            parent: None,
            action: None,
            cost,
            depth: 0,
        }
    }

    /// The node reached by playing `action` on `parent`'s board, or `None`
    /// when the move is impossible there.
    pub fn child(
        parent_id: NodeId,
        parent: &SearchNode,
        action: Move,
        goal: &BoardState,
        calculator: CostCalculator,
    ) -> Option<Self> {
        let mut puzzle = Puzzle::new(parent.state.clone());
        if !puzzle.apply_move(action) {
            return None;
        }

        let state = puzzle.into_board();
        let depth = parent.depth + 1;
        let cost = calculator.cost(&state, goal, depth);
        Some(Self {
            state,
            parent: Some(parent_id),
            action: Some(action),
            cost,
            depth,
        })
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn action(&self) -> Option<Move> {
        self.action
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Nodes compare by board alone; depth and cost play no part.
impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for SearchNode {}

#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn push(&mut self, node: SearchNode) -> NodeId {
        debug_assert!(node.parent.map_or(true, |p| p.0 < self.nodes.len()));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` and then each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: Some(id),
        }
    }

    /// Moves leading from the root to `id`, in playing order.
    pub fn path(&self, id: NodeId) -> Vec<Move> {
        let mut moves: Vec<Move> = self.ancestors(id).filter_map(|(_, n)| n.action).collect();
        moves.reverse();
        moves
    }

    /// The last `limit` steps leading to `id`, flagged when earlier steps
    /// were cut off.
    pub fn trace(&self, id: NodeId, limit: usize) -> Trace {
        let mut chain = self.ancestors(id).filter(|(_, n)| n.action.is_some());

        let mut steps: Vec<TraceStep> = chain
            .by_ref()
            .take(limit)
            .filter_map(|(_, n)| {
                n.action.map(|action| TraceStep {
                    depth: n.depth,
                    action,
                    state: n.state.clone(),
                })
            })
            .collect();
        steps.reverse();

        Trace {
            truncated: chain.next().is_some(),
            steps,
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a SearchNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let arena = self.arena;
        let node = &arena[id];
        self.next = node.parent;
        Some((id, node))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub depth: u32,
    pub action: Move,
    pub state: BoardState,
}

/// A solution path as printable steps, possibly cut short at the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
    pub truncated: bool,
}

impl Trace {
    /// Builds a trace by playing `moves` from `start`.
    pub fn replay(start: &BoardState, moves: &[Move], limit: usize) -> Trace {
        let mut puzzle = Puzzle::new(start.clone());
        let mut steps = Vec::with_capacity(moves.len());
        for (ix, &action) in moves.iter().enumerate() {
            if !puzzle.apply_move(action) {
                break;
            }
            steps.push(TraceStep {
                depth: ix as u32 + 1,
                action,
                state: puzzle.board().clone(),
            });
        }

        let skip = steps.len().saturating_sub(limit);
        Trace {
            truncated: skip > 0,
            steps: steps.split_off(skip),
        }
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.steps.iter().map(|s| s.action)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.truncated {
            writeln!(f, "Truncated trace route:")?;
        } else {
            writeln!(f, "Path taken to solve:")?;
        }
        for step in &self.steps {
            writeln!(f, "{}: {}", step.depth, step.action)?;
            writeln!(f, "{}", step.state)?;
        }
        Ok(())
    }
}
