//! Frontier strategies.
//!
//! A [`Strategy`] decides two things: which generated node is expanded next
//! (the frontier ordering) and whether a newly generated node is worth
//! keeping given the node already recorded for the same board.

use log::info;
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use crate::node::{NodeId, SearchNode};

/// How far iterative deepening raises its limit per pass.
pub const DEFAULT_DEPTH_STEP: u32 = 10;

/// Iterative deepening gives up past this limit; the hardest 4x4 boards
/// need 80 moves.
pub const DEFAULT_MAX_DEPTH: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    BreadthFirst,
    DepthFirst,
    DepthLimited { limit: u32 },
    IterativeDeepening { limit: u32, step: u32, max_limit: u32 },
    Bidirectional,
    CostGuided,
}

/// Generated nodes waiting to be expanded.
#[derive(Debug)]
pub enum Frontier {
    Fifo(VecDeque<NodeId>),
    Lifo(Vec<NodeId>),
    /// Lowest cost first; equal costs leave in insertion order.
    Priority {
        heap: BinaryHeap<Reverse<(u32, u64, NodeId)>>,
        inserted: u64,
    },
}

impl Frontier {
    pub fn fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }

    pub fn lifo() -> Self {
        Frontier::Lifo(Vec::new())
    }

    pub fn priority() -> Self {
        Frontier::Priority {
            heap: BinaryHeap::new(),
            inserted: 0,
        }
    }

    pub fn push(&mut self, id: NodeId, cost: u32) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(id),
            Frontier::Lifo(stack) => stack.push(id),
            Frontier::Priority { heap, inserted } => {
                heap.push(Reverse((cost, *inserted, id)));
                *inserted += 1;
            }
        }
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority { heap, .. } => heap.pop().map(|Reverse((_, _, id))| id),
        }
    }

    pub fn peek(&self) -> Option<NodeId> {
        match self {
            Frontier::Fifo(queue) => queue.front().copied(),
            Frontier::Lifo(stack) => stack.last().copied(),
            Frontier::Priority { heap, .. } => heap.peek().map(|Reverse((_, _, id))| *id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            Frontier::Fifo(queue) => queue.clear(),
            Frontier::Lifo(stack) => stack.clear(),
            Frontier::Priority { heap, inserted } => {
                heap.clear();
                *inserted = 0;
            }
        }
    }
}

#[derive(Debug)]
pub struct Strategy {
    kind: StrategyKind,
    frontier: Frontier,
}

impl Strategy {
    fn with_kind(kind: StrategyKind) -> Self {
        let frontier = match kind {
            StrategyKind::BreadthFirst | StrategyKind::Bidirectional => Frontier::fifo(),
            StrategyKind::DepthFirst
            | StrategyKind::DepthLimited { .. }
            | StrategyKind::IterativeDeepening { .. } => Frontier::lifo(),
            StrategyKind::CostGuided => Frontier::priority(),
        };
        Self { kind, frontier }
    }

    pub fn breadth_first() -> Self {
        Self::with_kind(StrategyKind::BreadthFirst)
    }

    pub fn depth_first() -> Self {
        Self::with_kind(StrategyKind::DepthFirst)
    }

    pub fn depth_limited(limit: u32) -> Self {
        Self::with_kind(StrategyKind::DepthLimited { limit })
    }

    pub fn iterative_deepening(limit: u32) -> Self {
        Self::iterative_deepening_with(limit, DEFAULT_DEPTH_STEP, DEFAULT_MAX_DEPTH)
    }

    pub fn iterative_deepening_with(limit: u32, step: u32, max_limit: u32) -> Self {
        Self::with_kind(StrategyKind::IterativeDeepening {
            limit: limit.min(max_limit),
            step: step.max(1),
            max_limit,
        })
    }

    /// Searches from both ends at once. The search driver keeps the two
    /// frontiers itself; this one holds the start side.
    pub fn bidirectional() -> Self {
        Self::with_kind(StrategyKind::Bidirectional)
    }

    /// Expands the cheapest node first, as scored by the search's
    /// cost calculator.
    pub fn cost_guided() -> Self {
        Self::with_kind(StrategyKind::CostGuided)
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            StrategyKind::BreadthFirst => "BreadthFirstSearch",
            StrategyKind::DepthFirst => "DepthFirstSearch",
            StrategyKind::DepthLimited { .. } => "DepthLimitedSearch",
            StrategyKind::IterativeDeepening { .. } => "IterativeDeepeningSearch",
            StrategyKind::Bidirectional => "BidirectionalSearch",
            StrategyKind::CostGuided => "CostGuidedSearch",
        }
    }

    /// The depth bound currently in force, if any.
    pub fn limit(&self) -> Option<u32> {
        match self.kind {
            StrategyKind::DepthLimited { limit } | StrategyKind::IterativeDeepening { limit, .. } => {
                Some(limit)
            }
            _ => None,
        }
    }

    pub fn enqueue(&mut self, id: NodeId, cost: u32) {
        self.frontier.push(id, cost);
    }

    /// Removes and returns the node to expand next.
    pub fn dequeue(&mut self) -> Option<NodeId> {
        self.frontier.pop()
    }

    pub fn next(&self) -> Option<NodeId> {
        self.frontier.peek()
    }

    pub fn finished(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Drops every queued node ahead of a fresh pass.
    pub fn reset(&mut self) {
        self.frontier.clear();
    }

    /// Whether `new` should be recorded and queued. `existing` is the node
    /// already recorded for the same board, if there is one.
    pub fn accept_node(&self, new: &SearchNode, existing: Option<&SearchNode>) -> bool {
        match self.kind {
            StrategyKind::BreadthFirst | StrategyKind::DepthFirst | StrategyKind::Bidirectional => {
                existing.is_none()
            }
            StrategyKind::DepthLimited { limit } | StrategyKind::IterativeDeepening { limit, .. } => {
                new.depth() <= limit && existing.map_or(true, |e| e.depth() > new.depth())
            }
            // equal costs go to the shorter path, otherwise a state could be
            // re-queued forever through a zero-gain cycle
            StrategyKind::CostGuided => existing.map_or(true, |e| {
                new.cost() < e.cost() || (new.cost() == e.cost() && new.depth() < e.depth())
            }),
        }
    }

    /// Relaxes the strategy after a failed pass. Returns true when the
    /// caller should search again from the root.
    pub fn expand_search(&mut self) -> bool {
        match &mut self.kind {
            StrategyKind::IterativeDeepening {
                limit,
                step,
                max_limit,
            } => {
                if *limit >= *max_limit {
                    info!("Depth limit {} reached, giving up", limit);
                    return false;
                }
                *limit = (*limit + *step).min(*max_limit);
                info!("Expanding search depth to {}", limit);
                true
            }
            _ => false,
        }
    }

    /// Whether a failed search proves there is no solution.
    pub fn is_complete(&self) -> bool {
        !matches!(
            self.kind,
            StrategyKind::DepthLimited { .. } | StrategyKind::IterativeDeepening { .. }
        )
    }
}
