//! # Sliding-tile search
//!
//! Solves N×N sliding-tile puzzles (the 8-puzzle and its relatives) with a
//! family of graph searches sharing one expansion loop.
//!
//! ## Modules
//! - `board`: the tile arrangement (`BoardState`), its parsing, equality and
//!   the inversion-parity solvability test.
//! - `puzzle`: the playable `Puzzle` with its cached blank and the `Move`
//!   directions.
//! - `node`: search nodes, the arena owning them and solution traces.
//! - `strategy`: frontier orderings and the duplicate-acceptance policies of
//!   breadth-first, depth-first, depth-limited, iterative-deepening,
//!   bidirectional and cost-guided search.
//! - `heuristic`: cost calculators driving cost-guided search.
//! - `search`: the driver running a strategy to success or exhaustion.
//! - `error`: errors raised while building boards or reading directions.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod node;
pub mod puzzle;
pub mod search;
pub mod strategy;

pub use board::BoardState;
pub use error::PuzzleError;
pub use heuristic::CostCalculator;
pub use puzzle::{Move, Puzzle};
pub use search::{Search, SearchReport};
pub use strategy::Strategy;
