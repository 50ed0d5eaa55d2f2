//! DucaPowr - Search Module
//!
//! Fixed-depth alpha-beta written as two mutually recursive halves: the side
//! to move at the root maximizes, its opponent minimizes. Cutoffs are
//! fail-hard and moves are tried in generation order.

use std::time::Instant;

use log::debug;

use crate::error::Result;
use crate::evaluation::{evaluate, SCORE_MAX, SCORE_MIN};
use crate::legality::try_apply;
use crate::move_generator::MoveGenerator;
use crate::moves::{Move, MoveList};
use crate::position::Position;

/// Deepest search the engine accepts.
pub const MAX_DEPTH: u32 = 10;

/// Outcome of one root search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

pub struct SearchEngine {
    move_generator: MoveGenerator,
    pub nodes_searched: u64,
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine {
            move_generator: MoveGenerator::new(),
            nodes_searched: 0,
        }
    }

    /// Search `depth` plies (at least one) and return the best root move.
    /// The position is restored before returning.
    pub fn search(&mut self, position: &mut Position, depth: u32) -> Result<SearchResult> {
        let depth = depth.clamp(1, MAX_DEPTH);
        let start = Instant::now();
        self.nodes_searched = 1;

        let mut moves = MoveList::new();
        self.move_generator.generate_all(position, &mut moves)?;

        let mut alpha = SCORE_MIN;
        let beta = SCORE_MAX;
        let mut best_move = None;
        let mut best_score = SCORE_MIN;

        for &mv in &moves {
            let Some(token) = try_apply(position, mv)? else {
                continue;
            };
            let score = self.minimize(position, depth - 1, alpha, beta)?;
            position.unmake(token)?;

            if best_move.is_none() || score > best_score {
                best_move = Some(mv);
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        debug!(
            "search depth {} nodes {} score {} best {} in {:?}",
            depth,
            self.nodes_searched,
            best_score,
            best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
            start.elapsed()
        );

        Ok(SearchResult {
            best_move,
            score: best_score,
            nodes: self.nodes_searched,
        })
    }

    /// Node where the root side is to move.
    fn maximize(&mut self, position: &mut Position, depth: u32, mut alpha: i32, beta: i32) -> Result<i32> {
        self.nodes_searched += 1;
        if depth == 0 {
            return Ok(evaluate(position));
        }

        let mut moves = MoveList::new();
        self.move_generator.generate_all(position, &mut moves)?;

        for &mv in &moves {
            let Some(token) = try_apply(position, mv)? else {
                continue;
            };
            let score = self.minimize(position, depth - 1, alpha, beta)?;
            position.unmake(token)?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }
        Ok(alpha)
    }

    /// Node where the root side's opponent is to move.
    fn minimize(&mut self, position: &mut Position, depth: u32, alpha: i32, mut beta: i32) -> Result<i32> {
        self.nodes_searched += 1;
        if depth == 0 {
            return Ok(-evaluate(position));
        }

        let mut moves = MoveList::new();
        self.move_generator.generate_all(position, &mut moves)?;

        for &mv in &moves {
            let Some(token) = try_apply(position, mv)? else {
                continue;
            };
            let score = self.maximize(position, depth - 1, alpha, beta)?;
            position.unmake(token)?;

            if score <= alpha {
                return Ok(alpha);
            }
            if score < beta {
                beta = score;
            }
        }
        Ok(beta)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}
