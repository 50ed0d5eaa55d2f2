//! DucaPowr - Perft
//!
//! Legal leaf-node counts, the standard oracle for move generation.

use log::info;

use crate::error::Result;
use crate::legality::try_apply;
use crate::move_generator::MoveGenerator;
use crate::moves::{Move, MoveList};
use crate::position::Position;

/// Number of legal move sequences of length `depth` from `position`.
pub fn perft(position: &mut Position, depth: u32) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let mut moves = MoveList::new();
    MoveGenerator::new().generate_all(position, &mut moves)?;

    let mut nodes = 0;
    for &mv in &moves {
        if let Some(token) = try_apply(position, mv)? {
            nodes += perft(position, depth - 1)?;
            position.unmake(token)?;
        }
    }
    Ok(nodes)
}

/// Perft split by root move.
pub fn divide(position: &mut Position, depth: u32) -> Result<Vec<(Move, u64)>> {
    let mut moves = MoveList::new();
    MoveGenerator::new().generate_all(position, &mut moves)?;

    let mut split = Vec::with_capacity(moves.len());
    for &mv in &moves {
        if let Some(token) = try_apply(position, mv)? {
            let nodes = perft(position, depth.saturating_sub(1))?;
            position.unmake(token)?;
            info!("{}: {}", mv, nodes);
            split.push((mv, nodes));
        }
    }
    Ok(split)
}
