//! DucaPowr - Position Evaluation Module
//!
//! Material only, counted twice (midgame and endgame values) and blended by
//! a phase derived from the remaining non-pawn pieces.

use crate::bitboard::popcount;
use crate::position::Position;
use crate::types::*;

// ============================================================================
// SCORE BOUNDS
// ============================================================================

/// Score of a position whose side to move has lost its king. Symmetric with
/// `SCORE_MAX` so that negation never overflows.
pub const SCORE_MIN: i32 = -i32::MAX;
pub const SCORE_MAX: i32 = i32::MAX;

// ============================================================================
// PIECE VALUES
// ============================================================================

/// Indexed by `PieceKind as usize`: pawn, bishop, knight, rook, queen.
const MIDGAME_VALUES: [i32; 5] = [82, 365, 337, 477, 1025];
const ENDGAME_VALUES: [i32; 5] = [94, 297, 281, 512, 936];

/// Phase weight per kind; a full set of minors and majors sums to `MAX_PHASE`.
const PHASE_WEIGHTS: [i32; 5] = [0, 1, 1, 2, 4];
const MAX_PHASE: i32 = 24;

const MATERIAL_KINDS: [PieceKind; 5] = [
    PieceKind::Pawn,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Remaining phase, 0 (bare kings and pawns) to `MAX_PHASE` (opening).
/// Extra pieces from promotion saturate at `MAX_PHASE`.
pub fn game_phase(position: &Position) -> i32 {
    let mut phase = 0;
    for kind in MATERIAL_KINDS {
        let count = popcount(position.board_of(kind, Color::White))
            + popcount(position.board_of(kind, Color::Black));
        phase += PHASE_WEIGHTS[kind as usize] * count as i32;
    }
    phase.min(MAX_PHASE)
}

/// Static evaluation from the side to move's point of view.
pub fn evaluate(position: &Position) -> i32 {
    let us = position.side_to_move();
    let them = us.opposite();

    if position.board_of(PieceKind::King, us) == 0 {
        return SCORE_MIN;
    }
    if position.board_of(PieceKind::King, them) == 0 {
        return SCORE_MAX;
    }

    let mut midgame = 0;
    let mut endgame = 0;
    for kind in MATERIAL_KINDS {
        let balance = popcount(position.board_of(kind, us)) as i32
            - popcount(position.board_of(kind, them)) as i32;
        midgame += MIDGAME_VALUES[kind as usize] * balance;
        endgame += ENDGAME_VALUES[kind as usize] * balance;
    }

    let phase = game_phase(position);
    (midgame * phase + endgame * (MAX_PHASE - phase)) / MAX_PHASE
}
