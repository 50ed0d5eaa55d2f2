//! DucaPowr - Move Generator Module
//!
//! Pseudo-legal moves for the side to move: every move that obeys the
//! piece movement rules, whether or not it leaves the mover's own king
//! attacked. Filtering happens in `legality`.

use crate::attacks::{tables, AttackTables};
use crate::bitboard::*;
use crate::error::Result;
use crate::moves::{Move, MoveFlag, MoveList, Promotion};
use crate::position::*;
use crate::types::*;

/// Which part of the move set to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Captures (en passant and capturing promotions included).
    Captures,
    /// Non-captures (push promotions and castling included).
    Quiets,
    All,
}

impl GenType {
    fn captures(self) -> bool {
        self != GenType::Quiets
    }

    fn quiets(self) -> bool {
        self != GenType::Captures
    }
}

/// Castling candidate: right bit, king move, squares that must be empty,
/// rook home square.
struct CastlingPath {
    right: u32,
    king_from: Square,
    king_to: Square,
    between: u64,
    rook_home: Square,
}

#[rustfmt::skip]
const CASTLING_PATHS: [[CastlingPath; 2]; 2] = [
    [
        CastlingPath { right: WHITE_KINGSIDE, king_from: 4, king_to: 6, between: 0x60, rook_home: 7 },
        CastlingPath { right: WHITE_QUEENSIDE, king_from: 4, king_to: 2, between: 0x0E, rook_home: 0 },
    ],
    [
        CastlingPath { right: BLACK_KINGSIDE, king_from: 60, king_to: 62, between: 0x6000_0000_0000_0000, rook_home: 63 },
        CastlingPath { right: BLACK_QUEENSIDE, king_from: 60, king_to: 58, between: 0x0E00_0000_0000_0000, rook_home: 56 },
    ],
];

/// Move generator for chess positions
pub struct MoveGenerator {
    tables: &'static AttackTables,
}

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator { tables: tables() }
    }

    /// Append every pseudo-legal move of the requested type to `moves`.
    pub fn generate(&self, position: &Position, gen: GenType, moves: &mut MoveList) -> Result<()> {
        let us = position.side_to_move();
        let own = position.pieces(us);
        let enemy = position.pieces(us.opposite());
        let occupied = own | enemy;

        let mut targets = 0;
        if gen.captures() {
            targets |= enemy;
        }
        if gen.quiets() {
            targets |= !occupied;
        }

        self.generate_pawn_moves(position, gen, enemy, occupied, moves)?;

        for sq in Squares(position.board_of(PieceKind::Knight, us)) {
            push_targets(sq, self.tables.knight_attacks(sq) & targets, moves)?;
        }
        for sq in Squares(position.board_of(PieceKind::Bishop, us)) {
            push_targets(sq, self.tables.bishop_attacks(sq, occupied) & targets, moves)?;
        }
        for sq in Squares(position.board_of(PieceKind::Rook, us)) {
            push_targets(sq, self.tables.rook_attacks(sq, occupied) & targets, moves)?;
        }
        for sq in Squares(position.board_of(PieceKind::Queen, us)) {
            push_targets(sq, self.tables.queen_attacks(sq, occupied) & targets, moves)?;
        }
        for sq in Squares(position.board_of(PieceKind::King, us)) {
            push_targets(sq, self.tables.king_attacks(sq) & targets, moves)?;
        }

        if gen.quiets() {
            self.generate_castling(position, occupied, moves)?;
        }
        Ok(())
    }

    /// Captures followed by quiet moves.
    pub fn generate_all(&self, position: &Position, moves: &mut MoveList) -> Result<()> {
        self.generate(position, GenType::Captures, moves)?;
        self.generate(position, GenType::Quiets, moves)
    }

    fn generate_pawn_moves(
        &self,
        position: &Position,
        gen: GenType,
        enemy: u64,
        occupied: u64,
        moves: &mut MoveList,
    ) -> Result<()> {
        let us = position.side_to_move();
        let pawns = position.board_of(PieceKind::Pawn, us);
        let empty = !occupied;

        let (promotion_rank, double_rank, forward): (u64, u64, i8) = match us {
            Color::White => (RANK_8, RANK_3, 8),
            Color::Black => (RANK_1, RANK_6, -8),
        };
        let advance = |bb: u64| match us {
            Color::White => shift_north(bb),
            Color::Black => shift_south(bb),
        };

        if gen.captures() {
            let en_passant = en_passant_targets(position) & empty;
            for from in Squares(pawns) {
                let attacks = self.tables.pawn_attacks(us, square_bb(from));
                for to in Squares(attacks & enemy) {
                    push_pawn_move(from, to, promotion_rank, moves)?;
                }
                for to in Squares(attacks & en_passant) {
                    moves.push(Move::new(from, to))?;
                }
            }
        }

        if gen.quiets() {
            let single = advance(pawns) & empty;
            let double = advance(single & double_rank) & empty;

            for to in Squares(single) {
                let from = (to as i8 - forward) as Square;
                push_pawn_move(from, to, promotion_rank, moves)?;
            }
            for to in Squares(double) {
                let from = (to as i8 - 2 * forward) as Square;
                moves.push(Move::with_flag(from, to, MoveFlag::DoublePush))?;
            }
        }
        Ok(())
    }

    fn generate_castling(&self, position: &Position, occupied: u64, moves: &mut MoveList) -> Result<()> {
        let us = position.side_to_move();
        let king = position.board_of(PieceKind::King, us);
        let rooks = position.board_of(PieceKind::Rook, us);

        for path in &CASTLING_PATHS[us.index()] {
            if position.flags() & path.right != 0
                && occupied & path.between == 0
                && king & square_bb(path.king_from) != 0
                && rooks & square_bb(path.rook_home) != 0
            {
                moves.push(Move::with_flag(path.king_from, path.king_to, MoveFlag::Castling))?;
            }
        }
        Ok(())
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new()
    }
}

/// Empty squares a pawn of the side to move may capture into en passant.
pub fn en_passant_targets(position: &Position) -> u64 {
    let them = position.side_to_move().opposite();
    let files = position.en_passant_files(them) as u64;
    match them {
        Color::White => files << 16,
        Color::Black => files << 40,
    }
}

#[inline]
fn push_targets(from: Square, targets: u64, moves: &mut MoveList) -> Result<()> {
    for to in Squares(targets) {
        moves.push(Move::new(from, to))?;
    }
    Ok(())
}

/// Pawn move to `to`, expanded into one move per promotion piece on the
/// last rank.
#[inline]
fn push_pawn_move(from: Square, to: Square, promotion_rank: u64, moves: &mut MoveList) -> Result<()> {
    if square_bb(to) & promotion_rank != 0 {
        for piece in Promotion::ALL {
            moves.push(Move::promotion(from, to, piece))?;
        }
        Ok(())
    } else {
        moves.push(Move::new(from, to))
    }
}
