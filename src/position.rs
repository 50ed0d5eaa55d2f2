//! DucaPowr - Position Module
//!
//! The authoritative board: one bitboard per piece identity, side to move, a
//! packed flags word (en-passant files and castling rights) and a move
//! history that makes every applied move exactly undoable.

use std::fmt;

use log::trace;

use crate::attacks::tables;
use crate::bitboard::*;
use crate::error::{EngineError, FenError, Result};
use crate::moves::{Move, MoveFlag};
use crate::types::*;
use crate::zobrist::ZobristKeys;

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ============================================================================
// FLAGS WORD
// ============================================================================
//
// bits 0-7   files on which a white pawn just advanced two squares
// bits 8-15  same for black
// bits 16-19 castling rights

pub const WHITE_KINGSIDE: u32 = 1 << 16;
pub const WHITE_QUEENSIDE: u32 = 1 << 17;
pub const BLACK_KINGSIDE: u32 = 1 << 18;
pub const BLACK_QUEENSIDE: u32 = 1 << 19;

pub const CASTLING_MASK: u32 = WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE;
pub const EN_PASSANT_MASK: u32 = 0xFFFF;

/// En-passant flag bit for a pawn of `color` that just double-pushed on `file`.
#[inline]
pub const fn en_passant_flag(color: Color, file: u8) -> u32 {
    1 << (color as u32 * 8 + file as u32)
}

/// Castling rights lost when a piece leaves or lands on `sq`.
#[inline]
const fn castling_rights_touched(sq: Square) -> u32 {
    match sq {
        0 => WHITE_QUEENSIDE,
        4 => WHITE_KINGSIDE | WHITE_QUEENSIDE,
        7 => WHITE_KINGSIDE,
        56 => BLACK_QUEENSIDE,
        60 => BLACK_KINGSIDE | BLACK_QUEENSIDE,
        63 => BLACK_KINGSIDE,
        _ => 0,
    }
}

/// Rook relocation `(from, to)` of a castling move landing the king on `king_to`.
#[inline]
pub const fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

// ============================================================================
// HISTORY
// ============================================================================

/// Everything `undo_move` needs to restore the position before `mv`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub moved: Piece,
    pub captured: Piece,
    /// Square the captured piece stood on; differs from `mv.to()` only for
    /// en passant.
    pub captured_square: Square,
    pub prior_flags: u32,
    pub prior_check_count: [u8; 2],
}

/// Proof of one `apply_move`, consumed by `Position::unmake`.
#[must_use = "an applied move must be undone with Position::unmake"]
#[derive(Debug, PartialEq, Eq)]
pub struct UndoToken {
    depth: usize,
}

impl UndoToken {
    pub fn depth(&self) -> usize {
        self.depth
    }
}

// ============================================================================
// POSITION
// ============================================================================

#[derive(Clone)]
pub struct Position {
    boards: [u64; BOARD_COUNT],
    side_to_move: Color,
    flags: u32,
    check_count: [u8; 2],
    history: Vec<HistoryEntry>,
    zobrist: ZobristKeys,
}

impl Position {
    /// Create a position with the starting layout
    pub fn new() -> Self {
        let mut position = Position::empty();
        position.init();
        position
    }

    /// A position with no pieces, white to move and no rights.
    pub fn empty() -> Self {
        Position {
            boards: [0; BOARD_COUNT],
            side_to_move: Color::White,
            flags: 0,
            check_count: [0; 2],
            history: Vec::with_capacity(256),
            zobrist: ZobristKeys::new(),
        }
    }

    /// Reset to the standard starting layout, white to move, all castling
    /// rights, no en passant, empty history.
    pub fn init(&mut self) {
        self.boards = [0; BOARD_COUNT];
        self.boards[Piece::WhitePawn.index()] = RANK_2;
        self.boards[Piece::WhiteRook.index()] = 0x0000000000000081;
        self.boards[Piece::WhiteKnight.index()] = 0x0000000000000042;
        self.boards[Piece::WhiteBishop.index()] = 0x0000000000000024;
        self.boards[Piece::WhiteQueen.index()] = 0x0000000000000008;
        self.boards[Piece::WhiteKing.index()] = 0x0000000000000010;
        self.boards[Piece::BlackPawn.index()] = RANK_7;
        self.boards[Piece::BlackRook.index()] = 0x8100000000000000;
        self.boards[Piece::BlackKnight.index()] = 0x4200000000000000;
        self.boards[Piece::BlackBishop.index()] = 0x2400000000000000;
        self.boards[Piece::BlackQueen.index()] = 0x0800000000000000;
        self.boards[Piece::BlackKing.index()] = 0x1000000000000000;
        self.side_to_move = Color::White;
        self.flags = CASTLING_MASK;
        self.check_count = [0; 2];
        self.history.clear();
        self.zobrist = ZobristKeys::new();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    #[inline]
    pub fn castling_rights(&self) -> u32 {
        self.flags & CASTLING_MASK
    }

    /// Files on which a pawn of `color` may be captured en passant.
    #[inline]
    pub fn en_passant_files(&self, color: Color) -> u8 {
        (self.flags >> (color as u32 * 8)) as u8
    }

    #[inline]
    pub fn check_count(&self, color: Color) -> u8 {
        self.check_count[color.index()]
    }

    #[inline]
    pub fn piece_board(&self, piece: Piece) -> u64 {
        self.boards[piece.index()]
    }

    #[inline]
    pub fn board_of(&self, kind: PieceKind, color: Color) -> u64 {
        self.boards[Piece::new(kind, color).index()]
    }

    /// All pieces of one side
    pub fn pieces(&self, color: Color) -> u64 {
        ALL_KINDS
            .iter()
            .fold(0, |acc, &kind| acc | self.board_of(kind, color))
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.boards.iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.board_of(PieceKind::King, color);
        if kings == 0 {
            None
        } else {
            Some(lsb(kings))
        }
    }

    /// Identity of the piece on `sq`, or `Piece::NoPiece`.
    pub fn get_piece_at(&self, sq: Square) -> Piece {
        let bit = square_bb(sq);
        ALL_PIECES
            .iter()
            .copied()
            .find(|piece| self.boards[piece.index()] & bit != 0)
            .unwrap_or(Piece::NoPiece)
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|entry| entry.mv)
    }

    /// Every square attacked by `color`, own pieces included.
    pub fn attacks_by(&self, color: Color) -> u64 {
        let t = tables();
        let occupied = self.occupied();
        let queens = self.board_of(PieceKind::Queen, color);

        let mut attacks = t.pawn_attacks(color, self.board_of(PieceKind::Pawn, color));
        for sq in Squares(self.board_of(PieceKind::Knight, color)) {
            attacks |= t.knight_attacks(sq);
        }
        for sq in Squares(self.board_of(PieceKind::Bishop, color) | queens) {
            attacks |= t.bishop_attacks(sq, occupied);
        }
        for sq in Squares(self.board_of(PieceKind::Rook, color) | queens) {
            attacks |= t.rook_attacks(sq, occupied);
        }
        for sq in Squares(self.board_of(PieceKind::King, color)) {
            attacks |= t.king_attacks(sq);
        }
        attacks
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Apply `mv` without any legality check. The returned token must be
    /// handed back to `unmake` before any earlier token.
    pub fn apply_move(&mut self, mv: Move) -> UndoToken {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();
        let from_bb = square_bb(from);
        let to_bb = square_bb(to);
        let moved = self.get_piece_at(from);
        let prior_flags = self.flags;
        let prior_check_count = self.check_count;

        // En passant: a pawn capturing into an empty square behind a pawn
        // that just advanced two squares.
        let mut captured_square = to;
        if moved.is_kind(PieceKind::Pawn)
            && file_of(from) != file_of(to)
            && self.occupied() & to_bb == 0
        {
            let behind = match us {
                Color::White => to.wrapping_sub(8),
                Color::Black => to + 8,
            };
            if behind < 64
                && self.flags & en_passant_flag(them, file_of(to)) != 0
                && self.board_of(PieceKind::Pawn, them) & square_bb(behind) != 0
            {
                captured_square = behind;
            }
        }

        let captured = self.get_piece_at(captured_square);
        self.boards[captured.index()] &= !square_bb(captured_square);
        self.boards[moved.index()] &= !from_bb;
        self.boards[moved.index()] |= to_bb;

        self.history.push(HistoryEntry {
            mv,
            moved,
            captured,
            captured_square,
            prior_flags,
            prior_check_count,
        });

        self.flags &= !EN_PASSANT_MASK;
        if mv.flag() == MoveFlag::DoublePush {
            self.flags |= en_passant_flag(us, file_of(from));
        }

        if let Some(promotion) = mv.promotion_piece() {
            self.boards[moved.index()] &= !to_bb;
            self.boards[Piece::new(promotion.kind(), us).index()] |= to_bb;
        }

        if mv.flag() == MoveFlag::Castling {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
                let rook = Piece::new(PieceKind::Rook, us).index();
                self.boards[rook] &= !square_bb(rook_from);
                self.boards[rook] |= square_bb(rook_to);
            }
        }

        self.flags &= !(castling_rights_touched(from) | castling_rights_touched(to));
        self.side_to_move = them;

        // a move from an empty square must not leave bits on the sentinel
        self.boards[Piece::NoPiece.index()] = 0;

        if self.attacks_by(us) & self.board_of(PieceKind::King, them) != 0 {
            let count = &mut self.check_count[them.index()];
            *count = count.saturating_add(1);
        }

        trace!("apply {:?} ({:?} x {:?})", mv, moved, captured);

        UndoToken {
            depth: self.history.len(),
        }
    }

    /// Revert the most recent applied move.
    pub fn undo_move(&mut self) -> Result<()> {
        let entry = self.history.pop().ok_or(EngineError::EmptyHistory)?;
        let us = self.side_to_move.opposite();
        let from_bb = square_bb(entry.mv.from());
        let to_bb = square_bb(entry.mv.to());

        self.flags = entry.prior_flags;
        self.check_count = entry.prior_check_count;

        if entry.mv.flag() == MoveFlag::Castling {
            if let Some((rook_from, rook_to)) = castling_rook_squares(entry.mv.to()) {
                let rook = Piece::new(PieceKind::Rook, us).index();
                self.boards[rook] &= !square_bb(rook_to);
                self.boards[rook] |= square_bb(rook_from);
            }
        }

        let on_destination = match entry.mv.promotion_piece() {
            Some(promotion) => Piece::new(promotion.kind(), us),
            None => entry.moved,
        };
        self.boards[on_destination.index()] &= !to_bb;
        self.boards[entry.moved.index()] |= from_bb;
        self.boards[entry.captured.index()] |= square_bb(entry.captured_square);
        self.boards[Piece::NoPiece.index()] = 0;

        self.side_to_move = us;
        Ok(())
    }

    /// Undo the move that produced `token`; refuses any token but the latest.
    pub fn unmake(&mut self, token: UndoToken) -> Result<()> {
        if token.depth != self.history.len() {
            return Err(EngineError::UndoOutOfOrder {
                expected: token.depth,
                actual: self.history.len(),
            });
        }
        self.undo_move()
    }

    // ------------------------------------------------------------------
    // Hashing
    // ------------------------------------------------------------------

    /// Zobrist hash of pieces, flags, check counts and side to move.
    pub fn hash(&self) -> u64 {
        let keys = &self.zobrist;
        let mut h = 0u64;

        for piece in ALL_PIECES {
            for sq in Squares(self.boards[piece.index()]) {
                h ^= keys.piece_square[piece.index()][sq as usize];
            }
        }

        for bit in Squares(self.flags as u64) {
            h ^= keys.flags[bit as usize];
        }

        for color in [Color::White, Color::Black] {
            h ^= keys.check_count_key(color.index(), self.check_count[color.index()]);
        }

        if self.side_to_move == Color::Black {
            h ^= keys.side;
        }

        h
    }

    // ------------------------------------------------------------------
    // FEN
    // ------------------------------------------------------------------

    /// Create a position from a FEN string
    pub fn from_fen(fen: &str) -> std::result::Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let mut position = Position::empty();

        // Piece placement
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(parts[0].to_string()));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file = file.saturating_add(skip as u8);
                } else if let Some(piece) = Piece::from_fen(c) {
                    if file > 7 {
                        return Err(FenError::Placement(parts[0].to_string()));
                    }
                    position.boards[piece.index()] |= square_bb(make_square(file, rank));
                    file += 1;
                } else {
                    return Err(FenError::Placement(parts[0].to_string()));
                }
            }
            if file != 8 {
                return Err(FenError::Placement(parts[0].to_string()));
            }
        }

        // Active color
        position.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        // Castling rights
        if let Some(&castling) = parts.get(2) {
            if castling != "-" {
                for c in castling.chars() {
                    position.flags |= match c {
                        'K' => WHITE_KINGSIDE,
                        'Q' => WHITE_QUEENSIDE,
                        'k' => BLACK_KINGSIDE,
                        'q' => BLACK_QUEENSIDE,
                        _ => return Err(FenError::Castling(castling.to_string())),
                    };
                }
            }
        }

        // En passant target square belongs to the side that just moved
        if let Some(&ep) = parts.get(3) {
            if ep != "-" {
                let sq = parse_square(ep).ok_or_else(|| FenError::EnPassant(ep.to_string()))?;
                let mover = position.side_to_move.opposite();
                let expected_rank = match mover {
                    Color::White => 2,
                    Color::Black => 5,
                };
                if rank_of(sq) != expected_rank {
                    return Err(FenError::EnPassant(ep.to_string()));
                }
                position.flags |= en_passant_flag(mover, file_of(sq));
            }
        }

        Ok(position)
    }

    /// Generate FEN string from current position
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty_count = 0;
            for file in 0..8u8 {
                match self.get_piece_at(make_square(file, rank)).to_fen() {
                    None => empty_count += 1,
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights() == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (WHITE_KINGSIDE, 'K'),
                (WHITE_QUEENSIDE, 'Q'),
                (BLACK_KINGSIDE, 'k'),
                (BLACK_QUEENSIDE, 'q'),
            ] {
                if self.flags & flag != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        let mover = self.side_to_move.opposite();
        let files = self.en_passant_files(mover);
        if files == 0 {
            fen.push('-');
        } else {
            let rank = match mover {
                Color::White => 2,
                Color::Black => 5,
            };
            fen.push_str(&square_name(make_square(lsb(files as u64), rank)));
        }

        fen.push_str(" 0 1");
        fen
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        for rank in (0..8u8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8u8 {
                let c = self.get_piece_at(make_square(file, rank)).to_fen().unwrap_or(' ');
                write!(f, " {} |", c)?;
            }
            writeln!(f)?;
            writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        }
        write!(f, "    a   b   c   d   e   f   g   h")
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}
