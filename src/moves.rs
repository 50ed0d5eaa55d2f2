//! DucaPowr - Move encoding
//!
//! A move is a 16-bit value:
//! - bits 0-5 source square
//! - bits 6-11 destination square
//! - bits 12-13 promotion piece (0 rook, 1 knight, 2 bishop, 3 queen)
//! - bits 14-15 flag (0 none, 1 promotion, 2 pawn double push, 3 castling)

use std::fmt;

use crate::error::{EngineError, Result};
use crate::types::*;

/// Special-move flag stored in the top two bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveFlag {
    Normal = 0,
    Promotion = 1,
    DoublePush = 2,
    Castling = 3,
}

/// Promotion piece selector stored in bits 12-13.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Promotion {
    Rook = 0,
    Knight = 1,
    Bishop = 2,
    Queen = 3,
}

impl Promotion {
    pub const ALL: [Promotion; 4] = [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ];

    pub const fn kind(self) -> PieceKind {
        match self {
            Promotion::Rook => PieceKind::Rook,
            Promotion::Knight => PieceKind::Knight,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Queen => PieceKind::Queen,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Promotion::Rook => 'r',
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Queen => 'q',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Promotion::Rook),
            'n' => Some(Promotion::Knight),
            'b' => Some(Promotion::Bishop),
            'q' => Some(Promotion::Queen),
            _ => None,
        }
    }

    const fn from_bits(bits: u16) -> Self {
        match bits & 3 {
            0 => Promotion::Rook,
            1 => Promotion::Knight,
            2 => Promotion::Bishop,
            _ => Promotion::Queen,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    const TO_SHIFT: u16 = 6;
    const PROMO_SHIFT: u16 = 12;
    const FLAG_SHIFT: u16 = 14;

    /// Null move constant (a1a1)
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move((from as u16 & 0x3F) | ((to as u16 & 0x3F) << Self::TO_SHIFT))
    }

    #[inline]
    pub const fn with_flag(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move(Self::new(from, to).0 | ((flag as u16) << Self::FLAG_SHIFT))
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: Promotion) -> Self {
        Move(
            Self::with_flag(from, to, MoveFlag::Promotion).0
                | ((piece as u16) << Self::PROMO_SHIFT),
        )
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Move(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        (self.0 & 0x3F) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> Self::TO_SHIFT) & 0x3F) as Square
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match self.0 >> Self::FLAG_SHIFT {
            0 => MoveFlag::Normal,
            1 => MoveFlag::Promotion,
            2 => MoveFlag::DoublePush,
            _ => MoveFlag::Castling,
        }
    }

    /// Promotion piece, meaningful only for promotion moves.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Promotion> {
        match self.flag() {
            MoveFlag::Promotion => Some(Promotion::from_bits(self.0 >> Self::PROMO_SHIFT)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Long algebraic notation (e.g., "e2e4", "e7e8q")
    pub fn to_long_algebraic(self) -> String {
        let mut text = format!("{}{}", square_name(self.from()), square_name(self.to()));
        if let Some(piece) = self.promotion_piece() {
            text.push(piece.letter());
        }
        text
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_algebraic())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_long_algebraic(), self.flag())
    }
}

// ============================================================================
// MOVE LIST
// ============================================================================

/// Capacity of one generation buffer.
pub const MAX_MOVES: usize = 400;

/// Fixed-capacity move buffer; pushing past capacity is an error, never an
/// overrun.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) -> Result<()> {
        if self.len == MAX_MOVES {
            return Err(EngineError::MoveListOverflow { capacity: MAX_MOVES });
        }
        self.moves[self.len] = mv;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout() {
        let mv = Move::new(12, 28);
        assert_eq!(mv.bits(), 12 | (28 << 6));
        assert_eq!(mv.flag(), MoveFlag::Normal);

        let promo = Move::promotion(52, 60, Promotion::Queen);
        assert_eq!(promo.bits() >> 14, 1);
        assert_eq!((promo.bits() >> 12) & 3, 3);
        assert_eq!(promo.promotion_piece(), Some(Promotion::Queen));

        let castle = Move::with_flag(4, 6, MoveFlag::Castling);
        assert_eq!(castle.bits() >> 14, 3);
        assert_eq!(castle.promotion_piece(), None);
    }

    #[test]
    fn long_algebraic_text() {
        assert_eq!(Move::new(12, 28).to_string(), "e2e4");
        assert_eq!(Move::promotion(52, 60, Promotion::Knight).to_string(), "e7e8n");
        assert_eq!(Move::with_flag(60, 62, MoveFlag::Castling).to_string(), "e8g8");
    }

    #[test]
    fn move_list_refuses_to_overflow() {
        let mut list = MoveList::new();
        for _ in 0..MAX_MOVES {
            list.push(Move::new(1, 2)).unwrap();
        }
        assert_eq!(list.len(), MAX_MOVES);
        assert!(matches!(
            list.push(Move::new(1, 2)),
            Err(EngineError::MoveListOverflow { capacity: MAX_MOVES })
        ));
        list.clear();
        assert!(list.is_empty());
    }
}
