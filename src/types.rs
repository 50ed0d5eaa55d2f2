//! DucaPowr - Type definitions and constants
//!
//! Colors, piece identities and square naming shared by every other module.

/// Square index (0 = a1, 7 = h1, 63 = h8), rank-major.
pub type Square = u8;

/// File and rank names for long algebraic notation
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"12345678";

/// Side to move / piece owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Piece kind without color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Bishop,
    Knight,
    Rook,
    Queen,
    King,
}

pub const ALL_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Piece identity indexing the board array. Colors interleave so that
/// `kind * 2 + color` is the index; `NoPiece` is the sentinel returned by
/// square lookups and owns a board that always stays empty.
#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    WhitePawn, BlackPawn,
    WhiteBishop, BlackBishop,
    WhiteKnight, BlackKnight,
    WhiteRook, BlackRook,
    WhiteQueen, BlackQueen,
    WhiteKing, BlackKing,
    NoPiece,
}

/// Number of real piece identities.
pub const PIECE_COUNT: usize = 12;
/// Number of boards held by a position, sentinel included.
pub const BOARD_COUNT: usize = 13;

#[rustfmt::skip]
pub const ALL_PIECES: [Piece; PIECE_COUNT] = [
    Piece::WhitePawn, Piece::BlackPawn,
    Piece::WhiteBishop, Piece::BlackBishop,
    Piece::WhiteKnight, Piece::BlackKnight,
    Piece::WhiteRook, Piece::BlackRook,
    Piece::WhiteQueen, Piece::BlackQueen,
    Piece::WhiteKing, Piece::BlackKing,
];

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        ALL_PIECES[kind as usize * 2 + color as usize]
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind of a real piece; `None` for the sentinel.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Piece::NoPiece => None,
            p => Some(ALL_KINDS[p as usize / 2]),
        }
    }

    /// Owner of a real piece; `None` for the sentinel.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            Piece::NoPiece => None,
            p if p as usize % 2 == 0 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Piece::NoPiece
    }

    #[inline]
    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.kind() == Some(kind)
    }

    /// FEN character of the piece
    pub fn to_fen(self) -> Option<char> {
        let c = match self.kind()? {
            PieceKind::Pawn => 'p',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color()? {
            Color::White => Some(c.to_ascii_uppercase()),
            Color::Black => Some(c),
        }
    }

    /// FEN piece character to piece
    pub fn from_fen(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

#[inline]
pub const fn file_of(sq: Square) -> u8 {
    sq & 7
}

#[inline]
pub const fn rank_of(sq: Square) -> u8 {
    sq >> 3
}

/// Convert square index (0-63) to algebraic notation (e.g., "e4")
pub fn square_name(sq: Square) -> String {
    let file = file_of(sq) as usize;
    let rank = rank_of(sq) as usize;
    format!("{}{}", FILE_NAMES[file] as char, RANK_NAMES[rank] as char)
}

/// Convert algebraic notation to square index
pub fn parse_square(name: &str) -> Option<Square> {
    let mut chars = name.chars();
    let file = match chars.next()? {
        c @ 'a'..='h' => c as u8 - b'a',
        _ => return None,
    };
    let rank = match chars.next()? {
        c @ '1'..='8' => c as u8 - b'1',
        _ => return None,
    };
    Some(make_square(file, rank))
}
