//! DucaPowr - Bitboard Module
//!
//! Bit utilities shared by the attack tables, the move generator and the
//! position. A bitboard is a 64-bit integer where each bit represents a
//! square on the board (bit 0 = a1, bit 63 = h8).

use crate::types::Square;

// ============================================================================
// CONSTANTS - Files and Ranks
// ============================================================================

pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_B: u64 = 0x0202020202020202;
pub const FILE_G: u64 = 0x4040404040404040;
pub const FILE_H: u64 = 0x8080808080808080;

pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_3: u64 = 0x0000000000FF0000;
pub const RANK_4: u64 = 0x00000000FF000000;
pub const RANK_5: u64 = 0x000000FF00000000;
pub const RANK_6: u64 = 0x0000FF0000000000;
pub const RANK_7: u64 = 0x00FF000000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;
pub const NOT_FILE_AB: u64 = !(FILE_A | FILE_B);
pub const NOT_FILE_GH: u64 = !(FILE_G | FILE_H);

/// `(bb & FILE_A) * MAGIC_FAR_8` moves a1..a8 onto the eighth rank, a1
/// landing on a8. The other files of the operand must be empty.
pub const MAGIC_FAR_8: u64 = 0x0102040810204080;

// ============================================================================
// BIT SCANNING
// ============================================================================

/// Extract and clear the least significant bit, returning its index
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Square {
    let idx = bb.trailing_zeros() as Square;
    *bb &= *bb - 1;
    idx
}

/// Count the number of set bits in a bitboard
#[inline]
pub fn popcount(bb: u64) -> u32 {
    bb.count_ones()
}

/// Get the index of the least significant bit
#[inline]
pub fn lsb(bb: u64) -> Square {
    bb.trailing_zeros() as Square
}

/// Get the index of the most significant bit
#[inline]
pub fn msb(bb: u64) -> Square {
    (63 - bb.leading_zeros()) as Square
}

/// Create a bitboard with a single bit set at the given square
#[inline]
pub const fn square_bb(sq: Square) -> u64 {
    1u64 << sq
}

/// Get the bitboard for a file (0-7)
#[inline]
pub const fn file_bb(file: u8) -> u64 {
    FILE_A << file
}

/// Get the bitboard for a rank (0-7)
#[inline]
pub const fn rank_bb(rank: u8) -> u64 {
    RANK_1 << (rank * 8)
}

/// Iterator over the squares of a bitboard, lowest first.
#[derive(Clone, Copy, Debug)]
pub struct Squares(pub u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = popcount(self.0) as usize;
        (n, Some(n))
    }
}

// ============================================================================
// SHIFTS
// ============================================================================

#[inline]
pub const fn shift_north(bb: u64) -> u64 {
    bb << 8
}

#[inline]
pub const fn shift_south(bb: u64) -> u64 {
    bb >> 8
}

#[inline]
pub const fn shift_east(bb: u64) -> u64 {
    (bb << 1) & NOT_FILE_A
}

#[inline]
pub const fn shift_west(bb: u64) -> u64 {
    (bb >> 1) & NOT_FILE_H
}

// ============================================================================
// REVERSAL AND ROTATION
// ============================================================================

/// Reverse the bit order of a byte (bit 0 <-> bit 7).
#[inline]
pub const fn reverse_byte(b: u8) -> u8 {
    b.reverse_bits()
}

/// Reverse all 64 bits: a1 <-> h8.
#[inline]
pub const fn reverse_board(bb: u64) -> u64 {
    bb.reverse_bits()
}

/// Flip ranks: a1 <-> a8.
#[inline]
pub const fn flip_vertical(bb: u64) -> u64 {
    bb.swap_bytes()
}

/// Mirror files: a1 <-> h1.
#[inline]
pub const fn mirror_horizontal(bb: u64) -> u64 {
    flip_vertical(reverse_board(bb))
}

/// Gather the eight squares of `file` into a byte, bit `r` holding rank `r`.
#[inline]
pub const fn file_to_byte(bb: u64, file: u8) -> u8 {
    (((bb >> file) & FILE_A).wrapping_mul(MAGIC_FAR_8) >> 56) as u8
}

/// Spread a byte onto the a-file, bit `r` landing on rank `r`.
#[inline]
pub const fn byte_to_file_a(byte: u8) -> u64 {
    let mut out = 0u64;
    let mut r = 0;
    while r < 8 {
        if byte & (1 << r) != 0 {
            out |= 1u64 << (r * 8);
        }
        r += 1;
    }
    out
}

/// The eight squares of `rank` as a byte, bit `f` holding file `f`.
#[inline]
pub const fn rank_to_byte(bb: u64, rank: u8) -> u8 {
    (bb >> (rank * 8)) as u8
}

// ============================================================================
// DEBUG / DISPLAY
// ============================================================================

/// Render a bitboard as an 8x8 grid, rank 8 on top.
pub fn bitboard_string(bb: u64) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        out.push_str(&format!("{}  ", rank + 1));
        for file in 0..8u8 {
            let sq = rank * 8 + file;
            out.push_str(if bb & square_bb(sq) != 0 { "1 " } else { ". " });
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out.push_str(&format!("   Bitboard: 0x{:016X}", bb));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_iterates_lowest_first() {
        let bb = square_bb(3) | square_bb(17) | square_bb(63);
        let squares: Vec<Square> = Squares(bb).collect();
        assert_eq!(squares, vec![3, 17, 63]);
        assert_eq!(lsb(bb), 3);
        assert_eq!(msb(bb), 63);
        assert_eq!(popcount(bb), 3);
    }

    #[test]
    fn file_byte_rotation_round_trips() {
        for file in 0..8u8 {
            for byte in 0..=255u8 {
                let bb = byte_to_file_a(byte) << file;
                assert_eq!(file_to_byte(bb, file), byte);
                // squares on other files are ignored
                assert_eq!(file_to_byte(bb | !file_bb(file), file), byte);
            }
        }
    }

    #[test]
    fn flips_and_mirrors() {
        assert_eq!(flip_vertical(RANK_1), RANK_8);
        assert_eq!(mirror_horizontal(FILE_A), FILE_H);
        assert_eq!(reverse_board(square_bb(0)), square_bb(63));
        assert_eq!(reverse_byte(0b0000_0011), 0b1100_0000);
    }

    #[test]
    fn east_west_shifts_do_not_wrap() {
        assert_eq!(shift_east(FILE_H), 0);
        assert_eq!(shift_west(FILE_A), 0);
        assert_eq!(shift_north(RANK_8), 0);
        assert_eq!(shift_south(RANK_1), 0);
    }

    #[test]
    fn rank_masks() {
        assert_eq!(rank_bb(3), RANK_4);
        assert_eq!(file_bb(7), FILE_H);
        assert_eq!(rank_to_byte(RANK_5 | RANK_4, 4), 0xFF);
    }
}
