//! DucaPowr - Legality Filter
//!
//! A move is legal when, after it is played, the opponent attacks neither
//! the mover's king nor (for castling) any square the king crossed. Attacks
//! are recomputed from scratch for every candidate.

use crate::bitboard::square_bb;
use crate::error::Result;
use crate::move_generator::MoveGenerator;
use crate::moves::{Move, MoveFlag, MoveList};
use crate::position::{Position, UndoToken};
use crate::types::*;

/// True if the side to move's king stands on a square of `attacks`.
#[inline]
pub fn is_check(position: &Position, attacks: u64) -> bool {
    position.board_of(PieceKind::King, position.side_to_move()) & attacks != 0
}

/// Is the side to move in check right now?
pub fn in_check(position: &Position) -> bool {
    is_check(position, position.attacks_by(position.side_to_move().opposite()))
}

/// Origin, transit and destination squares of a castling king move.
#[inline]
fn castling_path(mv: Move) -> u64 {
    let from = mv.from();
    let to = mv.to();
    let transit = (from + to) / 2;
    square_bb(from) | square_bb(transit) | square_bb(to)
}

/// False if the king would castle out of, through or into `enemy_attacks`.
#[inline]
pub fn castling_path_is_safe(mv: Move, enemy_attacks: u64) -> bool {
    castling_path(mv) & enemy_attacks == 0
}

/// Apply `mv` if it is legal and hand back the undo token; otherwise leave
/// the position untouched.
pub fn try_apply(position: &mut Position, mv: Move) -> Result<Option<UndoToken>> {
    let us = position.side_to_move();

    if mv.flag() == MoveFlag::Castling {
        let enemy_attacks = position.attacks_by(us.opposite());
        if !castling_path_is_safe(mv, enemy_attacks) {
            return Ok(None);
        }
    }

    let token = position.apply_move(mv);
    let king = position.board_of(PieceKind::King, us);
    if position.attacks_by(us.opposite()) & king != 0 {
        position.unmake(token)?;
        return Ok(None);
    }
    Ok(Some(token))
}

/// Does `mv` leave the mover's king safe? The position is restored before
/// returning.
pub fn is_legal(position: &mut Position, mv: Move) -> Result<bool> {
    match try_apply(position, mv)? {
        Some(token) => {
            position.unmake(token)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// All legal moves for the side to move, captures first.
pub fn legal_moves(position: &mut Position) -> Result<MoveList> {
    let mut pseudo = MoveList::new();
    MoveGenerator::new().generate_all(position, &mut pseudo)?;

    let mut legal = MoveList::new();
    for &mv in &pseudo {
        if is_legal(position, mv)? {
            legal.push(mv)?;
        }
    }
    Ok(legal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::STARTING_FEN;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn castles(fen: &str) -> Vec<String> {
        let mut p = position(fen);
        let mut v: Vec<String> = legal_moves(&mut p)
            .unwrap()
            .iter()
            .filter(|m| m.flag() == MoveFlag::Castling)
            .map(|m| m.to_string())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn start_position_moves_are_all_legal() {
        let mut p = position(STARTING_FEN);
        assert_eq!(legal_moves(&mut p).unwrap().len(), 20);
        assert_eq!(p.to_fen(), STARTING_FEN);
        assert_eq!(p.history_len(), 0);
    }

    #[test]
    fn detects_check() {
        let p = position("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
        assert!(in_check(&p));
        assert!(is_check(&p, p.attacks_by(Color::White)));
        assert!(!in_check(&position(STARTING_FEN)));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut p = position("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let knight_moves = legal_moves(&mut p)
            .unwrap()
            .iter()
            .filter(|m| m.from() == 12)
            .count();
        assert_eq!(knight_moves, 0);
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let mut p = position("4k3/8/8/8/8/8/r7/4K3 w - - 0 1");
        let moves = legal_moves(&mut p).unwrap();
        // rank 2 is covered by the rook; d1 and f1 remain
        let mut t: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        t.sort();
        assert_eq!(t, vec!["e1d1", "e1f1"]);
    }

    #[test]
    fn castling_gated_by_attacked_squares() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1c1", "e1g1"]);
        // f1 attacked: no kingside
        assert_eq!(castles("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1"), vec!["e1c1"]);
        // king in check: neither
        assert_eq!(castles("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1"), Vec::<String>::new());
        // g1 attacked by a knight
        assert_eq!(castles("r3k2r/8/8/8/8/7n/8/R3K2R w KQkq - 0 1"), vec!["e1c1"]);
        // b1 attacked only: queenside still allowed
        assert_eq!(castles("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1"), vec!["e1c1", "e1g1"]);
    }

    #[test]
    fn try_apply_leaves_position_untouched_on_illegal_move() {
        let mut p = position("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let before = p.hash();
        let mv = Move::new(12, 29);
        assert!(try_apply(&mut p, mv).unwrap().is_none());
        assert_eq!(p.hash(), before);
        assert_eq!(p.history_len(), 0);

        let token = try_apply(&mut p, Move::new(4, 3)).unwrap().unwrap();
        assert_eq!(p.side_to_move(), Color::Black);
        p.unmake(token).unwrap();
        assert_eq!(p.hash(), before);
    }

    #[test]
    fn en_passant_exposing_king_is_illegal() {
        // capturing d5 would open the fifth rank to the rook
        let mut p = position("8/8/8/r2pP2K/8/8/8/4k3 w - d6 0 1");
        let moves = legal_moves(&mut p).unwrap();
        assert!(!moves.contains(Move::new(36, 43)));
    }
}
