//! DucaPowr - Engine facade
//!
//! The three operations a protocol front end needs (new game, opponent move,
//! engine move) plus lifecycle accessors.

use std::fmt;

use log::info;

use crate::config::EngineConfig;
use crate::error::{EngineError, MoveParseError, Result};
use crate::legality::legal_moves;
use crate::moves::{Move, MoveFlag, Promotion};
use crate::position::Position;
use crate::search::SearchEngine;
use crate::types::*;

/// What the engine plays on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Move(Move),
    /// No legal move is available.
    Resign,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Move(mv) => write!(f, "{}", mv),
            Reply::Resign => f.write_str("resign"),
        }
    }
}

pub struct Engine {
    position: Position,
    search: SearchEngine,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            position: Position::new(),
            search: SearchEngine::new(),
            config,
            running: true,
        }
    }

    /// Reset to the starting position; the engine becomes active.
    pub fn new_game(&mut self) {
        self.position.init();
        self.running = true;
        info!("new game, depth {}", self.config.depth);
    }

    /// Replace the current game with the position described by `fen`.
    pub fn set_position(&mut self, fen: &str) -> Result<()> {
        self.position = Position::from_fen(fen)?;
        self.running = true;
        Ok(())
    }

    /// Parse and play an opponent move given in long algebraic notation.
    pub fn user_move(&mut self, text: &str) -> Result<Move> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        let mv = self.parse_move(text)?;
        if !legal_moves(&mut self.position)?.contains(mv) {
            return Err(EngineError::IllegalMove(text.to_string()));
        }
        let _ = self.position.apply_move(mv);
        Ok(mv)
    }

    /// Search, play and return the engine's move for the side to move.
    pub fn think(&mut self) -> Result<Reply> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        let result = self.search.search(&mut self.position, self.config.depth)?;
        match result.best_move {
            Some(mv) => {
                let _ = self.position.apply_move(mv);
                Ok(Reply::Move(mv))
            }
            None => {
                info!("no legal move for {:?}, resigning", self.position.side_to_move());
                Ok(Reply::Resign)
            }
        }
    }

    /// Convert move text to the internal encoding, inferring the
    /// double-push and castling flags from the moving piece.
    pub fn parse_move(&self, text: &str) -> std::result::Result<Move, MoveParseError> {
        let text = text.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::BadLength(text.to_string()));
        }

        let from = parse_square(&text[0..2]).ok_or_else(|| MoveParseError::BadSquare(text[0..2].to_string()))?;
        let to = parse_square(&text[2..4]).ok_or_else(|| MoveParseError::BadSquare(text[2..4].to_string()))?;

        if let Some(letter) = text[4..].chars().next() {
            let piece = Promotion::from_letter(letter).ok_or(MoveParseError::BadPromotion(letter))?;
            return Ok(Move::promotion(from, to, piece));
        }

        let piece = self.position.get_piece_at(from);
        let kind = piece.kind().ok_or_else(|| MoveParseError::EmptySource(square_name(from)))?;

        let flag = match kind {
            PieceKind::Pawn if rank_of(from).abs_diff(rank_of(to)) == 2 => MoveFlag::DoublePush,
            PieceKind::King if file_of(from).abs_diff(file_of(to)) == 2 => MoveFlag::Castling,
            _ => MoveFlag::Normal,
        };
        Ok(Move::with_flag(from, to, flag))
    }

    /// Stop playing; later moves are refused until a new game.
    pub fn close(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.config.set_depth(depth);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        let mut config = EngineConfig::default();
        config.set_depth(2);
        Engine::new(config)
    }

    #[test]
    fn parses_flags_from_piece_and_distance() {
        let engine = engine();
        assert_eq!(engine.parse_move("e2e4").unwrap().flag(), MoveFlag::DoublePush);
        assert_eq!(engine.parse_move("e2e3").unwrap().flag(), MoveFlag::Normal);
        assert_eq!(engine.parse_move("g1f3").unwrap().flag(), MoveFlag::Normal);
        assert_eq!(engine.parse_move("e1g1").unwrap().flag(), MoveFlag::Castling);
        assert_eq!(
            engine.parse_move("a7a8q").unwrap().promotion_piece(),
            Some(Promotion::Queen)
        );
    }

    #[test]
    fn rejects_malformed_text() {
        let engine = engine();
        assert!(matches!(engine.parse_move("e2"), Err(MoveParseError::BadLength(_))));
        assert!(matches!(engine.parse_move("e2e4qq"), Err(MoveParseError::BadLength(_))));
        assert!(matches!(engine.parse_move("z2e4"), Err(MoveParseError::BadSquare(_))));
        assert!(matches!(engine.parse_move("e2e9"), Err(MoveParseError::BadSquare(_))));
        assert_eq!(engine.parse_move("a7a8k"), Err(MoveParseError::BadPromotion('k')));
        assert_eq!(engine.parse_move("e4e5"), Err(MoveParseError::EmptySource("e4".into())));
        assert!(matches!(engine.parse_move("é2e4"), Err(MoveParseError::BadLength(_))));
    }

    #[test]
    fn user_move_sets_en_passant_and_switches_side() {
        let mut engine = engine();
        engine.user_move("e2e4").unwrap();
        assert_eq!(engine.side_to_move(), Color::Black);
        assert_eq!(engine.position().en_passant_files(Color::White), 1 << 4);
    }

    #[test]
    fn illegal_user_move_is_refused_without_side_effects() {
        let mut engine = engine();
        assert_eq!(
            engine.user_move("e2e5"),
            Err(EngineError::IllegalMove("e2e5".into()))
        );
        assert_eq!(engine.position().history_len(), 0);
        assert_eq!(engine.side_to_move(), Color::White);
    }

    #[test]
    fn think_plays_a_legal_move() {
        let mut engine = engine();
        engine.user_move("e2e4").unwrap();
        let reply = engine.think().unwrap();
        assert!(matches!(reply, Reply::Move(_)));
        assert_eq!(engine.side_to_move(), Color::White);
        assert_eq!(engine.position().history_len(), 2);
    }

    #[test]
    fn resigns_without_legal_moves() {
        let mut engine = engine();
        engine.set_position("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(engine.think().unwrap(), Reply::Resign);
        assert_eq!(Reply::Resign.to_string(), "resign");
    }

    #[test]
    fn closed_engine_refuses_work() {
        let mut engine = engine();
        engine.close();
        assert!(!engine.is_running());
        assert_eq!(engine.think(), Err(EngineError::NotRunning));
        assert_eq!(engine.user_move("e2e4"), Err(EngineError::NotRunning));
        engine.new_game();
        assert!(engine.is_running());
    }

    #[test]
    fn castling_from_text() {
        let mut engine = engine();
        engine.set_position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        engine.user_move("e1g1").unwrap();
        assert_eq!(engine.position().get_piece_at(5), Piece::WhiteRook);
        assert_eq!(engine.position().get_piece_at(6), Piece::WhiteKing);
    }
}
