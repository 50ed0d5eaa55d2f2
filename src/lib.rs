//! DucaPowr - xboard chess engine core
//!
//! Bitboard position with exact undo, magic/rotated attack tables,
//! pseudo-legal move generation with a legality filter, and a fixed-depth
//! alpha-beta search over a material evaluation.

pub mod types;
pub mod bitboard;
pub mod attacks;
pub mod moves;
pub mod zobrist;
pub mod error;
pub mod position;
pub mod evaluation;
pub mod move_generator;
pub mod legality;
pub mod search;
pub mod perft;
pub mod config;
pub mod engine;
pub mod xboard;

pub use engine::{Engine, Reply};
pub use error::{EngineError, Result};
pub use moves::Move;
pub use position::Position;
