pub use core_2048::*;

pub mod ai;
pub mod game;
pub mod logic;

pub use game::{Game, GameConfig, GameStatus, Turn};
pub use logic::{Merge, MoveOutcome, Spawn};
