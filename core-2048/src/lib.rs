pub mod board;
pub mod direction;
pub mod error;
pub mod line;

pub use board::Board;
pub use direction::Direction;
pub use error::EngineError;

pub type Tile = u64;
pub type Score = u64;

/// True for tiles that can legally appear on a board: 0 (empty) or a power of two >= 2.
pub const fn is_valid_tile(tile: Tile) -> bool {
    tile == 0 || (tile >= 2 && tile.is_power_of_two())
}
