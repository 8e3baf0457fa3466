use lib_2048::{GameStatus, Tile, Turn};
use rand::{seq::SliceRandom, Rng};

/// Merges producing at least this value earn a cheer.
pub const CHEER_THRESHOLD: Tile = 128;

const CHEERS: [&str; 8] = [
    "Nice merge!",
    "On a roll!",
    "Huge combo!",
    "That one counted!",
    "Keep stacking!",
    "Look at that tile!",
    "Big moves!",
    "Smooth!",
];

/// Message line for the frame following `turn`, if any.
pub fn turn_message(rng: &mut impl Rng, turn: &Turn, win_threshold: Tile) -> Option<String> {
    if turn.status == GameStatus::Over {
        return Some("Game over. Press r to restart or q to quit.".to_owned());
    }

    if turn.newly_won {
        return Some(format!("You reached {win_threshold}! Keep going or press r to restart."));
    }

    turn.max_merge()
        .filter(|&value| value >= CHEER_THRESHOLD)
        .and_then(|value| CHEERS.choose(rng).map(|cheer| format!("{cheer} ({value})")))
}
