use std::io::{self, Write};

use lib_2048::{Board, Score, Tile};

use crate::stats::SessionStats;

const SQUARE_HEIGHT: usize = 3;
const SQUARE_WIDTH: usize = 2 * (SQUARE_HEIGHT + 1) - 1;
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];
const CLEAR_LINE: &str = "\x1b[K";

/// Everything drawn in one frame.
pub struct View<'a> {
    pub board: &'a Board,
    pub score: Score,
    pub stats: &'a SessionStats,
    pub message: Option<&'a str>,
}

/// Lines taken up by one frame: score, grid and the message line.
pub const fn frame_height(size: usize) -> usize {
    1 + 1 + size * SQUARE_HEIGHT + (size - 1) + 1 + 1
}

fn tile_colour(tile: Tile) -> Option<u8> {
    (tile != 0).then(|| {
        let exponent = tile.trailing_zeros() as usize;

        COLOUR_TABLE[(exponent - 1) % COLOUR_TABLE.len()]
    })
}

fn border_row(out: &mut impl Write, size: usize, [left, mid, right]: [&str; 3]) -> io::Result<()> {
    let segment = "━".repeat(SQUARE_WIDTH);

    out.write_all(left.as_bytes())?;

    for j in 0..size {
        if j != 0 {
            out.write_all(mid.as_bytes())?;
        }

        out.write_all(segment.as_bytes())?;
    }

    writeln!(out, "{right}{CLEAR_LINE}")
}

fn padding_row(out: &mut impl Write, row: &[Tile]) -> io::Result<()> {
    for &tile in row {
        match tile_colour(tile) {
            Some(colour) => write!(out, "┃\x1b[{}m{:SQUARE_WIDTH$}\x1b[m", colour + 10, "")?,
            None => write!(out, "┃{:SQUARE_WIDTH$}", "")?,
        }
    }

    writeln!(out, "┃{CLEAR_LINE}")
}

fn draw_board_row(out: &mut impl Write, row: &[Tile]) -> io::Result<()> {
    for _ in 0..((SQUARE_HEIGHT - 1) / 2) {
        padding_row(out, row)?;
    }

    for &tile in row {
        match tile_colour(tile) {
            Some(colour) => write!(out, "┃\x1b[7m\x1b[{colour}m{tile:^SQUARE_WIDTH$}\x1b[m")?,
            None => write!(out, "┃{:SQUARE_WIDTH$}", "")?,
        }
    }

    writeln!(out, "┃{CLEAR_LINE}")?;

    for _ in 0..((SQUARE_HEIGHT - 1).div_ceil(2)) {
        padding_row(out, row)?;
    }

    Ok(())
}

pub fn draw_board(out: &mut impl Write, view: &View) -> io::Result<()> {
    let size = view.board.size();

    let stats = view.stats;

    writeln!(
        out,
        "Score: {}   Best: {}   Games: {}   Average: {}{CLEAR_LINE}",
        view.score,
        stats.best,
        stats.games_played,
        stats.average()
    )?;
    border_row(out, size, ["┏", "┳", "┓"])?;

    for (i, row) in view.board.rows().enumerate() {
        if i != 0 {
            border_row(out, size, ["┣", "╋", "┫"])?;
        }

        draw_board_row(out, row)?;
    }

    border_row(out, size, ["┗", "┻", "┛"])?;
    writeln!(out, "{}{CLEAR_LINE}", view.message.unwrap_or(""))?;

    out.flush()
}

/// Moves the cursor back over a frame drawn by [`draw_board`] and draws `view` in its place.
pub fn redraw_board(out: &mut impl Write, view: &View) -> io::Result<()> {
    write!(out, "\x1b[{}F", frame_height(view.board.size()))?;

    draw_board(out, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_matches_reported_height() {
        for size in [2, 4, 5] {
            let board = Board::new(size).unwrap();
            let stats = SessionStats::default();
            let view = View {
                board: &board,
                score: 0,
                stats: &stats,
                message: None,
            };

            let mut out = Vec::new();
            draw_board(&mut out, &view).unwrap();

            let text = String::from_utf8(out).unwrap();

            assert_eq!(text.lines().count(), frame_height(size));
        }
    }

    #[test]
    fn draws_tiles_and_scores() {
        let board = Board::from_rows(&[[2, 0], [0, 2048]]).unwrap();
        let stats = SessionStats {
            best: 120,
            games_played: 3,
            total_score: 300,
        };
        let view = View {
            board: &board,
            score: 36,
            stats: &stats,
            message: Some("Game over"),
        };

        let mut out = Vec::new();
        draw_board(&mut out, &view).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Score: 36   Best: 120   Games: 3   Average: 100"));
        assert!(text.contains("2048"));
        assert!(text.contains("Game over"));
    }

    #[test]
    fn colours_cycle_by_exponent() {
        assert_eq!(tile_colour(0), None);
        assert_eq!(tile_colour(2), Some(90));
        assert_eq!(tile_colour(4), Some(33));
        assert_eq!(tile_colour(256), Some(90));
    }
}
