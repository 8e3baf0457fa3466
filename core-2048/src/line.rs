use crate::{EngineError, Score, Tile};

/// Result of collapsing a single line towards index 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collapse {
    pub score: Score,
    /// Positions in the collapsed line that hold a freshly merged tile.
    pub merged_at: Vec<usize>,
}

/// Slides and merges `line` in place towards index 0.
///
/// Zeros are squeezed out, equal neighbours merge once per pass and the tail is
/// padded with zeros. A tile produced by a merge never merges again in the
/// same pass, so `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
///
/// Fails without a usable result if a merged tile or the score would overflow.
pub fn collapse_line(line: &mut [Tile]) -> Result<Collapse, EngineError> {
    let mut collapse = Collapse::default();
    let mut write = 0;
    let mut tail_merged = false;

    for read in 0..line.len() {
        let tile = line[read];

        if tile == 0 {
            continue;
        }

        line[read] = 0;

        if write > 0 && !tail_merged && line[write - 1] == tile {
            let merged = tile.checked_mul(2).ok_or_else(|| {
                EngineError::InvalidBoardState(format!("merging two {tile} tiles overflows"))
            })?;

            line[write - 1] = merged;
            collapse.score = collapse.score.checked_add(merged).ok_or_else(|| {
                EngineError::InvalidBoardState("line score overflows".to_owned())
            })?;
            collapse.merged_at.push(write - 1);
            tail_merged = true;
        } else {
            line[write] = tile;
            write += 1;
            tail_merged = false;
        }
    }

    Ok(collapse)
}

/// Whether collapsing `line` would change it.
pub fn can_collapse(line: &[Tile]) -> bool {
    let mut seen_empty = false;

    for (i, &tile) in line.iter().enumerate() {
        if tile == 0 {
            seen_empty = true;
        } else if seen_empty || (i > 0 && line[i - 1] == tile) {
            return true;
        }
    }

    false
}
