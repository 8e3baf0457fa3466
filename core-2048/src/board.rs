use std::fmt;

use crate::{is_valid_tile, Direction, EngineError, Tile};

/// Square grid of tiles stored row-major. 0 marks an empty cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
}

impl Board {
    pub const MIN_SIZE: usize = 2;

    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size < Self::MIN_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "board size {size} is below the minimum of {}",
                Self::MIN_SIZE
            )));
        }

        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Builds a board from explicit rows, rejecting anything that is not a square grid of
    /// empty cells and powers of two.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();

        if size < Self::MIN_SIZE {
            return Err(EngineError::InvalidBoardState(format!(
                "{size} rows, at least {} required",
                Self::MIN_SIZE
            )));
        }

        let mut cells = Vec::with_capacity(size * size);

        for (row, values) in rows.iter().map(AsRef::as_ref).enumerate() {
            if values.len() != size {
                return Err(EngineError::InvalidBoardState(format!(
                    "row {row} has {} cells, expected {size}",
                    values.len()
                )));
            }

            let invalid = values.iter().enumerate().find(|(_, &t)| !is_valid_tile(t));

            if let Some((col, &tile)) = invalid {
                return Err(EngineError::InvalidBoardState(format!(
                    "cell ({row}, {col}) holds {tile}, which is not a power of two >= 2"
                )));
            }

            cells.extend_from_slice(values);
        }

        Ok(Self { size, cells })
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        (row < self.size && col < self.size).then(|| self.cells[row * self.size + col])
    }

    /// Puts `tile` at (`row`, `col`), overwriting whatever is there.
    pub fn place(&mut self, row: usize, col: usize, tile: Tile) -> Result<(), EngineError> {
        if row >= self.size || col >= self.size {
            return Err(EngineError::InvalidBoardState(format!(
                "cell ({row}, {col}) is outside a {0}x{0} board",
                self.size
            )));
        }

        if !is_valid_tile(tile) {
            return Err(EngineError::InvalidBoardState(format!(
                "{tile} is not a power of two >= 2"
            )));
        }

        self.cells[row * self.size + col] = tile;

        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &tile)| tile == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&tile| tile == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&tile| tile != 0)
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Whether any two horizontally or vertically adjacent cells hold the same non-zero tile.
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size;

        (0..n).any(|row| {
            (0..n).any(|col| {
                let tile = self.cells[row * n + col];

                tile != 0
                    && ((col + 1 < n && self.cells[row * n + col + 1] == tile)
                        || (row + 1 < n && self.cells[(row + 1) * n + col] == tile))
            })
        })
    }

    /// Board coordinates of position `pos` along line `index`, counted from the edge that
    /// tiles slide towards when moving in `direction`.
    pub fn line_cell(&self, index: usize, direction: Direction, pos: usize) -> (usize, usize) {
        let along = if direction.is_reversed() {
            self.size - 1 - pos
        } else {
            pos
        };

        if direction.is_vertical() {
            (along, index)
        } else {
            (index, along)
        }
    }

    /// Row or column `index`, ordered from the edge tiles slide towards.
    pub fn line(&self, index: usize, direction: Direction) -> Vec<Tile> {
        (0..self.size)
            .map(|pos| {
                let (row, col) = self.line_cell(index, direction, pos);
                self.cells[row * self.size + col]
            })
            .collect()
    }

    /// Writes a line produced by [`Board::line`] back in board orientation.
    pub fn set_line(&mut self, index: usize, direction: Direction, line: &[Tile]) {
        debug_assert_eq!(line.len(), self.size);

        for (pos, &tile) in line.iter().enumerate() {
            let (row, col) = self.line_cell(index, direction, pos);
            self.cells[row * self.size + col] = tile;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (col, tile) in row.iter().enumerate() {
                if col != 0 {
                    f.write_str(" ")?;
                }

                write!(f, "{tile:>5}")?;
            }

            f.write_str("\n")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}
