use rand::Rng;
use tracing::trace;

use crate::{line, Board, Direction, EngineError, Score, Tile};

/// A merge produced by a move: where the combined tile landed and its new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merge {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// A tile placed by [`spawn_square`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub score: Score,
    pub moved: bool,
    pub merged: bool,
    pub merges: Vec<Merge>,
}

/// Creates an empty `size`x`size` board seeded with two random tiles.
pub fn initialize(rng: &mut impl Rng, size: usize) -> Result<Board, EngineError> {
    let mut board = Board::new(size)?;

    spawn_square(rng, &mut board);
    spawn_square(rng, &mut board);

    Ok(board)
}

/// Places a 2 (90%) or a 4 (10%) in a uniformly chosen empty cell.
///
/// Returns `None` without touching the board when it is already full.
pub fn spawn_square(rng: &mut impl Rng, board: &mut Board) -> Option<Spawn> {
    let slot_count = board.count_empty();

    if slot_count == 0 {
        return None;
    }

    let rand = rng.gen_range(0..(slot_count * 10));

    let slot_idx = rand / 10;
    let value = if rand % 10 == 0 { 4 } else { 2 };

    let (row, col) = board
        .empty_cells()
        .nth(slot_idx)
        .expect("slot index is below the empty cell count");
    board
        .place(row, col, value)
        .expect("empty cells lie on the board and 2 and 4 are valid tiles");

    trace!(row, col, value, "spawned tile");

    Some(Spawn { row, col, value })
}

/// Slides every line of `board` in `direction`, returning the new board, the points gained
/// and the merges that happened.
pub fn do_move(
    board: &Board,
    direction: Direction,
) -> Result<(Board, Score, Vec<Merge>), EngineError> {
    let mut new_board = board.clone();
    let mut gained: Score = 0;
    let mut merges = Vec::new();

    for index in 0..board.size() {
        let mut cells = board.line(index, direction);
        let collapse = line::collapse_line(&mut cells)?;

        gained = gained
            .checked_add(collapse.score)
            .ok_or_else(|| EngineError::InvalidBoardState("move score overflows".to_owned()))?;
        merges.extend(collapse.merged_at.into_iter().map(|pos| {
            let (row, col) = board.line_cell(index, direction, pos);

            Merge {
                row,
                col,
                value: cells[pos],
            }
        }));

        new_board.set_line(index, direction, &cells);
    }

    Ok((new_board, gained, merges))
}

/// Applies a move to `board` and `score`.
///
/// When nothing can slide or merge the returned board and score equal the inputs and
/// `moved` is false. Fails if a merged tile or the new score does not fit in 64 bits.
pub fn apply_move(
    board: &Board,
    score: Score,
    direction: Direction,
) -> Result<MoveOutcome, EngineError> {
    let (new_board, gained, merges) = do_move(board, direction)?;
    let moved = new_board != *board;

    let score = score.checked_add(gained).ok_or_else(|| {
        EngineError::InvalidBoardState(format!("score {score} plus {gained} overflows"))
    })?;

    Ok(MoveOutcome {
        board: new_board,
        score,
        moved,
        merged: !merges.is_empty(),
        merges,
    })
}

pub fn can_move(board: &Board, direction: Direction) -> bool {
    (0..board.size()).any(|index| line::can_collapse(&board.line(index, direction)))
}

pub fn try_move(board: &Board, direction: Direction) -> Result<Option<Board>, EngineError> {
    if !can_move(board, direction) {
        return Ok(None);
    }

    do_move(board, direction).map(|(new_board, _, _)| Some(new_board))
}

/// Resulting boards indexed by `Direction as usize`, `None` where the move does nothing.
pub fn try_all_moves(board: &Board) -> Result<[Option<Board>; 4], EngineError> {
    let mut moves = [None, None, None, None];

    for direction in Direction::iter() {
        moves[direction as usize] = try_move(board, direction)?;
    }

    Ok(moves)
}

pub fn is_game_over(board: &Board) -> bool {
    board.is_full() && !board.has_adjacent_pair()
}

pub fn has_won(board: &Board, threshold: Tile) -> bool {
    board.max_tile() >= threshold
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn board(rows: &[&[Tile]]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_move_left() {
        let game = board(&[&[2, 4, 8, 16], &[2, 8, 8, 4], &[4, 0, 0, 4], &[2, 0, 0, 4]]);
        let outcome = apply_move(&game, 0, Direction::Left).unwrap();

        assert_eq!(
            outcome.board,
            board(&[&[2, 4, 8, 16], &[2, 16, 4, 0], &[8, 0, 0, 0], &[2, 4, 0, 0]])
        );
        assert_eq!(outcome.score, 24);
        assert!(outcome.moved);
        assert!(outcome.merged);
        assert_eq!(
            outcome.merges,
            vec![
                Merge {
                    row: 1,
                    col: 1,
                    value: 16,
                },
                Merge {
                    row: 2,
                    col: 0,
                    value: 8,
                },
            ]
        );
    }

    #[test]
    fn test_move_right() {
        let game = board(&[&[2, 4, 8, 16], &[2, 8, 8, 4], &[4, 0, 0, 4], &[2, 0, 0, 4]]);
        let outcome = apply_move(&game, 10, Direction::Right).unwrap();

        assert_eq!(
            outcome.board,
            board(&[&[2, 4, 8, 16], &[0, 2, 16, 4], &[0, 0, 0, 8], &[0, 0, 2, 4]])
        );
        assert_eq!(outcome.score, 34);
    }

    #[test]
    fn test_move_up() {
        let game = board(&[&[2, 2, 4, 2], &[4, 8, 0, 0], &[8, 8, 0, 0], &[16, 4, 4, 4]]);
        let outcome = apply_move(&game, 0, Direction::Up).unwrap();

        assert_eq!(
            outcome.board,
            board(&[&[2, 2, 8, 2], &[4, 16, 0, 4], &[8, 4, 0, 0], &[16, 0, 0, 0]])
        );
        assert_eq!(outcome.score, 24);
    }

    #[test]
    fn test_move_down() {
        let game = board(&[&[2, 2, 4, 2], &[4, 8, 0, 0], &[8, 8, 0, 0], &[16, 4, 4, 4]]);
        let outcome = apply_move(&game, 0, Direction::Down).unwrap();

        assert_eq!(
            outcome.board,
            board(&[&[2, 0, 0, 0], &[4, 2, 0, 0], &[8, 16, 0, 2], &[16, 4, 8, 4]])
        );
        assert_eq!(
            outcome.merges,
            vec![
                Merge {
                    row: 2,
                    col: 1,
                    value: 16,
                },
                Merge {
                    row: 3,
                    col: 2,
                    value: 8,
                },
            ]
        );
    }

    #[test]
    fn preserves_merge_order() {
        let game = board(&[&[0, 2, 2, 4], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);

        let left = apply_move(&game, 0, Direction::Left).unwrap();
        let right = apply_move(&game, 0, Direction::Right).unwrap();

        assert_eq!(left.board.to_rows()[0], vec![4, 4, 0, 0]);
        assert_eq!(right.board.to_rows()[0], vec![0, 0, 4, 4]);
    }

    #[test]
    fn no_double_merge() {
        let game = board(&[&[2, 2, 2, 2], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        let outcome = apply_move(&game, 0, Direction::Left).unwrap();

        assert_eq!(outcome.board.to_rows()[0], vec![4, 4, 0, 0]);
        assert_eq!(outcome.score, 8);
    }

    #[test]
    fn packed_edge_is_a_no_op() {
        let game = board(&[&[2, 4, 0], &[8, 2, 0], &[4, 8, 0]]);
        let outcome = apply_move(&game, 12, Direction::Left).unwrap();

        assert!(!outcome.moved);
        assert!(!outcome.merged);
        assert_eq!(outcome.board, game);
        assert_eq!(outcome.score, 12);
        assert!(!can_move(&game, Direction::Left));
        assert!(can_move(&game, Direction::Right));

        let moves = try_all_moves(&game).unwrap();

        assert!(moves[Direction::Left as usize].is_none());
        assert!(moves[Direction::Up as usize].is_none());
        assert!(moves[Direction::Down as usize].is_none());
        assert_eq!(
            moves[Direction::Right as usize],
            Some(board(&[&[0, 2, 4], &[0, 8, 2], &[0, 4, 8]]))
        );
    }

    #[test]
    fn detects_game_over() {
        let stuck = board(&[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[4, 2, 4, 2]]);
        let open = board(&[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 0, 4], &[4, 2, 4, 2]]);
        let mergeable = board(&[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[4, 2, 2, 8]]);

        assert!(is_game_over(&stuck));
        assert!(!is_game_over(&open));
        assert!(!is_game_over(&mergeable));
        assert!(try_all_moves(&stuck).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn detects_win() {
        let won = board(&[&[0, 0, 0, 0], &[0, 2048, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 2]]);
        let close = board(&[&[0, 0, 0, 0], &[0, 1024, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 1024]]);

        assert!(has_won(&won, 2048));
        assert!(!has_won(&close, 2048));
        assert!(has_won(&close, 1024));
    }

    #[test]
    fn initialize_places_two_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for size in [2, 4, 5] {
            let board = initialize(&mut rng, size).unwrap();

            assert_eq!(board.size(), size);
            assert_eq!(board.count_empty(), size * size - 2);
            assert!(board.rows().flatten().all(|&t| t == 0 || t == 2 || t == 4));
        }

        assert!(matches!(
            initialize(&mut rng, 1),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overflowing_merge_is_an_error() {
        let game = board(&[&[1 << 63, 1 << 63], &[0, 0]]);

        assert!(matches!(
            apply_move(&game, 0, Direction::Left),
            Err(EngineError::InvalidBoardState(_))
        ));
        assert!(matches!(
            try_all_moves(&game),
            Err(EngineError::InvalidBoardState(_))
        ));
        assert_eq!(try_move(&game, Direction::Up), Ok(None));
    }

    #[test]
    fn overflowing_score_is_an_error() {
        let game = board(&[&[2, 2], &[0, 0]]);

        assert!(matches!(
            apply_move(&game, Score::MAX, Direction::Left),
            Err(EngineError::InvalidBoardState(_))
        ));

        let slide = apply_move(&game, Score::MAX, Direction::Down).unwrap();

        assert!(slide.moved);
        assert_eq!(slide.score, Score::MAX);
    }

    #[test]
    fn spawn_fills_every_empty_cell_then_stops() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut game = Board::new(3).unwrap();

        for filled in 1..=9 {
            let spawn = spawn_square(&mut rng, &mut game).unwrap();

            assert_eq!(game.get(spawn.row, spawn.col), Some(spawn.value));
            assert_eq!(game.count_empty(), 9 - filled);
        }

        assert_eq!(spawn_square(&mut rng, &mut game), None);
    }

    #[test]
    fn spawn_on_full_board_is_refused() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut game = board(&[&[2, 4], &[8, 16]]);
        let before = game.clone();

        assert_eq!(spawn_square(&mut rng, &mut game), None);
        assert_eq!(game, before);
    }
}
