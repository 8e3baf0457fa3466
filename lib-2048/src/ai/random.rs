use rand::{seq::IteratorRandom, Rng};

use crate::{logic, Board, Direction};

use super::Ai;

/// Picks uniformly among the directions that change the board.
pub struct RandomAi<R> {
    rng: R,
}

impl<R> Ai for RandomAi<R>
where
    R: Rng,
{
    fn get_next_move(&mut self, board: &Board) -> Option<Direction> {
        Direction::iter()
            .filter(|&direction| logic::can_move(board, direction))
            .choose(&mut self.rng)
    }
}

impl<R> RandomAi<R>
where
    R: Rng,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}
