use rand::Rng;
use tracing::{debug, info, trace};

use crate::{
    logic::{self, Merge, Spawn},
    Board, Direction, EngineError, Score, Tile,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub win_threshold: Tile,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            win_threshold: 2048,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < Board::MIN_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "board size {} is below the minimum of {}",
                self.size,
                Board::MIN_SIZE
            )));
        }

        // A threshold of 2 would be met by the opening tiles.
        if self.win_threshold < 4 || !self.win_threshold.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "win threshold {} is not a power of two >= 4",
                self.win_threshold
            )));
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The win threshold has been reached. Play may continue.
    Won,
    /// Board full with nothing left to merge. Only a reset leaves this state.
    Over,
}

/// What a call to [`Game::play`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub moved: bool,
    pub merged: bool,
    pub merges: Vec<Merge>,
    pub gained: Score,
    pub spawned: Option<Spawn>,
    pub status: GameStatus,
    /// Set only on the turn that first reached the win threshold.
    pub newly_won: bool,
}

impl Turn {
    fn rejected(status: GameStatus) -> Self {
        Self {
            moved: false,
            merged: false,
            merges: Vec::new(),
            gained: 0,
            spawned: None,
            status,
            newly_won: false,
        }
    }

    /// Largest tile produced by a merge this turn.
    pub fn max_merge(&self) -> Option<Tile> {
        self.merges.iter().map(|merge| merge.value).max()
    }
}

fn status_of(board: &Board, win_threshold: Tile) -> GameStatus {
    if logic::is_game_over(board) {
        GameStatus::Over
    } else if logic::has_won(board, win_threshold) {
        GameStatus::Won
    } else {
        GameStatus::InProgress
    }
}

/// One game session: owns the board, score, status and the RNG used for spawning.
pub struct Game<R> {
    config: GameConfig,
    board: Board,
    score: Score,
    status: GameStatus,
    rng: R,
}

impl<R> Game<R>
where
    R: Rng,
{
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self, EngineError> {
        config.validate()?;

        let board = logic::initialize(&mut rng, config.size)?;
        let status = status_of(&board, config.win_threshold);

        Ok(Self {
            config,
            board,
            score: 0,
            status,
            rng,
        })
    }

    /// Resumes a session from an existing board and score.
    pub fn from_board(
        config: GameConfig,
        board: Board,
        score: Score,
        rng: R,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        if board.size() != config.size {
            return Err(EngineError::InvalidBoardState(format!(
                "board is {0}x{0}, configured size is {1}",
                board.size(),
                config.size
            )));
        }

        let status = status_of(&board, config.win_threshold);

        Ok(Self {
            config,
            board,
            score,
            status,
            rng,
        })
    }

    /// Clears the board, zeroes the score and seeds two fresh tiles.
    pub fn reset(&mut self) {
        self.board.clear();
        logic::spawn_square(&mut self.rng, &mut self.board);
        logic::spawn_square(&mut self.rng, &mut self.board);

        self.score = 0;
        self.status = status_of(&self.board, self.config.win_threshold);

        info!(size = self.config.size, "game reset");
    }

    /// Slides the board in `direction` and spawns a tile if anything moved.
    ///
    /// An error leaves the game untouched.
    pub fn play(&mut self, direction: Direction) -> Result<Turn, EngineError> {
        if self.status == GameStatus::Over {
            trace!(?direction, "move refused, game is over");
            return Ok(Turn::rejected(self.status));
        }

        let outcome = logic::apply_move(&self.board, self.score, direction)?;

        if !outcome.moved {
            trace!(?direction, "move had no effect");
            return Ok(Turn::rejected(self.status));
        }

        let gained = outcome.score - self.score;

        self.board = outcome.board;
        self.score = outcome.score;

        let spawned = logic::spawn_square(&mut self.rng, &mut self.board);

        // Checked after the spawn, which can itself reach a threshold of 4.
        let newly_won = self.status == GameStatus::InProgress
            && logic::has_won(&self.board, self.config.win_threshold);

        if newly_won {
            self.status = GameStatus::Won;
            info!(score = self.score, threshold = self.config.win_threshold, "game won");
        }

        if logic::is_game_over(&self.board) {
            self.status = GameStatus::Over;
            info!(score = self.score, max_tile = self.board.max_tile(), "game over");
        }

        debug!(
            ?direction,
            gained,
            merges = outcome.merges.len(),
            score = self.score,
            "move applied"
        );

        Ok(Turn {
            moved: true,
            merged: outcome.merged,
            merges: outcome.merges,
            gained,
            spawned,
            status: self.status,
            newly_won,
        })
    }

    /// Like [`Game::play`] but takes a direction token such as `"left"`.
    pub fn play_token(&mut self, token: &str) -> Result<Turn, EngineError> {
        self.play(token.parse()?)
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        self.status != GameStatus::Over && logic::can_move(&self.board, direction)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub const fn score(&self) -> Score {
        self.score
    }

    pub const fn status(&self) -> GameStatus {
        self.status
    }

    pub const fn config(&self) -> &GameConfig {
        &self.config
    }
}
