use lib_2048::Score;

/// Scores tracked for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub best: Score,
    pub games_played: u64,
    pub total_score: Score,
}

impl SessionStats {
    pub fn observe(&mut self, score: Score) {
        self.best = self.best.max(score);
    }

    /// Counts a finished game. Games abandoned before scoring are not counted.
    pub fn record_game(&mut self, score: Score) {
        if score == 0 {
            return;
        }

        self.observe(score);
        self.games_played += 1;
        self.total_score = self.total_score.saturating_add(score);
    }

    /// Mean score of recorded games, rounded to the nearest point.
    pub fn average(&self) -> Score {
        if self.games_played == 0 {
            return 0;
        }

        self.total_score.saturating_add(self.games_played / 2) / self.games_played
    }
}
