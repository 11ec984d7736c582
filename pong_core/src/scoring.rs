//! Points, sets and match progression.

use crate::types::Side;

/// Win-by-2 rule: a set ends once either side has reached `score_limit`
/// while leading by at least two points.
pub fn check_set_won(a: u32, b: u32, score_limit: u32) -> bool {
    a.max(b) >= score_limit && a.abs_diff(b) >= 2
}

/// Result of awarding one point
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointOutcome {
    /// Set continues
    Point,
    /// Point decided a set, match continues
    SetWon(Side),
    /// Point decided the match
    MatchWon(Side),
}

/// Per-side points and sets for one match
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scoreboard {
    pub points: [u32; 2],
    pub sets: [u32; 2],
    pub score_limit: u32,
    pub sets_to_win: u32,
}

impl Scoreboard {
    pub fn new(score_limit: u32, sets_to_win: u32) -> Self {
        Scoreboard {
            points: [0, 0],
            sets: [0, 0],
            score_limit,
            sets_to_win,
        }
    }

    /// Credit `scorer` with a point and settle any set or match it decides.
    ///
    /// Once a side holds `sets_to_win` sets the board is frozen and further
    /// points are ignored.
    pub fn award_point(&mut self, scorer: Side) -> PointOutcome {
        if let Some(winner) = self.match_winner() {
            return PointOutcome::MatchWon(winner);
        }

        self.points[scorer.index()] += 1;

        let [a, b] = self.points;
        if !check_set_won(a, b, self.score_limit) {
            return PointOutcome::Point;
        }

        let winner = if a > b { Side::Left } else { Side::Right };
        self.sets[winner.index()] += 1;
        self.points = [0, 0];

        if self.sets[winner.index()] >= self.sets_to_win {
            PointOutcome::MatchWon(winner)
        } else {
            PointOutcome::SetWon(winner)
        }
    }

    /// Side holding `sets_to_win` sets, if any
    pub fn match_winner(&self) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|side| self.sets[side.index()] >= self.sets_to_win)
    }

    pub fn points(&self, side: Side) -> u32 {
        self.points[side.index()]
    }

    pub fn sets(&self, side: Side) -> u32 {
        self.sets[side.index()]
    }
}
