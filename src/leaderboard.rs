use crate::state::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl RankBadge {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankBadge::Gold,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            _ => RankBadge::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow<'a> {
    pub rank: usize,
    pub badge: RankBadge,
    pub team: &'a Team,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard<'a> {
    pub rows: Vec<LeaderboardRow<'a>>,
    // Sum over the listed teams only; the league aggregate is fetched separately
    // and the two may legitimately disagree.
    pub total_winnings: i64,
}

pub fn build_leaderboard(teams: &[Team]) -> Leaderboard<'_> {
    let mut sorted: Vec<&Team> = teams.iter().collect();
    // sort_by is stable, so tied teams keep their incoming order.
    sorted.sort_by(|a, b| b.total_winnings.cmp(&a.total_winnings));

    let rows = sorted
        .into_iter()
        .enumerate()
        .map(|(idx, team)| LeaderboardRow {
            rank: idx + 1,
            badge: RankBadge::for_rank(idx + 1),
            team,
        })
        .collect();

    Leaderboard {
        rows,
        total_winnings: saturating_sum(teams.iter().map(|t| t.total_winnings)),
    }
}

/// Sum that pins at the i64 bounds instead of overflowing. Edited figures are
/// coerced with saturation, so a single team may already hold `i64::MAX`.
pub fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values
        .into_iter()
        .fold(0i64, |acc, value| acc.saturating_add(value))
}
