use fanta_dashboard::forms::coerce_int;
use fanta_dashboard::leaderboard::{RankBadge, build_leaderboard};
use fanta_dashboard::state::Team;

fn team(id: &str, winnings: i64) -> Team {
    Team {
        id: id.to_string(),
        name: id.to_string(),
        owner: format!("owner {id}"),
        remaining_credits: 100,
        remaining_changes: 17,
        weekly_prizes: 0,
        total_winnings: winnings,
        non_callable_players: String::new(),
    }
}

#[test]
fn orders_by_descending_winnings_with_stable_ties() {
    let teams = vec![team("A", 50), team("B", 120), team("C", 120)];
    let board = build_leaderboard(&teams);

    let order: Vec<&str> = board.rows.iter().map(|row| row.team.id.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert_eq!(board.total_winnings, 290);

    let ranks: Vec<usize> = board.rows.iter().map(|row| row.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn tie_order_follows_input_order() {
    let teams = vec![team("C", 120), team("A", 50), team("B", 120)];
    let board = build_leaderboard(&teams);

    let order: Vec<&str> = board.rows.iter().map(|row| row.team.id.as_str()).collect();
    assert_eq!(order, vec!["C", "B", "A"]);
}

#[test]
fn badges_only_for_podium() {
    let teams: Vec<Team> = (0..5).map(|i| team(&format!("T{i}"), 100 - i)).collect();
    let board = build_leaderboard(&teams);

    let badges: Vec<RankBadge> = board.rows.iter().map(|row| row.badge).collect();
    assert_eq!(
        badges,
        vec![
            RankBadge::Gold,
            RankBadge::Silver,
            RankBadge::Bronze,
            RankBadge::Plain,
            RankBadge::Plain,
        ]
    );
}

#[test]
fn empty_league_has_zero_total() {
    let board = build_leaderboard(&[]);
    assert!(board.rows.is_empty());
    assert_eq!(board.total_winnings, 0);
}

#[test]
fn footer_total_pins_at_max_instead_of_overflowing() {
    let teams = vec![team("A", coerce_int("99999999999999999999")), team("B", 10)];
    let board = build_leaderboard(&teams);

    assert_eq!(board.rows[0].team.id, "A");
    assert_eq!(board.total_winnings, i64::MAX);
}
