use std::sync::{Mutex, MutexGuard};

use crate::api::{ApiError, LeagueApi};
use crate::leaderboard::saturating_sum;
use crate::state::{Credential, LeagueStats, Team, TeamPatch};

const NO_PLAYERS: &str = "Nessun giocatore";

/// In-memory stand-in for the league backend, seeded with the founding teams.
/// Behaves like the real server: teams come back richest first, stats are
/// derived from the stored teams, and the password doubles as the token.
pub struct DemoApi {
    teams: Mutex<Vec<Team>>,
    password: String,
}

impl DemoApi {
    pub fn new(password: impl Into<String>) -> Self {
        Self::with_teams(password, seed_teams())
    }

    pub fn with_teams(password: impl Into<String>, teams: Vec<Team>) -> Self {
        Self {
            teams: Mutex::new(teams),
            password: password.into(),
        }
    }

    fn store(&self) -> MutexGuard<'_, Vec<Team>> {
        self.teams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn authorize(&self, credential: &Credential) -> Result<(), ApiError> {
        if credential.token() == self.password {
            Ok(())
        } else {
            Err(ApiError::Authorization)
        }
    }
}

impl LeagueApi for DemoApi {
    fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let mut teams = self.store().clone();
        teams.sort_by(|a, b| b.total_winnings.cmp(&a.total_winnings));
        Ok(teams)
    }

    fn get_stats(&self) -> Result<LeagueStats, ApiError> {
        let teams = self.store();
        Ok(LeagueStats {
            total_teams: teams.len() as i64,
            total_prizes: saturating_sum(teams.iter().map(|t| t.weekly_prizes)),
            total_winnings: saturating_sum(teams.iter().map(|t| t.total_winnings)),
        })
    }

    fn authenticate(&self, password: &str) -> Result<Credential, ApiError> {
        if password == self.password {
            Ok(Credential::new(password))
        } else {
            Err(ApiError::InvalidCredential)
        }
    }

    fn update_team(
        &self,
        id: &str,
        patch: &TeamPatch,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        self.authorize(credential)?;
        let mut teams = self.store();
        let team = teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(team_not_found)?;
        patch.apply_to(team);
        Ok(())
    }

    fn delete_team(&self, id: &str, credential: &Credential) -> Result<(), ApiError> {
        self.authorize(credential)?;
        let mut teams = self.store();
        let before = teams.len();
        teams.retain(|t| t.id != id);
        if teams.len() == before {
            return Err(team_not_found());
        }
        Ok(())
    }
}

fn team_not_found() -> ApiError {
    ApiError::Server {
        status: 404,
        detail: "Squadra non trovata".to_string(),
    }
}

pub fn seed_teams() -> Vec<Team> {
    const FOUNDERS: [(&str, &str, i64, i64, i64); 10] = [
        ("AC CIUGHINA", "John Jones & Pierpy", 122, 0, 0),
        ("AC SPIDERMAN", "Vanio", 92, 0, 0),
        ("ASTON BIRR", "CR7 QUARATO & Claudio", 77, 0, 0),
        ("FC BISCIONE", "Angetony & xxx", 66, 0, 0),
        ("GOBBI FC", "Ciccio", 56, 0, 0),
        ("SILANO DOP", "Vito V", 32, 0, 0),
        ("SBALLATI FC", "Alessio", 135, 0, 0),
        ("DISGRAZIETI MALEDETTI", "Piema", 51, 0, 0),
        ("LOVEGANG126", "marchiteo & chri", 63, 1, 10),
        ("MONEY", "gigione & rich.campanella.89", 72, 0, 0),
    ];

    FOUNDERS
        .iter()
        .enumerate()
        .map(|(idx, (name, owner, credits, prizes, winnings))| Team {
            id: format!("team-{:02}", idx + 1),
            name: name.to_string(),
            owner: owner.to_string(),
            remaining_credits: *credits,
            remaining_changes: 17,
            weekly_prizes: *prizes,
            total_winnings: *winnings,
            non_callable_players: NO_PLAYERS.to_string(),
        })
        .collect()
}
