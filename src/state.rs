use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::forms::{EditForm, LoginForm};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub remaining_credits: i64,
    #[serde(default)]
    pub remaining_changes: i64,
    #[serde(default)]
    pub weekly_prizes: i64,
    #[serde(default)]
    pub total_winnings: i64,
    #[serde(default)]
    pub non_callable_players: String,
}

/// The mutable part of a team. Always sent whole, whatever the admin touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPatch {
    pub remaining_credits: i64,
    pub remaining_changes: i64,
    pub weekly_prizes: i64,
    pub total_winnings: i64,
    pub non_callable_players: String,
}

impl TeamPatch {
    pub fn apply_to(&self, team: &mut Team) {
        team.remaining_credits = self.remaining_credits;
        team.remaining_changes = self.remaining_changes;
        team.weekly_prizes = self.weekly_prizes;
        team.total_winnings = self.total_winnings;
        team.non_callable_players = self.non_callable_players.clone();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStats {
    #[serde(default)]
    pub total_teams: i64,
    #[serde(default)]
    pub total_prizes: i64,
    #[serde(default)]
    pub total_winnings: i64,
}

/// Bearer token handed out by the backend. Lives in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub team_id: String,
    pub team_name: String,
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    Login(LoginForm),
    EditTeam(EditForm),
    ConfirmDelete(DeleteTarget),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub teams: Vec<Team>,
    pub stats: Option<LeagueStats>,
    pub loading: bool,
    pub refreshing: bool,
    pub session: Option<Credential>,
    pub modal: Modal,
    pub selected: usize,
    pub banner: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            stats: None,
            loading: true,
            refreshing: true,
            session: None,
            modal: Modal::None,
            selected: 0,
            banner: None,
            last_refresh: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_some()
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            return;
        }
        if self.selected + 1 < self.teams.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.teams.len() {
            self.selected = self.teams.len() - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let line = format!("{} {}", Local::now().format("%H:%M:%S"), msg.into());
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Results reported back by the sync worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    RefreshLoaded {
        teams: Vec<Team>,
        stats: LeagueStats,
    },
    RefreshFailed(ApiError),
    LoginSucceeded(Credential),
    LoginFailed(ApiError),
    TeamSaved {
        id: String,
    },
    TeamSaveFailed {
        id: String,
        error: ApiError,
    },
    TeamDeleted {
        id: String,
    },
    TeamDeleteFailed {
        id: String,
        error: ApiError,
    },
    Log(String),
}

/// What the user asked for, already decoupled from the key that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    OpenLogin,
    Logout,
    EditSelected,
    DeleteSelected,
    SelectNext,
    SelectPrev,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    CloseModal,
    ToggleHelp,
    DismissBanner,
}

#[derive(Clone)]
pub enum ProviderCommand {
    Refresh,
    Authenticate {
        password: String,
    },
    UpdateTeam {
        id: String,
        patch: TeamPatch,
        credential: Credential,
    },
    DeleteTeam {
        id: String,
        credential: Credential,
    },
}

impl fmt::Debug for ProviderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderCommand::Refresh => f.write_str("Refresh"),
            ProviderCommand::Authenticate { .. } => f.write_str("Authenticate"),
            ProviderCommand::UpdateTeam { id, patch, .. } => f
                .debug_struct("UpdateTeam")
                .field("id", id)
                .field("patch", patch)
                .finish_non_exhaustive(),
            ProviderCommand::DeleteTeam { id, .. } => f
                .debug_struct("DeleteTeam")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}

pub const INVALID_PASSWORD_MSG: &str = "Password non valida";
pub const NO_SESSION_MSG: &str = "Sessione admin non attiva: effettua di nuovo l'accesso";

pub fn apply_intent(state: &mut AppState, intent: Intent) -> Option<ProviderCommand> {
    // The help overlay swallows everything but its own toggle.
    if state.help_overlay && intent != Intent::ToggleHelp {
        return None;
    }

    match intent {
        Intent::Refresh => {
            state.refreshing = true;
            state.push_log("[INFO] Refresh requested");
            Some(ProviderCommand::Refresh)
        }
        Intent::OpenLogin => {
            if !state.is_admin() && !state.modal.is_open() {
                state.modal = Modal::Login(LoginForm::default());
            }
            None
        }
        Intent::Logout => {
            if state.session.take().is_some() {
                if matches!(state.modal, Modal::EditTeam(_) | Modal::ConfirmDelete(_)) {
                    state.modal = Modal::None;
                }
                state.push_log("[INFO] Admin session closed");
            }
            None
        }
        Intent::EditSelected => {
            if state.is_admin() && !state.modal.is_open() {
                if let Some(team) = state.selected_team() {
                    state.modal = Modal::EditTeam(EditForm::seed(team));
                }
            }
            None
        }
        Intent::DeleteSelected => {
            if state.is_admin() && !state.modal.is_open() {
                if let Some(team) = state.selected_team() {
                    state.modal = Modal::ConfirmDelete(DeleteTarget {
                        team_id: team.id.clone(),
                        team_name: team.name.clone(),
                        pending: false,
                        error: None,
                    });
                }
            }
            None
        }
        Intent::SelectNext => {
            if !state.modal.is_open() {
                state.select_next();
            }
            None
        }
        Intent::SelectPrev => {
            if !state.modal.is_open() {
                state.select_prev();
            }
            None
        }
        Intent::Input(c) => {
            match &mut state.modal {
                Modal::Login(form) => form.input(c),
                Modal::EditTeam(form) => form.input(c),
                Modal::None | Modal::ConfirmDelete(_) => {}
            }
            None
        }
        Intent::Backspace => {
            match &mut state.modal {
                Modal::Login(form) => form.backspace(),
                Modal::EditTeam(form) => form.backspace(),
                Modal::None | Modal::ConfirmDelete(_) => {}
            }
            None
        }
        Intent::NextField => {
            if let Modal::EditTeam(form) = &mut state.modal {
                form.next_field();
            }
            None
        }
        Intent::PrevField => {
            if let Modal::EditTeam(form) = &mut state.modal {
                form.prev_field();
            }
            None
        }
        Intent::Submit => submit_modal(state),
        Intent::CloseModal => {
            state.modal = Modal::None;
            None
        }
        Intent::ToggleHelp => {
            state.help_overlay = !state.help_overlay;
            None
        }
        Intent::DismissBanner => {
            state.banner = None;
            None
        }
    }
}

fn submit_modal(state: &mut AppState) -> Option<ProviderCommand> {
    let session = state.session.clone();
    match &mut state.modal {
        Modal::None => None,
        Modal::Login(form) => {
            form.pending = true;
            form.error = None;
            Some(ProviderCommand::Authenticate {
                password: form.password().to_string(),
            })
        }
        Modal::EditTeam(form) => {
            let Some(credential) = session else {
                form.error = Some(NO_SESSION_MSG.to_string());
                return None;
            };
            form.pending = true;
            form.error = None;
            Some(ProviderCommand::UpdateTeam {
                id: form.team_id.clone(),
                patch: form.patch(),
                credential,
            })
        }
        Modal::ConfirmDelete(target) => {
            let Some(credential) = session else {
                target.error = Some(NO_SESSION_MSG.to_string());
                return None;
            };
            target.pending = true;
            target.error = None;
            Some(ProviderCommand::DeleteTeam {
                id: target.team_id.clone(),
                credential,
            })
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::RefreshLoaded { teams, stats } => {
            let count = teams.len();
            state.teams = teams;
            state.stats = Some(stats);
            state.loading = false;
            state.refreshing = false;
            state.banner = None;
            state.last_refresh = Some(Local::now());
            state.clamp_selection();
            state.push_log(format!("[INFO] Loaded {count} teams"));
        }
        Delta::RefreshFailed(err) => {
            // Whatever was on screen stays there.
            state.loading = false;
            state.refreshing = false;
            state.banner = Some(format!(
                "Aggiornamento dati non riuscito ({err}). Premi r per riprovare."
            ));
            state.push_log(format!("[WARN] Refresh failed: {err}"));
        }
        Delta::LoginSucceeded(credential) => {
            state.session = Some(credential);
            if matches!(state.modal, Modal::Login(_)) {
                state.modal = Modal::None;
            }
            state.push_log("[INFO] Admin access granted");
        }
        Delta::LoginFailed(err) => {
            state.session = None;
            if let Modal::Login(form) = &mut state.modal {
                form.pending = false;
                form.error = Some(login_error_message(&err));
            }
            state.push_log(format!("[WARN] Admin login failed: {err}"));
        }
        Delta::TeamSaved { id } => {
            if let Modal::EditTeam(form) = &state.modal {
                if form.team_id == id {
                    state.modal = Modal::None;
                }
            }
            state.refreshing = true;
            state.push_log(format!("[INFO] Team {id} saved"));
        }
        Delta::TeamSaveFailed { id, error } => {
            if let Modal::EditTeam(form) = &mut state.modal {
                if form.team_id == id {
                    form.pending = false;
                    form.error = Some(format!("Salvataggio non riuscito: {error}"));
                }
            }
            state.push_log(format!("[WARN] Saving team {id} failed: {error}"));
        }
        Delta::TeamDeleted { id } => {
            if let Modal::ConfirmDelete(target) = &state.modal {
                if target.team_id == id {
                    state.modal = Modal::None;
                }
            }
            state.refreshing = true;
            state.push_log(format!("[INFO] Team {id} deleted"));
        }
        Delta::TeamDeleteFailed { id, error } => {
            if let Modal::ConfirmDelete(target) = &mut state.modal {
                if target.team_id == id {
                    target.pending = false;
                    target.error = Some(format!("Eliminazione non riuscita: {error}"));
                }
            }
            state.push_log(format!("[WARN] Deleting team {id} failed: {error}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::InvalidCredential => INVALID_PASSWORD_MSG.to_string(),
        ApiError::Transport(_) => "Server non raggiungibile".to_string(),
        other => format!("Accesso non riuscito: {other}"),
    }
}
