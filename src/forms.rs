use std::fmt;

use crate::state::{Team, TeamPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    RemainingCredits,
    RemainingChanges,
    WeeklyPrizes,
    TotalWinnings,
    NonCallablePlayers,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        EditField::RemainingCredits,
        EditField::RemainingChanges,
        EditField::WeeklyPrizes,
        EditField::TotalWinnings,
        EditField::NonCallablePlayers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::RemainingCredits => "Crediti Rimanenti",
            EditField::RemainingChanges => "Cambi Rimanenti",
            EditField::WeeklyPrizes => "Premi Giornata",
            EditField::TotalWinnings => "Vincite Totali (€)",
            EditField::NonCallablePlayers => "Giocatori Non Schierabili",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, EditField::NonCallablePlayers)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Draft of the edit modal. Fields keep the raw text typed by the admin and
/// are only coerced when the patch is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub team_id: String,
    pub team_name: String,
    pub remaining_credits: String,
    pub remaining_changes: String,
    pub weekly_prizes: String,
    pub total_winnings: String,
    pub non_callable_players: String,
    pub focus: EditField,
    pub pending: bool,
    pub error: Option<String>,
}

impl EditForm {
    pub fn seed(team: &Team) -> Self {
        Self {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            remaining_credits: team.remaining_credits.to_string(),
            remaining_changes: team.remaining_changes.to_string(),
            weekly_prizes: team.weekly_prizes.to_string(),
            total_winnings: team.total_winnings.to_string(),
            non_callable_players: team.non_callable_players.clone(),
            focus: EditField::RemainingCredits,
            pending: false,
            error: None,
        }
    }

    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::RemainingCredits => &self.remaining_credits,
            EditField::RemainingChanges => &self.remaining_changes,
            EditField::WeeklyPrizes => &self.weekly_prizes,
            EditField::TotalWinnings => &self.total_winnings,
            EditField::NonCallablePlayers => &self.non_callable_players,
        }
    }

    fn value_mut(&mut self, field: EditField) -> &mut String {
        match field {
            EditField::RemainingCredits => &mut self.remaining_credits,
            EditField::RemainingChanges => &mut self.remaining_changes,
            EditField::WeeklyPrizes => &mut self.weekly_prizes,
            EditField::TotalWinnings => &mut self.total_winnings,
            EditField::NonCallablePlayers => &mut self.non_callable_players,
        }
    }

    pub fn input(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let focus = self.focus;
        self.value_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn patch(&self) -> TeamPatch {
        TeamPatch {
            remaining_credits: coerce_int(&self.remaining_credits),
            remaining_changes: coerce_int(&self.remaining_changes),
            weekly_prizes: coerce_int(&self.weekly_prizes),
            total_winnings: coerce_int(&self.total_winnings),
            non_callable_players: self.non_callable_players.clone(),
        }
    }
}

/// Leading-integer coercion: optional whitespace and sign, then as many digits
/// as are present. Anything without a leading digit becomes 0; overflow
/// saturates.
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    if seen_digit { value } else { 0 }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    password: String,
    pub pending: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn input(&mut self, c: char) {
        if !c.is_control() {
            self.password.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.password.pop();
    }

    pub fn masked(&self) -> String {
        "•".repeat(self.password.chars().count())
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("password", &"<redacted>")
            .field("pending", &self.pending)
            .field("error", &self.error)
            .finish()
    }
}
