use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::forms::{EditField, EditForm, LoginForm};
use crate::leaderboard::{Leaderboard, RankBadge, build_leaderboard};
use crate::state::{AppState, DeleteTarget, Modal, Team};

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 9;
const NO_PLAYERS: &str = "Nessun giocatore";

pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.size();
    if state.loading {
        render_loading(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], state);
    frame.render_widget(Paragraph::new(status_line(state)), chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[2]);
    render_team_cards(frame, body[0], state);
    render_leaderboard(frame, body[1], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    render_modal(frame, area, state);

    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 20, area);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Caricamento...",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, popup);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "FANTA-VENGERS 2025-2026",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Dashboard Gestione Lega",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, rows[0]);

    let stats = state.stats.unwrap_or_default();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);

    render_stat_card(frame, cols[0], &stats.total_teams.to_string(), "SQUADRE ATTIVE");
    render_stat_card(frame, cols[1], &stats.total_prizes.to_string(), "PREMI ASSEGNATI");
    render_stat_card(
        frame,
        cols[2],
        &format!("€{}", stats.total_winnings),
        "VINCITE TOTALI",
    );
}

fn render_stat_card(frame: &mut Frame, area: Rect, value: &str, label: &str) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn status_line(state: &AppState) -> Line<'static> {
    if let Some(banner) = &state.banner {
        return Line::from(Span::styled(
            format!("! {banner}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let session = if state.is_admin() {
        Span::styled("● Accesso Admin Attivo", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            "Console di Gestione - Amministrazione Lega Fantacalcio",
            Style::default().fg(Color::Gray),
        )
    };
    Line::from(vec![
        session,
        Span::raw("  "),
        Span::styled(refresh_label(state), Style::default().fg(Color::DarkGray)),
    ])
}

fn refresh_label(state: &AppState) -> String {
    if state.refreshing {
        return "Aggiornamento...".to_string();
    }
    match state.last_refresh {
        Some(at) => format!("Aggiornato alle {}", at.format("%H:%M:%S")),
        None => String::new(),
    }
}

fn render_team_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Panoramica Squadre")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    if state.teams.is_empty() {
        let empty = Paragraph::new("Nessuna squadra").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let per_row = (inner.width / CARD_WIDTH).max(1) as usize;
    let card_width = inner.width / per_row as u16;
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let total_rows = state.teams.len().div_ceil(per_row);
    let (start, end) = visible_range(state.selected / per_row, total_rows, visible_rows);

    for (offset, row) in (start..end).enumerate() {
        let y = inner.y + offset as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        for col in 0..per_row {
            let idx = row * per_row + col;
            let Some(team) = state.teams.get(idx) else {
                break;
            };
            let card_area = Rect {
                x: inner.x + col as u16 * card_width,
                y,
                width: card_width,
                height,
            };
            render_team_card(frame, card_area, team, idx == state.selected, state.is_admin());
        }
    }
}

fn render_team_card(frame: &mut Frame, area: Rect, team: &Team, selected: bool, is_admin: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(team.name.clone())
        .borders(Borders::ALL)
        .border_style(border_style);
    let card = Paragraph::new(team_card_lines(team, is_admin))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

pub fn team_card_lines(team: &Team, is_admin: bool) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let players = if team.non_callable_players.trim().is_empty() {
        NO_PLAYERS.to_string()
    } else {
        team.non_callable_players
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        Line::from(Span::styled(team.owner.clone(), label)),
        Line::from(vec![
            Span::styled("Premi ", label),
            Span::styled(
                team.weekly_prizes.to_string(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Cambi ", label),
            Span::styled(
                team.remaining_changes.to_string(),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Vincite ", label),
            Span::styled(
                format!("€{}", team.total_winnings),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Crediti ", label),
            Span::styled(
                team.remaining_credits.to_string(),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];
    if is_admin {
        lines.push(Line::from(Span::styled(
            "[e] Modifica",
            Style::default().fg(Color::Cyan),
        )));
    }
    lines.push(Line::from(Span::styled("Non schierabili:", label)));
    lines.push(Line::from(players));
    lines
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Classifica Prestazioni")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let board = build_leaderboard(&state.teams);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let widths = leaderboard_columns();
    render_leaderboard_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let selected_rank = state
        .selected_team()
        .and_then(|team| board.rows.iter().position(|row| row.team.id == team.id))
        .unwrap_or(0);
    let (start, end) = visible_range(selected_rank, board.rows.len(), list_area.height as usize);
    for (i, row) in board.rows[start..end].iter().enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let team = format!("{} ({})", row.team.name, row.team.owner);
        render_cell_text(frame, cols[0], &format!(" {} ", row.rank), badge_style(row.badge));
        render_cell_text(frame, cols[1], &team, Style::default());
        render_cell_text(
            frame,
            cols[2],
            &row.team.weekly_prizes.to_string(),
            Style::default(),
        );
        render_cell_text(
            frame,
            cols[3],
            &format!("€{}", row.team.total_winnings),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        );
    }

    let footer = Paragraph::new(leaderboard_footer(&board))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(footer, sections[2]);
}

pub fn leaderboard_footer(board: &Leaderboard<'_>) -> String {
    format!("Totale Vincite Lega: €{}", board.total_winnings)
}

fn leaderboard_columns() -> [Constraint; 4] {
    [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(9),
    ]
}

fn render_leaderboard_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Pos", style);
    render_cell_text(frame, cols[1], "Squadra", style);
    render_cell_text(frame, cols[2], "Premi", style);
    render_cell_text(frame, cols[3], "Vincite", style);
}

fn badge_style(badge: RankBadge) -> Style {
    match badge {
        RankBadge::Gold => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        RankBadge::Silver => Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
            .add_modifier(Modifier::BOLD),
        RankBadge::Bronze => Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(205, 127, 50))
            .add_modifier(Modifier::BOLD),
        RankBadge::Plain => Style::default().fg(Color::DarkGray),
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, text_area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "Nessun messaggio".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn footer_text(state: &AppState) -> String {
    match &state.modal {
        Modal::Login(_) => "Invio Accedi | Esc Annulla",
        Modal::EditTeam(_) => {
            "Tab/↓ Campo successivo | ↑ Campo precedente | Invio Salva Modifiche | Esc Annulla"
        }
        Modal::ConfirmDelete(_) => "Invio/y Conferma | Esc/n Annulla",
        Modal::None if state.is_admin() => {
            "j/k Seleziona | e Modifica | x Elimina | o Esci | r Aggiorna | ? Aiuto | q Chiudi"
        }
        Modal::None => "j/k Seleziona | a Accesso Admin | r Aggiorna | ? Aiuto | q Chiudi",
    }
    .to_string()
}

fn render_modal(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.modal {
        Modal::None => {}
        Modal::Login(form) => {
            let popup = centered_rect(50, 40, area);
            frame.render_widget(Clear, popup);
            let paragraph = Paragraph::new(login_lines(form))
                .block(
                    Block::default()
                        .title("Accesso Amministrativo")
                        .borders(Borders::ALL),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, popup);
        }
        Modal::EditTeam(form) => {
            let popup = centered_rect(70, 70, area);
            frame.render_widget(Clear, popup);
            let paragraph = Paragraph::new(edit_lines(form))
                .block(
                    Block::default()
                        .title(format!("Modifica Squadra: {}", form.team_name))
                        .borders(Borders::ALL),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, popup);
        }
        Modal::ConfirmDelete(target) => {
            let popup = centered_rect(50, 30, area);
            frame.render_widget(Clear, popup);
            let paragraph = Paragraph::new(delete_lines(target))
                .block(Block::default().title("Elimina Squadra").borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, popup);
        }
    }
}

fn login_lines(form: &LoginForm) -> Vec<Line<'static>> {
    let entry = if form.password().is_empty() {
        Span::styled(
            "Inserisci password amministrativa",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(form.masked(), Style::default().fg(Color::Cyan))
    };

    let mut lines = vec![
        Line::from("Password"),
        Line::from(vec![Span::raw("> "), entry]),
        Line::from(""),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    if form.pending {
        lines.push(Line::from(Span::styled(
            "Verifica in corso...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Invio Accedi | Esc Annulla",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn edit_lines(form: &EditForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for field in EditField::ALL {
        let focused = field == form.focus;
        let marker = if focused { "> " } else { "  " };
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<27}", field.label()), style),
            Span::styled(format!("{}{cursor}", form.value(field)), style),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    if form.pending {
        lines.push(Line::from(Span::styled(
            "Salvataggio in corso...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Invio Salva Modifiche | Esc Annulla",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn delete_lines(target: &DeleteTarget) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("Eliminare la squadra {}?", target.team_name)),
        Line::from(Span::styled(
            "L'operazione non si può annullare.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    if let Some(error) = &target.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    if target.pending {
        lines.push(Line::from(Span::styled(
            "Eliminazione in corso...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FANTA-VENGERS - Aiuto",
        "",
        "Generale:",
        "  j/k o ↑/↓    Seleziona squadra",
        "  r            Aggiorna dati",
        "  a            Accesso admin",
        "  ?            Mostra/nascondi aiuto",
        "  Esc          Chiudi avviso",
        "  q            Chiudi dashboard",
        "",
        "Admin:",
        "  e / Invio    Modifica squadra",
        "  x            Elimina squadra",
        "  o            Esci dalla sessione admin",
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Aiuto").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
