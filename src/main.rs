use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use fanta_dashboard::api::{HttpApi, LeagueApi};
use fanta_dashboard::config::Config;
use fanta_dashboard::demo::DemoApi;
use fanta_dashboard::state::{
    AppState, Delta, Intent, Modal, ProviderCommand, apply_delta, apply_intent,
};
use fanta_dashboard::{logging, sync, ui};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let intent = if self.state.modal.is_open() {
            modal_intent(&self.state.modal, key)
        } else {
            self.browse_intent(key)
        };
        if let Some(intent) = intent {
            self.dispatch(intent);
        }
    }

    fn browse_intent(&mut self, key: KeyEvent) -> Option<Intent> {
        if self.state.loading {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return None;
        }

        if self.state.help_overlay {
            return match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    None
                }
                KeyCode::Char('?') | KeyCode::Esc => Some(Intent::ToggleHelp),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('l') | KeyCode::Right => {
                Some(Intent::SelectNext)
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('h') | KeyCode::Left => {
                Some(Intent::SelectPrev)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Refresh),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::OpenLogin),
            KeyCode::Char('o') | KeyCode::Char('O') => Some(Intent::Logout),
            KeyCode::Char('e') | KeyCode::Enter => Some(Intent::EditSelected),
            KeyCode::Char('x') | KeyCode::Delete => Some(Intent::DeleteSelected),
            KeyCode::Char('?') => Some(Intent::ToggleHelp),
            KeyCode::Esc => Some(Intent::DismissBanner),
            _ => None,
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        let Some(cmd) = apply_intent(&mut self.state, intent) else {
            return;
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Sync worker unavailable");
        }
    }
}

fn modal_intent(modal: &Modal, key: KeyEvent) -> Option<Intent> {
    if let Modal::ConfirmDelete(_) = modal {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(Intent::Submit),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::CloseModal),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Intent::CloseModal),
        KeyCode::Enter => Some(Intent::Submit),
        KeyCode::Backspace => Some(Intent::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(Intent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Intent::PrevField),
        KeyCode::Char(c) => Some(Intent::Input(c)),
        _ => None,
    }
}

fn main() -> Result<()> {
    let config = Config::load();
    logging::init(&config)?;

    let api: Arc<dyn LeagueApi> = if config.demo {
        Arc::new(DemoApi::new(config.demo_password.clone()))
    } else {
        Arc::new(HttpApi::new(config.api_root())?)
    };

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    sync::spawn_provider(api, tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> Result<()> {
    let frame_budget = Duration::from_millis(100);

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui::draw(f, &app.state))?;

        if event::poll(frame_budget)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
