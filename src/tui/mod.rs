mod dashboard;
mod layout;
mod operation;
mod result;
pub mod state;
mod theme;

use crate::config::Config;
use crate::maintenance::{spawn_operation, Operation, TaskEvent};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use state::{App, AppMode};
use std::io;
use tokio::sync::mpsc;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // worker → UI; drained only by this loop
    let (tx, mut rx) = mpsc::channel::<TaskEvent>(32);

    loop {
        clamp_scroll(&mut app, terminal.size()?.height);

        terminal.draw(|f| ui(f, &app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let term_height = terminal.size()?.height;
                    handle_key(key, &mut app, &tx, &mut terminal, term_height)?;
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.apply_task_event(event);
        }

        if app.should_quit {
            break;
        }
    }

    // nobody will read the result; let the worker stop at its next line
    app.request_cancel();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn handle_key(
    key: KeyEvent,
    app: &mut App,
    tx: &mpsc::Sender<TaskEvent>,
    terminal: &mut Term,
    term_height: u16,
) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.request_cancel();
        app.should_quit = true;
        return Ok(());
    }

    match app.mode {
        AppMode::Dashboard => handle_dashboard_key(key, app, tx, terminal)?,
        AppMode::Running => {
            if key.code == KeyCode::Esc {
                app.request_cancel();
            } else {
                operation::handle_operation_key(key, app, term_height);
            }
        }
        AppMode::Result => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.dismiss_result(),
            _ => {
                operation::handle_operation_key(key, app, term_height);
            }
        },
    }
    Ok(())
}

fn handle_dashboard_key(
    key: KeyEvent,
    app: &mut App,
    tx: &mpsc::Sender<TaskEvent>,
    terminal: &mut Term,
) -> Result<()> {
    // popups swallow the next key
    if app.notice.take().is_some() {
        return Ok(());
    }
    if app.show_about {
        app.show_about = false;
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => {
            let operation = app.selected_operation();
            start_operation(app, operation, tx, terminal)?;
        }
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            app.selected = index;
            start_operation(app, Operation::ALL[index], tx, terminal)?;
        }
        KeyCode::Char('l' | 'L') => app.cycle_language(),
        KeyCode::Char('a' | 'A') => app.show_about = true,
        _ => {}
    }
    Ok(())
}

/// Spawn `operation` unless one is already in flight.
fn start_operation(
    app: &mut App,
    operation: Operation,
    tx: &mpsc::Sender<TaskEvent>,
    terminal: &mut Term,
) -> Result<()> {
    if app.is_busy() {
        return Ok(());
    }

    if operation.is_elevated() && app.config.elevation.needs_terminal_auth() {
        match validate_sudo_tui(terminal) {
            Ok(true) => {}
            Ok(false) => {
                app.show_auth_failure(operation, None);
                return Ok(());
            }
            Err(e) => {
                log::error!("sudo validation failed: {:#}", e);
                app.show_auth_failure(operation, Some(e.to_string()));
                return Ok(());
            }
        }
    }

    let handle = spawn_operation(app.catalog.clone(), operation, tx.clone());
    app.begin_run(handle);
    Ok(())
}

/// Leave the TUI to run `sudo -v`, then restore it.
fn validate_sudo_tui(terminal: &mut Term) -> Result<bool> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    println!("🔐 sudo");
    println!();

    let status = std::process::Command::new("sudo").arg("-v").status();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    Ok(status?.success())
}

fn clamp_scroll(app: &mut App, term_height: u16) {
    let visible = layout::visible_content_height(term_height);
    match app.mode {
        AppMode::Running => {
            if let Some(run) = &mut app.run {
                // gauge and status line take four extra rows
                let visible = visible.saturating_sub(4);
                let max_scroll = run.lines.len().saturating_sub(visible);
                run.scroll = run.scroll.min(max_scroll);
            }
        }
        AppMode::Result => {
            let total = result::body_line_count(app);
            if let Some(state) = &mut app.result {
                state.scroll = state.scroll.min(total.saturating_sub(visible));
            }
        }
        AppMode::Dashboard => {}
    }
}

fn ui(f: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Dashboard => dashboard::render_dashboard(f, app),
        AppMode::Running => operation::render_running(f, app),
        AppMode::Result => result::render_result(f, app),
    }
}
